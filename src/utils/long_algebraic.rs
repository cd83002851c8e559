//! Coordinate move notation (`e2e4`, `e7e8q`).
//!
//! Parsing resolves the string against the legal moves of the position, so a
//! successfully parsed move is always legal and carries its full description
//! (captured piece, castling, en passant).

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::PieceKind, game_state::GameState};
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::move_generation::move_generator::GeneratedMove;
use crate::moves::move_descriptions::MoveDescription;
use crate::utils::algebraic::algebraic_to_square;

#[inline]
pub fn move_description_to_long_algebraic(move_description: &MoveDescription) -> String {
    move_description.to_long_algebraic()
}

pub fn long_algebraic_to_move_description(
    long_algebraic: &str,
    game_state: &GameState,
) -> ChessResult<MoveDescription> {
    find_legal_move(long_algebraic, game_state).map(|generated| generated.move_description)
}

/// Resolve a coordinate move to the matching legal move and its result.
pub fn find_legal_move(long_algebraic: &str, game_state: &GameState) -> ChessResult<GeneratedMove> {
    let (from, to, promotion) = parse_coordinates(long_algebraic)?;

    generate_legal_moves(game_state)?
        .into_iter()
        .find(|generated| {
            let mv = &generated.move_description;
            mv.from == from && mv.to == to && mv.promotion_piece == promotion
        })
        .ok_or_else(|| ChessErrors::IllegalMove {
            mv: long_algebraic.to_owned(),
            fen: game_state.get_fen(),
        })
}

fn parse_coordinates(
    long_algebraic: &str,
) -> ChessResult<(u8, u8, Option<PieceKind>)> {
    let invalid = || ChessErrors::InvalidMoveString(long_algebraic.to_owned());

    if !long_algebraic.is_ascii() || !(4..=5).contains(&long_algebraic.len()) {
        return Err(invalid());
    }

    let from = algebraic_to_square(&long_algebraic[0..2]).map_err(|_| invalid())?;
    let to = algebraic_to_square(&long_algebraic[2..4]).map_err(|_| invalid())?;
    let promotion = match long_algebraic.as_bytes().get(4) {
        None => None,
        Some(b'q') => Some(PieceKind::Queen),
        Some(b'r') => Some(PieceKind::Rook),
        Some(b'b') => Some(PieceKind::Bishop),
        Some(b'n') => Some(PieceKind::Knight),
        Some(_) => return Err(invalid()),
    };

    Ok((from, to, promotion))
}

#[cfg(test)]
mod tests {
    use super::{find_legal_move, long_algebraic_to_move_description};
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::{CastleKind, PieceKind};
    use crate::game_state::game_state::GameState;

    #[test]
    fn parses_legal_moves_with_full_detail() {
        let game = GameState::new_game();
        let mv = long_algebraic_to_move_description("e2e4", &game).expect("e2e4 is legal");
        assert_eq!(mv.new_en_passant_target, Some(20));

        let castle = GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 0 1")
            .expect("FEN should parse");
        let mv = long_algebraic_to_move_description("e8c8", &castle).expect("O-O-O is legal");
        assert_eq!(mv.castle_kind, Some(CastleKind::DarkQueenside));
    }

    #[test]
    fn promotion_suffix_selects_piece() {
        let game = GameState::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let generated = find_legal_move("a7a8n", &game).expect("underpromotion is legal");
        assert_eq!(generated.move_description.promotion_piece, Some(PieceKind::Knight));
        // Promotion without a suffix is not a legal move.
        assert!(matches!(
            find_legal_move("a7a8", &game),
            Err(ChessErrors::IllegalMove { .. })
        ));
    }

    #[test]
    fn rejects_malformed_and_illegal_strings() {
        let game = GameState::new_game();
        assert_eq!(
            long_algebraic_to_move_description("e2e9", &game),
            Err(ChessErrors::InvalidMoveString("e2e9".to_owned()))
        );
        assert_eq!(
            long_algebraic_to_move_description("e7e8k", &game),
            Err(ChessErrors::InvalidMoveString("e7e8k".to_owned()))
        );
        assert!(matches!(
            long_algebraic_to_move_description("e2e5", &game),
            Err(ChessErrors::IllegalMove { .. })
        ));
    }
}
