//! FEN-to-GameState parser.
//!
//! Builds a fully-populated state from a Forsyth-Edwards Notation string,
//! including the king cache, Zobrist key and the game-ply counter. The two
//! clock fields are optional and default to `0 1`.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> ChessResult<GameState> {
    let mut parts = fen.split_whitespace();

    let board_part = parts
        .next()
        .ok_or_else(|| ChessErrors::fen("missing board layout"))?;
    let side_part = parts
        .next()
        .ok_or_else(|| ChessErrors::fen("missing side to move"))?;
    let castling_part = parts
        .next()
        .ok_or_else(|| ChessErrors::fen("missing castling rights"))?;
    let en_passant_part = parts
        .next()
        .ok_or_else(|| ChessErrors::fen("missing en-passant square"))?;
    let halfmove_part = parts.next().unwrap_or("0");
    let fullmove_part = parts.next().unwrap_or("1");

    if parts.next().is_some() {
        return Err(ChessErrors::fen("extra trailing fields"));
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = halfmove_part
        .parse::<u16>()
        .map_err(|_| ChessErrors::fen(format!("invalid halfmove clock: {halfmove_part}")))?;
    game_state.fullmove_number = fullmove_part
        .parse::<u16>()
        .map_err(|_| ChessErrors::fen(format!("invalid fullmove number: {fullmove_part}")))?
        .max(1);

    let dark_offset = u16::from(game_state.side_to_move == Color::Dark);
    game_state.game_ply = (game_state.fullmove_number - 1)
        .saturating_mul(2)
        .saturating_add(dark_offset);

    validate_kings(&game_state)?;
    game_state.refresh_derived_state()?;

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> ChessResult<()> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessErrors::fen("board layout must contain 8 ranks"));
    }

    for (fen_rank_idx, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_idx as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessErrors::fen(format!("invalid empty-square count '{ch}'")));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err(ChessErrors::fen("board rank has too many files"));
                }
                continue;
            }

            let piece = Piece::from_fen_char(ch)
                .ok_or_else(|| ChessErrors::fen(format!("invalid piece character '{ch}'")))?;

            if file >= 8 {
                return Err(ChessErrors::fen("board rank has too many files"));
            }

            game_state.squares[make_square(file, board_rank) as usize] = Some(piece);
            file += 1;
        }

        if file != 8 {
            return Err(ChessErrors::fen("board rank does not sum to 8 files"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::Light),
        "b" => Ok(Color::Dark),
        _ => Err(ChessErrors::fen(format!("invalid side to move: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights = 0;
    for ch in castling_part.chars() {
        rights |= match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => {
                return Err(ChessErrors::fen(format!(
                    "invalid castling rights character '{ch}'"
                )))
            }
        };
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let square = algebraic_to_square(en_passant_part)
        .map_err(|_| ChessErrors::fen(format!("invalid en-passant square: {en_passant_part}")))?;
    let rank = rank_of(square);
    if rank != 2 && rank != 5 {
        return Err(ChessErrors::fen(format!(
            "en-passant square must be on rank 3 or 6: {en_passant_part}"
        )));
    }

    Ok(Some(square))
}

fn validate_kings(game_state: &GameState) -> ChessResult<()> {
    for color in [Color::Light, Color::Dark] {
        match game_state.count_pieces(color, PieceKind::King) {
            1 => {}
            0 => return Err(ChessErrors::MissingKing(color)),
            n => {
                return Err(ChessErrors::fen(format!(
                    "{color:?} has {n} kings, expected exactly one"
                )))
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessErrors;
    use crate::game_state::chess_types::*;

    #[test]
    fn parses_start_position() {
        let game = parse_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .expect("start FEN should parse");
        assert_eq!(game.side_to_move, Color::Light);
        assert_eq!(game.castling_rights, CASTLE_ALL);
        assert_eq!(game.king_square(Color::Light), 4);
        assert_eq!(game.king_square(Color::Dark), 60);
        assert_eq!(game.game_ply, 0);
        assert_eq!(game.piece_at(3), Some(Piece::new(Color::Light, PieceKind::Queen)));
    }

    #[test]
    fn derives_game_ply_from_move_counters() {
        let game = parse_fen("4k3/8/8/8/8/8/8/4K3 b - - 12 30").expect("FEN should parse");
        assert_eq!(game.game_ply, 59);
        assert_eq!(game.halfmove_clock, 12);
    }

    #[test]
    fn clocks_are_optional() {
        let game = parse_fen("4k3/8/8/8/8/8/8/4K3 w - -").expect("short FEN should parse");
        assert_eq!(game.halfmove_clock, 0);
        assert_eq!(game.fullmove_number, 1);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8 w - - 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 x - - 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w KX - 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w - e4 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
        assert!(matches!(
            parse_fen("4k3/9/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra"),
            Err(ChessErrors::InvalidFen { .. })
        ));
    }

    #[test]
    fn requires_exactly_one_king_per_side() {
        assert_eq!(
            parse_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ChessErrors::MissingKing(Color::Dark))
        );
        assert!(matches!(
            parse_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(ChessErrors::InvalidFen { .. })
        ));
    }
}
