//! Move application.
//!
//! `apply_move` never mutates its input: it copies the position, performs the
//! move (including the rook hop of castling, the off-square pawn removal of en
//! passant and promotion), then updates rights, clocks, king cache and hash.
//! Legality is the caller's concern; this only validates that the from-square
//! holds a piece of the side to move.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::moves::move_descriptions::MoveDescription;
use crate::search::zobrist::compute_zobrist_key;

pub fn apply_move(game_state: &GameState, mv: &MoveDescription) -> ChessResult<GameState> {
    let moving_color = game_state.side_to_move;
    let moved = game_state
        .piece_at(mv.from)
        .ok_or(ChessErrors::EmptyFromSquare(mv.from))?;
    if moved.color != moving_color {
        return Err(ChessErrors::WrongSideToMove(mv.from));
    }

    let mut next = *game_state;
    let captured_on_target = next.squares[mv.to as usize].take();

    next.squares[mv.from as usize] = None;

    if let Some(capture_sq) = mv.en_passant_capture_square {
        next.squares[capture_sq as usize] = None;
    }

    let placed_kind = mv.promotion_piece.unwrap_or(moved.kind);
    next.squares[mv.to as usize] = Some(Piece::new(moving_color, placed_kind));

    if let Some(kind) = mv.castle_kind {
        let (rook_from, rook_to) = kind.rook_squares();
        let rook = next.squares[rook_from as usize].take();
        next.squares[rook_to as usize] = rook;
    }

    if moved.kind == PieceKind::King {
        next.king_squares[moving_color.index()] = mv.to;
    }

    next.castling_rights &= !(rights_touched_by(mv.from) | rights_touched_by(mv.to));

    next.en_passant_square = mv.new_en_passant_target;

    let is_capture = captured_on_target.is_some() || mv.en_passant_capture_square.is_some();
    if moved.kind == PieceKind::Pawn || is_capture {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }

    next.side_to_move = moving_color.opposite();
    next.game_ply = next.game_ply.saturating_add(1);
    next.zobrist_key = compute_zobrist_key(&next);

    Ok(next)
}

/// Castling rights lost when a piece leaves or lands on `square`.
#[inline]
fn rights_touched_by(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_LIGHT_QUEENSIDE,
        4 => CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE,
        7 => CASTLE_LIGHT_KINGSIDE,
        56 => CASTLE_DARK_QUEENSIDE,
        60 => CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE,
        63 => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}
