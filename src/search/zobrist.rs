//! Zobrist hashing for transposition-table keys.
//!
//! Keys come from a seeded `StdRng`, so hashes are stable from run to run.
//! A key covers piece placement, side to move, castling rights and the
//! en-passant file.

use std::sync::OnceLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game_state::{chess_types::*, game_state::GameState};

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
    en_passant_file: [u64; 8],
}

const ZOBRIST_SEED: u64 = 0x7468_6f72_6e5f_7a62;

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
    let mut tables = ZobristTables {
        piece_square: [[[0; 64]; 6]; 2],
        side_to_move: rng.random(),
        castling: [0; 16],
        en_passant_file: [0; 8],
    };

    tables
        .piece_square
        .iter_mut()
        .flatten()
        .flatten()
        .chain(tables.castling.iter_mut())
        .chain(tables.en_passant_file.iter_mut())
        .for_each(|key| *key = rng.random());

    tables
}

#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.color.index()][piece.kind.index()][square as usize]
}

#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & CASTLE_ALL) as usize]
}

#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Xored in when Dark is to move.
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Compute the full position key from scratch.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = game_state
        .pieces()
        .fold(0u64, |acc, (sq, piece)| acc ^ piece_square_key(piece, sq));

    if game_state.side_to_move == Color::Dark {
        key ^= side_to_move_key();
    }

    key ^= castling_key(game_state.castling_rights);

    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_file_key(file_of(ep_square));
    }

    key
}
