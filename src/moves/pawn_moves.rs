use crate::game_state::chess_types::{Color, Square};
use crate::moves::knight_moves::square_bit;

/// Diagonal capture targets, indexed by `[color][square]`.
pub const PAWN_ATTACKS: [[u64; 64]; 2] = [generate_pawn_attacks(1), generate_pawn_attacks(-1)];

#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    PAWN_ATTACKS[color.index()][square as usize]
}

/// Rank pawns of `color` start on.
#[inline]
pub const fn pawn_start_rank(color: Color) -> u8 {
    match color {
        Color::Light => 1,
        Color::Dark => 6,
    }
}

/// Rank on which pawns of `color` promote.
#[inline]
pub const fn promotion_rank(color: Color) -> u8 {
    match color {
        Color::Light => 7,
        Color::Dark => 0,
    }
}

const fn generate_pawn_attacks(direction: i32) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        table[sq] = square_bit(file - 1, rank + direction) | square_bit(file + 1, rank + direction);
        sq += 1;
    }

    table
}
