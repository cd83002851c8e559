use crate::game_state::chess_types::Square;

/// Target mask of every knight jump from each square.
pub const KNIGHT_ATTACKS: [u64; 64] = generate_knight_attacks();

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const fn generate_knight_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut i = 0usize;
        while i < KNIGHT_JUMPS.len() {
            attacks |= square_bit(file + KNIGHT_JUMPS[i].0, rank + KNIGHT_JUMPS[i].1);
            i += 1;
        }
        table[sq] = attacks;
        sq += 1;
    }

    table
}

/// Bit for `(file, rank)` or zero when off the board.
pub(crate) const fn square_bit(file: i32, rank: i32) -> u64 {
    if file < 0 || file > 7 || rank < 0 || rank > 7 {
        return 0;
    }
    1u64 << ((rank as usize) * 8 + (file as usize))
}
