use crate::game_state::chess_types::Square;
use crate::moves::knight_moves::square_bit;

/// Target mask of the eight single king steps from each square.
pub const KING_ATTACKS: [u64; 64] = generate_king_attacks();

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

const fn generate_king_attacks() -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as i32;
        let rank = (sq / 8) as i32;
        let mut attacks = 0u64;
        let mut df = -1;
        while df <= 1 {
            let mut dr = -1;
            while dr <= 1 {
                if df != 0 || dr != 0 {
                    attacks |= square_bit(file + df, rank + dr);
                }
                dr += 1;
            }
            df += 1;
        }
        table[sq] = attacks;
        sq += 1;
    }

    table
}
