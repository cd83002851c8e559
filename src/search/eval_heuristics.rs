//! Structural evaluation terms layered on top of material and piece-square
//! scores. Every term is white-minus-black and independent of the others.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::move_generation::legal_move_shared::ray;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub const DOUBLED_PAWN_PENALTY: i32 = 15;
pub const ISOLATED_PAWN_PENALTY: i32 = 20;
pub const PASSED_PAWN_FACTOR: i32 = 5;
pub const ROOK_COORDINATION_BONUS: i32 = 25;
pub const KING_SHIELD_BONUS: i32 = 10;
pub const KNIGHT_OUTPOST_BONUS: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalHeuristic {
    PawnStructure,
    PassedPawns,
    RookCoordination,
    KingShield,
    KnightOutposts,
}

impl EvalHeuristic {
    pub const ALL: [EvalHeuristic; 5] = [
        EvalHeuristic::PawnStructure,
        EvalHeuristic::PassedPawns,
        EvalHeuristic::RookCoordination,
        EvalHeuristic::KingShield,
        EvalHeuristic::KnightOutposts,
    ];

    pub fn white_minus_black(self, game_state: &GameState) -> i32 {
        let term: fn(&GameState, Color) -> i32 = match self {
            EvalHeuristic::PawnStructure => pawn_structure,
            EvalHeuristic::PassedPawns => passed_pawns,
            EvalHeuristic::RookCoordination => rook_coordination,
            EvalHeuristic::KingShield => king_shield,
            EvalHeuristic::KnightOutposts => knight_outposts,
        };
        term(game_state, Color::Light) - term(game_state, Color::Dark)
    }
}

/// Rank counted from `color`'s own back rank.
#[inline]
fn relative_rank(color: Color, square: Square) -> u8 {
    match color {
        Color::Light => rank_of(square),
        Color::Dark => 7 - rank_of(square),
    }
}

fn pawn_file_counts(game_state: &GameState, color: Color) -> [i32; 8] {
    let pawn = Piece::new(color, PieceKind::Pawn);
    let mut counts = [0i32; 8];
    for (sq, piece) in game_state.pieces() {
        if piece == pawn {
            counts[file_of(sq) as usize] += 1;
        }
    }
    counts
}

/// Doubled pawns cost per extra pawn on a file; isolated pawns cost per pawn.
pub fn pawn_structure(game_state: &GameState, color: Color) -> i32 {
    let counts = pawn_file_counts(game_state, color);
    let mut score = 0;
    for file in 0..8usize {
        let count = counts[file];
        if count == 0 {
            continue;
        }
        score -= (count - 1) * DOUBLED_PAWN_PENALTY;

        let left = file > 0 && counts[file - 1] > 0;
        let right = file < 7 && counts[file + 1] > 0;
        if !left && !right {
            score -= count * ISOLATED_PAWN_PENALTY;
        }
    }
    score
}

pub fn is_passed_pawn(game_state: &GameState, color: Color, square: Square) -> bool {
    let enemy_pawn = Piece::new(color.opposite(), PieceKind::Pawn);
    let file = file_of(square) as i8;
    let own_rank = relative_rank(color, square);

    !game_state.pieces().any(|(sq, piece)| {
        piece == enemy_pawn
            && (file_of(sq) as i8 - file).abs() <= 1
            && relative_rank(color, sq) > own_rank
    })
}

/// Quadratic in how far the pawn has advanced.
pub fn passed_pawns(game_state: &GameState, color: Color) -> i32 {
    let pawn = Piece::new(color, PieceKind::Pawn);
    game_state
        .pieces()
        .filter(|&(sq, piece)| piece == pawn && is_passed_pawn(game_state, color, sq))
        .map(|(sq, _)| {
            let advance = relative_rank(color, sq) as i32;
            PASSED_PAWN_FACTOR * advance * advance
        })
        .sum()
}

/// Bonus for each pair of rooks that see each other along a rank or file.
pub fn rook_coordination(game_state: &GameState, color: Color) -> i32 {
    let rook = Some(Piece::new(color, PieceKind::Rook));
    let mut score = 0;
    for (sq, piece) in game_state.pieces() {
        if Some(piece) != rook {
            continue;
        }
        // Only look up and right so each pair is counted once.
        for &direction in &ROOK_DIRECTIONS[..2] {
            if ray(sq, direction).find_map(|s| game_state.piece_at(s)) == rook {
                score += ROOK_COORDINATION_BONUS;
            }
        }
    }
    score
}

/// Own pawns on the king's file and its neighbours, one or two ranks ahead.
pub fn king_shield(game_state: &GameState, color: Color) -> i32 {
    let king = game_state.king_square(color);
    let pawn = Some(Piece::new(color, PieceKind::Pawn));
    let forward = color.pawn_direction();
    let mut shield = 0;
    for file_delta in -1..=1 {
        for step in 1..=2 {
            if let Some(sq) = offset_square(king, file_delta, forward * step) {
                if game_state.piece_at(sq) == pawn {
                    shield += 1;
                }
            }
        }
    }
    shield * KING_SHIELD_BONUS
}

/// Knights on relative ranks 4-6 defended by an own pawn.
pub fn knight_outposts(game_state: &GameState, color: Color) -> i32 {
    let knight = Piece::new(color, PieceKind::Knight);
    let pawn = Some(Piece::new(color, PieceKind::Pawn));
    game_state
        .pieces()
        .filter(|&(sq, piece)| {
            piece == knight
                && (3..=5).contains(&relative_rank(color, sq))
                // Defenders sit where an enemy pawn on `sq` would attack.
                && squares_in_mask(pawn_attacks(color.opposite(), sq))
                    .any(|defender| game_state.piece_at(defender) == pawn)
        })
        .count() as i32
        * KNIGHT_OUTPOST_BONUS
}
