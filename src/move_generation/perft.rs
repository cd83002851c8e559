//! Perft node counting with a per-leaf breakdown, plus `divide` for
//! pinpointing generator bugs one root move at a time.

use crate::chess_errors::ChessResult;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::gives_check;
use crate::move_generation::move_generator::{GeneratedMove, MoveGenerator};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
    pub checkmates: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

pub fn perft<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let root_moves = generator.generate_legal_moves(game_state)?;
    let mut total = PerftCounts::default();

    for mv in root_moves {
        perft_recurse(generator, &mv, depth, 1, &mut total)?;
    }

    Ok(total)
}

/// Leaf counts below each root move, in generation order.
pub fn divide<G: MoveGenerator>(
    generator: &G,
    game_state: &GameState,
    depth: u8,
) -> ChessResult<Vec<(String, PerftCounts)>> {
    let mut out = Vec::new();
    if depth == 0 {
        return Ok(out);
    }

    for mv in generator.generate_legal_moves(game_state)? {
        let mut local = PerftCounts::default();
        perft_recurse(generator, &mv, depth, 1, &mut local)?;
        out.push((mv.move_description.to_long_algebraic(), local));
    }

    Ok(out)
}

fn perft_recurse<G: MoveGenerator>(
    generator: &G,
    mv: &GeneratedMove,
    search_depth: u8,
    current_depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    if current_depth == search_depth {
        let description = &mv.move_description;
        let mut leaf = PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        };

        if description.is_capture() {
            leaf.captures = 1;
        }
        if description.is_en_passant() {
            leaf.en_passant = 1;
        }
        if description.is_castle() {
            leaf.castles = 1;
        }
        if description.is_promotion() {
            leaf.promotions = 1;
        }
        if gives_check(&mv.game_after_move) {
            leaf.checks = 1;
            if generator
                .generate_legal_moves(&mv.game_after_move)?
                .is_empty()
            {
                leaf.checkmates = 1;
            }
        }

        counts.merge(leaf);
        return Ok(());
    }

    let moves = generator.generate_legal_moves(&mv.game_after_move)?;
    for child in moves {
        perft_recurse(generator, &child, search_depth, current_depth + 1, counts)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::move_generation::legal_move_generator::LegalMoveGenerator;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

    fn nodes(fen: &str, depth: u8) -> usize {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        perft(&LegalMoveGenerator, &game, depth)
            .expect("perft should run")
            .nodes
    }

    #[test]
    fn perft_depth_zero_counts_single_node() {
        let counts = perft(&LegalMoveGenerator, &GameState::new_game(), 0).expect("perft");
        assert_eq!(
            counts,
            PerftCounts {
                nodes: 1,
                ..PerftCounts::default()
            }
        );
    }

    #[test]
    fn start_position_perft() {
        let game = GameState::new_game();
        assert_eq!(perft(&LegalMoveGenerator, &game, 1).expect("perft").nodes, 20);
        assert_eq!(perft(&LegalMoveGenerator, &game, 2).expect("perft").nodes, 400);
        let depth3 = perft(&LegalMoveGenerator, &game, 3).expect("perft");
        assert_eq!(
            depth3,
            PerftCounts {
                nodes: 8902,
                captures: 34,
                en_passant: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
    }

    #[test]
    fn kiwipete_perft() {
        assert_eq!(nodes(KIWIPETE, 1), 48);
        let game = GameState::from_fen(KIWIPETE).expect("FEN should parse");
        let depth2 = perft(&LegalMoveGenerator, &game, 2).expect("perft");
        assert_eq!(depth2.nodes, 2039);
        assert_eq!(depth2.captures, 351);
        assert_eq!(depth2.en_passant, 1);
        assert_eq!(depth2.castles, 91);
        assert_eq!(depth2.checks, 3);
    }

    #[test]
    fn endgame_position_perft() {
        assert_eq!(nodes(POSITION_3, 1), 14);
        assert_eq!(nodes(POSITION_3, 2), 191);
        let game = GameState::from_fen(POSITION_3).expect("FEN should parse");
        let depth3 = perft(&LegalMoveGenerator, &game, 3).expect("perft");
        assert_eq!(depth3.nodes, 2812);
        assert_eq!(depth3.captures, 209);
        assert_eq!(depth3.en_passant, 2);
        assert_eq!(depth3.checks, 267);
    }

    #[test]
    fn promotion_heavy_positions_perft() {
        assert_eq!(nodes(POSITION_4, 1), 6);
        assert_eq!(nodes(POSITION_4, 2), 264);
        assert_eq!(nodes(POSITION_5, 1), 44);
        assert_eq!(nodes(POSITION_5, 2), 1486);
    }

    #[test]
    fn divide_sums_to_perft() {
        let game = GameState::new_game();
        let split = divide(&LegalMoveGenerator, &game, 2).expect("divide");
        assert_eq!(split.len(), 20);
        assert!(split.iter().all(|(_, counts)| counts.nodes == 20));
        let total: usize = split.iter().map(|(_, counts)| counts.nodes).sum();
        assert_eq!(total, 400);
    }
}
