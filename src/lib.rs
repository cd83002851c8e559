//! Crate root module declarations for the Thorn Chess engine.
//!
//! Board representation and strict-legal move generation sit at the bottom,
//! the evaluator and alpha-beta search above them, and the engine plus the
//! UCI front-end on top. Binaries, benches and tests import the stable module
//! paths declared here.

pub mod chess_errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
}

pub mod moves {
    pub mod bishop_moves;
    pub mod king_moves;
    pub mod knight_moves;
    pub mod move_descriptions;
    pub mod pawn_moves;
    pub mod queen_moves;
    pub mod rook_moves;
}

pub mod move_generation {
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
    pub mod legal_move_shared;
    pub mod legal_moves_bishop;
    pub mod legal_moves_king;
    pub mod legal_moves_knight;
    pub mod legal_moves_pawn;
    pub mod legal_moves_queen;
    pub mod legal_moves_rook;
    pub mod move_generator;
    pub mod perft;
}

pub mod search {
    pub mod board_scoring;
    pub mod complexity;
    pub mod eval_heuristics;
    pub mod iterative_deepening;
    pub mod move_ordering;
    pub mod quiescence;
    pub mod search_context;
    pub mod transposition_table;
    pub mod zobrist;
}

pub mod tables {
    pub mod endgame_tablebase;
    pub mod opening_book;
    pub mod piece_square_tables;
}

pub mod engines {
    pub mod engine_config;
    pub mod engine_iterative;
    pub mod engine_trait;
    pub mod time_management;
}

pub mod uci {
    pub mod uci_top;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod long_algebraic;
    pub mod render_game_state;
}
