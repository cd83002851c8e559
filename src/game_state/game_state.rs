//! Core board state representation.
//!
//! `GameState` is a 64-cell mailbox plus turn, castling, en-passant and clock
//! fields. It is small and `Copy`, so search branches by cloning instead of
//! make/unmake. The king-square cache and Zobrist key are maintained by
//! `apply_move` and the FEN parser.

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::*;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameState {
    pub squares: [Cell; 64],

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    /// Cached king locations indexed by `Color::index()`.
    pub king_squares: [Square; 2],

    pub zobrist_key: u64,

    /// Half-moves played in the game so far. Drives phase detection.
    pub game_ply: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            squares: [None; 64],
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            king_squares: [0; 2],
            zobrist_key: 0,
            game_ply: 0,
        }
    }
}

impl GameState {
    /// Empty board, Light to move. Callers must place both kings and call
    /// `refresh_derived_state` before handing the state to move generation.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Standard starting position.
    pub fn new_game() -> Self {
        let mut state = Self::new_empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            state.squares[make_square(file, 0) as usize] = Some(Piece::new(Color::Light, *kind));
            state.squares[make_square(file, 1) as usize] =
                Some(Piece::new(Color::Light, PieceKind::Pawn));
            state.squares[make_square(file, 6) as usize] =
                Some(Piece::new(Color::Dark, PieceKind::Pawn));
            state.squares[make_square(file, 7) as usize] = Some(Piece::new(Color::Dark, *kind));
        }
        state.castling_rights = CASTLE_ALL;
        state.king_squares = [4, 60];
        state.zobrist_key = compute_zobrist_key(&state);
        state
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Cell {
        self.squares[square as usize]
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.squares[square as usize].is_none()
    }

    /// Piece on `square` if it belongs to `color`.
    #[inline]
    pub fn piece_of_color(&self, square: Square, color: Color) -> Option<PieceKind> {
        match self.squares[square as usize] {
            Some(piece) if piece.color == color => Some(piece.kind),
            _ => None,
        }
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastlingRights) -> bool {
        self.castling_rights & right != 0
    }

    /// Iterate `(square, piece)` over occupied cells.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(sq, cell)| cell.map(|piece| (sq as Square, piece)))
    }

    pub fn piece_count(&self) -> usize {
        self.squares.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn count_pieces(&self, color: Color, kind: PieceKind) -> usize {
        self.squares
            .iter()
            .filter(|cell| **cell == Some(Piece::new(color, kind)))
            .count()
    }

    /// Recompute king cache and hash from the board. Used after bulk edits.
    pub fn refresh_derived_state(&mut self) -> ChessResult<()> {
        for color in [Color::Light, Color::Dark] {
            let king = self
                .find_king(color)
                .ok_or(ChessErrors::MissingKing(color))?;
            self.king_squares[color.index()] = king;
        }
        self.zobrist_key = compute_zobrist_key(self);
        Ok(())
    }

    /// Check that the king cache agrees with the board.
    pub fn verify_king_squares(&self) -> ChessResult<()> {
        for color in [Color::Light, Color::Dark] {
            let cached = self.king_square(color);
            if self.piece_at(cached) != Some(Piece::new(color, PieceKind::King)) {
                return Err(ChessErrors::KingSquareMismatch {
                    color,
                    cached,
                    actual: self.find_king(color),
                });
            }
        }
        Ok(())
    }

    fn find_king(&self, color: Color) -> Option<Square> {
        let king = Some(Piece::new(color, PieceKind::King));
        self.squares
            .iter()
            .position(|cell| *cell == king)
            .map(|sq| sq as Square)
    }
}
