//! Move representation.
//!
//! A `MoveDescription` is only meaningful relative to the position it was
//! generated from: it records the moving piece, what it captures and which
//! special rule (castling, en passant, double push, promotion) applies.

use std::fmt;

use crate::game_state::chess_types::{file_of, rank_of, CastleKind, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveDescription {
    pub from: Square,
    pub to: Square,
    pub moved_piece: PieceKind,
    pub captured_piece: Option<PieceKind>,
    pub promotion_piece: Option<PieceKind>,
    pub castle_kind: Option<CastleKind>,
    /// Square of the pawn removed by an en-passant capture (differs from `to`).
    pub en_passant_capture_square: Option<Square>,
    /// Target square created by a double pawn push, valid for one ply.
    pub new_en_passant_target: Option<Square>,
}

impl MoveDescription {
    #[inline]
    pub const fn quiet(from: Square, to: Square, moved_piece: PieceKind) -> Self {
        Self {
            from,
            to,
            moved_piece,
            captured_piece: None,
            promotion_piece: None,
            castle_kind: None,
            en_passant_capture_square: None,
            new_en_passant_target: None,
        }
    }

    #[inline]
    pub const fn capture(
        from: Square,
        to: Square,
        moved_piece: PieceKind,
        captured_piece: PieceKind,
    ) -> Self {
        let mut mv = Self::quiet(from, to, moved_piece);
        mv.captured_piece = Some(captured_piece);
        mv
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion_piece: PieceKind) -> Self {
        self.promotion_piece = Some(promotion_piece);
        self
    }

    #[inline]
    pub const fn double_push(from: Square, to: Square, en_passant_target: Square) -> Self {
        let mut mv = Self::quiet(from, to, PieceKind::Pawn);
        mv.new_en_passant_target = Some(en_passant_target);
        mv
    }

    #[inline]
    pub const fn en_passant(from: Square, to: Square, captured_square: Square) -> Self {
        let mut mv = Self::capture(from, to, PieceKind::Pawn, PieceKind::Pawn);
        mv.en_passant_capture_square = Some(captured_square);
        mv
    }

    #[inline]
    pub const fn castle(kind: CastleKind) -> Self {
        let (from, to) = kind.king_squares();
        let mut mv = Self::quiet(from, to, PieceKind::King);
        mv.castle_kind = Some(kind);
        mv
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured_piece.is_some()
    }

    #[inline]
    pub const fn is_promotion(&self) -> bool {
        self.promotion_piece.is_some()
    }

    #[inline]
    pub const fn is_en_passant(&self) -> bool {
        self.en_passant_capture_square.is_some()
    }

    #[inline]
    pub const fn is_castle(&self) -> bool {
        self.castle_kind.is_some()
    }

    /// Captures and promotions.
    #[inline]
    pub const fn is_tactical(&self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// True when both moves name the same squares and promotion piece.
    #[inline]
    pub fn same_coordinates(&self, other: &MoveDescription) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.promotion_piece == other.promotion_piece
    }

    /// Coordinate notation, e.g. `e2e4` or `a7a8q`.
    pub fn to_long_algebraic(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MoveDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sq in [self.from, self.to] {
            write!(
                f,
                "{}{}",
                char::from(b'a' + file_of(sq)),
                char::from(b'1' + rank_of(sq))
            )?;
        }
        if let Some(promo) = self.promotion_piece {
            write!(f, "{}", promo.fen_char())?;
        }
        Ok(())
    }
}
