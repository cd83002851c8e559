//! Primitive board types shared by every subsystem.
//!
//! Squares are indexed `0 == a1`, `7 == h1`, `56 == a8`, `63 == h8`.

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank direction pawns of this color advance in.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }

    /// `+1` for Light, `-1` for Dark. Converts white-relative scores.
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::Light => 1,
            Color::Dark => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    /// Promotion choices, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

/// A colored piece occupying one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// FEN letter: uppercase for Light, lowercase for Dark.
    pub fn fen_char(self) -> char {
        let ch = self.kind.fen_char();
        match self.color {
            Color::Light => ch.to_ascii_uppercase(),
            Color::Dark => ch,
        }
    }

    pub fn from_fen_char(ch: char) -> Option<Self> {
        let kind = PieceKind::from_fen_char(ch)?;
        let color = if ch.is_ascii_uppercase() {
            Color::Light
        } else {
            Color::Dark
        };
        Some(Self { color, kind })
    }
}

/// Board square index (`0..=63`).
pub type Square = u8;

/// One board cell: empty or a piece.
pub type Cell = Option<Piece>;

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn make_square(file: u8, rank: u8) -> Square {
    rank * 8 + file
}

/// Step from `square` by a file/rank delta, `None` when it leaves the board.
#[inline]
pub fn offset_square(square: Square, file_delta: i8, rank_delta: i8) -> Option<Square> {
    let file = file_of(square) as i8 + file_delta;
    let rank = rank_of(square) as i8 + rank_delta;
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(make_square(file as u8, rank as u8))
    } else {
        None
    }
}

/// Iterate the squares set in a 64-bit target mask, lowest first.
#[inline]
pub fn squares_in_mask(mut mask: u64) -> impl Iterator<Item = Square> {
    std::iter::from_fn(move || {
        if mask == 0 {
            return None;
        }
        let sq = mask.trailing_zeros() as Square;
        mask &= mask - 1;
        Some(sq)
    })
}

/// Compact castling rights bitmask.
pub type CastlingRights = u8;

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub const CASTLE_ALL: CastlingRights = 0x0F;

/// Which of the four castling moves a move performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleKind {
    LightKingside,
    LightQueenside,
    DarkKingside,
    DarkQueenside,
}

impl CastleKind {
    pub const ALL: [CastleKind; 4] = [
        CastleKind::LightKingside,
        CastleKind::LightQueenside,
        CastleKind::DarkKingside,
        CastleKind::DarkQueenside,
    ];

    #[inline]
    pub const fn color(self) -> Color {
        match self {
            CastleKind::LightKingside | CastleKind::LightQueenside => Color::Light,
            CastleKind::DarkKingside | CastleKind::DarkQueenside => Color::Dark,
        }
    }

    #[inline]
    pub const fn right(self) -> CastlingRights {
        match self {
            CastleKind::LightKingside => CASTLE_LIGHT_KINGSIDE,
            CastleKind::LightQueenside => CASTLE_LIGHT_QUEENSIDE,
            CastleKind::DarkKingside => CASTLE_DARK_KINGSIDE,
            CastleKind::DarkQueenside => CASTLE_DARK_QUEENSIDE,
        }
    }

    /// `(king_from, king_to)`.
    #[inline]
    pub const fn king_squares(self) -> (Square, Square) {
        match self {
            CastleKind::LightKingside => (4, 6),
            CastleKind::LightQueenside => (4, 2),
            CastleKind::DarkKingside => (60, 62),
            CastleKind::DarkQueenside => (60, 58),
        }
    }

    /// `(rook_from, rook_to)`.
    #[inline]
    pub const fn rook_squares(self) -> (Square, Square) {
        match self {
            CastleKind::LightKingside => (7, 5),
            CastleKind::LightQueenside => (0, 3),
            CastleKind::DarkKingside => (63, 61),
            CastleKind::DarkQueenside => (56, 59),
        }
    }

    /// Squares strictly between king and rook that must be empty.
    pub const fn empty_squares(self) -> &'static [Square] {
        match self {
            CastleKind::LightKingside => &[5, 6],
            CastleKind::LightQueenside => &[1, 2, 3],
            CastleKind::DarkKingside => &[61, 62],
            CastleKind::DarkQueenside => &[57, 58, 59],
        }
    }

    /// Squares the king crosses or lands on; none may be attacked.
    pub const fn king_path(self) -> &'static [Square] {
        match self {
            CastleKind::LightKingside => &[5, 6],
            CastleKind::LightQueenside => &[3, 2],
            CastleKind::DarkKingside => &[61, 62],
            CastleKind::DarkQueenside => &[59, 58],
        }
    }

    pub fn for_color(color: Color) -> [CastleKind; 2] {
        match color {
            Color::Light => [CastleKind::LightKingside, CastleKind::LightQueenside],
            Color::Dark => [CastleKind::DarkKingside, CastleKind::DarkQueenside],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_square_respects_board_edges() {
        assert_eq!(offset_square(0, -1, 0), None);
        assert_eq!(offset_square(7, 1, 0), None);
        assert_eq!(offset_square(7, 0, 1), Some(15));
        assert_eq!(offset_square(63, 0, 1), None);
        // h1 knight jump to the "next rank a-file" must not wrap.
        assert_eq!(offset_square(7, 2, 1), None);
    }

    #[test]
    fn squares_in_mask_yields_set_bits_in_order() {
        let squares: Vec<Square> = squares_in_mask((1 << 3) | (1 << 40) | (1 << 63)).collect();
        assert_eq!(squares, vec![3, 40, 63]);
        assert_eq!(squares_in_mask(0).count(), 0);
    }

    #[test]
    fn piece_fen_chars_round_trip() {
        for ch in ['P', 'n', 'B', 'r', 'Q', 'k'] {
            let piece = Piece::from_fen_char(ch).expect("valid piece letter");
            assert_eq!(piece.fen_char(), ch);
        }
        assert!(Piece::from_fen_char('x').is_none());
    }
}
