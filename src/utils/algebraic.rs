//! Square conversions for coordinate notation (`e4` and friends).

use crate::chess_errors::{ChessErrors, ChessResult};
use crate::game_state::chess_types::{file_of, rank_of, Square};

/// Convert a coordinate such as `"e4"` to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessErrors::InvalidSquare(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessErrors::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to a coordinate such as `"e4"`.
#[inline]
pub fn square_to_algebraic(square: Square) -> ChessResult<String> {
    if square > 63 {
        return Err(ChessErrors::InvalidSquare(square.to_string()));
    }

    let file_char = char::from(b'a' + file_of(square));
    let rank_char = char::from(b'1' + rank_of(square));
    Ok(format!("{file_char}{rank_char}"))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};
    use crate::chess_errors::ChessErrors;

    #[test]
    fn round_trip_square_conversions() {
        assert_eq!(algebraic_to_square("a1").expect("a1 should parse"), 0);
        assert_eq!(algebraic_to_square("h8").expect("h8 should parse"), 63);
        assert_eq!(algebraic_to_square("e4").expect("e4 should parse"), 28);
        assert_eq!(square_to_algebraic(0).expect("0 should convert"), "a1");
        assert_eq!(square_to_algebraic(63).expect("63 should convert"), "h8");
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        assert_eq!(
            algebraic_to_square("i9"),
            Err(ChessErrors::InvalidSquare("i9".to_owned()))
        );
        assert!(algebraic_to_square("e").is_err());
        assert!(square_to_algebraic(64).is_err());
    }
}
