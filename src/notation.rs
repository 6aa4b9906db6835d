// src/notation.rs
//! Coordinate notation for squares and moves (`e4`, `e2e4`, `a7a8q`).

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

use crate::error::NotationError;
use crate::types::{Move, PieceKind, Square};

lazy_static! {
    static ref MOVE_PATTERN: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([qrbnQRBN])?$").expect("move pattern is a valid regex");
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file_char = (b'a' + self.column() - 1) as char;
        write!(f, "{}{}", file_char, self.row())
    }
}

impl FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(NotationError::InvalidSquare(s.to_string()));
        }
        let column = match bytes[0] { b'a'..=b'h' => bytes[0] - b'a' + 1, _ => 0 };
        let row = match bytes[1] { b'1'..=b'8' => bytes[1] - b'0', _ => 0 };
        Square::new(row, column).map_err(|_| NotationError::InvalidSquare(s.to_string()))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.letter())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = NotationError;

    /// Parses coordinate notation. Validates format only, never legality.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let caps = MOVE_PATTERN
            .captures(trimmed)
            .ok_or_else(|| NotationError::InvalidFormat(trimmed.to_string()))?;

        let from: Square = caps[1].parse()?;
        let to: Square = caps[2].parse()?;
        let promotion = caps
            .get(3)
            .and_then(|m| m.as_str().chars().next())
            .and_then(PieceKind::from_letter);

        Ok(Move { from, to, promotion })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squares_print_algebraic() {
        assert_eq!(Square::new(1, 1).unwrap().to_string(), "a1");
        assert_eq!(Square::new(4, 5).unwrap().to_string(), "e4");
        assert_eq!(Square::new(8, 8).unwrap().to_string(), "h8");
    }

    #[test]
    fn squares_parse() {
        assert_eq!("e2".parse::<Square>(), Ok(Square::new(2, 5).unwrap()));
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
    }

    #[test]
    fn moves_parse_with_optional_promotion() {
        let mv: Move = "e2e4".parse().unwrap();
        assert_eq!(mv, Move::new(Square::new(2, 5).unwrap(), Square::new(4, 5).unwrap()));

        let promo: Move = " a7a8N ".parse().unwrap();
        assert_eq!(promo.promotion, Some(PieceKind::Knight));
        assert_eq!(promo.to_string(), "a7a8n");
    }

    #[test]
    fn malformed_moves_are_rejected() {
        for bad in ["", "e2", "e2e9", "e2e4k", "O-O", "e2-e4"] {
            assert!(bad.parse::<Move>().is_err(), "accepted {:?}", bad);
        }
    }
}
