// src/types.rs
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::SquareError;

// --- Enums and Basic Structs ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color { White, Black }

impl Color {
    pub fn opponent(&self) -> Color {
        match self { Color::White => Color::Black, Color::Black => Color::White }
    }

    /// Direction a pawn of this color advances in, as a row delta.
    pub fn forward(&self) -> i8 {
        match self { Color::White => 1, Color::Black => -1 }
    }

    /// Row pawns of this color start on.
    pub fn pawn_row(&self) -> u8 {
        match self { Color::White => 2, Color::Black => 7 }
    }

    /// Row a pawn of this color promotes on.
    pub fn last_row(&self) -> u8 {
        match self { Color::White => 8, Color::Black => 1 }
    }

    pub(crate) fn index(&self) -> usize {
        match self { Color::White => 0, Color::Black => 1 }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self { Color::White => f.write_str("White"), Color::Black => f.write_str("Black") }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PieceKind { King, Queen, Rook, Bishop, Knight, Pawn }

impl PieceKind {
    /// Kinds a pawn may promote to, in the order promotion variants are generated.
    pub const PROMOTIONS: [PieceKind; 4] = [PieceKind::Queen, PieceKind::Rook, PieceKind::Bishop, PieceKind::Knight];

    pub fn is_promotion_target(&self) -> bool {
        !matches!(self, PieceKind::King | PieceKind::Pawn)
    }

    pub(crate) fn letter(&self) -> char {
        match self {
            PieceKind::Pawn => 'p', PieceKind::Knight => 'n', PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r', PieceKind::Queen => 'q', PieceKind::King => 'k',
        }
    }

    pub(crate) fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn), 'n' => Some(PieceKind::Knight), 'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook), 'q' => Some(PieceKind::Queen), 'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub fn new(color: Color, kind: PieceKind) -> Self { Piece { color, kind } }

    pub fn value(&self) -> u32 {
        match self.kind {
            PieceKind::Pawn => 1, PieceKind::Knight => 3, PieceKind::Bishop => 3,
            PieceKind::Rook => 5, PieceKind::Queen => 9, PieceKind::King => 0,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.letter();
        let symbol = match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black => symbol,
        };
        write!(f, "{}", symbol)
    }
}

// --- Squares ---

/// A board coordinate. `row` is the rank and `column` the file, both `1..=8`,
/// with `(1, 1)` being a1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    row: u8,
    column: u8,
}

impl Square {
    pub fn new(row: u8, column: u8) -> Result<Self, SquareError> {
        if (1..=8).contains(&row) && (1..=8).contains(&column) {
            Ok(Square { row, column })
        } else {
            Err(SquareError::OutOfRange { row, column })
        }
    }

    pub fn row(&self) -> u8 { self.row }
    pub fn column(&self) -> u8 { self.column }

    /// Index 0..64, a1 = 0, b1 = 1, ..., h8 = 63.
    pub fn index(&self) -> usize {
        (self.row as usize - 1) * 8 + (self.column as usize - 1)
    }

    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Square { row: (index / 8) as u8 + 1, column: (index % 8) as u8 + 1 }
    }

    /// The square `(dr, dc)` away, or `None` past the edge.
    pub fn offset(&self, dr: i8, dc: i8) -> Option<Square> {
        let row = self.row as i8 + dr;
        let column = self.column as i8 + dc;
        if (1..=8).contains(&row) && (1..=8).contains(&column) {
            Some(Square { row: row as u8, column: column as u8 })
        } else {
            None
        }
    }

    /// All 64 squares, a1 first.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

// Squares travel as algebraic text so they can key JSON maps.
impl Serialize for Square {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Square {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// --- Move Representation ---
#[derive(Debug, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    #[serde(default)]
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Move { from, to, promotion: None }
    }

    pub fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Move { from, to, promotion: Some(promotion) }
    }

    /// Legality is keyed on the coordinates alone; the promotion choice is not compared.
    pub fn same_path(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to
    }
}
