// src/board.rs
//! The 8x8 grid of optional pieces. Pure data, no rules.

use std::fmt;

use crate::types::{Color, Piece, PieceKind, Square};

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook, PieceKind::Knight, PieceKind::Bishop, PieceKind::Queen,
    PieceKind::King, PieceKind::Bishop, PieceKind::Knight, PieceKind::Rook,
];

/// One cell per square, indexed by [`Square::index`].
///
/// No invariant is kept on piece counts: any configuration can be built,
/// which move simulation relies on. Cloning copies every cell, so a clone
/// shares no state with its original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Piece>; 64],
}

impl Default for Board {
    fn default() -> Self { Board::empty() }
}

impl Board {
    pub fn empty() -> Self {
        Board { cells: [None; 64] }
    }

    /// A board in the standard starting position.
    pub fn standard() -> Self {
        let mut board = Board::empty();
        board.reset_to_standard_setup();
        board
    }

    /// Clears the board and lays out both armies.
    pub fn reset_to_standard_setup(&mut self) {
        self.cells = [None; 64];
        for (i, kind) in BACK_RANK.iter().enumerate() {
            let file = i + 1;
            self.cells[file - 1] = Some(Piece::new(Color::White, *kind));
            self.cells[8 + file - 1] = Some(Piece::new(Color::White, PieceKind::Pawn));
            self.cells[48 + file - 1] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            self.cells[56 + file - 1] = Some(Piece::new(Color::Black, *kind));
        }
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()]
    }

    /// Puts `piece` on `sq`, replacing any occupant. `None` clears the square.
    #[inline]
    pub fn place(&mut self, sq: Square, piece: Option<Piece>) {
        self.cells[sq.index()] = piece;
    }

    /// Removes and returns the occupant of `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.cells[sq.index()].take()
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Every occupied square, a1 first.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.map(|piece| (Square::from_index(i), piece)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, piece)| piece.color == color)
    }

    /// Finds the king's square for a given color. Returns None if the king is missing.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(color)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(sq, _)| sq)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  +-----------------+")?;
        for row in (1..=8u8).rev() {
            write!(f, "{} | ", row)?;
            for column in 1..=8u8 {
                let sq = Square::from_index((row as usize - 1) * 8 + column as usize - 1);
                match self.get(sq) {
                    Some(piece) => write!(f, "{} ", piece)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "  +-----------------+")?;
        write!(f, "    a b c d e f g h")
    }
}
