// src/movegen.rs
//! Pseudo-legal move generation: piece geometry and occupancy only, with no
//! regard to whether the mover's own king is left attacked.

use lazy_static::lazy_static;

use crate::board::Board;
use crate::types::{Color, Move, Piece, PieceKind, Square};

// Directions for sliding pieces (dr, dc)
const ORTHOGONALS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONALS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1), (2, -1), (1, 2), (1, -2),
    (-1, 2), (-1, -2), (-2, 1), (-2, -1),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (1, -1), (1, 0), (1, 1), (0, -1),
    (0, 1), (-1, -1), (-1, 0), (-1, 1),
];

// --- Precomputed Step Tables ---

lazy_static! {
    static ref KNIGHT_REACH: Vec<Vec<Square>> = compute_reach(&KNIGHT_OFFSETS);
    static ref KING_REACH: Vec<Vec<Square>> = compute_reach(&KING_OFFSETS);
}

/// On-board destinations of a stepping piece, for each of the 64 squares.
fn compute_reach(offsets: &[(i8, i8)]) -> Vec<Vec<Square>> {
    Square::all()
        .map(|from| offsets.iter().filter_map(|&(dr, dc)| from.offset(dr, dc)).collect())
        .collect()
}

// --- Generation ---

/// Generates pseudo-legal moves for whatever piece stands on `from`.
/// Empty squares yield no moves. Output order is unspecified.
pub fn pseudo_legal_moves(board: &Board, from: Square) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(piece) = board.get(from) else { return moves };

    match piece.kind {
        PieceKind::Rook => generate_sliding_moves(board, from, piece.color, &ORTHOGONALS, &mut moves),
        PieceKind::Bishop => generate_sliding_moves(board, from, piece.color, &DIAGONALS, &mut moves),
        PieceKind::Queen => {
            generate_sliding_moves(board, from, piece.color, &ORTHOGONALS, &mut moves);
            generate_sliding_moves(board, from, piece.color, &DIAGONALS, &mut moves);
        }
        PieceKind::Knight => generate_step_moves(board, from, piece.color, &KNIGHT_REACH[from.index()], &mut moves),
        // Adjacent squares only; castling is not generated.
        PieceKind::King => generate_step_moves(board, from, piece.color, &KING_REACH[from.index()], &mut moves),
        PieceKind::Pawn => generate_pawn_moves(board, from, piece.color, &mut moves),
    }

    moves
}

/// Walks each ray until the edge or the first occupied square, which is kept
/// only when it holds an enemy piece.
fn generate_sliding_moves(board: &Board, from: Square, color: Color, directions: &[(i8, i8)], moves: &mut Vec<Move>) {
    for &(dr, dc) in directions {
        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            match board.get(next) {
                None => moves.push(Move::new(from, next)),
                Some(occupant) => {
                    if occupant.color != color {
                        moves.push(Move::new(from, next));
                    }
                    break;
                }
            }
            current = next;
        }
    }
}

fn generate_step_moves(board: &Board, from: Square, color: Color, reach: &[Square], moves: &mut Vec<Move>) {
    for &to in reach {
        if !is_own(board.get(to), color) {
            moves.push(Move::new(from, to));
        }
    }
}

/// Pushes, double pushes from the starting row, and diagonal captures.
/// No en-passant.
fn generate_pawn_moves(board: &Board, from: Square, color: Color, moves: &mut Vec<Move>) {
    let forward = color.forward();

    // 1. Single push, then double push through it
    if let Some(one) = from.offset(forward, 0) {
        if board.is_empty(one) {
            add_pawn_move(from, one, color, moves);
            if from.row() == color.pawn_row() {
                if let Some(two) = one.offset(forward, 0) {
                    if board.is_empty(two) {
                        add_pawn_move(from, two, color, moves);
                    }
                }
            }
        }
    }

    // 2. Captures
    for dc in [-1, 1] {
        if let Some(target) = from.offset(forward, dc) {
            if matches!(board.get(target), Some(occupant) if occupant.color != color) {
                add_pawn_move(from, target, color, moves);
            }
        }
    }
}

/// A pawn landing on its last row expands into one move per promotion kind.
fn add_pawn_move(from: Square, to: Square, color: Color, moves: &mut Vec<Move>) {
    if to.row() == color.last_row() {
        moves.extend(PieceKind::PROMOTIONS.iter().map(|&kind| Move::with_promotion(from, to, kind)));
    } else {
        moves.push(Move::new(from, to));
    }
}

#[inline]
fn is_own(cell: Option<Piece>, color: Color) -> bool {
    matches!(cell, Some(piece) if piece.color == color)
}
