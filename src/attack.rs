// src/attack.rs
//! Attack detection. Pawns are checked by their capture geometry, since they
//! threaten diagonal squares they could not move to while empty.

use crate::board::Board;
use crate::movegen::pseudo_legal_moves;
use crate::types::{Color, PieceKind, Square};

/// Checks if `target` is attacked by any piece of `attacker_color`.
/// This ignores pins and legality, just raw attack patterns.
pub fn is_square_attacked(board: &Board, target: Square, attacker_color: Color) -> bool {
    board.pieces_of(attacker_color).any(|(from, piece)| match piece.kind {
        PieceKind::Pawn => pawn_attacks(from, attacker_color, target),
        _ => pseudo_legal_moves(board, from).iter().any(|mv| mv.to == target),
    })
}

#[inline]
fn pawn_attacks(from: Square, color: Color, target: Square) -> bool {
    let forward = color.forward();
    from.offset(forward, -1) == Some(target) || from.offset(forward, 1) == Some(target)
}
