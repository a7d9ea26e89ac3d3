//! Release-time placement check

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use crate::consts::SNAP_THRESHOLD;

/// Result of releasing one piece
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapOutcome {
    pub piece_id: u32,
    /// True when this release locked the piece into its slot
    pub snapped: bool,
    /// Piece position after evaluation
    pub position: Vec2,
}

/// Whether a piece at `current` is close enough to lock into `correct`
#[inline]
pub fn within_snap(current: Vec2, correct: Vec2) -> bool {
    current.distance(correct) < SNAP_THRESHOLD
}

/// Lock the piece into its slot if it was released close enough.
///
/// Already placed pieces are left untouched.
pub fn evaluate(piece: &mut Piece) -> SnapOutcome {
    let snapped = !piece.is_placed && within_snap(piece.current, piece.correct);
    if snapped {
        piece.current = piece.correct;
        piece.is_placed = true;
    }
    SnapOutcome {
        piece_id: piece.id,
        snapped,
        position: piece.current,
    }
}
