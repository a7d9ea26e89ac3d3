//! Single-pointer drag tracking
//!
//! Pointer samples arrive in host (client pixel) coordinates and are
//! converted to board units through the current [`BoardRect`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::piece::{GridConfig, Piece};
use super::snap::{self, SnapOutcome};
use crate::consts::BOARD_EXTENT;

/// On-screen rectangle of the board in client pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl BoardRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert a client position to board units (not clamped).
    /// Returns None for a collapsed board.
    pub fn to_board(&self, client: Vec2) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        Some(Vec2::new(
            (client.x - self.left) / self.width * BOARD_EXTENT,
            (client.y - self.top) / self.height * BOARD_EXTENT,
        ))
    }
}

/// The piece currently held by the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveDrag {
    pub piece_id: u32,
    /// Pointer position minus piece position at grab time, in board units
    pub offset: Vec2,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DragController {
    active: Option<ActiveDrag>,
}

impl DragController {
    pub fn new() -> Self {
        Self { active: None }
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Grab a piece. Returns false (and changes nothing) for placed or
    /// unknown pieces, or when there is no board to measure against.
    pub fn begin(
        &mut self,
        pieces: &[Piece],
        board: Option<&BoardRect>,
        piece_id: u32,
        pointer: Vec2,
    ) -> bool {
        let Some(piece) = pieces.iter().find(|p| p.id == piece_id) else {
            return false;
        };
        if piece.is_placed {
            return false;
        }
        let Some(at) = board.and_then(|b| b.to_board(pointer)) else {
            return false;
        };

        self.active = Some(ActiveDrag {
            piece_id,
            offset: at - piece.current,
        });
        true
    }

    /// Follow the pointer, keeping the piece fully inside the board.
    /// Returns the new position of the held piece, if any.
    pub fn drag_to(
        &mut self,
        pieces: &mut [Piece],
        grid: &GridConfig,
        board: Option<&BoardRect>,
        pointer: Vec2,
    ) -> Option<Vec2> {
        let drag = self.active?;
        let at = board.and_then(|b| b.to_board(pointer))?;
        let piece = pieces
            .iter_mut()
            .find(|p| p.id == drag.piece_id && !p.is_placed)?;

        piece.current = grid.clamp_position(at - drag.offset);
        Some(piece.current)
    }

    /// Release the held piece at the pointer position and try to snap it.
    /// The drag is cleared whatever the outcome.
    pub fn end(
        &mut self,
        pieces: &mut [Piece],
        grid: &GridConfig,
        board: Option<&BoardRect>,
        pointer: Vec2,
    ) -> Option<SnapOutcome> {
        let drag = self.active?;
        self.drag_to(pieces, grid, board, pointer);
        self.active = None;

        let piece = pieces.iter_mut().find(|p| p.id == drag.piece_id)?;
        Some(snap::evaluate(piece))
    }

    /// Drop the held piece without evaluating it
    pub fn cancel(&mut self) {
        self.active = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn board() -> BoardRect {
        // 400x200 px board at (100, 50)
        BoardRect::new(100.0, 50.0, 400.0, 200.0)
    }

    fn one_piece(correct: Vec2, current: Vec2) -> Vec<Piece> {
        vec![Piece::new(0, correct, current)]
    }

    #[test]
    fn test_board_rect_converts_to_percent() {
        let at = board().to_board(Vec2::new(300.0, 100.0)).unwrap();
        assert!((at.x - 50.0).abs() < 1e-4);
        assert!((at.y - 25.0).abs() < 1e-4);

        let collapsed = BoardRect::new(0.0, 0.0, 0.0, 100.0);
        assert!(collapsed.to_board(Vec2::ZERO).is_none());
    }

    #[test]
    fn test_drag_keeps_grab_offset() {
        let grid = GridConfig::new(4, 4);
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(40.0, 40.0));
        let mut drag = DragController::new();

        // Grab 5 units right / 10 units down of the corner
        assert!(drag.begin(&pieces, Some(&board()), 0, Vec2::new(280.0, 150.0)));
        assert_eq!(drag.active().map(|d| d.piece_id), Some(0));

        // Pointer moves to (60%, 60%)
        let pos = drag
            .drag_to(&mut pieces, &grid, Some(&board()), Vec2::new(340.0, 170.0))
            .unwrap();
        assert!((pos.x - 55.0).abs() < 1e-4);
        assert!((pos.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_begin_rejected_without_board_or_for_placed_piece() {
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(40.0, 40.0));
        let mut drag = DragController::new();

        assert!(!drag.begin(&pieces, None, 0, Vec2::ZERO));
        assert!(!drag.begin(&pieces, Some(&board()), 9, Vec2::ZERO));

        pieces[0].is_placed = true;
        assert!(!drag.begin(&pieces, Some(&board()), 0, Vec2::ZERO));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_move_and_end_without_drag_are_noops() {
        let grid = GridConfig::new(2, 2);
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(30.0, 30.0));
        let mut drag = DragController::new();

        assert!(drag.drag_to(&mut pieces, &grid, Some(&board()), Vec2::ZERO).is_none());
        assert!(drag.end(&mut pieces, &grid, Some(&board()), Vec2::ZERO).is_none());
        assert_eq!(pieces[0].current, Vec2::new(30.0, 30.0));
    }

    #[test]
    fn test_end_snaps_and_clears_drag() {
        let grid = GridConfig::new(4, 4);
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(50.0, 50.0));
        let mut drag = DragController::new();

        // Grab exactly at the piece corner: (50%, 50%) = (300px, 150px)
        assert!(drag.begin(&pieces, Some(&board()), 0, Vec2::new(300.0, 150.0)));
        // Release at (5%, 5%) which is within the snap radius of (0, 0)
        let outcome = drag
            .end(&mut pieces, &grid, Some(&board()), Vec2::new(120.0, 60.0))
            .unwrap();

        assert!(outcome.snapped);
        assert!(pieces[0].is_placed);
        assert_eq!(pieces[0].current, Vec2::ZERO);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_end_far_from_slot_leaves_piece_loose() {
        let grid = GridConfig::new(4, 4);
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(50.0, 50.0));
        let mut drag = DragController::new();

        assert!(drag.begin(&pieces, Some(&board()), 0, Vec2::new(300.0, 150.0)));
        let outcome = drag
            .end(&mut pieces, &grid, Some(&board()), Vec2::new(300.0, 150.0))
            .unwrap();

        assert!(!outcome.snapped);
        assert!(!pieces[0].is_placed);
        assert_eq!(pieces[0].current, Vec2::new(50.0, 50.0));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_placed_piece_ignores_further_moves() {
        let grid = GridConfig::new(2, 2);
        let mut pieces = one_piece(Vec2::ZERO, Vec2::new(20.0, 20.0));
        let mut drag = DragController::new();

        assert!(drag.begin(&pieces, Some(&board()), 0, Vec2::new(180.0, 90.0)));
        pieces[0].is_placed = true;
        pieces[0].current = Vec2::ZERO;

        assert!(drag.drag_to(&mut pieces, &grid, Some(&board()), Vec2::new(400.0, 200.0)).is_none());
        drag.end(&mut pieces, &grid, Some(&board()), Vec2::new(400.0, 200.0));
        assert_eq!(pieces[0].current, Vec2::ZERO);
        assert!(pieces[0].is_placed);
    }

    proptest! {
        #[test]
        fn prop_moves_stay_on_board(
            rows in 1u32..=6,
            cols in 1u32..=6,
            moves in prop::collection::vec((-500.0f32..1500.0, -500.0f32..1500.0), 1..20),
        ) {
            let grid = GridConfig::new(rows, cols);
            let mut pieces = one_piece(grid.max_position(), Vec2::ZERO);
            let mut drag = DragController::new();
            let rect = board();
            prop_assert!(drag.begin(&pieces, Some(&rect), 0, Vec2::new(rect.left, rect.top)));

            let max = grid.max_position();
            for (x, y) in moves {
                drag.drag_to(&mut pieces, &grid, Some(&rect), Vec2::new(x, y));
                let p = pieces[0].current;
                prop_assert!(p.x >= 0.0 && p.x <= max.x);
                prop_assert!(p.y >= 0.0 && p.y <= max.y);
            }
        }
    }
}
