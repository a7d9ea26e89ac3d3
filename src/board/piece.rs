//! Pieces and grid shape
//!
//! Positions are fractional board units: 0..100 on each axis, as a
//! percentage of the board's width/height.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::BOARD_EXTENT;

/// Grid shape of one puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
}

impl GridConfig {
    pub fn new(rows: u32, cols: u32) -> Self {
        debug_assert!(rows > 0 && cols > 0, "grid must have at least one cell");
        Self { rows, cols }
    }

    pub fn total_pieces(&self) -> u32 {
        self.rows * self.cols
    }

    /// Width and height of one piece in board units
    pub fn piece_size(&self) -> Vec2 {
        Vec2::new(
            BOARD_EXTENT / self.cols as f32,
            BOARD_EXTENT / self.rows as f32,
        )
    }

    /// Largest top-left corner that keeps a piece fully on the board
    pub fn max_position(&self) -> Vec2 {
        Vec2::splat(BOARD_EXTENT) - self.piece_size()
    }

    /// Clamp a top-left corner so the piece stays inside the board
    pub fn clamp_position(&self, pos: Vec2) -> Vec2 {
        pos.clamp(Vec2::ZERO, self.max_position())
    }

    /// Width / height ratio of the assembled picture
    pub fn aspect(&self) -> f32 {
        self.cols as f32 / self.rows as f32
    }
}

/// One jigsaw piece
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// `row * cols + col`
    pub id: u32,
    /// Target slot (top-left corner)
    pub correct: Vec2,
    /// Live position (top-left corner)
    pub current: Vec2,
    /// Locked into its slot; never reverts within one puzzle
    pub is_placed: bool,
}

impl Piece {
    pub fn new(id: u32, correct: Vec2, current: Vec2) -> Self {
        Self {
            id,
            correct,
            current,
            is_placed: false,
        }
    }

    /// Distance from the live position to the target slot
    pub fn distance_to_slot(&self) -> f32 {
        self.current.distance(self.correct)
    }

    /// Grid row and column of the target slot
    pub fn cell(&self, grid: &GridConfig) -> (u32, u32) {
        (self.id / grid.cols, self.id % grid.cols)
    }
}
