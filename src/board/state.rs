//! Puzzle instance state
//!
//! One instance per played puzzle. Starting a level (including "play again")
//! always builds a fresh instance with a new session number.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::generate::{ImageRef, generate_pieces};
use super::piece::{GridConfig, Piece};
use crate::catalog::Theme;

/// Lifecycle of a puzzle instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzlePhase {
    /// Waiting for the picture; the clock is not running yet
    Loading,
    /// Clock running, win detection armed
    Playing,
    /// All pieces placed; terminal for this instance
    Solved,
}

/// True when there is at least one piece and every piece is placed
pub fn all_placed(pieces: &[Piece]) -> bool {
    !pieces.is_empty() && pieces.iter().all(|p| p.is_placed)
}

/// A live puzzle board
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PuzzleInstance {
    /// Distinguishes this instance from earlier ones (stale ticks/responses)
    pub session: u64,
    pub theme: Theme,
    /// Catalog index of the level being played
    pub level_index: usize,
    pub grid: GridConfig,
    /// Sorted by id
    pub pieces: Vec<Piece>,
    pub image: ImageRef,
    /// Whole seconds on the clock
    pub elapsed_secs: u32,
    pub phase: PuzzlePhase,
}

impl PuzzleInstance {
    /// Generate a fresh board for a level
    pub fn generate(
        session: u64,
        theme: Theme,
        level_index: usize,
        grid: GridConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let pieces = generate_pieces(&grid, rng);
        let image = ImageRef::random(theme, &grid, rng);
        Self {
            session,
            theme,
            level_index,
            grid,
            pieces,
            image,
            elapsed_secs: 0,
            phase: PuzzlePhase::Loading,
        }
    }

    /// Clock running and accepting a win
    pub fn is_active(&self) -> bool {
        self.phase == PuzzlePhase::Playing
    }

    pub fn is_solved(&self) -> bool {
        self.phase == PuzzlePhase::Solved
    }

    pub fn piece(&self, id: u32) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id == id)
    }

    pub fn placed_count(&self) -> usize {
        self.pieces.iter().filter(|p| p.is_placed).count()
    }

    /// The picture finished loading (or failed to). Starts the clock.
    /// Returns true on the Loading -> Playing transition.
    pub fn image_ready(&mut self) -> bool {
        if self.phase != PuzzlePhase::Loading {
            return false;
        }
        self.phase = PuzzlePhase::Playing;
        true
    }

    /// Advance the clock by one second while playing
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        true
    }

    /// Win detection. Returns true exactly once per instance, on the
    /// transition into [`PuzzlePhase::Solved`]; the clock stops there.
    pub fn check_win(&mut self) -> bool {
        if self.is_active() && all_placed(&self.pieces) {
            self.phase = PuzzlePhase::Solved;
            return true;
        }
        false
    }
}
