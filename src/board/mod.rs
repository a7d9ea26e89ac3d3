//! Puzzle board module
//!
//! Everything that happens on the board lives here and stays free of any
//! browser dependency:
//! - Piece generation (seeded RNG only)
//! - Pointer drag tracking and bounds clamping
//! - Snap-to-slot on release
//! - Win detection and the puzzle clock

pub mod drag;
pub mod generate;
pub mod piece;
pub mod snap;
pub mod state;

pub use drag::{ActiveDrag, BoardRect, DragController};
pub use generate::{ImageRef, generate_pieces, image_dimensions};
pub use piece::{GridConfig, Piece};
pub use snap::{SnapOutcome, evaluate, within_snap};
pub use state::{PuzzleInstance, PuzzlePhase, all_placed};
