//! Pussel Magi - a jigsaw puzzle game for children
//!
//! Core modules:
//! - `board`: Puzzle generation, dragging, snapping and win detection
//! - `game`: Screen flow, progression and the event queue for the host
//! - `progress`: Persistent player statistics and scoring
//! - `challenge`: Arithmetic gate for locked levels
//! - `praise`: Completion praise from a text service, with fallbacks
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `platform`: Browser tick source
//! - `audio`: Synthesized sound effects (web only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod board;
pub mod catalog;
pub mod challenge;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod praise;
pub mod progress;
pub mod settings;

pub use catalog::{DifficultyLevel, LEVELS, Theme};
pub use game::{ChallengeOutcome, Game, GameError, GameEvent, GameSnapshot, LevelSelection, Screen};
pub use progress::{PlayerStats, RoundResult};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Board size in fractional units on each axis (percent)
    pub const BOARD_EXTENT: f32 = 100.0;
    /// Release distance (board units) under which a piece locks into its slot
    pub const SNAP_THRESHOLD: f32 = 15.0;

    /// Puzzle clock cadence
    pub const TICK_INTERVAL_MS: i32 = 1000;

    /// Scoring
    pub const TIME_BONUS_BASE: u32 = 100;
    pub const TIME_BONUS_MIN: u32 = 10;
    /// Par time per piece (seconds) for the star rating
    pub const PAR_SECS_PER_PIECE: u32 = 5;

    /// Challenge operand range (inclusive)
    pub const CHALLENGE_MIN_OPERAND: i64 = 2;
    pub const CHALLENGE_MAX_OPERAND: i64 = 9;

    /// Picture source
    pub const IMAGE_BASE_URL: &str = "https://picsum.photos";
    /// Long side of the requested picture in pixels
    pub const IMAGE_BASE_SIZE: u32 = 800;
    pub const IMAGE_SEED_LEN: usize = 7;

    /// Praise text service
    pub const PRAISE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
    pub const PRAISE_MODEL: &str = "gemini-2.5-flash";

    /// Storage keys
    pub const STATS_KEY: &str = "pusselMagiStats";
    pub const SETTINGS_KEY: &str = "pusselMagiSettings";
}
