//! Player progression and scoring
//!
//! Persisted to the progress store as a single JSON record; every mutation
//! replaces the whole record.

use serde::{Deserialize, Serialize};

use crate::catalog::{self, DifficultyLevel, LAST_LEVEL_INDEX};
use crate::consts::{PAR_SECS_PER_PIECE, STATS_KEY, TIME_BONUS_BASE, TIME_BONUS_MIN};
use crate::persistence::{self, KeyValueStore, StoreError};

/// Cumulative statistics across sessions.
///
/// Every field only ever grows. Missing fields in older records load as 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub total_score: u64,
    pub stars: u32,
    pub completed_puzzles: u32,
    /// The frontier: every level at or below this index is playable
    pub highest_unlocked_level_index: usize,
}

/// Score breakdown for one completed puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub level_index: usize,
    pub elapsed_secs: u32,
    pub time_bonus: u32,
    pub round_score: u32,
    pub stars: u32,
    /// Level newly reachable thanks to this win
    pub unlocked_level: Option<usize>,
}

/// Bonus for finishing quickly, never below the minimum
pub fn time_bonus(elapsed_secs: u32) -> u32 {
    TIME_BONUS_BASE.saturating_sub(elapsed_secs).max(TIME_BONUS_MIN)
}

/// 3 stars under par, 2 under twice par, otherwise 1
pub fn star_rating(total_pieces: u32, elapsed_secs: u32) -> u32 {
    let par = total_pieces * PAR_SECS_PER_PIECE;
    if elapsed_secs < par {
        3
    } else if elapsed_secs < par * 2 {
        2
    } else {
        1
    }
}

impl RoundResult {
    /// Score a completion of `level` (unlock not yet decided)
    pub fn score(level_index: usize, level: &DifficultyLevel, elapsed_secs: u32) -> Self {
        let time_bonus = time_bonus(elapsed_secs);
        Self {
            level_index,
            elapsed_secs,
            time_bonus,
            round_score: level.reward + time_bonus,
            stars: star_rating(level.total_pieces(), elapsed_secs),
            unlocked_level: None,
        }
    }
}

impl PlayerStats {
    pub fn is_unlocked(&self, level_index: usize) -> bool {
        level_index <= self.highest_unlocked_level_index
    }

    /// Apply a completed puzzle. Completing the frontier level opens the
    /// next one unless it was the last.
    pub fn record_win(&mut self, level_index: usize, elapsed_secs: u32) -> RoundResult {
        let level = catalog::level(level_index).unwrap_or(&catalog::LEVELS[0]);
        let mut result = RoundResult::score(level_index, level, elapsed_secs);

        self.total_score += u64::from(result.round_score);
        self.completed_puzzles += 1;
        self.stars += result.stars;

        if level_index == self.highest_unlocked_level_index && level_index < LAST_LEVEL_INDEX {
            self.highest_unlocked_level_index = level_index + 1;
            result.unlocked_level = Some(level_index + 1);
            log::info!("Level {} unlocked", level_index + 1);
        }

        log::info!(
            "Puzzle {} solved in {}s: +{} points, {} stars",
            level.id,
            elapsed_secs,
            result.round_score,
            result.stars
        );
        result
    }

    /// Move the frontier up to `level_index` in one step.
    /// Returns true if the frontier moved.
    pub fn unlock_through(&mut self, level_index: usize) -> bool {
        let target = level_index.min(LAST_LEVEL_INDEX);
        if target <= self.highest_unlocked_level_index {
            return false;
        }
        self.highest_unlocked_level_index = target;
        log::info!("Unlocked levels through {}", target);
        true
    }

    /// Load stats from the store; zero state when absent or unreadable
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut stats: Self = persistence::load_json(store, STATS_KEY);
        if stats.highest_unlocked_level_index > LAST_LEVEL_INDEX {
            log::warn!(
                "Stored frontier {} is past the last level, capping",
                stats.highest_unlocked_level_index
            );
            stats.highest_unlocked_level_index = LAST_LEVEL_INDEX;
        }
        stats
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        persistence::save_json(store, STATS_KEY, self)
    }
}
