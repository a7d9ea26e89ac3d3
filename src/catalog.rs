//! Static game catalog: themes and difficulty tiers
//!
//! The order of [`LEVELS`] is the unlock order (index 0 is the easiest).

use serde::{Deserialize, Serialize};

/// Picture theme chosen on the theme screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Animals,
    Space,
    Nature,
    Fantasy,
}

impl Theme {
    /// All themes in menu order
    pub const ALL: [Theme; 4] = [Theme::Animals, Theme::Space, Theme::Nature, Theme::Fantasy];

    /// Identifier used in image seeds and prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Animals => "animals",
            Theme::Space => "space",
            Theme::Nature => "nature",
            Theme::Fantasy => "fantasy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "animals" => Some(Theme::Animals),
            "space" => Some(Theme::Space),
            "nature" => Some(Theme::Nature),
            "fantasy" => Some(Theme::Fantasy),
            _ => None,
        }
    }

    /// Menu label (Swedish)
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Animals => "Djur",
            Theme::Space => "Rymden",
            Theme::Nature => "Natur",
            Theme::Fantasy => "Sagor",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Animals => "🦁",
            Theme::Space => "🚀",
            Theme::Nature => "🌲",
            Theme::Fantasy => "🦄",
        }
    }

    /// Image search keywords for the theme
    pub fn image_keywords(&self) -> &'static str {
        match self {
            Theme::Animals => "puppy,kitten,wildlife",
            Theme::Space => "galaxy,planet,astronaut",
            Theme::Fantasy => "castle,dragon,magic",
            Theme::Nature => "forest,mountain,flower",
        }
    }
}

/// One entry of the difficulty catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyLevel {
    pub id: &'static str,
    pub rows: u32,
    pub cols: u32,
    /// Menu label (Swedish)
    pub label: &'static str,
    /// Base score awarded on completion
    pub reward: u32,
}

impl DifficultyLevel {
    pub fn total_pieces(&self) -> u32 {
        self.rows * self.cols
    }
}

/// Difficulty tiers, easiest first
pub const LEVELS: [DifficultyLevel; 8] = [
    DifficultyLevel { id: "2x2", rows: 2, cols: 2, label: "Lätt", reward: 10 },
    DifficultyLevel { id: "2x3", rows: 2, cols: 3, label: "Klurig", reward: 15 },
    DifficultyLevel { id: "3x3", rows: 3, cols: 3, label: "Medel", reward: 25 },
    DifficultyLevel { id: "3x4", rows: 3, cols: 4, label: "Utmaning", reward: 35 },
    DifficultyLevel { id: "4x4", rows: 4, cols: 4, label: "Svår", reward: 50 },
    DifficultyLevel { id: "4x5", rows: 4, cols: 5, label: "Mästare", reward: 75 },
    DifficultyLevel { id: "5x5", rows: 5, cols: 5, label: "Expert", reward: 100 },
    DifficultyLevel { id: "6x6", rows: 6, cols: 6, label: "Legend", reward: 150 },
];

/// Index of the last (hardest) level
pub const LAST_LEVEL_INDEX: usize = LEVELS.len() - 1;

/// Look up a level by index
pub fn level(index: usize) -> Option<&'static DifficultyLevel> {
    LEVELS.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_get_harder() {
        for pair in LEVELS.windows(2) {
            assert!(pair[1].total_pieces() > pair[0].total_pieces());
            assert!(pair[1].reward > pair[0].reward);
        }
        assert_eq!(LEVELS[2].reward, 25);
        assert_eq!(level(LAST_LEVEL_INDEX).map(|l| l.id), Some("6x6"));
        assert!(level(LEVELS.len()).is_none());
    }

    #[test]
    fn test_theme_round_trips_through_str() {
        for theme in Theme::ALL {
            assert_eq!(Theme::from_str(theme.as_str()), Some(theme));
        }
        assert_eq!(Theme::from_str(" Space "), Some(Theme::Space));
        assert_eq!(Theme::from_str("ocean"), None);
    }
}
