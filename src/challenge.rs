//! Arithmetic gate for locked levels

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::Theme;
use crate::consts::{CHALLENGE_MAX_OPERAND, CHALLENGE_MIN_OPERAND};

/// A pending multiplication question guarding one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenge {
    pub lhs: i64,
    pub rhs: i64,
    /// Level that opens on a correct answer
    pub target_level_index: usize,
    /// Theme the level will be played with
    pub theme: Theme,
}

impl Challenge {
    /// Draw two operands in the configured range
    pub fn generate(theme: Theme, target_level_index: usize, rng: &mut impl Rng) -> Self {
        let lhs = rng.random_range(CHALLENGE_MIN_OPERAND..=CHALLENGE_MAX_OPERAND);
        let rhs = rng.random_range(CHALLENGE_MIN_OPERAND..=CHALLENGE_MAX_OPERAND);
        Self {
            lhs,
            rhs,
            target_level_index,
            theme,
        }
    }

    /// Question text shown to the player
    pub fn question(&self) -> String {
        format!("{} x {}", self.lhs, self.rhs)
    }

    pub fn expected_answer(&self) -> i64 {
        self.lhs * self.rhs
    }

    /// Check a typed answer. Anything that is not an integer is wrong.
    pub fn verify(&self, submitted: &str) -> bool {
        submitted
            .trim()
            .parse::<i64>()
            .is_ok_and(|answer| answer == self.expected_answer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_operands_in_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let c = Challenge::generate(Theme::Space, 3, &mut rng);
            assert!((2..=9).contains(&c.lhs));
            assert!((2..=9).contains(&c.rhs));
            assert_eq!(c.expected_answer(), c.lhs * c.rhs);
        }
    }

    #[test]
    fn test_verify_parses_answer() {
        let c = Challenge {
            lhs: 6,
            rhs: 7,
            target_level_index: 2,
            theme: Theme::Animals,
        };
        assert_eq!(c.question(), "6 x 7");
        assert!(c.verify("42"));
        assert!(c.verify(" 42\n"));
        assert!(!c.verify("41"));
        assert!(!c.verify(""));
        assert!(!c.verify("fyrtiotvå"));
        assert!(!c.verify("42abc"));
    }
}
