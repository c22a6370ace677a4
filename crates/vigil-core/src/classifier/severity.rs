//! Discrete severity classification of the nudity score.

use serde::{Deserialize, Serialize};

/// Ordinal severity level derived from the nudity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    Safe,
    Low,
    Moderate,
    High,
    Extreme,
}

impl SeverityLevel {
    /// Returns the level name as it appears in API responses.
    pub fn name(&self) -> &'static str {
        match self {
            SeverityLevel::Safe => "Safe",
            SeverityLevel::Low => "Low",
            SeverityLevel::Moderate => "Moderate",
            SeverityLevel::High => "High",
            SeverityLevel::Extreme => "Extreme",
        }
    }
}

/// Threshold table mapping nudity scores to severity levels.
///
/// Each entry is the inclusive lower bound of its level; intervals are
/// half-open, so a score sitting exactly on a bound belongs to the
/// higher bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityThresholds {
    steps: Vec<(f64, SeverityLevel)>,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            steps: vec![
                (15.0, SeverityLevel::Low),
                (40.0, SeverityLevel::Moderate),
                (70.0, SeverityLevel::High),
                (90.0, SeverityLevel::Extreme),
            ],
        }
    }
}

impl SeverityThresholds {
    /// Maps a nudity score to its severity level.
    ///
    /// Total over the real line: anything below the first bound is
    /// `Safe`, anything at or above the last is `Extreme`.
    pub fn classify(&self, nudity: f64) -> SeverityLevel {
        let mut level = SeverityLevel::Safe;
        for (bound, step) in &self.steps {
            if nudity >= *bound {
                level = *step;
            } else {
                break;
            }
        }
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_belong_to_the_higher_bucket() {
        let thresholds = SeverityThresholds::default();
        assert_eq!(thresholds.classify(15.0), SeverityLevel::Low);
        assert_eq!(thresholds.classify(40.0), SeverityLevel::Moderate);
        assert_eq!(thresholds.classify(70.0), SeverityLevel::High);
        assert_eq!(thresholds.classify(90.0), SeverityLevel::Extreme);
    }

    #[test]
    fn values_just_below_a_bound_stay_in_the_lower_bucket() {
        let thresholds = SeverityThresholds::default();
        assert_eq!(thresholds.classify(14.99), SeverityLevel::Safe);
        assert_eq!(thresholds.classify(39.99), SeverityLevel::Low);
        assert_eq!(thresholds.classify(69.99), SeverityLevel::Moderate);
        assert_eq!(thresholds.classify(89.99), SeverityLevel::High);
    }

    #[test]
    fn total_over_the_real_line() {
        let thresholds = SeverityThresholds::default();
        assert_eq!(thresholds.classify(-5.0), SeverityLevel::Safe);
        assert_eq!(thresholds.classify(0.0), SeverityLevel::Safe);
        assert_eq!(thresholds.classify(100.0), SeverityLevel::Extreme);
        assert_eq!(thresholds.classify(250.0), SeverityLevel::Extreme);
    }

    #[test]
    fn classification_is_monotonic() {
        let thresholds = SeverityThresholds::default();
        let mut previous = SeverityLevel::Safe;
        for step in 0..=1000 {
            let level = thresholds.classify(step as f64 / 10.0);
            assert!(level >= previous, "level regressed at score {}", step);
            previous = level;
        }
    }

    #[test]
    fn levels_are_totally_ordered() {
        assert!(SeverityLevel::Safe < SeverityLevel::Low);
        assert!(SeverityLevel::Low < SeverityLevel::Moderate);
        assert!(SeverityLevel::Moderate < SeverityLevel::High);
        assert!(SeverityLevel::High < SeverityLevel::Extreme);
    }

    #[test]
    fn level_serializes_as_its_name() {
        for level in [
            SeverityLevel::Safe,
            SeverityLevel::Low,
            SeverityLevel::Moderate,
            SeverityLevel::High,
            SeverityLevel::Extreme,
        ] {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.name()));
        }
    }
}
