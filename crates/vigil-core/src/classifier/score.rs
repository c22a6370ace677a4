//! Score aggregation: detections to normalized risk scores.

use serde::{Deserialize, Serialize};

use super::detection::Detection;
use super::taxonomy::{Category, Taxonomy};

/// Normalized risk scores for one classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    /// Derived safe score: `max(0, 100 - nudity - sexy)`, never computed
    /// independently.
    pub safe: f64,
    /// Explicit-content score (0 to 100).
    pub nudity: f64,
    /// Suggestive-content score (0 to 80).
    pub sexy: f64,
}

impl ScoreVector {
    /// Builds a vector from the two aggregated components; `safe` is
    /// always derived here.
    pub fn from_components(nudity: f64, sexy: f64) -> Self {
        Self {
            safe: (100.0 - nudity - sexy).max(0.0),
            nudity,
            sexy,
        }
    }

    /// The all-zero-risk vector for inputs with no scorable detections.
    pub fn zero() -> Self {
        Self::from_components(0.0, 0.0)
    }
}

/// The scoring formula, isolated as a single named strategy.
///
/// This is the one place where content policy is encoded: explicit hits
/// are weighted at full severity while suggestive-only evidence is capped
/// and damped so it cannot alone drive the result into high-severity
/// territory. Retuning is a field change here, not a rewrite of the
/// aggregation plumbing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringPolicy {
    /// Upper bound on the nudity score.
    pub explicit_cap: f64,
    /// Multiplier applied to the mean suggestive confidence.
    pub suggestive_base: f64,
    /// Upper bound on the sexy score.
    pub suggestive_cap: f64,
    /// Fraction of the sexy score contributed to nudity when no explicit
    /// hits exist. Covered-but-suggestive content is lower risk than
    /// exposure but not risk-free.
    pub suggestive_damping: f64,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            explicit_cap: 100.0,
            suggestive_base: 50.0,
            suggestive_cap: 80.0,
            suggestive_damping: 0.4,
        }
    }
}

impl ScoringPolicy {
    /// Aggregates per-detection confidences into a [`ScoreVector`].
    ///
    /// Benign and Unknown detections are discarded before scoring.
    /// Confidences are clamped to `[0, 1]` before averaging; empty hit
    /// sets never divide by zero.
    pub fn aggregate(&self, taxonomy: &Taxonomy, detections: &[Detection]) -> ScoreVector {
        let mut explicit_hits: Vec<f64> = Vec::new();
        let mut suggestive_hits: Vec<f64> = Vec::new();

        for detection in detections {
            let confidence = f64::from(detection.confidence).clamp(0.0, 1.0);
            match taxonomy.categorize(&detection.label) {
                Category::Explicit => explicit_hits.push(confidence),
                Category::Suggestive => suggestive_hits.push(confidence),
                Category::Benign | Category::Unknown => {}
            }
        }

        let sexy = if suggestive_hits.is_empty() {
            0.0
        } else {
            (self.suggestive_base * mean(&suggestive_hits)).min(self.suggestive_cap)
        };

        let nudity = if !explicit_hits.is_empty() {
            (100.0 * mean(&explicit_hits)).min(self.explicit_cap)
        } else if !suggestive_hits.is_empty() {
            // Suggestive-only evidence contributes a damped signal rather
            // than none.
            self.suggestive_damping * sexy
        } else {
            0.0
        };

        ScoreVector::from_components(nudity, sexy)
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
