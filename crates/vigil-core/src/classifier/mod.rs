//! Content-risk classification for uploaded images.
//!
//! This module converts labeled detections into normalized risk scores
//! and an ordinal severity level.

mod detection;
mod pipeline;
mod result;
mod score;
mod severity;
mod taxonomy;

pub use detection::Detection;
pub use pipeline::{ClassifyError, ImageClassifier};
pub use result::{AssembleError, ClassificationResult};
pub use score::{ScoreVector, ScoringPolicy};
pub use severity::{SeverityLevel, SeverityThresholds};
pub use taxonomy::{Category, Taxonomy};
