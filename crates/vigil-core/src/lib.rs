//! Vigil Core - detection-to-score content-risk classification.
//!
//! This crate turns raw object detections from an external visual content
//! detector into calibrated risk scores and a discrete severity level.

pub mod classifier;
pub mod detector;

pub use classifier::{
    Category, ClassificationResult, ClassifyError, Detection, ImageClassifier, ScoreVector,
    ScoringPolicy, SeverityLevel, SeverityThresholds, Taxonomy,
};
pub use detector::{CommandDetector, DetectorError, NudityDetector};
