//! The classification pipeline: detect, categorize, aggregate, assemble.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use super::detection::Detection;
use super::result::{AssembleError, ClassificationResult};
use super::score::ScoringPolicy;
use super::severity::SeverityThresholds;
use super::taxonomy::Taxonomy;
use crate::detector::{DetectorError, NudityDetector};

/// Failures a classification request can surface to the caller.
///
/// Neither kind is retried internally: aggregation is deterministic, so
/// retrying a pure computation cannot change its outcome.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The external detector call failed.
    #[error("detector failure: {0}")]
    Detector(#[from] DetectorError),

    /// A detection could not be reduced to a serialization-safe record.
    #[error("serialization failure: {0}")]
    Serialization(#[from] AssembleError),
}

/// Stateless classification pipeline.
///
/// Holds a shared detector handle plus the fixed taxonomy, scoring
/// policy, and threshold tables. Carries no state across invocations;
/// every method takes `&self`, so one instance can serve concurrent
/// requests without locks.
pub struct ImageClassifier {
    detector: Arc<dyn NudityDetector>,
    taxonomy: Taxonomy,
    policy: ScoringPolicy,
    thresholds: SeverityThresholds,
}

impl ImageClassifier {
    /// Creates a pipeline with the default taxonomy, policy, and
    /// thresholds.
    pub fn new(detector: Arc<dyn NudityDetector>) -> Self {
        Self {
            detector,
            taxonomy: Taxonomy::with_defaults(),
            policy: ScoringPolicy::default(),
            thresholds: SeverityThresholds::default(),
        }
    }

    /// Replaces the label taxonomy.
    pub fn with_taxonomy(mut self, taxonomy: Taxonomy) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Replaces the scoring policy.
    pub fn with_policy(mut self, policy: ScoringPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replaces the severity threshold table.
    pub fn with_thresholds(mut self, thresholds: SeverityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Returns the detector name for logging and health reporting.
    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Classifies an in-memory image: runs the detector, then scores its
    /// detections.
    pub fn classify_bytes(&self, image: &[u8]) -> Result<ClassificationResult, ClassifyError> {
        debug!(
            detector = self.detector.name(),
            image_bytes = image.len(),
            "Classifying image"
        );
        let detections = self.detector.detect(image)?;
        self.classify_detections(&detections)
    }

    /// Scores an already-obtained detection list.
    ///
    /// This is the pure core: a deterministic function of its input plus
    /// the fixed configuration tables.
    pub fn classify_detections(
        &self,
        detections: &[Detection],
    ) -> Result<ClassificationResult, ClassifyError> {
        let scores = self.policy.aggregate(&self.taxonomy, detections);
        let level = self.thresholds.classify(scores.nudity);
        let result = ClassificationResult::assemble(&scores, level, detections)?;

        info!(
            detections = detections.len(),
            nudity = result.nudity_score,
            sexy = result.sexy_score,
            level = level.name(),
            "Classified image"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::SeverityLevel;

    struct FixedDetector(Vec<Detection>);

    impl NudityDetector for FixedDetector {
        fn detect(&self, _image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct FailingDetector;

    impl NudityDetector for FailingDetector {
        fn detect(&self, _image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
            Err(DetectorError::Failed {
                status: 1,
                stderr: "model not loaded".to_string(),
            })
        }
    }

    fn classifier_with(detections: Vec<Detection>) -> ImageClassifier {
        ImageClassifier::new(Arc::new(FixedDetector(detections)))
    }

    #[test]
    fn empty_detection_list_is_fully_safe() {
        let result = classifier_with(vec![]).classify_bytes(b"img").unwrap();
        assert_eq!(result.safe_score, 100.0);
        assert_eq!(result.nudity_score, 0.0);
        assert_eq!(result.sexy_score, 0.0);
        assert_eq!(result.nudity_level, SeverityLevel::Safe);
        assert!(result.detections.is_none());
    }

    #[test]
    fn exposed_breast_at_high_confidence_is_high_severity() {
        let result = classifier_with(vec![Detection::new("FEMALE_BREAST_EXPOSED", 0.8)])
            .classify_bytes(b"img")
            .unwrap();
        assert_eq!(result.nudity_score, 80.0);
        assert_eq!(result.sexy_score, 0.0);
        assert_eq!(result.safe_score, 20.0);
        assert_eq!(result.nudity_level, SeverityLevel::High);
    }

    #[test]
    fn covered_breast_stays_safe_with_damped_nudity() {
        let result = classifier_with(vec![Detection::new("FEMALE_BREAST_COVERED", 0.6)])
            .classify_bytes(b"img")
            .unwrap();
        assert_eq!(result.sexy_score, 30.0);
        assert_eq!(result.nudity_score, 12.0);
        assert_eq!(result.safe_score, 58.0);
        assert_eq!(result.nudity_level, SeverityLevel::Safe);
    }

    #[test]
    fn benign_only_scores_zero_but_keeps_records() {
        let result = classifier_with(vec![Detection::new("FACE_FEMALE", 0.99)])
            .classify_bytes(b"img")
            .unwrap();
        assert_eq!(result.nudity_score, 0.0);
        assert_eq!(result.sexy_score, 0.0);
        assert_eq!(result.safe_score, 100.0);
        assert_eq!(result.nudity_level, SeverityLevel::Safe);
        // The detector reported a non-empty list, so records survive.
        assert_eq!(result.detections.unwrap().len(), 1);
    }

    #[test]
    fn detector_failure_propagates_unchanged() {
        let classifier = ImageClassifier::new(Arc::new(FailingDetector));
        let err = classifier.classify_bytes(b"img").unwrap_err();
        assert!(matches!(err, ClassifyError::Detector(_)));
        assert!(err.to_string().contains("model not loaded"));
    }

    #[test]
    fn classification_is_a_pure_function_of_its_input() {
        let classifier = classifier_with(vec![
            Detection::new("FEMALE_BREAST_EXPOSED", 0.73),
            Detection::new("BELLY_EXPOSED", 0.41),
        ]);
        let first = classifier.classify_bytes(b"img").unwrap();
        let second = classifier.classify_bytes(b"img").unwrap();
        assert_eq!(first.nudity_score, second.nudity_score);
        assert_eq!(first.sexy_score, second.sexy_score);
        assert_eq!(first.nudity_level, second.nudity_level);
    }

    #[test]
    fn shared_pipeline_serves_concurrent_requests() {
        let classifier = Arc::new(classifier_with(vec![Detection::new(
            "FEMALE_BREAST_EXPOSED",
            0.8,
        )]));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let classifier = Arc::clone(&classifier);
                std::thread::spawn(move || classifier.classify_bytes(b"img").unwrap())
            })
            .collect();

        for handle in handles {
            let result = handle.join().unwrap();
            assert_eq!(result.nudity_score, 80.0);
            assert_eq!(result.nudity_level, SeverityLevel::High);
        }
    }

    #[test]
    fn unknown_labels_are_excluded_from_scoring() {
        let result = classifier_with(vec![
            Detection::new("TRAFFIC_CONE", 0.99),
            Detection::new("FEMALE_BREAST_COVERED", 0.6),
        ])
        .classify_bytes(b"img")
        .unwrap();
        assert_eq!(result.sexy_score, 30.0);
        assert_eq!(result.nudity_score, 12.0);
        assert_eq!(result.detections.unwrap().len(), 2);
    }
}
