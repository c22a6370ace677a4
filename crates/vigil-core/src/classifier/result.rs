//! Assembly of the final classification result.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::detection::Detection;
use super::score::ScoreVector;
use super::severity::SeverityLevel;

/// A detection field could not be represented as a primitive, even after
/// string coercion. This is a defect in the upstream detector contract
/// and is surfaced to the caller rather than swallowed.
#[derive(Debug, thiserror::Error)]
#[error("detection field '{field}' cannot be serialized: {reason}")]
pub struct AssembleError {
    pub field: String,
    pub reason: String,
}

/// The assembled, serialization-safe classification result.
///
/// Serializes to the service's wire shape: scores rounded to two
/// decimals, `detections` omitted entirely when the detector reported
/// nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub safe_score: f64,
    pub nudity_score: f64,
    pub nudity_level: SeverityLevel,
    pub sexy_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections: Option<Vec<Map<String, Value>>>,
}

impl ClassificationResult {
    /// Packages scores, level, and detections into the output record.
    ///
    /// Each detection is reduced to primitive-typed fields: strings,
    /// numbers, booleans, and nulls pass through; anything else (e.g.
    /// geometry arrays) is coerced to its compact JSON-string form.
    pub fn assemble(
        scores: &ScoreVector,
        level: SeverityLevel,
        detections: &[Detection],
    ) -> Result<Self, AssembleError> {
        let records = if detections.is_empty() {
            None
        } else {
            let records = detections
                .iter()
                .map(sanitize_detection)
                .collect::<Result<Vec<_>, _>>()?;
            Some(records)
        };

        Ok(Self {
            safe_score: round2(scores.safe),
            nudity_score: round2(scores.nudity),
            nudity_level: level,
            sexy_score: round2(scores.sexy),
            detections: records,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sanitize_detection(detection: &Detection) -> Result<Map<String, Value>, AssembleError> {
    let mut record = Map::new();
    record.insert("label".to_string(), Value::String(detection.label.clone()));

    let confidence =
        Number::from_f64(f64::from(detection.confidence)).ok_or_else(|| AssembleError {
            field: "confidence".to_string(),
            reason: "not a finite number".to_string(),
        })?;
    record.insert("confidence".to_string(), Value::Number(confidence));

    for (key, value) in &detection.extra {
        record.insert(key.clone(), sanitize_field(key, value)?);
    }

    Ok(record)
}

fn sanitize_field(field: &str, value: &Value) -> Result<Value, AssembleError> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(value.clone()),
        other => serde_json::to_string(other)
            .map(Value::String)
            .map_err(|e| AssembleError {
                field: field.to_string(),
                reason: e.to_string(),
            }),
    }
}
