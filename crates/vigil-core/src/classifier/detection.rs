//! Typed detection records received from the external detector.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// One labeled, confidence-scored region reported by the detector.
///
/// Detector-specific fields such as bounding boxes ride along in `extra`
/// and are treated as opaque until the serialization boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Detector label, e.g. `FEMALE_BREAST_EXPOSED`.
    pub label: String,
    /// Detector confidence (0.0 to 1.0).
    pub confidence: f32,
    /// Remaining detector fields (geometry etc.), kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Detection {
    /// Creates a detection with a clamped confidence and no extra fields.
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
            extra: Map::new(),
        }
    }

    /// Parses a single raw detector record.
    ///
    /// Returns `None` if the record is not an object or is missing the
    /// required `label`/`confidence` fields. Malformed records are
    /// excluded, never a hard failure.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let label = object.get("label")?.as_str()?.to_string();
        let confidence = object.get("confidence")?.as_f64()? as f32;

        let extra = object
            .iter()
            .filter(|(key, _)| key.as_str() != "label" && key.as_str() != "confidence")
            .map(|(key, val)| (key.clone(), val.clone()))
            .collect();

        Some(Self {
            label,
            confidence,
            extra,
        })
    }

    /// Parses a list of raw detector records, dropping malformed entries.
    pub fn parse_list(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .filter_map(|value| {
                let parsed = Self::from_value(value);
                if parsed.is_none() {
                    debug!(record = %value, "Dropping malformed detection record");
                }
                parsed
            })
            .collect()
    }
}
