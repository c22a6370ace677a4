//! API response models.
//!
//! The classification endpoint serializes
//! [`vigil_core::ClassificationResult`] directly; only auxiliary
//! responses live here.

use serde::Serialize;

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server is responding.
    pub status: &'static str,
    /// Name of the configured detector.
    pub detector: &'static str,
}
