//! API route handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use tracing::{debug, warn};

use vigil_core::ClassificationResult;

use crate::error::{ApiError, Result};
use crate::models::HealthResponse;
use crate::state::AppState;

/// File extensions accepted by the upload endpoint.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// POST /api/classify - Classify an uploaded image.
pub async fn classify_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ClassificationResult>> {
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Upload(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty())
            .ok_or(ApiError::NoFileSelected)?;

        if !allowed_file(&filename) {
            warn!(filename, "Rejected upload with disallowed file type");
            return Err(ApiError::FileTypeNotAllowed(filename));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Upload(e.to_string()))?;
        debug!(filename, bytes = bytes.len(), "Received image upload");
        image = Some(bytes.to_vec());
        break;
    }

    let image = image.ok_or(ApiError::MissingImage)?;

    // The detector call blocks on an external process; keep it off the
    // async executor.
    let classifier = state.classifier.clone();
    let result = tokio::task::spawn_blocking(move || classifier.classify_bytes(&image))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(result))
}

/// GET /api/health - Liveness probe.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        detector: state.classifier.detector_name(),
    })
}

/// Returns true if the filename carries an accepted image extension.
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
