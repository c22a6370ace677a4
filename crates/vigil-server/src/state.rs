//! Application state for the API server.

use std::sync::Arc;

use vigil_core::ImageClassifier;

/// Shared application state.
///
/// The classification pipeline is stateless and read-only, so it is
/// shared plainly behind an `Arc`, injected once at startup.
#[derive(Clone)]
pub struct AppState {
    /// Classification pipeline with its detector handle.
    pub classifier: Arc<ImageClassifier>,
}

impl AppState {
    /// Creates application state owning the given pipeline.
    pub fn new(classifier: ImageClassifier) -> Self {
        Self {
            classifier: Arc::new(classifier),
        }
    }

    /// Creates application state sharing an existing pipeline.
    pub fn with_shared(classifier: Arc<ImageClassifier>) -> Self {
        Self { classifier }
    }
}
