//! Boundary to the external visual content detector.
//!
//! The detection model is an opaque black box: it receives an image and
//! returns structured detections. Everything behind the [`NudityDetector`]
//! trait is outside this crate's decision-making.

use std::io::Write;
use std::process::Command;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::classifier::Detection;

/// Placeholder in detector command arguments that is replaced with the
/// staged image path.
pub const IMAGE_PLACEHOLDER: &str = "{image}";

/// Errors from the external detector call.
///
/// These are propagated unchanged to the caller; the pipeline performs
/// no retries.
#[derive(Debug, Error)]
pub enum DetectorError {
    /// Could not stage the image for the detector.
    #[error("failed to stage image for detector: {0}")]
    Staging(std::io::Error),

    /// Could not invoke the detector command.
    #[error("failed to invoke detector: {0}")]
    Invoke(std::io::Error),

    /// The detector ran but reported failure.
    #[error("detector exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },

    /// The detector output was not a JSON array of detections.
    #[error("unreadable detector output: {0}")]
    Output(#[from] serde_json::Error),
}

/// A detector that produces labeled detections for an image.
///
/// Implementations must be safe to share behind an `Arc` across
/// concurrent classification requests.
pub trait NudityDetector: Send + Sync {
    /// Runs detection over an in-memory image and returns its detections.
    fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError>;

    /// Returns the name of this detector for logging and health checks.
    fn name(&self) -> &'static str {
        "detector"
    }
}

/// Adapter for detectors with a file-path invocation contract.
///
/// The image is written to a scoped temporary file, the configured
/// command is invoked with the path substituted for [`IMAGE_PLACEHOLDER`]
/// (or appended when no argument carries the placeholder), and a JSON
/// array of detection records is read from stdout. The temporary file is
/// removed on every exit path, including detector failure, because its
/// lifetime is tied to the guard's `Drop`.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    program: String,
    args: Vec<String>,
    suffix: String,
}

impl CommandDetector {
    /// Creates a detector invoking the given program with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            suffix: ".jpg".to_string(),
        }
    }

    /// Sets the command arguments. Arguments may contain
    /// [`IMAGE_PLACEHOLDER`].
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Sets the temporary file suffix (default `.jpg`).
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Parses a whitespace-separated command line into a detector.
    ///
    /// Returns `None` for an empty command line. No shell quoting is
    /// interpreted; use the builder methods for arguments with spaces.
    pub fn parse(command_line: &str) -> Option<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts.next()?.to_string();
        let args = parts.map(str::to_string).collect();
        Some(Self {
            program,
            args,
            suffix: ".jpg".to_string(),
        })
    }

    /// Returns the configured program.
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl NudityDetector for CommandDetector {
    fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
        // The guard owns the staged file until this function returns, so
        // removal happens on success, detector failure, and parse failure
        // alike.
        let mut staged = tempfile::Builder::new()
            .prefix("vigil-")
            .suffix(&self.suffix)
            .tempfile()
            .map_err(DetectorError::Staging)?;
        staged.write_all(image).map_err(DetectorError::Staging)?;
        staged.flush().map_err(DetectorError::Staging)?;

        let path = staged.path().to_string_lossy().into_owned();
        let mut substituted = false;
        let args: Vec<String> = self
            .args
            .iter()
            .map(|arg| {
                if arg.contains(IMAGE_PLACEHOLDER) {
                    substituted = true;
                    arg.replace(IMAGE_PLACEHOLDER, &path)
                } else {
                    arg.clone()
                }
            })
            .collect();

        let mut command = Command::new(&self.program);
        command.args(&args);
        if !substituted {
            command.arg(&path);
        }

        debug!(program = %self.program, image_bytes = image.len(), "Invoking external detector");
        let output = command.output().map_err(DetectorError::Invoke)?;

        if !output.status.success() {
            return Err(DetectorError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let values: Vec<Value> = serde_json::from_slice(&output.stdout)?;
        Ok(Detection::parse_list(&values))
    }

    fn name(&self) -> &'static str {
        "command"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn sh(script: &str) -> CommandDetector {
        CommandDetector::new("sh").with_args(vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    fn parses_detections_from_stdout() {
        let detector = sh(
            r#"test -f {image} && echo '[{"label":"FEMALE_BREAST_EXPOSED","confidence":0.8,"box":[1,2,3,4]}]'"#,
        );
        let detections = detector.detect(b"fake image bytes").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "FEMALE_BREAST_EXPOSED");
        assert!((detections[0].confidence - 0.8).abs() < 1e-6);
        assert!(detections[0].extra.contains_key("box"));
    }

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let detector = sh(
            r#"echo '[{"label":"FACE_MALE","confidence":0.9},{"class":"oops"}]' # {image}"#,
        );
        let detections = detector.detect(b"img").unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].label, "FACE_MALE");
    }

    #[test]
    fn nonzero_exit_is_a_detector_failure() {
        let detector = sh("echo boom >&2; exit 3 # {image}");
        let err = detector.detect(b"img").unwrap_err();
        match err {
            DetectorError::Failed { status, stderr } => {
                assert_eq!(status, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn garbage_output_is_an_output_error() {
        let detector = sh("echo 'not json' # {image}");
        assert!(matches!(
            detector.detect(b"img"),
            Err(DetectorError::Output(_))
        ));
    }

    #[test]
    fn missing_program_is_an_invoke_error() {
        let detector = CommandDetector::new("/nonexistent/vigil-detector");
        assert!(matches!(
            detector.detect(b"img"),
            Err(DetectorError::Invoke(_))
        ));
    }

    #[test]
    fn staged_image_is_removed_on_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();
        let recorded = dir.path().join("seen-path");
        let record = recorded.to_string_lossy();

        let detector = sh(&format!("printf %s {{image}} > '{record}'; echo '[]'"));
        detector.detect(b"img").unwrap();
        let staged = fs::read_to_string(&recorded).unwrap();
        assert!(!Path::new(&staged).exists());

        let detector = sh(&format!("printf %s {{image}} > '{record}'; exit 1"));
        detector.detect(b"img").unwrap_err();
        let staged = fs::read_to_string(&recorded).unwrap();
        assert!(!Path::new(&staged).exists());
    }

    #[test]
    fn path_is_appended_when_no_placeholder_is_given() {
        // sh -c receives the appended path as $0.
        let detector = sh(r#"test -f "$0" && echo '[]'"#);
        assert!(detector.detect(b"img").unwrap().is_empty());
    }

    #[test]
    fn parse_splits_program_and_args() {
        let detector = CommandDetector::parse("nudenet-cli --json {image}").unwrap();
        assert_eq!(detector.program(), "nudenet-cli");
        assert_eq!(detector.args, vec!["--json", "{image}"]);
        assert!(CommandDetector::parse("   ").is_none());
    }
}
