//! Error types with actionable diagnostics.
//!
//! All errors carry enough context to resolve the problem without consulting
//! external documentation. `is_caller_error` separates bad requests (surfaced
//! to the caller with a specific reason) from operational failures.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for crecer operations.
pub type Result<T> = std::result::Result<T, CrecerError>;

/// Errors that can occur across training, inference, and matching.
#[derive(Error, Debug)]
pub enum CrecerError {
    /// Model artifact file missing at startup. Fatal: the inference path must
    /// not serve predictions without a fitted model.
    #[error("Model artifact not found: {path}\n  → Run `crecer train <data.csv>` to produce the artifact pair")]
    ArtifactNotFound { path: PathBuf },

    /// Model artifact present but unreadable. Also startup-fatal.
    #[error("Model artifact corrupt: {path}\n  {message}\n  → Re-run training to regenerate the artifact pair")]
    ArtifactCorrupt { path: PathBuf, message: String },

    /// A required feature key was absent from an inference request.
    #[error("Missing required feature '{field}' in inference input")]
    MissingFeature { field: String },

    /// A feature key was present but had the wrong shape or type.
    #[error("Invalid value for feature '{field}': {message}")]
    InvalidFeature { field: String, message: String },

    /// A matching request carried an unusable preference object.
    #[error("Invalid preference: {message}")]
    InvalidPreference { message: String },

    /// Training was invoked with no records at all.
    #[error("Training dataset is empty")]
    EmptyDataset,

    /// Too few usable rows survived data cleaning to derive three class bins.
    #[error("Insufficient training data: {rows} usable rows, need at least {needed}")]
    InsufficientData { rows: usize, needed: usize },

    /// Historical dataset file could not be read or lacks required columns.
    #[error("Dataset error in {path}: {message}")]
    Dataset { path: PathBuf, message: String },

    /// IO error with context.
    #[error("IO error: {context}\n  Cause: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl CrecerError {
    /// Create an IO error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// True for errors caused by the request rather than the service: these
    /// are reported back to the caller with their specific reason.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::MissingFeature { .. }
                | Self::InvalidFeature { .. }
                | Self::InvalidPreference { .. }
        )
    }

    /// True for conditions under which the inference service must refuse to
    /// start rather than serve undefined predictions.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::ArtifactNotFound { .. } | Self::ArtifactCorrupt { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_feature_names_the_key() {
        let err = CrecerError::MissingFeature { field: "domain".into() };
        let msg = err.to_string();
        assert!(msg.contains("domain"));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_artifact_errors_are_startup_fatal() {
        assert!(CrecerError::ArtifactNotFound { path: "model/pipeline.bin".into() }
            .is_startup_fatal());
        assert!(CrecerError::ArtifactCorrupt {
            path: "model/explainer.bin".into(),
            message: "bad magic".into()
        }
        .is_startup_fatal());
        assert!(!CrecerError::EmptyDataset.is_startup_fatal());
    }

    #[test]
    fn test_caller_errors_exclude_training_failures() {
        assert!(!CrecerError::EmptyDataset.is_caller_error());
        assert!(!CrecerError::InsufficientData { rows: 2, needed: 3 }.is_caller_error());
        assert!(CrecerError::InvalidPreference { message: "min > max".into() }.is_caller_error());
    }

    #[test]
    fn test_artifact_not_found_is_actionable() {
        let err = CrecerError::ArtifactNotFound { path: "model/pipeline.bin".into() };
        let msg = err.to_string();
        assert!(msg.contains("pipeline.bin"));
        assert!(msg.contains("crecer train"));
    }

    #[test]
    fn test_io_error_constructor_keeps_context() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CrecerError::io("reading dataset", io_err);
        assert!(err.to_string().contains("reading dataset"));
    }
}
