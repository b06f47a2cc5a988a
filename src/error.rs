//! Fatal error type for the conversion pipeline.
//!
//! Only structurally unrecoverable situations end up here: a source that
//! cannot be read or deserialized, an invalid file pattern, a document whose
//! root is not a mapping, or two documents that disagree on the shape of a
//! key. Everything else is
//! reported as a [`Diagnostic`](crate::diagnostics::Diagnostic) and the
//! pipeline keeps going.

use thiserror::Error;

/// Error type for conversion operations that cannot produce a model
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File \"{path}\": {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("File \"{path}\": {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid file pattern \"{pattern}\": {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Document \"{origin}\" is not a mapping of sections")]
    InvalidDocument { origin: String },

    #[error("Cannot merge \"{path}\" from \"{origin}\": {reason}")]
    MergeConflict {
        origin: String,
        path: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl ConvertError {
    pub fn merge_conflict(
        origin: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConvertError::MergeConflict {
            origin: origin.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }
}
