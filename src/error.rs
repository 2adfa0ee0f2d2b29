//! Error types for document transformation, hook processing, and loading.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal precondition violations while transforming a document.
///
/// Each variant names one condition so the hosting framework can map them to
/// distinct diagnostics. Tolerated anomalies are never errors; they surface
/// as [`crate::Warning`] values instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Promoting a link relation would overwrite an existing top-level key.
    #[error("cannot promote link relation \"{relation}\": key \"{key}\" already present")]
    KeyCollision { relation: String, key: String },

    /// An item lacks the identifier key required for URL expansion.
    #[error("item at {path} is missing identifier key \"{key}\"")]
    MissingIdentifier { path: String, key: String },

    /// An item identifier is not a string or cannot be resolved as a URL
    /// reference against the base URL.
    #[error("invalid identifier at {path}: {message}")]
    InvalidIdentifier { path: String, message: String },
}

/// Errors raised by the hook entry points.
#[derive(Debug, Error)]
pub enum HookError {
    /// A body that was expected to hold a JSON document did not parse.
    #[error("body is not valid JSON: {source}")]
    ParseFailure {
        #[from]
        source: serde_json::Error,
    },

    /// The request body parsed to JSON `null`, so there is no document to
    /// persist.
    #[error("request body holds no document")]
    NullDocument,

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Errors while loading a document from a file, string, or URL.
#[derive(Debug, Error)]
pub enum LoadError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "remote")]
    #[error("failed to fetch {url}: {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },
}

impl TransformError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl HookError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            HookError::ParseFailure { .. } | HookError::NullDocument => 2,
            HookError::Transform(e) => e.exit_code(),
        }
    }
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            #[cfg(feature = "remote")]
            LoadError::NetworkError { .. } => 3,
            LoadError::InvalidJson { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_error_display() {
        let err = TransformError::KeyCollision {
            relation: "next".into(),
            key: "next".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot promote link relation \"next\": key \"next\" already present"
        );

        let err = TransformError::MissingIdentifier {
            path: "/@graph/2".into(),
            key: "@id".into(),
        };
        assert_eq!(
            err.to_string(),
            "item at /@graph/2 is missing identifier key \"@id\""
        );
    }

    #[test]
    fn transform_error_exit_codes() {
        let err = TransformError::KeyCollision {
            relation: "collection".into(),
            key: "partOf".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn hook_error_wraps_transform() {
        let err = HookError::from(TransformError::MissingIdentifier {
            path: "/".into(),
            key: "@id".into(),
        });
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(err, HookError::Transform(_)));
    }

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let source = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = LoadError::InvalidJson { source };
        assert_eq!(err.exit_code(), 2);
    }
}
