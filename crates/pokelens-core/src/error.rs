//! Error types for the Pokelens pipeline.
//!
//! Errors are organized by collaborator so log lines say which remote
//! service failed. None of these reach an HTTP client verbatim: the
//! pipeline folds them into a single localized not-found message.

use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Errors raised while talking to one of the remote collaborators.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Vision model upload or generation failed
    #[error("Vision error: {message}")]
    Vision {
        message: String,
        status_code: Option<u16>,
    },

    /// Species data API request failed
    #[error("Species API error: {message}")]
    Species {
        message: String,
        status_code: Option<u16>,
    },

    /// Translation request failed
    #[error("Translation error: {message}")]
    Translation { message: String },

    /// A required credential was not provided
    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

/// The only failure a species lookup exposes to its caller.
///
/// A missing id and a transport failure look the same from outside; the
/// `reason` is kept for logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No species record for id {id}: {reason}")]
    NotFound { id: u32, reason: String },
}

/// Convenience type alias for collaborator results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vision_error_display() {
        let err = PipelineError::Vision {
            message: "HTTP 503: unavailable".to_string(),
            status_code: Some(503),
        };
        assert_eq!(err.to_string(), "Vision error: HTTP 503: unavailable");
    }

    #[test]
    fn test_missing_credential_names_variable() {
        let err = PipelineError::MissingCredential("GEMINI_API_KEY".into());
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_lookup_error_mentions_id() {
        let err = LookupError::NotFound {
            id: 99999,
            reason: "HTTP 404".to_string(),
        };
        assert!(err.to_string().contains("99999"));
    }
}
