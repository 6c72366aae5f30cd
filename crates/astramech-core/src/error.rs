//! # Error Module
//!
//! Errors raised at the edges of the engine: loading documents and
//! validating input. The calculations themselves never fail.

use thiserror::Error;

/// Result alias for fallible core operations.
pub type Result<T> = std::result::Result<T, AstraError>;

/// Errors from the AstraMech core.
#[derive(Debug, Error)]
pub enum AstraError {
    /// Input failed validation (bad profile, negative figures, ...).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Benchmark or application configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML document could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML document could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AstraError {
    /// Whether the error was caused by the caller's input rather than the server.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, AstraError::Validation(_) | AstraError::Json(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_is_client_error() {
        assert!(AstraError::Validation("bad".into()).is_client_error());
        assert!(!AstraError::Config("boom".into()).is_client_error());
    }

    #[test]
    fn display_includes_message() {
        let err = AstraError::Config("missing default".into());
        assert_eq!(err.to_string(), "Configuration error: missing default");
    }
}
