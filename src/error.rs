//! Error types for qail-filter.
//!
//! Turning parameters into conditions never fails; these cover loading
//! the allow-list and reading CLI input.

use thiserror::Error;

/// The main error type for qail-filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// Invalid allow-list configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A `key=value` argument without `=` or with an empty key.
    #[error("Invalid parameter: '{0}'. Expected: key=value")]
    InvalidParam(String),

    /// Malformed TOML.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FilterError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for qail-filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::InvalidParam("status".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: 'status'. Expected: key=value"
        );
        assert_eq!(
            FilterError::config("no filters").to_string(),
            "Configuration error: no filters"
        );
    }
}
