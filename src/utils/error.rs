use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Remote service error: {message}")]
    RemoteError { message: String },

    /// The remote payload was not valid JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("Cache key not found: {key}")]
    CacheKeyNotFound { key: String },

    #[error("Cache backend error: {message}")]
    CacheError { message: String },
}

/// Coarse grouping used by callers that only care about the kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Validation,
    NotFound,
    Remote,
    Cache,
}

impl LookupError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LookupError::ConfigError { .. } | LookupError::InvalidConfigValue { .. } => {
                ErrorCategory::Configuration
            }
            LookupError::ValidationError { .. } => ErrorCategory::Validation,
            LookupError::NotFound { .. } => ErrorCategory::NotFound,
            LookupError::ApiError(_)
            | LookupError::RemoteError { .. }
            | LookupError::SerializationError(_) => ErrorCategory::Remote,
            LookupError::CacheKeyNotFound { .. } | LookupError::CacheError { .. } => {
                ErrorCategory::Cache
            }
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        LookupError::ConfigError {
            message: message.into(),
        }
    }

    pub(crate) fn remote(message: impl Into<String>) -> Self {
        LookupError::RemoteError {
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for LookupError {
    fn from(e: rusqlite::Error) -> Self {
        LookupError::CacheError {
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LookupError>;
