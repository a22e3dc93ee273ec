//! Structured error types for configuration access.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A resolved value does not match the grammar of the requested type.
    MalformedValue,
    /// A value parses but exceeds the representable or declared range.
    OutOfRange,
    /// A `${key}` token (or a direct `get`) names a key with no value in any layer.
    UnresolvedReference,
    /// Variable expansion does not terminate because of a reference cycle.
    CyclicReference,
    /// Unexpected internal failure.
    InternalError,
}

/// Structured error for configuration operations.
///
/// Every failure names the key it occurred on and, where available, the raw
/// text that triggered it, so callers can report actionable diagnostics.
#[derive(Debug, Serialize)]
pub struct ConfigError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl ConfigError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
            raw: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    // Convenience constructors

    pub fn malformed(key: &str, raw: &str, expected: &str) -> Self {
        Self::new(
            ErrorCode::MalformedValue,
            format!("Value '{}' for key {} is not a valid {}", raw, key, expected),
        )
        .with_key(key)
        .with_raw(raw)
    }

    pub fn out_of_range(key: &str, raw: &str, bound: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::OutOfRange,
            format!(
                "Value '{}' for key {} exceeds the maximum of {}",
                raw, key, bound
            ),
        )
        .with_key(key)
        .with_raw(raw)
    }

    pub fn unresolved(key: &str) -> Self {
        Self::new(
            ErrorCode::UnresolvedReference,
            format!("No value set for key {}", key),
        )
        .with_key(key)
    }

    pub fn unresolved_token(referenced: &str, raw: &str) -> Self {
        Self::new(
            ErrorCode::UnresolvedReference,
            format!(
                "Reference ${{{}}} in '{}' names a key with no value",
                referenced, raw
            ),
        )
        .with_key(referenced)
        .with_raw(raw)
    }

    pub fn cyclic(key: &str) -> Self {
        Self::new(
            ErrorCode::CyclicReference,
            format!("Variable expansion of key {} references itself", key),
        )
        .with_key(key)
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ConfigError {}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for ConfigError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to ConfigError first
        match err.downcast::<ConfigError>() {
            Ok(config_err) => config_err,
            Err(err) => ConfigError::internal(err),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
