//! Classification error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::ProviderError;

/// Errors that can occur while classifying content.
///
/// Each variant is a distinct terminal outcome so callers can choose to
/// fail open or fail closed per kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// The provider could not be reached, timed out, or rejected the call.
    #[error("provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The provider answered but the output did not match the schema.
    #[error("schema validation failed: {0}")]
    SchemaValidationFailed(String),

    /// The provider declined to answer under its content policy.
    #[error("provider refused: {0}")]
    ProviderRefused(String),

    /// Content exceeds the configured maximum length.
    #[error("content too long: {length} chars (max {max})")]
    ContentTooLong {
        /// Length of the submitted content in chars.
        length: usize,
        /// Configured maximum.
        max: usize,
    },
}

/// Discriminant of [`ClassifyError`] without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ProviderUnavailable,
    SchemaValidationFailed,
    ProviderRefused,
    ContentTooLong,
}

impl ErrorKind {
    /// Returns the stable machine-readable code for this kind.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ProviderUnavailable => "provider_unavailable",
            ErrorKind::SchemaValidationFailed => "schema_validation_failed",
            ErrorKind::ProviderRefused => "provider_refused",
            ErrorKind::ContentTooLong => "content_too_long",
        }
    }
}

impl ClassifyError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClassifyError::ProviderUnavailable(_) => ErrorKind::ProviderUnavailable,
            ClassifyError::SchemaValidationFailed(_) => ErrorKind::SchemaValidationFailed,
            ClassifyError::ProviderRefused(_) => ErrorKind::ProviderRefused,
            ClassifyError::ContentTooLong { .. } => ErrorKind::ContentTooLong,
        }
    }

    /// Returns true if retrying the same request may succeed.
    ///
    /// Only transient provider failures qualify. The classifier itself
    /// never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifyError::ProviderUnavailable(_))
    }
}

impl From<ProviderError> for ClassifyError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Unavailable(msg) => ClassifyError::ProviderUnavailable(msg),
            ProviderError::Refused(msg) => ClassifyError::ProviderRefused(msg),
            ProviderError::Malformed(msg) => ClassifyError::SchemaValidationFailed(msg),
        }
    }
}

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(ClassifyError::ProviderUnavailable("timeout".into()).is_retryable());
        assert!(!ClassifyError::SchemaValidationFailed("missing".into()).is_retryable());
        assert!(!ClassifyError::ProviderRefused("policy".into()).is_retryable());
        assert!(!ClassifyError::ContentTooLong { length: 10, max: 5 }.is_retryable());
    }

    #[test]
    fn provider_errors_map_to_distinct_kinds() {
        let unavailable: ClassifyError = ProviderError::Unavailable("down".into()).into();
        let refused: ClassifyError = ProviderError::Refused("no".into()).into();
        let malformed: ClassifyError = ProviderError::Malformed("bad json".into()).into();

        assert_eq!(unavailable.kind(), ErrorKind::ProviderUnavailable);
        assert_eq!(refused.kind(), ErrorKind::ProviderRefused);
        assert_eq!(malformed.kind(), ErrorKind::SchemaValidationFailed);
    }

    #[test]
    fn kind_codes_are_snake_case() {
        assert_eq!(ErrorKind::ProviderRefused.code(), "provider_refused");
        assert_eq!(
            serde_json::to_value(ErrorKind::ContentTooLong).unwrap(),
            "content_too_long"
        );
    }

    #[test]
    fn display_includes_detail() {
        let err = ClassifyError::ContentTooLong {
            length: 12,
            max: 10,
        };
        assert_eq!(err.to_string(), "content too long: 12 chars (max 10)");
    }
}
