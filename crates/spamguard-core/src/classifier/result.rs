//! Classification request and result types.

use serde::{Deserialize, Serialize};

use crate::schema::SpamVerdict;

/// Text submitted for classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    /// The text to judge. Empty text is valid and forwarded unchanged.
    pub content: String,
}

impl ClassificationRequest {
    /// Creates a new request.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Result of classifying content.
///
/// Only ever produced from a decoded provider answer; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether the content is spam.
    #[serde(rename = "isSpam")]
    pub is_spam: bool,
}

impl ClassificationResult {
    /// Returns true if the content is spam.
    pub fn is_spam(&self) -> bool {
        self.is_spam
    }
}

impl From<SpamVerdict> for ClassificationResult {
    fn from(verdict: SpamVerdict) -> Self {
        Self {
            is_spam: verdict.is_spam,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_serializes_with_camel_case_field() {
        let result = ClassificationResult { is_spam: true };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"isSpam":true}"#
        );
    }

    #[test]
    fn request_accepts_empty_content() {
        let request: ClassificationRequest = serde_json::from_str(r#"{"content":""}"#).unwrap();
        assert_eq!(request, ClassificationRequest::new(""));
    }
}
