//! Spam classification.
//!
//! The spam/not-spam judgment is delegated to a [`StructuredProvider`]; this
//! module builds the request, bounds it in time, and validates the answer.
//!
//! [`StructuredProvider`]: crate::provider::StructuredProvider

mod result;
mod spam;

pub use result::{ClassificationRequest, ClassificationResult};
pub use spam::{ClassifierConfig, SpamClassifier, DEFAULT_MAX_CONTENT_CHARS, DEFAULT_TIMEOUT_SECS};
