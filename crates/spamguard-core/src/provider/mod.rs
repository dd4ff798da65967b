//! Structured generation providers.
//!
//! A provider takes a prompt plus an [`OutputSchema`] and returns a JSON value
//! that is supposed to conform to it. Decoding against the schema happens in
//! the classifier, not here.

mod openai;

pub use openai::{OpenAiProvider, ProviderConfig};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::schema::OutputSchema;

/// A single schema-constrained generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System instructions.
    pub system: String,
    /// User prompt, with the content to judge embedded.
    pub prompt: String,
    /// Schema the output must conform to.
    pub schema: OutputSchema,
}

/// Errors reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Network failure, timeout, or an error status from the provider.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    /// The provider refused to answer under its content policy.
    #[error("provider refused: {0}")]
    Refused(String),

    /// The provider answered with something that is not a JSON payload.
    #[error("malformed provider output: {0}")]
    Malformed(String),
}

/// Trait for schema-constrained generation backends.
///
/// Implementations are shared across concurrent requests and must not hold
/// per-call mutable state.
#[async_trait]
pub trait StructuredProvider: Send + Sync {
    /// Returns the name of this provider for logging/debugging.
    fn name(&self) -> &'static str;

    /// Issues exactly one generation call and returns the raw JSON output.
    async fn generate(&self, request: &GenerationRequest) -> Result<Value, ProviderError>;
}
