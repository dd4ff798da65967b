//! Spamguard Core - schema-constrained spam classification.
//!
//! Asks a hosted language model whether a piece of text is spam. The model's
//! answer is constrained to a fixed schema (`{ "isSpam": boolean }`) and
//! decoded into a typed value; nothing is parsed out of free text.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use spamguard_core::classifier::{ClassifierConfig, SpamClassifier};
//! use spamguard_core::provider::OpenAiProvider;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(OpenAiProvider::from_env()?);
//! let classifier = SpamClassifier::new(provider, ClassifierConfig::default());
//! let result = classifier.classify("Buy cheap pills now!!! Click here").await?;
//! println!("spam: {}", result.is_spam);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod error;
pub mod policy;
pub mod prompt;
pub mod provider;
pub mod schema;

pub use classifier::{
    ClassificationRequest, ClassificationResult, ClassifierConfig, SpamClassifier,
};
pub use error::{ClassifyError, ErrorKind, Result};
pub use policy::{GateAction, GateDecision, GatePolicy};
pub use provider::{
    GenerationRequest, OpenAiProvider, ProviderConfig, ProviderError, StructuredProvider,
};
