//! Provider-backed spam classifier.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{ClassificationRequest, ClassificationResult};
use crate::error::{ClassifyError, Result};
use crate::prompt;
use crate::provider::StructuredProvider;
use crate::schema;

/// Default maximum content length in chars.
pub const DEFAULT_MAX_CONTENT_CHARS: usize = 8_000;

/// Default bound on a single provider call in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the spam classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Maximum content length in chars; longer content is rejected before
    /// reaching the provider.
    pub max_content_chars: usize,
    /// Upper bound on the provider call. Expiry surfaces as
    /// [`ClassifyError::ProviderUnavailable`].
    pub timeout: Duration,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClassifierConfig {
    /// Sets the maximum content length.
    pub fn with_max_content_chars(mut self, max: usize) -> Self {
        self.max_content_chars = max;
        self
    }

    /// Sets the provider call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Classifies text as spam or not spam via a structured generation provider.
///
/// Holds no per-call state: one instance can serve concurrent callers.
/// Each call makes exactly one provider request with no retries and no
/// caching.
#[derive(Clone)]
pub struct SpamClassifier {
    provider: Arc<dyn StructuredProvider>,
    config: ClassifierConfig,
}

impl SpamClassifier {
    /// Creates a classifier over the given provider.
    pub fn new(provider: Arc<dyn StructuredProvider>, config: ClassifierConfig) -> Self {
        Self { provider, config }
    }

    /// Creates a classifier with default configuration.
    pub fn with_defaults(provider: Arc<dyn StructuredProvider>) -> Self {
        Self::new(provider, ClassifierConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Classifies `content`.
    pub async fn classify(&self, content: &str) -> Result<ClassificationResult> {
        let length = content.chars().count();
        if length > self.config.max_content_chars {
            debug!(length, max = self.config.max_content_chars, "Content too long");
            return Err(ClassifyError::ContentTooLong {
                length,
                max: self.config.max_content_chars,
            });
        }

        let request = prompt::build_request(content);
        let start = Instant::now();
        debug!(
            provider = self.provider.name(),
            content_chars = length,
            "Classifying content"
        );

        let call = self.provider.generate(&request);
        let outcome = match tokio::time::timeout(self.config.timeout, call).await {
            Ok(Ok(output)) => schema::decode_verdict(&output).map(ClassificationResult::from),
            Ok(Err(err)) => Err(ClassifyError::from(err)),
            Err(_) => Err(ClassifyError::ProviderUnavailable(format!(
                "no response within {:?}",
                self.config.timeout
            ))),
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(result) => info!(
                provider = self.provider.name(),
                is_spam = result.is_spam,
                latency_ms,
                "Content classified"
            ),
            Err(err) => warn!(
                provider = self.provider.name(),
                kind = err.kind().code(),
                latency_ms,
                "Classification failed: {}",
                err
            ),
        }

        outcome
    }

    /// Classifies the content of a request.
    pub async fn classify_request(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult> {
        self.classify(&request.content).await
    }
}

impl std::fmt::Debug for SpamClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpamClassifier")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish()
    }
}
