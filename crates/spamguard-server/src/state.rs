//! Application state for the API server.

use std::sync::Arc;

use spamguard_core::{GatePolicy, SpamClassifier};

/// Worst-case JSON encoding of one char: a `\uXXXX\uXXXX` surrogate pair.
const MAX_JSON_BYTES_PER_CHAR: usize = 12;

/// Room for the surrounding object, key, and whitespace.
const BODY_OVERHEAD_BYTES: usize = 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Spam classifier, constructed once and shared by all requests.
    pub classifier: Arc<SpamClassifier>,
    /// Failure posture for POST /api/check.
    pub policy: GatePolicy,
}

impl AppState {
    /// Creates a new application state with the default gate policy.
    pub fn new(classifier: SpamClassifier) -> Self {
        Self::with_policy(classifier, GatePolicy::default())
    }

    /// Creates application state with a custom gate policy.
    pub fn with_policy(classifier: SpamClassifier, policy: GatePolicy) -> Self {
        Self {
            classifier: Arc::new(classifier),
            policy,
        }
    }

    /// Largest request body accepted, in bytes.
    ///
    /// Any body holding content within the classifier's char limit fits;
    /// larger bodies are refused before they are buffered in full.
    pub fn body_limit(&self) -> usize {
        self.classifier
            .config()
            .max_content_chars
            .saturating_mul(MAX_JSON_BYTES_PER_CHAR)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }
}
