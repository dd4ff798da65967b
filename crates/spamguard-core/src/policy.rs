//! Gate policy: turning a classification outcome into an action.
//!
//! The classifier surfaces every failure as a distinct error kind. A
//! [`GatePolicy`] decides per kind whether the gate fails open (allow),
//! fails closed (block), or holds the content for review.

use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationResult;
use crate::error::{ClassifyError, ErrorKind};

/// Action to take on submitted content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateAction {
    /// Publish the content.
    Allow,
    /// Reject the content.
    Block,
    /// Could not classify; keep the content for manual review.
    Hold,
}

impl GateAction {
    /// Returns a human-readable name for this action.
    pub fn name(&self) -> &'static str {
        match self {
            GateAction::Allow => "Allow",
            GateAction::Block => "Block",
            GateAction::Hold => "Hold",
        }
    }
}

/// Outcome of applying a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateDecision {
    /// The action to take.
    pub action: GateAction,
    /// Why: `"spam"`, `"not_spam"`, or an error kind code.
    pub reason: String,
    /// The classification, when one was obtained.
    pub classification: Option<ClassificationResult>,
}

/// Per-error-kind failure posture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatePolicy {
    /// Action when the provider is unreachable or timed out.
    pub on_unavailable: GateAction,
    /// Action when the provider output failed schema validation.
    pub on_schema_failure: GateAction,
    /// Action when the provider refused to answer.
    pub on_refusal: GateAction,
    /// Action when content exceeds the length limit.
    pub on_too_long: GateAction,
}

impl Default for GatePolicy {
    /// Holds anything that could not be classified; never treats a failure
    /// as "not spam".
    fn default() -> Self {
        Self {
            on_unavailable: GateAction::Hold,
            on_schema_failure: GateAction::Hold,
            on_refusal: GateAction::Hold,
            on_too_long: GateAction::Block,
        }
    }
}

impl GatePolicy {
    /// Every failure allows the content through.
    pub fn fail_open() -> Self {
        Self::uniform(GateAction::Allow)
    }

    /// Every failure blocks the content.
    pub fn fail_closed() -> Self {
        Self::uniform(GateAction::Block)
    }

    fn uniform(action: GateAction) -> Self {
        Self {
            on_unavailable: action,
            on_schema_failure: action,
            on_refusal: action,
            on_too_long: action,
        }
    }

    /// Sets the action for refusals.
    pub fn with_on_refusal(mut self, action: GateAction) -> Self {
        self.on_refusal = action;
        self
    }

    /// Sets the action for unavailable providers.
    pub fn with_on_unavailable(mut self, action: GateAction) -> Self {
        self.on_unavailable = action;
        self
    }

    /// Returns the configured action for an error kind.
    pub fn action_for(&self, kind: ErrorKind) -> GateAction {
        match kind {
            ErrorKind::ProviderUnavailable => self.on_unavailable,
            ErrorKind::SchemaValidationFailed => self.on_schema_failure,
            ErrorKind::ProviderRefused => self.on_refusal,
            ErrorKind::ContentTooLong => self.on_too_long,
        }
    }

    /// Decides what to do with content given its classification outcome.
    pub fn decide(
        &self,
        outcome: &std::result::Result<ClassificationResult, ClassifyError>,
    ) -> GateDecision {
        match outcome {
            Ok(result) if result.is_spam => GateDecision {
                action: GateAction::Block,
                reason: "spam".to_string(),
                classification: Some(*result),
            },
            Ok(result) => GateDecision {
                action: GateAction::Allow,
                reason: "not_spam".to_string(),
                classification: Some(*result),
            },
            Err(err) => self.decide_failure(err.kind()),
        }
    }

    /// Decides what to do with content that could not be classified.
    pub fn decide_failure(&self, kind: ErrorKind) -> GateDecision {
        GateDecision {
            action: self.action_for(kind),
            reason: kind.code().to_string(),
            classification: None,
        }
    }
}
