//! API request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use spamguard_core::GateAction;

/// Request body for POST /api/classify and POST /api/check.
#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    /// The submitted text.
    pub content: String,
}

/// Response body for POST /api/classify.
#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    #[serde(rename = "isSpam")]
    pub is_spam: bool,
}

/// Response body for POST /api/check.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Action to take: allow, block, or hold.
    pub action: GateAction,
    /// Reason for the action (`spam`, `not_spam`, or an error code).
    pub reason: String,
    /// Classification, if one was obtained.
    #[serde(rename = "isSpam")]
    pub is_spam: Option<bool>,
    /// Classification latency in milliseconds.
    pub latency_ms: u64,
    /// When the check completed.
    pub checked_at: DateTime<Utc>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
}
