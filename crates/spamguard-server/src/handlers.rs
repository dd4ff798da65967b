//! API route handlers.

use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use spamguard_core::ErrorKind;
use tracing::{debug, info};

use crate::error::{ApiError, Result};
use crate::models::{CheckResponse, ClassifyResponse, ContentRequest, HealthResponse};
use crate::state::AppState;

fn content_from(
    state: &AppState,
    payload: std::result::Result<Json<ContentRequest>, JsonRejection>,
) -> Result<String> {
    payload.map(|Json(req)| req.content).map_err(|rejection| {
        let status = rejection.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BodyTooLarge {
                limit_bytes: state.body_limit(),
            }
        } else {
            ApiError::Rejected {
                status,
                message: rejection.body_text(),
            }
        }
    })
}

/// POST /api/classify - Classify content and return the raw verdict.
pub async fn classify_content(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<ClassifyResponse>> {
    let content = content_from(&state, payload)?;
    debug!(content_chars = content.chars().count(), "Classifying content");

    let result = state.classifier.classify(&content).await?;

    Ok(Json(ClassifyResponse {
        is_spam: result.is_spam,
    }))
}

/// POST /api/check - Classify content and apply the gate policy.
///
/// Always answers 200 for well-formed requests; classification failures are
/// folded into the action according to the configured policy. An oversize
/// body counts as content too long.
pub async fn check_content(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ContentRequest>, JsonRejection>,
) -> Result<Json<CheckResponse>> {
    let start = Instant::now();
    let decision = match content_from(&state, payload) {
        Ok(content) => {
            debug!(content_chars = content.chars().count(), "Checking content");
            let outcome = state.classifier.classify(&content).await;
            state.policy.decide(&outcome)
        }
        Err(ApiError::BodyTooLarge { limit_bytes }) => {
            debug!(limit_bytes, "Request body over limit");
            state.policy.decide_failure(ErrorKind::ContentTooLong)
        }
        Err(err) => return Err(err),
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    info!(
        action = decision.action.name(),
        reason = %decision.reason,
        latency_ms,
        "Gate decision"
    );

    Ok(Json(CheckResponse {
        action: decision.action,
        reason: decision.reason,
        is_spam: decision.classification.map(|c| c.is_spam),
        latency_ms,
        checked_at: Utc::now(),
    }))
}

/// GET /api/health - Liveness and provider name.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.classifier.provider_name().to_string(),
    })
}
