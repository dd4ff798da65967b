//! OpenAI-compatible Chat Completions provider.
//!
//! Sends the schema as a strict `json_schema` response format and maps the
//! reply onto [`ProviderError`] kinds:
//!
//! - transport failures, 401/403/429 and 5xx statuses → `Unavailable`
//! - `message.refusal`, `finish_reason = "content_filter"`, or a 400 with a
//!   content policy error code → `Refused`
//! - missing or non-JSON message content, or a 400/404/422 rejecting the
//!   request itself → `Malformed`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{GenerationRequest, ProviderError, StructuredProvider};

/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

/// Environment variable overriding the model.
pub const ENV_MODEL: &str = "SPAMGUARD_MODEL";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";

/// Error codes the API uses when it declines on content policy grounds.
const REFUSAL_ERROR_CODES: &[&str] = &["content_policy_violation", "content_filter"];

/// Statuses meaning the request is invalid as sent, as opposed to transient.
const REJECTED_REQUEST_STATUSES: &[StatusCode] = &[
    StatusCode::BAD_REQUEST,
    StatusCode::NOT_FOUND,
    StatusCode::UNPROCESSABLE_ENTITY,
];

/// Provider configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// API key. Not validated up front; a missing key fails at call time.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API base URL without trailing slash.
    pub base_url: String,
    /// Timeout for a single HTTP request.
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ProviderConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: non_empty(ENV_API_KEY),
            model: non_empty(ENV_MODEL).unwrap_or(defaults.model),
            base_url: non_empty(ENV_BASE_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            request_timeout: defaults.request_timeout,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the HTTP request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    refusal: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
    code: Option<String>,
}

/// Provider backed by an OpenAI-compatible Chat Completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl OpenAiProvider {
    /// Creates a provider with its own HTTP client.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("Spamguard/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Creates a provider from environment configuration.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(ProviderConfig::from_env())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn request_body(&self, request: &GenerationRequest) -> Value {
        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt }
            ],
            "response_format": request.schema.to_response_format(),
            "temperature": 0
        })
    }
}

#[async_trait]
impl StructuredProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Value, ProviderError> {
        let body = self.request_body(request);

        let mut builder = self.client.post(self.endpoint()).json(&body);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(describe_transport_error(&e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Unavailable(describe_transport_error(&e)))?;

        if !status.is_success() {
            let err = error_from_status(status, &bytes);
            warn!(status = status.as_u16(), error = %err, "Provider returned error status");
            return Err(err);
        }

        let completion: ChatCompletion = serde_json::from_slice(&bytes)
            .map_err(|e| ProviderError::Malformed(format!("invalid completion body: {}", e)))?;

        debug!(choices = completion.choices.len(), "Provider completion received");
        output_from_completion(completion)
    }
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}

fn error_from_status(status: StatusCode, body: &[u8]) -> ProviderError {
    let detail = serde_json::from_slice::<ApiErrorBody>(body).ok();

    if status == StatusCode::BAD_REQUEST {
        if let Some(ref detail) = detail {
            let is_policy = detail
                .error
                .code
                .as_deref()
                .is_some_and(|code| REFUSAL_ERROR_CODES.contains(&code));
            if is_policy {
                return ProviderError::Refused(detail.error.message.clone());
            }
        }
    }

    let message = match detail {
        Some(detail) => detail.error.message,
        None => String::from_utf8_lossy(body).into_owned(),
    };
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    // The request itself was rejected (bad schema, unknown model); resending it
    // cannot succeed.
    if REJECTED_REQUEST_STATUSES.contains(&status) {
        ProviderError::Malformed(message)
    } else {
        ProviderError::Unavailable(message)
    }
}

fn output_from_completion(completion: ChatCompletion) -> Result<Value, ProviderError> {
    let choice = completion
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Malformed("completion has no choices".to_string()))?;

    if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
        return Err(ProviderError::Refused(refusal));
    }

    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(ProviderError::Refused(
            "output blocked by content filter".to_string(),
        ));
    }

    let content = choice
        .message
        .content
        .ok_or_else(|| ProviderError::Malformed("missing message content".to_string()))?;

    serde_json::from_str(&content)
        .map_err(|e| ProviderError::Malformed(format!("message content is not JSON: {}", e)))
}
