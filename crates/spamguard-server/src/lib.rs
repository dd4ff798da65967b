//! Spamguard Server - HTTP API server.
//!
//! Exposes the spam classifier to submission handlers.
//!
//! ## Endpoints
//!
//! - `POST /api/classify` - Classify content, return `{ "isSpam": bool }`
//! - `POST /api/check` - Classify content and apply the gate policy
//! - `GET /api/health` - Liveness and provider name
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use spamguard_core::{OpenAiProvider, SpamClassifier};
//! use spamguard_server::{AppState, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(OpenAiProvider::from_env().unwrap());
//!     let state = AppState::new(SpamClassifier::with_defaults(provider));
//!     let server = Server::with_state(ServerConfig::default(), state).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

pub mod error;
mod handlers;
pub mod models;
pub mod state;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use error::{ApiError, Result};
pub use state::AppState;

/// Default server port.
pub const DEFAULT_PORT: u16 = 48766;

/// Default server host (localhost only).
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to (default: 127.0.0.1).
    pub host: String,
    /// Port to bind to (default: 48766).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Sets the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Server error types.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to address.
    #[error("failed to bind to {0}: {1}")]
    BindError(SocketAddr, std::io::Error),

    /// Server runtime error.
    #[error("server error: {0}")]
    Runtime(String),
}

/// Builds the API router over the given state.
///
/// Request bodies are capped at [`AppState::body_limit`].
pub fn router(state: AppState) -> Router {
    let body_limit = state.body_limit();

    Router::new()
        .route("/api/classify", post(handlers::classify_content))
        .route("/api/check", post(handlers::check_content))
        .route("/api/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// The HTTP API server.
pub struct Server {
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Creates a server with the given application state.
    pub fn with_state(
        config: ServerConfig,
        state: AppState,
    ) -> std::result::Result<Self, ServerError> {
        // Submission forms post from the browser
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let router = router(state).layer(cors);

        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ServerError::Runtime(format!("invalid address: {}", e)))?;

        Ok(Self { router, addr })
    }

    /// Returns the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Runs the server until shutdown.
    pub async fn run(self) -> std::result::Result<(), ServerError> {
        info!("Starting Spamguard API server on {}", self.addr);

        let domain = if self.addr.is_ipv6() {
            Domain::IPV6
        } else {
            Domain::IPV4
        };
        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        // Allow rebinding while old sockets linger in TIME_WAIT
        socket
            .set_reuse_address(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        socket
            .bind(&self.addr.into())
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .listen(128)
            .map_err(|e| ServerError::BindError(self.addr, e))?;
        socket
            .set_nonblocking(true)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        let std_listener: std::net::TcpListener = socket.into();
        let listener = tokio::net::TcpListener::from_std(std_listener)
            .map_err(|e| ServerError::BindError(self.addr, e))?;

        axum::serve(listener, self.router)
            .await
            .map_err(|e| ServerError::Runtime(e.to_string()))?;

        Ok(())
    }

    /// Returns the router for testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use spamguard_core::{
        ClassifierConfig, GatePolicy, GenerationRequest, ProviderError, SpamClassifier,
        StructuredProvider,
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Flags anything containing "click here" and fails on marker strings.
    struct ScriptedProvider;

    #[async_trait]
    impl StructuredProvider for ScriptedProvider {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn generate(
            &self,
            request: &GenerationRequest,
        ) -> std::result::Result<Value, ProviderError> {
            let prompt = request.prompt.to_lowercase();
            if prompt.contains("[down]") {
                Err(ProviderError::Unavailable("connection refused".into()))
            } else if prompt.contains("[refuse]") {
                Err(ProviderError::Refused("content policy".into()))
            } else if prompt.contains("[garbled]") {
                Ok(json!({ "spam": "maybe" }))
            } else {
                Ok(json!({ "isSpam": prompt.contains("click here") }))
            }
        }
    }

    fn create_test_app(policy: GatePolicy) -> Router {
        let classifier = SpamClassifier::new(
            Arc::new(ScriptedProvider),
            ClassifierConfig::default().with_max_content_chars(200),
        );
        router(AppState::with_policy(classifier, policy))
    }

    async fn post_raw(
        app: Router,
        uri: &str,
        content_type: Option<&str>,
        body: String,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = builder.body(Body::from(body)).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        post_raw(app, uri, Some("application/json"), body.to_string()).await
    }

    #[tokio::test]
    async fn test_classify_spam() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_json(
            app,
            "/api/classify",
            json!({"content": "Buy cheap pills now!!! Click here"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"isSpam": true}));
    }

    #[tokio::test]
    async fn test_classify_not_spam() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_json(
            app,
            "/api/classify",
            json!({"content": "Looking for a senior backend engineer role in Lagos"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"isSpam": false}));
    }

    #[tokio::test]
    async fn test_classify_empty_content() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_json(app, "/api/classify", json!({"content": ""})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["isSpam"], false);
    }

    #[tokio::test]
    async fn test_classify_errors_keep_their_kind() {
        let cases = [
            ("[down]", StatusCode::SERVICE_UNAVAILABLE, "provider_unavailable"),
            ("[refuse]", StatusCode::UNPROCESSABLE_ENTITY, "provider_refused"),
            ("[garbled]", StatusCode::BAD_GATEWAY, "schema_validation_failed"),
        ];

        for (content, expected_status, expected_code) in cases {
            let app = create_test_app(GatePolicy::default());
            let (status, json) =
                post_json(app, "/api/classify", json!({"content": content})).await;

            assert_eq!(status, expected_status);
            assert_eq!(json["code"], expected_code);
        }
    }

    #[tokio::test]
    async fn test_classify_too_long() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) =
            post_json(app, "/api/classify", json!({"content": "x".repeat(201)})).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["code"], "content_too_long");
    }

    #[tokio::test]
    async fn test_classify_missing_content_is_unprocessable() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_json(app, "/api/classify", json!({"text": "hi"})).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_classify_malformed_json_is_bad_request() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_raw(
            app,
            "/api/classify",
            Some("application/json"),
            "{\"content\": ".to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_classify_without_content_type_is_unsupported() {
        let app = create_test_app(GatePolicy::default());
        let body = json!({"content": "hello"}).to_string();
        let (status, json) = post_raw(app, "/api/classify", None, body).await;

        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json["code"], "invalid_request");
    }

    #[tokio::test]
    async fn test_classify_oversize_body_is_too_long() {
        let app = create_test_app(GatePolicy::default());
        // 200 chars allowed, so the body limit is 200 * 12 + 1024 bytes
        let (status, json) =
            post_json(app, "/api/classify", json!({"content": "x".repeat(5000)})).await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json["code"], "content_too_long");
    }

    #[tokio::test]
    async fn test_check_oversize_body_follows_too_long_policy() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) =
            post_json(app, "/api/check", json!({"content": "x".repeat(5000)})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["action"], "block");
        assert_eq!(json["reason"], "content_too_long");
        assert!(json["isSpam"].is_null());

        let app = create_test_app(GatePolicy::fail_open());
        let (_, json) = post_json(app, "/api/check", json!({"content": "x".repeat(5000)})).await;
        assert_eq!(json["action"], "allow");
    }

    #[test]
    fn test_body_limit_tracks_content_limit() {
        let classifier = SpamClassifier::new(
            Arc::new(ScriptedProvider),
            ClassifierConfig::default().with_max_content_chars(200),
        );
        assert_eq!(AppState::new(classifier).body_limit(), 200 * 12 + 1024);
    }

    #[tokio::test]
    async fn test_check_blocks_spam() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) =
            post_json(app, "/api/check", json!({"content": "click here to win"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["action"], "block");
        assert_eq!(json["reason"], "spam");
        assert_eq!(json["isSpam"], true);
    }

    #[tokio::test]
    async fn test_check_holds_on_refusal_by_default() {
        let app = create_test_app(GatePolicy::default());
        let (status, json) = post_json(app, "/api/check", json!({"content": "[refuse]"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["action"], "hold");
        assert_eq!(json["reason"], "provider_refused");
        assert!(json["isSpam"].is_null());
    }

    #[tokio::test]
    async fn test_check_fail_open_allows_when_down() {
        let app = create_test_app(GatePolicy::fail_open());
        let (_, json) = post_json(app, "/api/check", json!({"content": "[down]"})).await;

        assert_eq!(json["action"], "allow");
        assert_eq!(json["reason"], "provider_unavailable");
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app(GatePolicy::default());
        let request = Request::builder()
            .method("GET")
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["provider"], "scripted");
    }

    #[tokio::test]
    async fn test_server_router_serves_api() {
        let classifier = SpamClassifier::with_defaults(Arc::new(ScriptedProvider));
        let server = Server::with_state(ServerConfig::default(), AppState::new(classifier)).unwrap();
        assert_eq!(server.addr(), "127.0.0.1:48766".parse::<SocketAddr>().unwrap());

        let (status, json) = post_json(
            server.router(),
            "/api/classify",
            json!({"content": "click here"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"isSpam": true}));
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::default().with_host("0.0.0.0").with_port(9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_server_rejects_invalid_address() {
        let classifier = SpamClassifier::with_defaults(Arc::new(ScriptedProvider));
        let result = Server::with_state(
            ServerConfig::default().with_host("not an address"),
            AppState::new(classifier),
        );
        assert!(matches!(result, Err(ServerError::Runtime(_))));
    }
}
