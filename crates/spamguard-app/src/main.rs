//! Spamguard - spam gate for user submissions.
//!
//! Runs the HTTP API (`serve`) or classifies a single text (`check`).
//! Provider credentials and model come from the environment
//! (`OPENAI_API_KEY`, `SPAMGUARD_MODEL`, `OPENAI_BASE_URL`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use spamguard_core::classifier::{DEFAULT_MAX_CONTENT_CHARS, DEFAULT_TIMEOUT_SECS};
use spamguard_core::{ClassifierConfig, GatePolicy, OpenAiProvider, ProviderConfig, SpamClassifier};
use spamguard_server::{AppState, Server, ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Spamguard - schema-constrained spam classification
#[derive(Parser, Debug)]
#[command(name = "spamguard", version, about)]
struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Upper bound on a single provider call, in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Reject content longer than this many characters
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CONTENT_CHARS)]
    max_content_chars: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// What /api/check does when content cannot be classified
        #[arg(long, value_enum, default_value_t = PolicyArg::Hold)]
        policy: PolicyArg,
    },
    /// Classify a single text and print the result as JSON
    Check {
        /// Text to classify
        text: String,
    },
}

/// Failure posture for content that cannot be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Hold for review (blocks oversize content)
    Hold,
    /// Allow through
    Open,
    /// Block
    Closed,
}

impl PolicyArg {
    fn to_policy(self) -> GatePolicy {
        match self {
            PolicyArg::Hold => GatePolicy::default(),
            PolicyArg::Open => GatePolicy::fail_open(),
            PolicyArg::Closed => GatePolicy::fail_closed(),
        }
    }
}

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "spamguard", "Spamguard").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging with file rotation.
///
/// Console output goes to stderr so `check` can print JSON on stdout.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("spamguard={},warn", log_level)));

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("spamguard")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(std::io::stderr))
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

/// Builds the classifier once at startup; it is shared from here on.
fn build_classifier(args: &Args) -> anyhow::Result<SpamClassifier> {
    let timeout = Duration::from_secs(args.timeout_secs);
    let provider_config = ProviderConfig::from_env().with_request_timeout(timeout);

    if provider_config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; provider calls will fail");
    }
    tracing::info!(
        model = %provider_config.model,
        base_url = %provider_config.base_url,
        "Provider configured"
    );

    let provider = OpenAiProvider::new(provider_config).context("failed to create provider")?;
    let config = ClassifierConfig::default()
        .with_timeout(timeout)
        .with_max_content_chars(args.max_content_chars);

    Ok(SpamClassifier::new(Arc::new(provider), config))
}

async fn run_check(classifier: &SpamClassifier, text: &str) -> anyhow::Result<()> {
    match classifier.classify(text).await {
        Ok(result) => {
            println!("{}", serde_json::to_string(&result)?);
            Ok(())
        }
        Err(err) => {
            let body = serde_json::json!({
                "error": err.to_string(),
                "code": err.kind().code(),
            });
            eprintln!("{}", body);
            Err(anyhow::anyhow!("classification failed ({})", err.kind().code()))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Keep the guard alive for the duration of the program
    let _log_guard = init_logging(&args);

    let classifier = build_classifier(&args)?;

    match &args.command {
        Command::Serve { host, port, policy } => {
            let config = ServerConfig::default().with_host(host.clone()).with_port(*port);
            let state = AppState::with_policy(classifier, policy.to_policy());
            let server = Server::with_state(config, state)?;

            tracing::info!(policy = ?policy, addr = %server.addr(), "Starting Spamguard...");
            server.run().await?;
        }
        Command::Check { text } => run_check(&classifier, text).await?,
    }

    tracing::info!("Spamguard shutting down");
    Ok(())
}
