use thiserror::Error;
use tracing::Span;
use tracing_subscriber::EnvFilter;

use crate::domain::model::LogFormat;

pub const APPLICATION_NAME: &str = "bidi";
const UNKNOWN_COMMIT: &str = "unknown";

#[derive(Debug, Error)]
pub enum BootError {
    #[error("fatal: {0}")]
    Fatal(String),
}

pub fn init_logging(level: &str, format: LogFormat) {
    // Base level from config, still overridable via RUST_LOG.
    let default = format!("{level},bidi_core={level},bidi={level},sqlx=warn,reqwest=warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true);

    match format {
        LogFormat::Json => builder
            .json()
            .with_current_span(false)
            .with_span_list(true)
            .init(),
        LogFormat::Pretty => builder.with_thread_names(true).init(),
    }
}

/// Root span carrying `application_name` and `git_commit` on every event
/// logged inside it. Must be created after [`init_logging`].
///
/// Error level so the fields survive any configured log level.
pub fn service_span() -> Span {
    let commit = git_commit_from(std::env::var("GIT_SHA").ok());
    tracing::error_span!(
        "service",
        application_name = APPLICATION_NAME,
        git_commit = %commit
    )
}

/// Value for the `git_commit` field; blank or missing `GIT_SHA` reads as `unknown`.
pub fn git_commit_from(sha: Option<String>) -> String {
    sha.map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN_COMMIT.to_string())
}
