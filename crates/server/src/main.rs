mod app_state;
mod auth;
mod db;
mod errors;
mod handlers;
mod models;
mod view;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::extract::Request;
use axum::middleware::{self, Next};
use bidi_core::domain::model::AppConfig;
use bidi_core::infra::config::ConfigLoader;
use bidi_core::infra::logging::{init_logging, service_span, BootError};
use bidi_core::infra::reqwest_http::ReqwestHttp;
use bidi_core::infra::time::SystemClock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument, Span};

use app_state::{AppState, SharedContext};

const DEFAULT_CONFIG_PATH: &str = "crates/server/res/config.toml";

#[tokio::main]
async fn main() -> Result<(), BootError> {
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("BIDI_CONFIG_PATH").ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let cfg = ConfigLoader::load(Path::new(&config_path))
        .await
        .map_err(|e| BootError::Fatal(format!("config {config_path}: {e}")))?;
    init_logging(&cfg.log_level, cfg.log_format);

    let span = service_span();
    run(cfg, config_path).instrument(span).await
}

async fn run(cfg: AppConfig, config_path: String) -> Result<(), BootError> {
    info!(mode = ?cfg.mode, timezone = %cfg.timezone, config = %config_path, "BIDI starting");
    info!(baseline = ?cfg.baseline_policy, refresh_on_request = cfg.refresh_on_request, "Tracker configured");

    let addr: SocketAddr = format!("{}:{}", cfg.http_host, cfg.http_port)
        .parse()
        .map_err(|e| BootError::Fatal(format!("invalid http bind: {e}")))?;

    let repo = db::open_repo(&cfg).await?;
    let http = ReqwestHttp::new(&cfg.user_agent, cfg.request_timeout)
        .map_err(|e| BootError::Fatal(format!("http client: {e}")))?;
    let ctx = SharedContext::new(cfg, repo, Arc::new(http), Arc::new(SystemClock));
    let state = AppState::new(ctx);

    let cancel = CancellationToken::new();
    let poller_task = {
        let poller = Arc::clone(&state.poller);
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.run(cancel).await }.instrument(Span::current()))
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| BootError::Fatal(format!("bind {addr}: {e}")))?;
    info!(%addr, "HTTP listening");

    let shutdown = cancel.clone();
    // Connection tasks do not inherit this span; re-enter it per request.
    let request_span = Span::current();
    let app = handlers::router(state).layer(middleware::from_fn(
        move |req: Request, next: Next| {
            let span = request_span.clone();
            async move { next.run(req).instrument(span).await }
        },
    ));
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for ctrl-c");
            }
            info!("Shutdown requested");
            shutdown.cancel();
        })
        .await;

    cancel.cancel();
    if let Err(e) = poller_task.await {
        error!(error = %e, "Poller task failed");
    }

    served.map_err(|e| BootError::Fatal(format!("http server error: {e}")))
}
