mod api;
mod health;
mod incidents;
mod stats;
mod timeline;
mod view;

use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::app_state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/:key/api", get(api::status))
        .route("/:key/bankid", get(view::status_page))
        .route("/:key/timeline", get(timeline::timeline))
        .route("/:key/stats", get(stats::stats))
        .route("/:key/incidents", get(incidents::incidents))
        .with_state(state)
}

/// Runs a poll cycle before answering when `api.refresh_on_request` is set.
async fn refresh_if_configured(state: &AppState) {
    if state.ctx.cfg.refresh_on_request {
        let outcome = state.poller.poll_once().await;
        debug!(code = outcome.code.ordinal(), "Refreshed on request");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use bidi_core::app::users::seed_user;
    use bidi_core::domain::model::{FetchError, GetResult, SeedUser};
    use bidi_core::infra::config::ConfigLoader;
    use bidi_core::infra::sqlite_repo::SqliteRepo;
    use bidi_core::ports::clock::Clock;
    use bidi_core::ports::http::Http;
    use bidi_core::ports::repo::Repo;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::router;
    use crate::app_state::{AppState, SharedContext};

    const KEY: &str = "test-key";
    // 2024-01-01T11:00:00Z
    const NOW_MS: i64 = 1_704_106_800_000;

    const CRITICAL_PAGE: &str = r#"<html><body>
<div class="m-statuspage"><span class="color-dot critical"></span></div>
<div class="m-statuspage-description"></div>
<p>Innlogging feiler & BankID er nede</p>
</body></html>"#;

    const OK_PAGE: &str =
        r#"<div class="m-statuspage"><span class="color-dot none"></span></div>"#;

    struct StubHttp(&'static str);

    #[async_trait::async_trait]
    impl Http for StubHttp {
        async fn get(&self, _url: &str) -> GetResult {
            GetResult {
                status: Some(200),
                body: Some(self.0.as_bytes().to_vec()),
                error: None,
                latency_ms: 0,
            }
        }

        async fn get_json(&self, _url: &str) -> Result<Value, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    struct TestClock(AtomicI64);

    #[async_trait::async_trait]
    impl Clock for TestClock {
        async fn now_epoch_ms(&self) -> i64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    struct Harness {
        _dir: TempDir,
        repo: Arc<SqliteRepo>,
        clock: Arc<TestClock>,
        state: AppState,
    }

    async fn harness(page: &'static str, refresh_on_request: bool) -> Harness {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = ConfigLoader::parse(
            &format!(
                r#"
[app]
timezone = "UTC"

[http]
host = "127.0.0.1"
port = 0

[api]
refresh_on_request = {refresh_on_request}
"#
            ),
            dir.path(),
        )
        .expect("config");

        let repo = Arc::new(
            SqliteRepo::new(&cfg.db_path, cfg.timezone)
                .await
                .expect("repo"),
        );
        repo.migrate().await.expect("migrate");
        seed_user(
            repo.as_ref(),
            &SeedUser {
                api_key: KEY.into(),
                user: "ops".into(),
                email: None,
            },
        )
        .await
        .expect("seed");

        let clock = Arc::new(TestClock(AtomicI64::new(NOW_MS)));
        let ctx = SharedContext::new(
            cfg,
            repo.clone(),
            Arc::new(StubHttp(page)),
            clock.clone(),
        );
        Harness {
            _dir: dir,
            repo,
            clock,
            state: AppState::new(ctx),
        }
    }

    async fn get(state: &AppState, uri: &str) -> Response {
        router(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("response")
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json")
    }

    async fn body_text(resp: Response) -> String {
        let bytes = resp
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        String::from_utf8(bytes.to_vec()).expect("utf8")
    }

    #[tokio::test]
    async fn health_is_open() {
        let h = harness(OK_PAGE, false).await;
        let resp = get(&h.state, "/health").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "ok");
    }

    #[tokio::test]
    async fn bad_key_is_forbidden_and_counted() {
        let h = harness(OK_PAGE, false).await;

        let resp = get(&h.state, "/nope/api").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(resp).await, json!({ "message": "Unauthorized" }));

        let resp = get(&h.state, "/nope/bankid").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let counters = h.repo.counters().await.expect("counters");
        assert_eq!((counters.hits, counters.failures, counters.successes), (2, 2, 0));
    }

    #[tokio::test]
    async fn api_reports_initializing_before_first_poll() {
        let h = harness(OK_PAGE, false).await;

        let resp = get(&h.state, &format!("/{KEY}/api")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;

        assert_eq!(body["message"], json!({ "auth": "Authorized" }));
        assert_eq!(body["bidi"]["status"], 0);
        assert_eq!(body["bidi"]["color"], "black");
        assert_eq!(body["bidi"]["text"], "Initialiserer");
        assert_eq!(body["bidi"]["extra"], Value::Null);
        assert_eq!(body["openapi"], Value::Null);
    }

    #[tokio::test]
    async fn api_reflects_last_poll() {
        let h = harness(CRITICAL_PAGE, false).await;
        h.state.poller.poll_once().await;

        let body = body_json(get(&h.state, &format!("/{KEY}/api")).await).await;

        assert_eq!(body["bidi"]["status"], 4);
        assert_eq!(body["bidi"]["color"], "red");
        assert_eq!(body["bidi"]["text"], "BankID: er helt nede.");
        assert_eq!(body["bidi"]["extra"], "Innlogging feiler & BankID er nede");
        assert_eq!(
            body["openapi"],
            json!({ "Error": "Couldnt retrieve data from statuspages." })
        );
    }

    #[tokio::test]
    async fn refresh_on_request_polls_before_answering() {
        let h = harness(OK_PAGE, true).await;

        let body = body_json(get(&h.state, &format!("/{KEY}/api")).await).await;

        assert_eq!(body["bidi"]["status"], 1);
        assert_eq!(body["bidi"]["color"], "green");
        assert!(h.repo.ongoing_incident().await.expect("read").is_some());
    }

    #[tokio::test]
    async fn timeline_lists_polled_hour() {
        let h = harness(CRITICAL_PAGE, false).await;
        h.state.poller.poll_once().await;
        h.clock.0.store(NOW_MS + 60_000, Ordering::SeqCst);

        let resp = get(&h.state, &format!("/{KEY}/timeline")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;

        assert_eq!(
            body,
            json!([{
                "time": "2024-01-01 10:59:59+00:00",
                "color": "red",
                "status": 4,
                "text": "Innlogging feiler & BankID er nede",
            }])
        );
    }

    #[tokio::test]
    async fn stats_count_this_request() {
        let h = harness(OK_PAGE, false).await;
        get(&h.state, &format!("/{KEY}/api")).await;
        get(&h.state, "/wrong/api").await;

        let body = body_json(get(&h.state, &format!("/{KEY}/stats")).await).await;

        assert_eq!(
            body,
            json!({ "hits": 3, "success": 2, "failed": 1, "errors": 0 })
        );
    }

    #[tokio::test]
    async fn status_page_is_escaped_html() {
        let h = harness(CRITICAL_PAGE, false).await;
        h.state.poller.poll_once().await;

        let resp = get(&h.state, &format!("/{KEY}/bankid")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(content_type.starts_with("text/html"));

        let html = body_text(resp).await;
        assert!(html.contains(r#"<div class="status red">"#));
        assert!(html.contains("Innlogging feiler &amp; BankID er nede"));
        assert!(html.contains("2024-01-01 11:00:00 UTC"));
    }

    #[tokio::test]
    async fn incidents_lists_ongoing_incident() {
        let h = harness(CRITICAL_PAGE, false).await;
        h.state.poller.poll_once().await;

        let resp = get(&h.state, &format!("/{KEY}/incidents?limit=10")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;

        let rows = body.as_array().expect("array");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["color"], "red");
        assert_eq!(rows[0]["status"], "ongoing");
        assert_eq!(rows[0]["started_at_ms"], NOW_MS);
        assert_eq!(rows[0]["ended_at_ms"], Value::Null);
        assert_eq!(rows[0]["reason"], "Innlogging feiler & BankID er nede");

        let resp = get(&h.state, "/nope/incidents").await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
