#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use bidi_core::app::context::AppContext;
use bidi_core::domain::model::{AppConfig, FetchError, GetResult};
use bidi_core::infra::config::ConfigLoader;
use bidi_core::infra::sqlite_repo::SqliteRepo;
use bidi_core::ports::clock::Clock;
use bidi_core::ports::http::Http;
use bidi_core::ports::repo::Repo;
use tempfile::TempDir;

// 2024-01-01T11:00:00Z
pub const NOW_MS: i64 = 1_704_106_800_000;
pub const MINUTE_MS: i64 = 60_000;

pub const OK_PAGE: &str = r#"<html><body>
<div class="m-statuspage"><h2>BankID</h2><span class="color-dot none"></span></div>
</body></html>"#;

pub const CRITICAL_PAGE: &str = r#"<html><body>
<div class="m-statuspage"><h2>BankID</h2><span class="color-dot critical"></span></div>
<div class="m-statuspage-description"><h3>Hendelse</h3></div>
<p>BankID er nede for alle kunder.</p>
</body></html>"#;

pub const MAINTENANCE_PAGE_NO_DESCRIPTION: &str = r#"<html><body>
<div class="m-statuspage"><span class="color-dot maintenance"></span></div>
</body></html>"#;

/// Temp directory plus a migrated repo inside it. Keep the struct alive for the test.
pub struct TestDb {
    pub dir: TempDir,
    pub repo: Arc<SqliteRepo>,
}

pub async fn test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = SqliteRepo::new(&dir.path().join("bidi.sqlite"), chrono_tz::UTC)
        .await
        .expect("open sqlite");
    repo.migrate().await.expect("migrate");
    TestDb {
        dir,
        repo: Arc::new(repo),
    }
}

pub fn test_config(baseline: &str, summary_url: &str) -> AppConfig {
    let toml = format!(
        r#"
[app]
timezone = "UTC"

[http]
host = "127.0.0.1"
port = 0

[provider]
status_url = "http://status.test/status"
summary_url = "{summary_url}"

[tracker]
baseline = "{baseline}"
"#
    );
    ConfigLoader::parse(&toml, Path::new(".")).expect("config")
}

pub struct FixedClock(AtomicI64);

impl FixedClock {
    pub fn at(ms: i64) -> Self {
        Self(AtomicI64::new(ms))
    }

    pub fn set(&self, ms: i64) {
        self.0.store(ms, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl Clock for FixedClock {
    async fn now_epoch_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Serves a canned status page; `page: None` behaves like a refused connection.
pub struct StubHttp {
    pub page: Option<&'static str>,
    pub status: u16,
    pub summary: Result<serde_json::Value, FetchError>,
}

impl StubHttp {
    pub fn serving(page: &'static str) -> Self {
        Self {
            page: Some(page),
            status: 200,
            summary: Ok(serde_json::json!({ "status": { "indicator": "none" } })),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            page: None,
            status: 0,
            summary: Err(FetchError::ConnectionFailure),
        }
    }
}

#[async_trait::async_trait]
impl Http for StubHttp {
    async fn get(&self, _url: &str) -> GetResult {
        match self.page {
            Some(page) => GetResult {
                status: Some(self.status),
                body: Some(page.as_bytes().to_vec()),
                error: None,
                latency_ms: 1,
            },
            None => GetResult {
                status: None,
                body: None,
                error: Some(FetchError::ConnectionFailure),
                latency_ms: 1,
            },
        }
    }

    async fn get_json(&self, _url: &str) -> Result<serde_json::Value, FetchError> {
        self.summary.clone()
    }
}

pub type TestContext = AppContext<SqliteRepo, StubHttp, FixedClock>;

pub fn context(db: &TestDb, cfg: AppConfig, http: StubHttp) -> TestContext {
    AppContext::new(
        cfg,
        Arc::clone(&db.repo),
        Arc::new(http),
        Arc::new(FixedClock::at(NOW_MS)),
    )
}
