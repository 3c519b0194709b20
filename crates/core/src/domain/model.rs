//! Domain models: app configuration, observations, incidents, counters, the
//! current-status snapshot, and HTTP result shapes.

use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use super::severity::{SeverityCode, StatusColor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Dev,
    Prod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Whether a green (baseline) observation is tracked as an incident of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaselinePolicy {
    /// Colors are compared unconditionally; green opens an incident like any other color.
    #[default]
    Track,
    /// Green is "no incident": it never opens a row, it only closes the ongoing one.
    Ignore,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: AppMode,
    pub timezone: Tz,
    pub http_host: String,
    pub http_port: u16,
    pub db_path: PathBuf,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub status_url: String,
    pub summary_url: Option<String>,
    pub baseline_policy: BaselinePolicy,
    pub refresh_on_request: bool,
    pub log_level: String,
    pub log_format: LogFormat,
    pub seed_user: Option<SeedUser>,
}

/// API user created at start-up when configured.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub api_key: String,
    pub user: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub user: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub method: Option<String>,
    /// Epoch seconds; `None` never expires.
    pub expire: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub observed_at_ms: i64,
    pub code: SeverityCode,
    pub color: StatusColor,
    pub detail: Option<String>,
}

impl Observation {
    pub fn new(observed_at_ms: i64, code: SeverityCode, detail: Option<String>) -> Self {
        Self {
            observed_at_ms,
            code,
            color: code.color(),
            detail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Ongoing,
    Ended,
}

impl IncidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Ongoing => "ongoing",
            IncidentStatus::Ended => "ended",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ongoing" => Some(IncidentStatus::Ongoing),
            "ended" => Some(IncidentStatus::Ended),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incident {
    pub id: i64,
    pub status: IncidentStatus,
    pub started_at_ms: i64,
    pub ended_at_ms: Option<i64>,
    pub color: StatusColor,
    pub reason: Option<String>,
}

/// A row to insert as the new ongoing incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIncident {
    pub started_at_ms: i64,
    pub color: StatusColor,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterValues {
    pub hits: u64,
    #[serde(rename = "success")]
    pub successes: u64,
    #[serde(rename = "failed")]
    pub failures: u64,
    pub errors: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Hits,
    Successes,
    Failures,
    Errors,
}

impl CounterKind {
    pub fn column(self) -> &'static str {
        match self {
            CounterKind::Hits => "hits",
            CounterKind::Successes => "success",
            CounterKind::Failures => "failed",
            CounterKind::Errors => "errors",
        }
    }
}

/// Latest derived status, replaced wholesale after each poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    /// `None` until the first poll completes.
    pub code: Option<SeverityCode>,
    pub meaning: String,
    pub text: String,
    pub detail: Option<String>,
    pub color: StatusColor,
    pub updated_at_ms: Option<i64>,
    pub provider_summary: Option<serde_json::Value>,
}

impl StatusSnapshot {
    pub fn from_code(
        code: SeverityCode,
        detail: Option<String>,
        updated_at_ms: i64,
        provider_summary: Option<serde_json::Value>,
    ) -> Self {
        Self {
            code: Some(code),
            meaning: code.meaning().to_string(),
            text: code.text().to_string(),
            detail,
            color: code.color(),
            updated_at_ms: Some(updated_at_ms),
            provider_summary,
        }
    }

    /// Numeric status as shown to API clients; `0` while initializing.
    pub fn status_number(&self) -> u8 {
        self.code.map(SeverityCode::ordinal).unwrap_or(0)
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            code: None,
            meaning: "BIDI initialiseres og vil hente data innen 30 sekunder eller mindre"
                .to_string(),
            text: "Initialiserer".to_string(),
            detail: None,
            color: StatusColor::Black,
            updated_at_ms: None,
            provider_summary: None,
        }
    }
}

/// Why a fetch produced no usable response. Never fatal to the poller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("connection failed")]
    ConnectionFailure,
    #[error("http status {0}")]
    Status(u16),
    #[error("failed reading body: {0}")]
    Body(String),
    #[error("request failed: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone)]
pub struct GetResult {
    pub status: Option<u16>,
    pub body: Option<Vec<u8>>,
    pub error: Option<FetchError>,
    pub latency_ms: u64,
}

impl GetResult {
    /// Body of a successful response; `None` means the page is unreadable.
    pub fn readable_body(&self) -> Option<&[u8]> {
        match (&self.error, self.status) {
            (None, Some(s)) if (200..300).contains(&s) => self.body.as_deref(),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<FetchError> {
        if let Some(e) = &self.error {
            return Some(e.clone());
        }
        match self.status {
            Some(s) if (200..300).contains(&s) => None,
            Some(s) => Some(FetchError::Status(s)),
            None => Some(FetchError::Unexpected("no response".to_string())),
        }
    }
}
