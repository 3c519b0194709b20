//! Loads the TOML configuration file and normalizes it into `AppConfig`.
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;
use tokio::fs;

use crate::domain::model::{AppConfig, AppMode, BaselinePolicy, LogFormat, SeedUser};

const DEFAULT_TIMEZONE: &str = "Europe/Oslo";
const DEFAULT_STATUS_URL: &str = "https://www.bankid.no/status";
const DEFAULT_SUMMARY_URL: &str = "https://bankid-services.statuspage.io/api/v2/summary.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
struct RawAppFile {
    #[serde(default)]
    app: RawApp,
    http: RawHttp,
    #[serde(default)]
    sqlite: RawSqlite,
    #[serde(default)]
    polling: RawPolling,
    #[serde(default)]
    provider: RawProvider,
    #[serde(default)]
    tracker: RawTracker,
    #[serde(default)]
    api: RawApi,
    #[serde(default)]
    logging: RawLogging,
    #[serde(default)]
    seed: Option<RawSeed>,
}

#[derive(Debug, Deserialize, Default)]
struct RawApp {
    mode: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawHttp {
    host: String,
    port: u16,
}

#[derive(Debug, Deserialize)]
struct RawSqlite {
    #[serde(default = "default_sqlite_path")]
    path: String,
}

impl Default for RawSqlite {
    fn default() -> Self {
        Self {
            path: default_sqlite_path(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawPolling {
    #[serde(default = "default_interval_seconds")]
    interval_seconds: u64,
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    user_agent: String,
}

impl Default for RawPolling {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval_seconds(),
            request_timeout_seconds: default_request_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawProvider {
    status_url: Option<String>,
    /// Empty string disables the summary fetch.
    summary_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawTracker {
    baseline: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawApi {
    #[serde(default)]
    refresh_on_request: bool,
}

#[derive(Debug, Deserialize, Default)]
struct RawLogging {
    level: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSeed {
    api_key: String,
    user: String,
    email: Option<String>,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub async fn load(config_path: &Path) -> Result<AppConfig, ConfigError> {
        let content = fs::read_to_string(config_path).await?;
        let base_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Self::parse(&content, base_dir)
    }

    /// Relative paths (the SQLite file) resolve against `base_dir`.
    pub fn parse(content: &str, base_dir: &Path) -> Result<AppConfig, ConfigError> {
        let raw: RawAppFile = toml::from_str(content)?;

        let mode = parse_mode(raw.app.mode.as_deref())?;
        let tz_str = raw
            .app
            .timezone
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_TIMEZONE);
        let timezone: Tz = tz_str
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("invalid timezone '{tz_str}'")))?;

        if raw.polling.interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "polling.interval_seconds must be greater than 0".into(),
            ));
        }
        if raw.polling.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "polling.request_timeout_seconds must be greater than 0".into(),
            ));
        }

        let status_url = raw
            .provider
            .status_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS_URL.to_string());
        let summary_url = match raw.provider.summary_url {
            None => Some(DEFAULT_SUMMARY_URL.to_string()),
            Some(s) if s.trim().is_empty() => None,
            Some(s) => Some(s),
        };

        let seed_user = raw
            .seed
            .map(|s| {
                if s.api_key.trim().is_empty() {
                    return Err(ConfigError::Invalid("seed.api_key cannot be empty".into()));
                }
                Ok(SeedUser {
                    api_key: s.api_key,
                    user: s.user,
                    email: s.email,
                })
            })
            .transpose()?;

        Ok(AppConfig {
            mode,
            timezone,
            http_host: raw.http.host,
            http_port: raw.http.port,
            db_path: resolve_path(base_dir, &raw.sqlite.path),
            poll_interval: Duration::from_secs(raw.polling.interval_seconds),
            request_timeout: Duration::from_secs(raw.polling.request_timeout_seconds),
            user_agent: raw.polling.user_agent,
            status_url,
            summary_url,
            baseline_policy: parse_baseline(raw.tracker.baseline.as_deref())?,
            refresh_on_request: raw.api.refresh_on_request,
            log_level: normalize_log_level(raw.logging.level.as_deref())?,
            log_format: parse_log_format(raw.logging.format.as_deref())?,
            seed_user,
        })
    }
}

fn default_sqlite_path() -> String {
    "bidi.sqlite".to_string()
}

fn default_interval_seconds() -> u64 {
    60
}

fn default_request_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("bidi/", env!("CARGO_PKG_VERSION")).to_string()
}

fn parse_mode(s: Option<&str>) -> Result<AppMode, ConfigError> {
    match s.map(|x| x.to_ascii_lowercase()) {
        None => Ok(AppMode::Prod),
        Some(m) if m == "prod" => Ok(AppMode::Prod),
        Some(m) if m == "dev" => Ok(AppMode::Dev),
        Some(other) => Err(ConfigError::Invalid(format!(
            "invalid app.mode '{other}', expected 'dev' or 'prod'"
        ))),
    }
}

fn parse_baseline(s: Option<&str>) -> Result<BaselinePolicy, ConfigError> {
    match s.map(|x| x.trim().to_ascii_lowercase()) {
        None => Ok(BaselinePolicy::Track),
        Some(b) if b == "track" => Ok(BaselinePolicy::Track),
        Some(b) if b == "ignore" => Ok(BaselinePolicy::Ignore),
        Some(other) => Err(ConfigError::Invalid(format!(
            "invalid tracker.baseline '{other}', expected 'track' or 'ignore'"
        ))),
    }
}

fn parse_log_format(s: Option<&str>) -> Result<LogFormat, ConfigError> {
    match s.map(|x| x.trim().to_ascii_lowercase()) {
        None => Ok(LogFormat::Pretty),
        Some(f) if f == "pretty" => Ok(LogFormat::Pretty),
        Some(f) if f == "json" => Ok(LogFormat::Json),
        Some(other) => Err(ConfigError::Invalid(format!(
            "invalid logging.format '{other}', expected 'pretty' or 'json'"
        ))),
    }
}

fn normalize_log_level(level: Option<&str>) -> Result<String, ConfigError> {
    let l = level.unwrap_or("info").trim().to_ascii_lowercase();
    match l.as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => Ok(l),
        _ => Err(ConfigError::Invalid(format!(
            "invalid logging.level '{l}', expected error|warn|info|debug|trace|off"
        ))),
    }
}

fn resolve_path(base_dir: &Path, raw: &str) -> PathBuf {
    let p = Path::new(raw);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    base_dir.join(p)
}
