//! Wall-clock source and epoch-millisecond rendering in the configured zone.
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::ports::clock::Clock;

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait::async_trait]
impl Clock for SystemClock {
    async fn now_epoch_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Human-readable local time, e.g. `2024-01-01 11:00:00 CET`.
pub fn format_epoch_ms(ms: i64, zone: &Tz) -> String {
    to_zoned(ms, zone).format("%Y-%m-%d %H:%M:%S %Z").to_string()
}

pub fn epoch_ms_to_iso(ms: i64, zone: &Tz) -> String {
    to_zoned(ms, zone).to_rfc3339()
}

fn to_zoned(ms: i64, zone: &Tz) -> DateTime<Tz> {
    let dt_utc: DateTime<Utc> = Utc
        .timestamp_millis_opt(ms)
        .single()
        .unwrap_or_default();
    dt_utc.with_timezone(zone)
}
