//! Hourly 7-day timeline over stored observations.
//!
//! A [`Timeline`] owns the observations of its window, so walking it never
//! touches storage and can be repeated any number of times with the same result.

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::model::Observation;
use super::severity::StatusColor;

pub const BUCKET_MS: i64 = 3_600_000;
pub const BUCKET_COUNT: i64 = 24 * 7;
pub const WINDOW_MS: i64 = BUCKET_MS * BUCKET_COUNT;

/// Colors checked per bucket, most severe first. Yellow is not reported.
pub const COLOR_PRIORITY: [StatusColor; 6] = [
    StatusColor::Red,
    StatusColor::Orange,
    StatusColor::Blue,
    StatusColor::Green,
    StatusColor::Grey,
    StatusColor::Black,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketResult {
    pub time: String,
    pub color: StatusColor,
    /// Severity ordinal of the reported observation.
    pub status: u8,
    /// Incident detail if the observation carried one, otherwise the code's display text.
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    now_ms: i64,
    zone: Tz,
    observations: Vec<Observation>,
}

impl Timeline {
    /// Observations outside `[now - 7d, now)` are dropped.
    pub fn new(now_ms: i64, zone: Tz, mut observations: Vec<Observation>) -> Self {
        let start = now_ms - WINDOW_MS;
        observations.retain(|o| o.observed_at_ms >= start && o.observed_at_ms < now_ms);
        // Stable: equal timestamps keep insertion order, so "last" means last appended.
        observations.sort_by_key(|o| o.observed_at_ms);
        Self {
            now_ms,
            zone,
            observations,
        }
    }

    pub fn window_start_ms(&self) -> i64 {
        self.now_ms - WINDOW_MS
    }

    /// Walks the window forward one hour at a time, yielding at most one result per bucket.
    pub fn buckets(&self) -> impl Iterator<Item = BucketResult> + '_ {
        let start = self.window_start_ms();
        (0..BUCKET_COUNT).filter_map(move |i| {
            let bucket_start = start + i * BUCKET_MS;
            self.resolve_bucket(bucket_start, bucket_start + BUCKET_MS)
        })
    }

    fn resolve_bucket(&self, from_ms: i64, to_ms: i64) -> Option<BucketResult> {
        let lo = self
            .observations
            .partition_point(|o| o.observed_at_ms < from_ms);
        let hi = self.observations.partition_point(|o| o.observed_at_ms < to_ms);
        let bucket = &self.observations[lo..hi];
        if bucket.is_empty() {
            return None;
        }

        COLOR_PRIORITY.iter().find_map(|color| {
            bucket
                .iter()
                .rev()
                .find(|o| o.color == *color)
                .map(|o| BucketResult {
                    time: format_bucket_time(from_ms, &self.zone),
                    color: o.color,
                    status: o.code.ordinal(),
                    text: o
                        .detail
                        .clone()
                        .unwrap_or_else(|| o.code.text().to_string()),
                })
        })
    }
}

/// Hour of `ms` in `zone`, rendered with the end-of-hour display convention
/// (`HH:59:59`) and the zone's offset, so the repeated hour at a DST fall-back
/// still yields two distinct labels.
pub fn format_bucket_time(ms: i64, zone: &Tz) -> String {
    let utc: DateTime<Utc> = Utc
        .timestamp_millis_opt(ms)
        .single()
        .unwrap_or_default();
    utc.with_timezone(zone)
        .format("%Y-%m-%d %H:59:59%:z")
        .to_string()
}
