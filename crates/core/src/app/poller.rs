//! Poll loop: fetch the status page, classify it, track incidents, append to
//! the timeline, and publish the new snapshot.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use serde_json::json;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::app::context::AppContext;
use crate::app::tracker::TransitionResult;
use crate::domain::model::{FetchError, Observation, StatusSnapshot};
use crate::domain::severity::SeverityCode;
use crate::infra::time::format_epoch_ms;
use crate::page::classifier::classify;
use crate::ports::clock::Clock;
use crate::ports::http::Http;
use crate::ports::repo::{Repo, RepoError};

const SUMMARY_UNAVAILABLE: &str = "Couldnt retrieve data from statuspages.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollPhase {
    Idle,
    Fetching,
}

/// What one poll cycle did.
#[derive(Debug, Clone)]
pub struct PollOutcome {
    pub code: SeverityCode,
    pub detail: Option<String>,
    pub fetch_error: Option<FetchError>,
    /// `None` when the tracker could not persist the transition.
    pub transition: Option<TransitionResult>,
    pub observation_stored: bool,
}

pub struct Poller<R, H, C>
where
    R: Repo + ?Sized,
    H: Http + ?Sized,
    C: Clock + ?Sized,
{
    ctx: AppContext<R, H, C>,
    /// Cycles in flight; the background loop and on-demand refreshes may overlap.
    in_flight: AtomicUsize,
}

impl<R, H, C> Poller<R, H, C>
where
    R: Repo + ?Sized,
    H: Http + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(ctx: AppContext<R, H, C>) -> Self {
        Self {
            ctx,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn context(&self) -> &AppContext<R, H, C> {
        &self.ctx
    }

    pub fn phase(&self) -> PollPhase {
        phase_of(&self.in_flight)
    }

    /// Runs one cycle every `poll_interval` until `cancel` fires. A cycle in
    /// progress is finished before the loop exits.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.ctx.cfg.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.ctx.cfg.poll_interval.as_secs(),
            url = %self.ctx.cfg.status_url,
            baseline = ?self.ctx.tracker.policy(),
            "Poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }
            self.poll_once().await;
        }

        info!("Poller stopped");
    }

    /// Never fails: fetch and persistence problems are logged and counted.
    pub async fn poll_once(&self) -> PollOutcome {
        let _phase = PhaseGuard::enter(&self.in_flight);
        let ctx = &self.ctx;
        let started = Instant::now();
        let now_ms = ctx.clock.now_epoch_ms().await;

        let res = ctx.http.get(&ctx.cfg.status_url).await;
        let fetch_error = res.failure();
        if let Some(e) = &fetch_error {
            warn!(url = %ctx.cfg.status_url, error = %e, "Status page unreadable");
            self.count_error().await;
        }

        let classification = classify(res.readable_body());
        let observation = Observation::new(
            now_ms,
            classification.code,
            classification.detail.clone(),
        );

        let transition = match ctx.tracker.record_observation(&observation).await {
            Ok(t) => Some(t),
            Err(e) => {
                self.report_persistence_error("record_observation", &e).await;
                None
            }
        };

        let observation_stored = match ctx.timeline.append(&observation).await {
            Ok(()) => true,
            Err(e) => {
                self.report_persistence_error("append_observation", &e).await;
                false
            }
        };

        let provider_summary = self.fetch_summary().await;

        ctx.status.replace(StatusSnapshot::from_code(
            classification.code,
            classification.detail.clone(),
            now_ms,
            provider_summary,
        ));

        info!(
            tick_time = %format_epoch_ms(now_ms, &ctx.cfg.timezone),
            code = classification.code.ordinal(),
            color = %observation.color,
            latency_ms = res.latency_ms,
            total_ms = started.elapsed().as_millis() as u64,
            "Poll complete"
        );

        PollOutcome {
            code: classification.code,
            detail: classification.detail,
            fetch_error,
            transition,
            observation_stored,
        }
    }

    async fn fetch_summary(&self) -> Option<serde_json::Value> {
        let url = self.ctx.cfg.summary_url.as_deref()?;
        match self.ctx.http.get_json(url).await {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(url, error = %e, "Provider summary unavailable");
                self.count_error().await;
                Some(json!({ "Error": SUMMARY_UNAVAILABLE }))
            }
        }
    }

    async fn report_persistence_error(&self, op: &'static str, e: &RepoError) {
        if matches!(e, RepoError::InvariantViolation(_)) {
            error!(op, error = %e, "Incident invariant violated");
        } else {
            error!(op, error = %e, "Persistence failed, retrying next tick");
        }
        self.count_error().await;
    }

    async fn count_error(&self) {
        if let Err(e) = self.ctx.counters.error().await {
            debug!(error = %e, "Could not increment error counter");
        }
    }
}

fn phase_of(in_flight: &AtomicUsize) -> PollPhase {
    if in_flight.load(Ordering::Acquire) > 0 {
        PollPhase::Fetching
    } else {
        PollPhase::Idle
    }
}

/// Counts one cycle in flight for as long as it lives, including when the
/// cycle's future is dropped early.
struct PhaseGuard<'a>(&'a AtomicUsize);

impl<'a> PhaseGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::AcqRel);
        Self(in_flight)
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}
