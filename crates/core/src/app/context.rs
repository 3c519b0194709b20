use std::sync::Arc;

use crate::app::counters::Counters;
use crate::app::snapshot::StatusBoard;
use crate::app::timeline::TimelineStore;
use crate::app::tracker::IncidentTracker;
use crate::domain::model::AppConfig;
use crate::ports::clock::Clock;
use crate::ports::http::Http;
use crate::ports::repo::Repo;

/// Runtime dependencies shared by the poller and the API layer.
pub struct AppContext<R, H, C>
where
    R: Repo + ?Sized,
    H: Http + ?Sized,
    C: Clock + ?Sized,
{
    pub cfg: Arc<AppConfig>,
    pub repo: Arc<R>,
    pub http: Arc<H>,
    pub clock: Arc<C>,
    pub tracker: Arc<IncidentTracker<R>>,
    pub timeline: TimelineStore<R>,
    pub counters: Counters<R>,
    pub status: StatusBoard,
}

impl<R, H, C> AppContext<R, H, C>
where
    R: Repo + ?Sized,
    H: Http + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(cfg: AppConfig, repo: Arc<R>, http: Arc<H>, clock: Arc<C>) -> Self {
        let tracker = Arc::new(IncidentTracker::new(
            Arc::clone(&repo),
            cfg.baseline_policy,
        ));
        let timeline = TimelineStore::new(Arc::clone(&repo), cfg.timezone);
        let counters = Counters::new(Arc::clone(&repo));
        Self {
            cfg: Arc::new(cfg),
            repo,
            http,
            clock,
            tracker,
            timeline,
            counters,
            status: StatusBoard::new(),
        }
    }
}

impl<R, H, C> Clone for AppContext<R, H, C>
where
    R: Repo + ?Sized,
    H: Http + ?Sized,
    C: Clock + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            cfg: Arc::clone(&self.cfg),
            repo: Arc::clone(&self.repo),
            http: Arc::clone(&self.http),
            clock: Arc::clone(&self.clock),
            tracker: Arc::clone(&self.tracker),
            timeline: self.timeline.clone(),
            counters: self.counters.clone(),
            status: self.status.clone(),
        }
    }
}
