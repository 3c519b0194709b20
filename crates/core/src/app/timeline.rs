use std::sync::Arc;

use chrono_tz::Tz;

use crate::domain::model::Observation;
use crate::domain::timeline::{Timeline, WINDOW_MS};
use crate::ports::repo::{Repo, RepoError};

/// Append side and query side of the observation log.
pub struct TimelineStore<R: Repo + ?Sized> {
    repo: Arc<R>,
    zone: Tz,
}

impl<R: Repo + ?Sized> TimelineStore<R> {
    pub fn new(repo: Arc<R>, zone: Tz) -> Self {
        Self { repo, zone }
    }

    pub async fn append(&self, observation: &Observation) -> Result<(), RepoError> {
        self.repo.append_observation(observation).await
    }

    /// Reads the 7 days before `now_ms` once; the returned timeline can be walked repeatedly.
    pub async fn query(&self, now_ms: i64) -> Result<Timeline, RepoError> {
        let observations = self
            .repo
            .observations_between(now_ms - WINDOW_MS, now_ms)
            .await?;
        Ok(Timeline::new(now_ms, self.zone, observations))
    }
}

impl<R: Repo + ?Sized> Clone for TimelineStore<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            zone: self.zone,
        }
    }
}
