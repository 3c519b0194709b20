//! Persistence port for incidents, observations, counters and API users.

use crate::domain::model::{
    CounterKind, CounterValues, Incident, NewIncident, Observation, UserRecord,
};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(String),
    #[error("stored row is invalid: {0}")]
    Corrupt(String),
    /// More than one ongoing incident was read back. Never expected outside tests.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

#[async_trait::async_trait]
pub trait Repo: Send + Sync {
    async fn migrate(&self) -> Result<(), RepoError>;

    /// The single ongoing incident, or [`RepoError::InvariantViolation`] if there are several.
    async fn ongoing_incident(&self) -> Result<Option<Incident>, RepoError>;

    async fn open_incident(&self, next: &NewIncident) -> Result<Incident, RepoError>;

    /// Ends the ongoing incident, if any, and returns it as stored.
    async fn close_ongoing(&self, ended_at_ms: i64) -> Result<Option<Incident>, RepoError>;

    /// Ends the ongoing incident and opens `next` in one transaction.
    async fn replace_ongoing(
        &self,
        ended_at_ms: i64,
        next: &NewIncident,
    ) -> Result<(Incident, Incident), RepoError>;

    /// Most recent incidents first.
    async fn recent_incidents(&self, limit: i64) -> Result<Vec<Incident>, RepoError>;

    async fn append_observation(&self, observation: &Observation) -> Result<(), RepoError>;

    /// Observations with `from_ms <= observed_at_ms < to_ms`, oldest first.
    async fn observations_between(
        &self,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<Observation>, RepoError>;

    async fn increment_counter(&self, kind: CounterKind) -> Result<(), RepoError>;

    async fn counters(&self) -> Result<CounterValues, RepoError>;

    async fn users_by_key_hash(&self, key_hash: &str) -> Result<Vec<UserRecord>, RepoError>;

    async fn insert_user(&self, key_hash: &str, user: &UserRecord) -> Result<(), RepoError>;
}
