//! SQLite-backed `Repo`.
mod connection;
mod counters;
mod incidents;
mod migrations;
mod models;
mod observations;
mod users;

use std::path::Path;

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::domain::model::{
    CounterKind, CounterValues, Incident, NewIncident, Observation, UserRecord,
};
use crate::ports::repo::{Repo, RepoError};

pub struct SqliteRepo {
    pool: SqlitePool,
    zone: Tz,
}

impl SqliteRepo {
    pub async fn new(db_path: &Path, zone: Tz) -> Result<Self, RepoError> {
        let pool = connection::create_pool(db_path).await?;
        Ok(Self { pool, zone })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Repo for SqliteRepo {
    async fn migrate(&self) -> Result<(), RepoError> {
        migrations::migrate(&self.pool).await
    }

    async fn ongoing_incident(&self) -> Result<Option<Incident>, RepoError> {
        incidents::ongoing_incident(&self.pool).await
    }

    async fn open_incident(&self, next: &NewIncident) -> Result<Incident, RepoError> {
        incidents::open_incident(&self.pool, next, &self.zone).await
    }

    async fn close_ongoing(&self, ended_at_ms: i64) -> Result<Option<Incident>, RepoError> {
        incidents::close_ongoing(&self.pool, ended_at_ms, &self.zone).await
    }

    async fn replace_ongoing(
        &self,
        ended_at_ms: i64,
        next: &NewIncident,
    ) -> Result<(Incident, Incident), RepoError> {
        incidents::replace_ongoing(&self.pool, ended_at_ms, next, &self.zone).await
    }

    async fn recent_incidents(&self, limit: i64) -> Result<Vec<Incident>, RepoError> {
        incidents::recent_incidents(&self.pool, limit).await
    }

    async fn append_observation(&self, observation: &Observation) -> Result<(), RepoError> {
        observations::append_observation(&self.pool, observation, &self.zone).await
    }

    async fn observations_between(
        &self,
        from_ms: i64,
        to_ms: i64,
    ) -> Result<Vec<Observation>, RepoError> {
        observations::observations_between(&self.pool, from_ms, to_ms).await
    }

    async fn increment_counter(&self, kind: CounterKind) -> Result<(), RepoError> {
        counters::increment_counter(&self.pool, kind).await
    }

    async fn counters(&self) -> Result<CounterValues, RepoError> {
        counters::counters(&self.pool).await
    }

    async fn users_by_key_hash(&self, key_hash: &str) -> Result<Vec<UserRecord>, RepoError> {
        users::users_by_key_hash(&self.pool, key_hash).await
    }

    async fn insert_user(&self, key_hash: &str, user: &UserRecord) -> Result<(), RepoError> {
        users::insert_user(&self.pool, key_hash, user).await
    }
}
