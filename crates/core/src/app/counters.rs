use std::sync::Arc;

use crate::domain::model::{CounterKind, CounterValues};
use crate::ports::repo::{Repo, RepoError};

/// Monotonic operational tallies. Each increment is committed before it returns.
pub struct Counters<R: Repo + ?Sized> {
    repo: Arc<R>,
}

impl<R: Repo + ?Sized> Counters<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn hit(&self) -> Result<(), RepoError> {
        self.repo.increment_counter(CounterKind::Hits).await
    }

    pub async fn success(&self) -> Result<(), RepoError> {
        self.repo.increment_counter(CounterKind::Successes).await
    }

    pub async fn failure(&self) -> Result<(), RepoError> {
        self.repo.increment_counter(CounterKind::Failures).await
    }

    pub async fn error(&self) -> Result<(), RepoError> {
        self.repo.increment_counter(CounterKind::Errors).await
    }

    pub async fn read(&self) -> Result<CounterValues, RepoError> {
        self.repo.counters().await
    }
}

impl<R: Repo + ?Sized> Clone for Counters<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}
