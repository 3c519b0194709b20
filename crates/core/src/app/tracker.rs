//! Incident tracking: turns each observation into an open/close/no-op
//! transition while keeping at most one incident ongoing.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::model::{BaselinePolicy, Incident, NewIncident, Observation};
use crate::domain::severity::StatusColor;
use crate::ports::repo::{Repo, RepoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionResult {
    /// Nothing was ongoing; a new incident was opened.
    Opened(Incident),
    /// The ongoing incident was ended. `opened` is the incident that replaced it,
    /// absent only when the new color is an ignored baseline.
    Closed {
        ended: Incident,
        opened: Option<Incident>,
    },
    /// The ongoing incident already has this color.
    Unchanged,
    /// Baseline observation with nothing ongoing under [`BaselinePolicy::Ignore`].
    NoOp,
}

pub struct IncidentTracker<R: Repo + ?Sized> {
    repo: Arc<R>,
    policy: BaselinePolicy,
    // Serializes read-modify-write so concurrent refreshes cannot both open a row.
    guard: Mutex<()>,
}

impl<R: Repo + ?Sized> IncidentTracker<R> {
    pub fn new(repo: Arc<R>, policy: BaselinePolicy) -> Self {
        Self {
            repo,
            policy,
            guard: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> BaselinePolicy {
        self.policy
    }

    pub async fn record_observation(
        &self,
        observation: &Observation,
    ) -> Result<TransitionResult, RepoError> {
        let _guard = self.guard.lock().await;

        let now_ms = observation.observed_at_ms;
        let baseline =
            self.policy == BaselinePolicy::Ignore && observation.color == StatusColor::Green;
        let next = NewIncident {
            started_at_ms: now_ms,
            color: observation.color,
            reason: observation.detail.clone(),
        };

        let result = match self.repo.ongoing_incident().await? {
            None if baseline => TransitionResult::NoOp,
            None => TransitionResult::Opened(self.repo.open_incident(&next).await?),
            Some(current) if current.color == observation.color => TransitionResult::Unchanged,
            Some(current) if baseline => {
                let ended = self.repo.close_ongoing(now_ms).await?.ok_or_else(|| {
                    RepoError::InvariantViolation(format!(
                        "incident {} vanished while closing",
                        current.id
                    ))
                })?;
                TransitionResult::Closed {
                    ended,
                    opened: None,
                }
            }
            Some(_) => {
                let (ended, opened) = self.repo.replace_ongoing(now_ms, &next).await?;
                TransitionResult::Closed {
                    ended,
                    opened: Some(opened),
                }
            }
        };

        match &result {
            TransitionResult::Opened(incident) => {
                info!(id = incident.id, color = %incident.color, "Incident opened");
            }
            TransitionResult::Closed { ended, opened } => {
                info!(
                    ended_id = ended.id,
                    ended_color = %ended.color,
                    opened_id = opened.as_ref().map(|i| i.id),
                    color = %observation.color,
                    "Incident closed"
                );
            }
            TransitionResult::Unchanged | TransitionResult::NoOp => {
                debug!(color = %observation.color, "Incident state unchanged");
            }
        }
        Ok(result)
    }
}
