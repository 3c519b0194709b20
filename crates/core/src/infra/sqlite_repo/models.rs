//! Row structs and conversions between SQLx records and domain types.
use crate::domain::model::{Incident, IncidentStatus, Observation, UserRecord};
use crate::domain::severity::{SeverityCode, StatusColor};
use crate::ports::repo::RepoError;

pub(super) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> RepoError {
    move |e| RepoError::Database(format!("{context}: {e}"))
}

#[derive(Debug, sqlx::FromRow)]
pub struct IncidentRecord {
    pub id: i64,
    pub status: String,
    pub started_at_ms: i64,
    pub ended_at_ms: Option<i64>,
    pub color: String,
    pub reason: Option<String>,
}

impl TryFrom<IncidentRecord> for Incident {
    type Error = RepoError;

    fn try_from(value: IncidentRecord) -> Result<Self, Self::Error> {
        let status = IncidentStatus::parse(&value.status).ok_or_else(|| {
            RepoError::Corrupt(format!("incident {} status '{}'", value.id, value.status))
        })?;
        let color = StatusColor::parse(&value.color).ok_or_else(|| {
            RepoError::Corrupt(format!("incident {} color '{}'", value.id, value.color))
        })?;
        Ok(Self {
            id: value.id,
            status,
            started_at_ms: value.started_at_ms,
            ended_at_ms: value.ended_at_ms,
            color,
            reason: value.reason,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ObservationRecord {
    pub id: i64,
    pub observed_at_ms: i64,
    pub code: i64,
    pub color: String,
    pub detail: Option<String>,
}

impl TryFrom<ObservationRecord> for Observation {
    type Error = RepoError;

    fn try_from(value: ObservationRecord) -> Result<Self, Self::Error> {
        let code = SeverityCode::from_ordinal(value.code).ok_or_else(|| {
            RepoError::Corrupt(format!("observation {} code {}", value.id, value.code))
        })?;
        let color = StatusColor::parse(&value.color).ok_or_else(|| {
            RepoError::Corrupt(format!("observation {} color '{}'", value.id, value.color))
        })?;
        Ok(Self {
            observed_at_ms: value.observed_at_ms,
            code,
            color,
            detail: value.detail,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub method: Option<String>,
    pub expire: Option<i64>,
}

impl From<UserRow> for UserRecord {
    fn from(value: UserRow) -> Self {
        Self {
            user: value.username,
            email: value.email,
            phone: value.phone,
            method: value.method,
            expire: value.expire,
        }
    }
}
