//! Incident rows: the single ongoing incident and its closed predecessors.
use chrono_tz::Tz;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

use super::models::{db_error, IncidentRecord};
use crate::domain::model::{Incident, IncidentStatus, NewIncident};
use crate::infra::time::epoch_ms_to_iso;
use crate::ports::repo::RepoError;

const SELECT_INCIDENT: &str =
    "SELECT id, status, started_at_ms, ended_at_ms, color, reason FROM incidents";

pub async fn ongoing_incident(pool: &SqlitePool) -> Result<Option<Incident>, RepoError> {
    let mut conn = pool.acquire().await.map_err(db_error("ongoing_incident"))?;
    read_ongoing(&mut conn).await
}

pub async fn open_incident(
    pool: &SqlitePool,
    next: &NewIncident,
    zone: &Tz,
) -> Result<Incident, RepoError> {
    let mut conn = pool.acquire().await.map_err(db_error("open_incident"))?;
    insert_ongoing(&mut conn, next, zone).await
}

pub async fn close_ongoing(
    pool: &SqlitePool,
    ended_at_ms: i64,
    zone: &Tz,
) -> Result<Option<Incident>, RepoError> {
    let mut tx = begin(pool).await?;
    let closed = end_ongoing(&mut tx, ended_at_ms, zone).await?;
    tx.commit().await.map_err(db_error("close_ongoing (commit)"))?;
    Ok(closed)
}

/// Closing and opening share one transaction, so readers see exactly one
/// ongoing row before and after.
pub async fn replace_ongoing(
    pool: &SqlitePool,
    ended_at_ms: i64,
    next: &NewIncident,
    zone: &Tz,
) -> Result<(Incident, Incident), RepoError> {
    let mut tx = begin(pool).await?;
    let closed = end_ongoing(&mut tx, ended_at_ms, zone).await?.ok_or_else(|| {
        RepoError::InvariantViolation("replace_ongoing called with no ongoing incident".into())
    })?;
    let opened = insert_ongoing(&mut tx, next, zone).await?;
    tx.commit()
        .await
        .map_err(db_error("replace_ongoing (commit)"))?;
    Ok((closed, opened))
}

pub async fn recent_incidents(pool: &SqlitePool, limit: i64) -> Result<Vec<Incident>, RepoError> {
    let rows = sqlx::query_as::<_, IncidentRecord>(&format!(
        "{SELECT_INCIDENT} ORDER BY id DESC LIMIT ?1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(db_error("recent_incidents"))?;
    rows.into_iter().map(Incident::try_from).collect()
}

async fn begin(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, RepoError> {
    pool.begin().await.map_err(db_error("begin transaction"))
}

async fn read_ongoing(conn: &mut SqliteConnection) -> Result<Option<Incident>, RepoError> {
    let mut rows = sqlx::query_as::<_, IncidentRecord>(&format!(
        "{SELECT_INCIDENT} WHERE status = 'ongoing' ORDER BY id LIMIT 2"
    ))
    .fetch_all(&mut *conn)
    .await
    .map_err(db_error("read ongoing incident"))?;

    if rows.len() > 1 {
        return Err(RepoError::InvariantViolation(format!(
            "{} ongoing incidents (ids {} and {})",
            rows.len(),
            rows[0].id,
            rows[1].id
        )));
    }
    rows.pop().map(Incident::try_from).transpose()
}

async fn end_ongoing(
    conn: &mut SqliteConnection,
    ended_at_ms: i64,
    zone: &Tz,
) -> Result<Option<Incident>, RepoError> {
    let Some(mut current) = read_ongoing(conn).await? else {
        return Ok(None);
    };

    sqlx::query(
        r#"
      UPDATE incidents
      SET status = 'ended', ended_at_ms = ?1, ended_at_text = ?2
      WHERE id = ?3
      "#,
    )
    .bind(ended_at_ms)
    .bind(epoch_ms_to_iso(ended_at_ms, zone))
    .bind(current.id)
    .execute(&mut *conn)
    .await
    .map_err(db_error("end ongoing incident"))?;

    current.status = IncidentStatus::Ended;
    current.ended_at_ms = Some(ended_at_ms);
    Ok(Some(current))
}

async fn insert_ongoing(
    conn: &mut SqliteConnection,
    next: &NewIncident,
    zone: &Tz,
) -> Result<Incident, RepoError> {
    let result = sqlx::query(
        r#"
      INSERT INTO incidents(status, started_at_ms, started_at_text, color, reason)
      VALUES ('ongoing', ?1, ?2, ?3, ?4)
      "#,
    )
    .bind(next.started_at_ms)
    .bind(epoch_ms_to_iso(next.started_at_ms, zone))
    .bind(next.color.as_str())
    .bind(next.reason.as_deref())
    .execute(&mut *conn)
    .await
    .map_err(db_error("insert ongoing incident"))?;

    Ok(Incident {
        id: result.last_insert_rowid(),
        status: IncidentStatus::Ongoing,
        started_at_ms: next.started_at_ms,
        ended_at_ms: None,
        color: next.color,
        reason: next.reason.clone(),
    })
}
