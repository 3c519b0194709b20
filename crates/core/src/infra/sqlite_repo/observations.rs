//! Append-only observation log and its time-range scan.
use chrono_tz::Tz;
use sqlx::SqlitePool;

use super::models::{db_error, ObservationRecord};
use crate::domain::model::Observation;
use crate::infra::time::epoch_ms_to_iso;
use crate::ports::repo::RepoError;

pub async fn append_observation(
    pool: &SqlitePool,
    observation: &Observation,
    zone: &Tz,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
      INSERT INTO observations(observed_at_ms, observed_at_text, code, color, detail)
      VALUES (?1, ?2, ?3, ?4, ?5)
      "#,
    )
    .bind(observation.observed_at_ms)
    .bind(epoch_ms_to_iso(observation.observed_at_ms, zone))
    .bind(i64::from(observation.code.ordinal()))
    .bind(observation.color.as_str())
    .bind(observation.detail.as_deref())
    .execute(pool)
    .await
    .map_err(db_error("append_observation"))?;
    Ok(())
}

pub async fn observations_between(
    pool: &SqlitePool,
    from_ms: i64,
    to_ms: i64,
) -> Result<Vec<Observation>, RepoError> {
    let rows = sqlx::query_as::<_, ObservationRecord>(
        r#"
      SELECT id, observed_at_ms, code, color, detail
      FROM observations
      WHERE observed_at_ms >= ?1 AND observed_at_ms < ?2
      ORDER BY observed_at_ms, id
      "#,
    )
    .bind(from_ms)
    .bind(to_ms)
    .fetch_all(pool)
    .await
    .map_err(db_error("observations_between"))?;
    rows.into_iter().map(Observation::try_from).collect()
}
