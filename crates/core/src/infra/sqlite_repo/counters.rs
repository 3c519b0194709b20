//! Process-lifetime hit/success/failure/error tallies in the single `stats` row.
use sqlx::SqlitePool;

use super::models::db_error;
use crate::domain::model::{CounterKind, CounterValues};
use crate::ports::repo::RepoError;

pub async fn increment_counter(pool: &SqlitePool, kind: CounterKind) -> Result<(), RepoError> {
    let column = kind.column();
    let result = sqlx::query(&format!(
        "UPDATE stats SET {column} = {column} + 1 WHERE stat = 'stat'"
    ))
    .execute(pool)
    .await
    .map_err(db_error("increment_counter"))?;

    if result.rows_affected() != 1 {
        return Err(RepoError::Corrupt("stats row missing".into()));
    }
    Ok(())
}

pub async fn counters(pool: &SqlitePool) -> Result<CounterValues, RepoError> {
    let (hits, success, failed, errors) = sqlx::query_as::<_, (i64, i64, i64, i64)>(
        "SELECT hits, success, failed, errors FROM stats WHERE stat = 'stat'",
    )
    .fetch_optional(pool)
    .await
    .map_err(db_error("counters"))?
    .ok_or_else(|| RepoError::Corrupt("stats row missing".into()))?;

    Ok(CounterValues {
        hits: hits.max(0) as u64,
        successes: success.max(0) as u64,
        failures: failed.max(0) as u64,
        errors: errors.max(0) as u64,
    })
}
