//! Database migrations: create tables/indexes and seed the counters row.
use sqlx::SqlitePool;
use tracing::info;

use super::models::db_error;
use crate::ports::repo::RepoError;

pub async fn migrate(pool: &SqlitePool) -> Result<(), RepoError> {
    info!("DB migrate start");

    let ddls = [
        r#"
      CREATE TABLE IF NOT EXISTS incidents(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        status TEXT NOT NULL CHECK (status IN ('ongoing', 'ended')),
        started_at_ms INTEGER NOT NULL,
        started_at_text TEXT NOT NULL,
        ended_at_ms INTEGER NULL,
        ended_at_text TEXT NULL,
        color TEXT NOT NULL,
        reason TEXT NULL
      )"#,
        // At most one ongoing incident, whatever the writer does.
        r#"
      CREATE UNIQUE INDEX IF NOT EXISTS ux_incidents_ongoing
      ON incidents(status) WHERE status = 'ongoing'"#,
        r#"
      CREATE TABLE IF NOT EXISTS observations(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        observed_at_ms INTEGER NOT NULL,
        observed_at_text TEXT NOT NULL,
        code INTEGER NOT NULL,
        color TEXT NOT NULL,
        detail TEXT NULL
      )"#,
        r#"CREATE INDEX IF NOT EXISTS idx_observations_time ON observations(observed_at_ms)"#,
        r#"
      CREATE TABLE IF NOT EXISTS stats(
        stat TEXT PRIMARY KEY,
        hits INTEGER NOT NULL DEFAULT 0,
        success INTEGER NOT NULL DEFAULT 0,
        failed INTEGER NOT NULL DEFAULT 0,
        errors INTEGER NOT NULL DEFAULT 0
      )"#,
        r#"INSERT OR IGNORE INTO stats(stat, hits, success, failed, errors) VALUES ('stat', 0, 0, 0, 0)"#,
        r#"
      CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        key_hash TEXT NOT NULL,
        username TEXT NOT NULL,
        email TEXT NULL,
        phone TEXT NULL,
        method TEXT NULL,
        expire INTEGER NULL
      )"#,
        r#"CREATE INDEX IF NOT EXISTS idx_users_key_hash ON users(key_hash)"#,
    ];

    for ddl in ddls {
        sqlx::query(ddl)
            .execute(pool)
            .await
            .map_err(db_error("migrate (ddl)"))?;
    }

    info!("DB migrate done");
    Ok(())
}
