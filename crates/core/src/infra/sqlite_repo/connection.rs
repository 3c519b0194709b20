//! Creates and configures the SQLite pool.
use std::{
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
    SqlitePool,
};

use crate::ports::repo::RepoError;

pub async fn create_pool(db_path: &Path) -> Result<SqlitePool, RepoError> {
    let full_path = if db_path.is_absolute() {
        db_path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(db_path)
    };

    if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| RepoError::Database(format!("db dir create error: {e}")))?;
    }

    let url = format!("sqlite://{}", full_path.display());
    let opts = SqliteConnectOptions::from_str(&url)
        .map_err(|e| RepoError::Database(format!("db connect options error: {e}")))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(opts)
        .await
        .map_err(|e| RepoError::Database(format!("db connect error: {e}")))
}
