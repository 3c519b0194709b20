use std::path::Path;
use std::sync::Arc;

use bidi_core::app::users::seed_user;
use bidi_core::domain::model::{AppConfig, AppMode};
use bidi_core::infra::logging::BootError;
use bidi_core::infra::sqlite_repo::SqliteRepo;
use bidi_core::ports::repo::Repo;
use tracing::{info, warn};

/// Opens and migrates the database, seeding the configured API user. Dev mode
/// starts from an empty file.
pub async fn open_repo(cfg: &AppConfig) -> Result<Arc<SqliteRepo>, BootError> {
    if cfg.mode == AppMode::Dev {
        reset_database(&cfg.db_path).await?;
    }

    let repo = SqliteRepo::new(&cfg.db_path, cfg.timezone)
        .await
        .map_err(|e| BootError::Fatal(format!("open {}: {e}", cfg.db_path.display())))?;
    repo.migrate()
        .await
        .map_err(|e| BootError::Fatal(format!("migrate: {e}")))?;

    if let Some(seed) = &cfg.seed_user {
        seed_user(&repo, seed)
            .await
            .map_err(|e| BootError::Fatal(format!("seed user: {e}")))?;
    }

    info!(path = %cfg.db_path.display(), "Database ready");
    Ok(Arc::new(repo))
}

async fn reset_database(path: &Path) -> Result<(), BootError> {
    for suffix in ["", "-wal", "-shm"] {
        let mut file = path.as_os_str().to_owned();
        file.push(suffix);
        match tokio::fs::remove_file(&file).await {
            Ok(()) => warn!(path = ?file, "Dev mode: removed database file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(BootError::Fatal(format!(
                    "remove {}: {e}",
                    Path::new(&file).display()
                )))
            }
        }
    }
    Ok(())
}
