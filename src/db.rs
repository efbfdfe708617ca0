use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{ConnectOptions, Pool, Sqlite};

use crate::{AppError, AppResult};

/// Default on-disk location of the core database file.
pub fn default_db_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
    base.join("pocketbook").join("core.db")
}

/// Open (creating if missing) the database file and return a connection pool.
///
/// A single connection keeps every statement strictly serialized, which is
/// the concurrency model the worker relies on.
pub async fn open_pool(db_path: &Path) -> AppResult<Pool<Sqlite>> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            tracing::error!(
                target: "pocketbook",
                event = "db_dir_create_failed",
                path = %parent.display(),
                error = %e
            );
            AppError::new("DB/OPEN_FAILED", "Could not create database directory")
                .with_context("path", parent.display().to_string())
        })?;
    }

    let opts = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Full)
        .log_statements(log::LevelFilter::Off);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .after_connect(|conn, _| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys=ON;")
                    .execute(&mut *conn)
                    .await?;
                sqlx::query("PRAGMA busy_timeout = 5000;")
                    .execute(&mut *conn)
                    .await?;
                Ok::<_, sqlx::Error>(())
            })
        })
        .connect_with(opts)
        .await
        .map_err(|e| {
            tracing::error!(
                target: "pocketbook",
                event = "db_open_failed",
                path = %db_path.display(),
                error = %e
            );
            AppError::new("DB/OPEN_FAILED", "Could not open database")
                .with_context("path", db_path.display().to_string())
        })?;

    log_effective_pragmas(&pool).await;

    Ok(pool)
}

async fn log_effective_pragmas(pool: &Pool<Sqlite>) {
    use tracing::{info, warn};

    let jm: (String,) = sqlx::query_as("PRAGMA journal_mode;")
        .fetch_one(pool)
        .await
        .unwrap_or((String::from("unknown"),));

    let fks: (i64,) = sqlx::query_as("PRAGMA foreign_keys;")
        .fetch_one(pool)
        .await
        .unwrap_or((i64::MIN,));

    info!(
        target: "pocketbook",
        event = "db_open",
        journal_mode = %jm.0,
        foreign_keys = %fks.0
    );

    if !jm.0.eq_ignore_ascii_case("wal") {
        warn!(
            target: "pocketbook",
            event = "db_open_warning",
            msg = "journal_mode != WAL; running with reduced crash safety"
        );
    }
}

/// Paths of the WAL sidecar files SQLite keeps next to the database.
pub fn sidecar_paths(db_path: &Path) -> [PathBuf; 2] {
    let mut wal = db_path.as_os_str().to_owned();
    wal.push("-wal");
    let mut shm = db_path.as_os_str().to_owned();
    shm.push("-shm");
    [PathBuf::from(wal), PathBuf::from(shm)]
}

/// Remove the database file and its sidecars. Callers must have closed the
/// pool first.
pub fn remove_db_files(db_path: &Path) -> AppResult<()> {
    for path in std::iter::once(db_path.to_path_buf()).chain(sidecar_paths(db_path)) {
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::from(e).with_context("path", path.display().to_string()))
            }
        }
    }
    Ok(())
}
