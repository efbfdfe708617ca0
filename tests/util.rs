#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

use pocketbook::migrate;
use pocketbook::Core;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;

/// In-memory pool with the full schema applied. One connection, so every
/// statement sees the same database.
pub async fn temp_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect sqlite::memory:");
    sqlx::query("PRAGMA foreign_keys=ON;")
        .execute(&pool)
        .await
        .unwrap();
    migrate::run_migrations(&pool).await.expect("migrations");
    pool
}

/// File-backed core in a temp directory. Keep the guard alive for the
/// duration of the test.
pub async fn temp_core() -> (TempDir, Core) {
    let dir = tempfile::tempdir().expect("tempdir");
    let core = Core::open(dir.path().join("core.db"))
        .await
        .expect("open core");
    (dir, core)
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}
