#![allow(clippy::unwrap_used, clippy::expect_used)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocketbook::db::{default_db_path, open_pool};
use pocketbook::migrate::{list_applied_migrations, migration_set, run_migrations};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "migrate", about = "Pocketbook schema migration helper")]
struct Cli {
    /// Optional explicit DB path
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// List embedded migrations and show applied/pending
    #[command(about, long_about = None)]
    List,
    /// Show current migration status
    #[command(about, long_about = None)]
    Status,
    /// Apply all pending migrations
    #[command(about, long_about = None)]
    Up,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_log::LogTracer::init();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("POCKETBOOK_LOG").unwrap_or_else(|_| "pocketbook=info,sqlx=warn".into()),
        )
        .with_target(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init();

    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(default_db_path);

    match cli.cmd {
        Cmd::List => list(&db_path).await,
        Cmd::Status => status(&db_path).await,
        Cmd::Up => up(&db_path).await,
    }
}

async fn applied_scripts(db: &Path) -> Result<Vec<String>> {
    if !db.exists() {
        return Ok(Vec::new());
    }
    let pool = open_pool(db).await?;
    let applied = list_applied_migrations(&pool).await?;
    pool.close().await;
    Ok(applied)
}

async fn list(db: &Path) -> Result<()> {
    let applied = applied_scripts(db).await?;
    println!("DB: {}", db.display());
    for migration in migration_set() {
        let state = if applied.iter().any(|s| s.as_str() == migration.script) {
            "applied"
        } else {
            "pending"
        };
        println!("{:<40}  {}", migration.script, state);
    }
    Ok(())
}

async fn status(db: &Path) -> Result<()> {
    let all = migration_set();
    let applied = applied_scripts(db).await?;
    let head = all
        .iter()
        .rev()
        .find(|m| applied.iter().any(|s| s.as_str() == m.script))
        .map(|m| m.script)
        .unwrap_or("<none>");
    println!("DB: {}", db.display());
    println!("Applied: {}/{}", applied.len(), all.len());
    println!("Head: {}", head);
    Ok(())
}

async fn up(db: &Path) -> Result<()> {
    let pool = open_pool(db).await?;
    let before = list_applied_migrations(&pool).await?.len();
    run_migrations(&pool).await?;
    let after = list_applied_migrations(&pool).await?.len();
    pool.close().await;
    if after == before {
        println!("Nothing to apply.");
    } else {
        println!("Applied {} migration(s).", after - before);
    }
    Ok(())
}
