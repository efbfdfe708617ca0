use include_dir::{include_dir, Dir};
use sqlx::SqlitePool;
use tracing::{error, info};

use crate::scripts::MIGRATION_HELPER_SCRIPTS;
use crate::AppResult;

static MIGRATIONS_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/migrations");

/// One versioned migration script. Version numbers are the 1-based position
/// in the lexicographic filename ordering, so filenames must sort in the
/// intended application order.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i64,
    pub script: &'static str,
    pub sql: &'static str,
}

/// The full embedded migration set, in ascending version order.
pub fn migration_set() -> Vec<Migration> {
    let mut files: Vec<_> = MIGRATIONS_DIR
        .files()
        .filter_map(|file| {
            let name = file.path().file_name()?.to_str()?;
            if !name.ends_with(".sql") {
                return None;
            }
            Some((name, file.contents_utf8()?))
        })
        .collect();
    files.sort_by_key(|(name, _)| *name);
    files
        .into_iter()
        .enumerate()
        .map(|(index, (script, sql))| Migration {
            version: index as i64 + 1,
            script,
            sql,
        })
        .collect()
}

fn preview(sql: &str) -> String {
    let one_line = sql.replace(['\n', '\t'], " ");
    let trimmed = one_line.trim();
    if trimmed.len() > 160 {
        // Slicing at a fixed byte offset can split a multi-byte character.
        let cut = (0..=160)
            .rev()
            .find(|&i| trimmed.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}…", &trimmed[..cut])
    } else {
        trimmed.to_string()
    }
}

fn statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|stmt| {
        !stmt.is_empty()
            && !stmt
                .lines()
                .all(|line| line.trim().is_empty() || line.trim_start().starts_with("--"))
    })
}

async fn last_applied_version(pool: &SqlitePool) -> AppResult<i64> {
    let exists_sql = MIGRATION_HELPER_SCRIPTS.load("check_migration_table_exists")?;
    let table_count: i64 = sqlx::query_scalar(exists_sql).fetch_one(pool).await?;
    if table_count == 0 {
        return Ok(0);
    }

    let latest_sql = MIGRATION_HELPER_SCRIPTS.load("get_latest_migration_version")?;
    let version: i64 = sqlx::query_scalar(latest_sql).fetch_one(pool).await?;
    Ok(version)
}

/// Bring the database up to the current schema version.
///
/// Each pending migration runs in its own transaction together with its
/// history row, so a failure mid-run leaves earlier migrations committed
/// and a retry resumes from the first unapplied version. This must be the
/// first thing that touches a freshly opened handle.
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    let last = last_applied_version(pool).await?;
    let insert_sql = MIGRATION_HELPER_SCRIPTS.load("insert_migration")?;

    for migration in migration_set().into_iter().filter(|m| m.version > last) {
        let mut tx = pool.begin().await?;

        for stmt in statements(migration.sql) {
            info!(
                target: "pocketbook",
                event = "migration_stmt",
                file = %migration.script,
                sql = %preview(stmt)
            );
            if let Err(e) = sqlx::query(stmt).execute(&mut *tx).await {
                error!(
                    target: "pocketbook",
                    event = "migration_stmt_error",
                    file = %migration.script,
                    sql = %preview(stmt),
                    error = %e
                );
                return Err(e.into());
            }
        }

        sqlx::query(insert_sql)
            .bind(migration.version)
            .bind(migration.script)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(
            target: "pocketbook",
            event = "migration_file_applied",
            file = %migration.script,
            version = migration.version
        );
    }

    Ok(())
}

/// Scripts recorded in the migration ledger, in application order.
pub async fn list_applied_migrations(pool: &SqlitePool) -> AppResult<Vec<String>> {
    let exists_sql = MIGRATION_HELPER_SCRIPTS.load("check_migration_table_exists")?;
    let table_count: i64 = sqlx::query_scalar(exists_sql).fetch_one(pool).await?;
    if table_count == 0 {
        return Ok(Vec::new());
    }

    let sql = MIGRATION_HELPER_SCRIPTS.load("get_migrations")?;
    let scripts: Vec<String> = sqlx::query_scalar(sql).fetch_all(pool).await?;
    Ok(scripts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migration_versions_are_contiguous_from_one() {
        let set = migration_set();
        assert!(!set.is_empty());
        for (index, migration) in set.iter().enumerate() {
            assert_eq!(migration.version, index as i64 + 1);
        }
    }

    #[test]
    fn preview_truncates_on_a_char_boundary() {
        let short = preview("SELECT 1;");
        assert_eq!(short, "SELECT 1;");

        // 159 ASCII bytes followed by a 2-byte character puts byte 160
        // inside the character.
        let long = format!("{}é tail that pushes well past the limit", "x".repeat(159));
        let truncated = preview(&long);
        assert!(truncated.ends_with('…'));
        assert_eq!(truncated.trim_end_matches('…'), "x".repeat(159));
    }

    #[test]
    fn migration_filenames_sort_in_application_order() {
        let set = migration_set();
        for pair in set.windows(2) {
            assert!(pair[0].script < pair[1].script);
        }
    }

    #[test]
    fn comment_only_fragments_are_not_statements() {
        let sql = "-- header\nCREATE TABLE t (id TEXT);\n-- trailing comment\n";
        let stmts: Vec<_> = statements(sql).collect();
        assert_eq!(stmts.len(), 1);
        assert!(stmts[0].contains("CREATE TABLE"));
    }
}
