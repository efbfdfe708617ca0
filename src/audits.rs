use serde::Serialize;
use sqlx::SqliteConnection;

use crate::id::new_uuid_v7;
use crate::scripts::AUDIT_SCRIPTS;
use crate::time::utc_timestamp;
use crate::AppResult;

/// Convert a camelCase command name to its UPPER_SNAKE audit tag,
/// e.g. `createBudget` → `CREATE_BUDGET`.
pub fn command_tag(name: &str) -> String {
    let mut tag = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            tag.push('_');
        }
        tag.push(ch.to_ascii_uppercase());
    }
    tag
}

/// Append one immutable audit record inside the caller's transaction.
///
/// Runs on the same connection as the mutation it describes, so the pair
/// commits or rolls back together.
pub async fn append(
    conn: &mut SqliteConnection,
    command: &str,
    payload: &impl Serialize,
) -> AppResult<()> {
    let sql = AUDIT_SCRIPTS.load("log")?;
    sqlx::query(sql)
        .bind(new_uuid_v7())
        .bind(command_tag(command))
        .bind(serde_json::to_string(payload)?)
        .bind(utc_timestamp())
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_names_become_upper_snake() {
        assert_eq!(command_tag("createBudget"), "CREATE_BUDGET");
        assert_eq!(command_tag("deleteCategory"), "DELETE_CATEGORY");
        assert_eq!(command_tag("updateExpense"), "UPDATE_EXPENSE");
    }

    #[test]
    fn single_word_names_pass_through_uppercased() {
        assert_eq!(command_tag("disconnect"), "DISCONNECT");
    }
}
