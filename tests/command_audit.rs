use anyhow::Result;
use pocketbook::commands::CommandRepository;
use pocketbook::entities::{Budget, Income};
use pocketbook::period::{Period, PeriodType};
use sqlx::Row;

#[path = "util.rs"]
mod util;

fn sample_income() -> Income {
    Income {
        budget_id: "b-1".into(),
        id: "i-1".into(),
        name: "Salary".into(),
        period: Period {
            kind: PeriodType::Month,
            amount: 1,
        },
        amount: 1000.0,
    }
}

#[tokio::test]
async fn every_mutation_leaves_one_audit_row() -> Result<()> {
    let pool = util::temp_pool().await;
    let commands = CommandRepository::new(pool.clone());

    let budget = Budget {
        id: "b-1".into(),
        name: "Household".into(),
    };
    commands.create_budget(&budget).await?;
    commands.create_income(&sample_income()).await?;

    assert_eq!(util::count(&pool, "budgets").await, 1);
    assert_eq!(util::count(&pool, "incomes").await, 1);
    assert_eq!(util::count(&pool, "audits").await, 2);
    Ok(())
}

#[tokio::test]
async fn audit_rows_carry_tag_payload_and_timestamp() -> Result<()> {
    let pool = util::temp_pool().await;
    let commands = CommandRepository::new(pool.clone());

    commands.create_income(&sample_income()).await?;

    let row = sqlx::query("SELECT command, data, timestamp FROM audits")
        .fetch_one(&pool)
        .await?;
    let command: String = row.try_get("command")?;
    let data: String = row.try_get("data")?;
    let timestamp: String = row.try_get("timestamp")?;

    assert_eq!(command, "CREATE_INCOME");

    let payload: serde_json::Value = serde_json::from_str(&data)?;
    assert_eq!(payload["budgetId"], "b-1");
    assert_eq!(payload["name"], "Salary");
    assert_eq!(payload["period"]["type"], "month");
    assert_eq!(payload["amount"], 1000.0);

    // YYYY-MM-DD HH:MM:SS.mmm
    assert_eq!(timestamp.len(), 23);
    assert_eq!(&timestamp[10..11], " ");
    Ok(())
}

#[tokio::test]
async fn failed_audit_rolls_back_the_mutation() -> Result<()> {
    let pool = util::temp_pool().await;
    let commands = CommandRepository::new(pool.clone());

    // With the audit table gone the append must fail and take the entity
    // insert down with it.
    sqlx::query("DROP TABLE audits").execute(&pool).await?;

    let result = commands.create_income(&sample_income()).await;
    assert!(result.is_err());
    assert_eq!(util::count(&pool, "incomes").await, 0);
    Ok(())
}

#[tokio::test]
async fn failed_mutation_leaves_no_audit_row() -> Result<()> {
    let pool = util::temp_pool().await;
    let commands = CommandRepository::new(pool.clone());

    let budget = Budget {
        id: "b-1".into(),
        name: "Household".into(),
    };
    commands.create_budget(&budget).await?;

    // Duplicate primary key fails the insert before the audit append runs.
    let result = commands.create_budget(&budget).await;
    assert!(result.is_err());
    assert_eq!(util::count(&pool, "budgets").await, 1);
    assert_eq!(util::count(&pool, "audits").await, 1);
    Ok(())
}

#[tokio::test]
async fn account_delete_clears_referencing_expenses_in_storage() -> Result<()> {
    let pool = util::temp_pool().await;
    let commands = CommandRepository::new(pool.clone());

    let account = pocketbook::entities::Account {
        budget_id: "b-1".into(),
        id: "a-1".into(),
        name: "Checking".into(),
    };
    commands.create_account(&account).await?;

    sqlx::query(
        "INSERT INTO expenses (budget_id, id, name, period_type, period_amount, amount, category_id, account_id)
         VALUES ('b-1', 'e-1', 'Lunch', 'week', 1, 15.0, 'c-1', 'a-1')",
    )
    .execute(&pool)
    .await?;

    commands.delete_account(&account).await?;

    assert_eq!(util::count(&pool, "accounts").await, 0);
    assert_eq!(util::count(&pool, "expenses").await, 0);
    Ok(())
}
