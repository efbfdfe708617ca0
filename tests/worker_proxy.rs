use std::time::Duration;

use anyhow::Result;
use pocketbook::core::CreateBudgetCommand;
use pocketbook::queries::GetBudgetsQuery;
use pocketbook::{CoreProxy, CoreProxyConfig};

#[tokio::test]
async fn proxy_round_trips_commands_and_queries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(dir.path().join("core.db")));

    proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await?;

    let budgets = proxy.get_budgets(GetBudgetsQuery::default()).await?;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].name, "Household");

    proxy.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn domain_errors_cross_the_worker_boundary_intact() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(dir.path().join("core.db")));

    proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await?;
    let err = proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "BUDGET/NAME_TAKEN");
    assert_eq!(err.context().get("name"), Some(&"Household".to_string()));

    proxy.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn zero_timeout_reports_spawn_timeout() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = CoreProxyConfig::new(dir.path().join("core.db"));
    config.spawn_timeout = Duration::ZERO;
    let proxy = CoreProxy::new(config);

    let err = proxy
        .get_budgets(GetBudgetsQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "WORKER/SPAWN_TIMEOUT");
    assert_eq!(err.context().get("timeoutMs"), Some(&"0".to_string()));
    Ok(())
}

#[tokio::test]
async fn boot_failure_is_reported_not_hung() -> Result<()> {
    // Parent of the db path is a regular file, so the worker cannot open
    // the database and exits during boot.
    let file = tempfile::NamedTempFile::new()?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(file.path().join("core.db")));

    let err = proxy
        .get_budgets(GetBudgetsQuery::default())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "WORKER/GONE");
    Ok(())
}

#[tokio::test]
async fn disconnect_allows_a_later_respawn() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(dir.path().join("core.db")));

    proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await?;
    proxy.disconnect().await?;

    // Next call boots a fresh worker against the same file.
    let budgets = proxy.get_budgets(GetBudgetsQuery::default()).await?;
    assert_eq!(budgets.len(), 1);

    proxy.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn clear_data_resets_the_store_in_place() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(dir.path().join("core.db")));

    proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await?;
    proxy.clear_data().await?;

    assert!(proxy.get_budgets(GetBudgetsQuery::default()).await?.is_empty());

    // The reset store accepts new writes without a respawn.
    proxy
        .create_budget(CreateBudgetCommand {
            name: "Fresh start".into(),
        })
        .await?;
    assert_eq!(proxy.get_budgets(GetBudgetsQuery::default()).await?.len(), 1);

    proxy.disconnect().await?;
    Ok(())
}

#[tokio::test]
async fn export_import_round_trip_preserves_data() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("core.db");
    let backup = dir.path().join("backup.db");
    let proxy = CoreProxy::new(CoreProxyConfig::new(db_path.clone()));

    proxy
        .create_budget(CreateBudgetCommand {
            name: "Household".into(),
        })
        .await?;
    proxy.disconnect().await?;
    pocketbook::file_ops::export_data(&db_path, &backup)?;

    // Wipe, then restore from the exported file.
    let proxy = CoreProxy::new(CoreProxyConfig::new(db_path.clone()));
    proxy.clear_data().await?;
    assert!(proxy.get_budgets(GetBudgetsQuery::default()).await?.is_empty());
    proxy.disconnect().await?;

    pocketbook::file_ops::import_data(&backup, &db_path)?;
    let proxy = CoreProxy::new(CoreProxyConfig::new(db_path));
    let budgets = proxy.get_budgets(GetBudgetsQuery::default()).await?;
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0].name, "Household");

    proxy.disconnect().await?;
    Ok(())
}
