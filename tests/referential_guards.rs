use anyhow::Result;
use pocketbook::core::{
    CreateAccountCommand, CreateBudgetCommand, CreateCategoryCommand, CreateExpenseCommand,
    DeleteAccountCommand, DeleteCategoryCommand, DeleteExpenseCommand, UpdateExpenseCommand,
};
use pocketbook::period::{Period, PeriodType};
use pocketbook::queries::{GetAccountsQuery, GetBudgetsQuery, GetCategoriesQuery, GetExpensesQuery};
use pocketbook::Core;

#[path = "util.rs"]
mod util;

struct Fixture {
    budget_id: String,
    category_id: String,
    account_id: String,
}

async fn seed(core: &Core) -> Result<Fixture> {
    core.create_budget(CreateBudgetCommand {
        name: "Household".into(),
    })
    .await?;
    let budget_id = core.get_budgets(GetBudgetsQuery::default()).await?[0]
        .id
        .clone();

    core.create_category(CreateCategoryCommand {
        budget_id: budget_id.clone(),
        name: "Food".into(),
        color: "#ff0000".into(),
    })
    .await?;
    let category_id = core
        .get_categories(GetCategoriesQuery {
            budget_id: budget_id.clone(),
            search: None,
        })
        .await?[0]
        .id
        .clone();

    core.create_account(CreateAccountCommand {
        budget_id: budget_id.clone(),
        name: "Checking".into(),
    })
    .await?;
    let account_id = core
        .get_accounts(GetAccountsQuery {
            budget_id: budget_id.clone(),
            search: None,
        })
        .await?[0]
        .id
        .clone();

    Ok(Fixture {
        budget_id,
        category_id,
        account_id,
    })
}

fn weekly() -> Period {
    Period {
        kind: PeriodType::Week,
        amount: 1,
    }
}

#[tokio::test]
async fn expense_create_validates_category_before_account() -> Result<()> {
    let (_dir, core) = util::temp_core().await;
    let fx = seed(&core).await?;

    // Both references invalid: the category failure wins.
    let err = core
        .create_expense(CreateExpenseCommand {
            budget_id: fx.budget_id.clone(),
            name: "Lunch".into(),
            category_id: "missing-category".into(),
            account_id: "missing-account".into(),
            period: weekly(),
            amount: 15.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CATEGORY/NOT_FOUND");

    let err = core
        .create_expense(CreateExpenseCommand {
            budget_id: fx.budget_id.clone(),
            name: "Lunch".into(),
            category_id: fx.category_id.clone(),
            account_id: "missing-account".into(),
            period: weekly(),
            amount: 15.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ACCOUNT/NOT_FOUND");

    let expenses = core
        .get_expenses(GetExpensesQuery {
            budget_id: fx.budget_id.clone(),
            search: None,
            category_id: None,
            account_id: None,
        })
        .await?;
    assert!(expenses.is_empty());
    Ok(())
}

#[tokio::test]
async fn expense_update_validates_references_and_existence() -> Result<()> {
    let (_dir, core) = util::temp_core().await;
    let fx = seed(&core).await?;

    core.create_expense(CreateExpenseCommand {
        budget_id: fx.budget_id.clone(),
        name: "Lunch".into(),
        category_id: fx.category_id.clone(),
        account_id: fx.account_id.clone(),
        period: weekly(),
        amount: 15.0,
    })
    .await?;
    let expense_id = core
        .get_expenses(GetExpensesQuery {
            budget_id: fx.budget_id.clone(),
            search: None,
            category_id: None,
            account_id: None,
        })
        .await?[0]
        .id
        .clone();

    let err = core
        .update_expense(UpdateExpenseCommand {
            budget_id: fx.budget_id.clone(),
            id: expense_id.clone(),
            name: "Lunch".into(),
            category_id: "missing-category".into(),
            account_id: fx.account_id.clone(),
            period: weekly(),
            amount: 15.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CATEGORY/NOT_FOUND");

    let err = core
        .update_expense(UpdateExpenseCommand {
            budget_id: fx.budget_id.clone(),
            id: "missing-expense".into(),
            name: "Lunch".into(),
            category_id: fx.category_id.clone(),
            account_id: fx.account_id.clone(),
            period: weekly(),
            amount: 15.0,
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "EXPENSE/NOT_FOUND");

    core.update_expense(UpdateExpenseCommand {
        budget_id: fx.budget_id.clone(),
        id: expense_id,
        name: "Dinner".into(),
        category_id: fx.category_id.clone(),
        account_id: fx.account_id.clone(),
        period: weekly(),
        amount: 25.0,
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn category_with_expenses_cannot_be_deleted() -> Result<()> {
    let (_dir, core) = util::temp_core().await;
    let fx = seed(&core).await?;

    core.create_expense(CreateExpenseCommand {
        budget_id: fx.budget_id.clone(),
        name: "Lunch".into(),
        category_id: fx.category_id.clone(),
        account_id: fx.account_id.clone(),
        period: weekly(),
        amount: 15.0,
    })
    .await?;

    let err = core
        .delete_category(DeleteCategoryCommand {
            budget_id: fx.budget_id.clone(),
            id: fx.category_id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CATEGORY/HAS_EXPENSES");

    let expense_id = core
        .get_expenses(GetExpensesQuery {
            budget_id: fx.budget_id.clone(),
            search: None,
            category_id: Some(fx.category_id.clone()),
            account_id: None,
        })
        .await?[0]
        .id
        .clone();
    core.delete_expense(DeleteExpenseCommand {
        budget_id: fx.budget_id.clone(),
        id: expense_id,
    })
    .await?;

    core.delete_category(DeleteCategoryCommand {
        budget_id: fx.budget_id.clone(),
        id: fx.category_id.clone(),
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn account_with_expenses_cannot_be_deleted() -> Result<()> {
    let (_dir, core) = util::temp_core().await;
    let fx = seed(&core).await?;

    core.create_expense(CreateExpenseCommand {
        budget_id: fx.budget_id.clone(),
        name: "Lunch".into(),
        category_id: fx.category_id.clone(),
        account_id: fx.account_id.clone(),
        period: weekly(),
        amount: 15.0,
    })
    .await?;

    let err = core
        .delete_account(DeleteAccountCommand {
            budget_id: fx.budget_id.clone(),
            id: fx.account_id.clone(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ACCOUNT/HAS_EXPENSES");

    let expense_id = core
        .get_expenses(GetExpensesQuery {
            budget_id: fx.budget_id.clone(),
            search: None,
            category_id: None,
            account_id: Some(fx.account_id.clone()),
        })
        .await?[0]
        .id
        .clone();
    core.delete_expense(DeleteExpenseCommand {
        budget_id: fx.budget_id.clone(),
        id: expense_id,
    })
    .await?;

    core.delete_account(DeleteAccountCommand {
        budget_id: fx.budget_id.clone(),
        id: fx.account_id.clone(),
    })
    .await?;
    Ok(())
}

#[tokio::test]
async fn deleting_missing_entities_reports_scoped_codes() -> Result<()> {
    let (_dir, core) = util::temp_core().await;
    let fx = seed(&core).await?;

    let err = core
        .delete_category(DeleteCategoryCommand {
            budget_id: fx.budget_id.clone(),
            id: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "CATEGORY/NOT_FOUND");
    assert_eq!(err.context().get("budgetId"), Some(&fx.budget_id));

    let err = core
        .delete_account(DeleteAccountCommand {
            budget_id: fx.budget_id.clone(),
            id: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "ACCOUNT/NOT_FOUND");

    let err = core
        .delete_expense(DeleteExpenseCommand {
            budget_id: fx.budget_id.clone(),
            id: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.code(), "EXPENSE/NOT_FOUND");
    Ok(())
}
