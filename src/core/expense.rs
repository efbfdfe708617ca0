use serde::{Deserialize, Serialize};

use crate::core::Core;
use crate::entities;
use crate::id::new_uuid_v7;
use crate::models;
use crate::period::Period;
use crate::queries::GetExpensesQuery;
use crate::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseCommand {
    pub budget_id: String,
    pub name: String,
    pub category_id: String,
    pub account_id: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseCommand {
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub account_id: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteExpenseCommand {
    pub budget_id: String,
    pub id: String,
}

pub(crate) async fn get_expenses(
    core: &Core,
    query: GetExpensesQuery,
) -> AppResult<Vec<models::Expense>> {
    core.queries().get_expenses(&query).await
}

/// The category check runs before the account check; both run before any
/// write.
async fn check_references(
    core: &Core,
    budget_id: &str,
    category_id: &str,
    account_id: &str,
) -> AppResult<()> {
    if !core.queries().category_exists(budget_id, category_id).await? {
        return Err(AppError::category_not_found(budget_id, category_id));
    }

    if !core.queries().account_exists(budget_id, account_id).await? {
        return Err(AppError::account_not_found(budget_id, account_id));
    }

    Ok(())
}

pub(crate) async fn create_expense(core: &Core, command: CreateExpenseCommand) -> AppResult<()> {
    check_references(
        core,
        &command.budget_id,
        &command.category_id,
        &command.account_id,
    )
    .await?;

    let entity = entities::Expense {
        budget_id: command.budget_id,
        id: new_uuid_v7(),
        name: command.name,
        period: command.period,
        amount: command.amount,
        category_id: command.category_id,
        account_id: command.account_id,
    };

    core.commands().create_expense(&entity).await
}

pub(crate) async fn update_expense(core: &Core, command: UpdateExpenseCommand) -> AppResult<()> {
    check_references(
        core,
        &command.budget_id,
        &command.category_id,
        &command.account_id,
    )
    .await?;

    let Some(mut entity) = core
        .queries()
        .get_expense(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::expense_not_found(&command.budget_id, &command.id));
    };

    entity.name = command.name;
    entity.period = command.period;
    entity.amount = command.amount;
    entity.category_id = command.category_id;
    entity.account_id = command.account_id;

    core.commands().update_expense(&entity).await
}

pub(crate) async fn delete_expense(core: &Core, command: DeleteExpenseCommand) -> AppResult<()> {
    let Some(entity) = core
        .queries()
        .get_expense(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::expense_not_found(&command.budget_id, &command.id));
    };

    core.commands().delete_expense(&entity).await
}
