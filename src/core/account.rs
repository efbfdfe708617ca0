use serde::{Deserialize, Serialize};

use crate::core::Core;
use crate::entities;
use crate::id::new_uuid_v7;
use crate::models;
use crate::queries::{GetAccountsQuery, GetExpensesQuery};
use crate::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountCommand {
    pub budget_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountCommand {
    pub budget_id: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountCommand {
    pub budget_id: String,
    pub id: String,
}

pub(crate) async fn get_accounts(
    core: &Core,
    query: GetAccountsQuery,
) -> AppResult<Vec<models::Account>> {
    core.queries().get_accounts(&query).await
}

pub(crate) async fn create_account(core: &Core, command: CreateAccountCommand) -> AppResult<()> {
    let entity = entities::Account {
        budget_id: command.budget_id,
        id: new_uuid_v7(),
        name: command.name,
    };

    core.commands().create_account(&entity).await
}

pub(crate) async fn update_account(core: &Core, command: UpdateAccountCommand) -> AppResult<()> {
    let Some(mut entity) = core
        .queries()
        .get_account(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::account_not_found(&command.budget_id, &command.id));
    };

    entity.name = command.name;

    core.commands().update_account(&entity).await
}

pub(crate) async fn delete_account(core: &Core, command: DeleteAccountCommand) -> AppResult<()> {
    let Some(entity) = core
        .queries()
        .get_account(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::account_not_found(&command.budget_id, &command.id));
    };

    let expenses = core
        .queries()
        .get_expenses(&GetExpensesQuery {
            budget_id: command.budget_id.clone(),
            search: None,
            category_id: None,
            account_id: Some(command.id.clone()),
        })
        .await?;

    if !expenses.is_empty() {
        return Err(AppError::account_has_expenses(&command.budget_id, &command.id));
    }

    core.commands().delete_account(&entity).await
}
