use serde::{Deserialize, Serialize};

use crate::core::Core;
use crate::entities;
use crate::id::new_uuid_v7;
use crate::models;
use crate::queries::GetBudgetsQuery;
use crate::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetCommand {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetCommand {
    pub budget: models::Budget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBudgetCommand {
    pub budget: models::Budget,
}

pub(crate) async fn get_budgets(
    core: &Core,
    query: GetBudgetsQuery,
) -> AppResult<Vec<models::Budget>> {
    let budgets = core.queries().get_budgets(&query).await?;
    Ok(budgets
        .into_iter()
        .map(|entity| models::Budget {
            id: entity.id,
            name: entity.name,
        })
        .collect())
}

pub(crate) async fn create_budget(core: &Core, command: CreateBudgetCommand) -> AppResult<()> {
    if core.queries().budget_name_exists(&command.name).await? {
        return Err(AppError::budget_name_taken(&command.name));
    }

    let entity = entities::Budget {
        id: new_uuid_v7(),
        name: command.name,
    };

    core.commands().create_budget(&entity).await
}

pub(crate) async fn update_budget(core: &Core, command: UpdateBudgetCommand) -> AppResult<()> {
    if !core.queries().budget_exists(&command.budget.id).await? {
        return Err(AppError::budget_not_found(&command.budget.id));
    }

    if core
        .queries()
        .budget_name_exists(&command.budget.name)
        .await?
    {
        return Err(AppError::budget_name_taken(&command.budget.name));
    }

    let entity = entities::Budget {
        id: command.budget.id,
        name: command.budget.name,
    };

    core.commands().update_budget(&entity).await
}

pub(crate) async fn delete_budget(core: &Core, command: DeleteBudgetCommand) -> AppResult<()> {
    if !core.queries().budget_exists(&command.budget.id).await? {
        return Err(AppError::budget_not_found(&command.budget.id));
    }

    let entity = entities::Budget {
        id: command.budget.id,
        name: command.budget.name,
    };

    core.commands().delete_budget(&entity).await
}
