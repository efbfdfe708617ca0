use serde::{Deserialize, Serialize};

use crate::core::Core;
use crate::entities;
use crate::id::new_uuid_v7;
use crate::models;
use crate::queries::{GetCategoriesQuery, GetExpensesQuery};
use crate::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryCommand {
    pub budget_id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryCommand {
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCategoryCommand {
    pub budget_id: String,
    pub id: String,
}

pub(crate) async fn get_categories(
    core: &Core,
    query: GetCategoriesQuery,
) -> AppResult<Vec<models::Category>> {
    core.queries().get_categories(&query).await
}

pub(crate) async fn create_category(core: &Core, command: CreateCategoryCommand) -> AppResult<()> {
    let entity = entities::Category {
        budget_id: command.budget_id,
        id: new_uuid_v7(),
        name: command.name,
        color: command.color,
    };

    core.commands().create_category(&entity).await
}

pub(crate) async fn update_category(core: &Core, command: UpdateCategoryCommand) -> AppResult<()> {
    let Some(mut entity) = core
        .queries()
        .get_category(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::category_not_found(&command.budget_id, &command.id));
    };

    entity.name = command.name;
    entity.color = command.color;

    core.commands().update_category(&entity).await
}

pub(crate) async fn delete_category(core: &Core, command: DeleteCategoryCommand) -> AppResult<()> {
    let Some(entity) = core
        .queries()
        .get_category(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::category_not_found(&command.budget_id, &command.id));
    };

    let expenses = core
        .queries()
        .get_expenses(&GetExpensesQuery {
            budget_id: command.budget_id.clone(),
            search: None,
            category_id: Some(command.id.clone()),
            account_id: None,
        })
        .await?;

    if !expenses.is_empty() {
        return Err(AppError::category_has_expenses(&command.budget_id, &command.id));
    }

    core.commands().delete_category(&entity).await
}
