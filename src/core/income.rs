use serde::{Deserialize, Serialize};

use crate::core::Core;
use crate::entities;
use crate::id::new_uuid_v7;
use crate::models;
use crate::period::Period;
use crate::queries::{GetIncomesQuery, TotalIncomeQuery};
use crate::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncomeCommand {
    pub budget_id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncomeCommand {
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteIncomeCommand {
    pub budget_id: String,
    pub id: String,
}

pub(crate) async fn get_incomes(
    core: &Core,
    query: GetIncomesQuery,
) -> AppResult<Vec<models::Income>> {
    let incomes = core.queries().get_incomes(&query).await?;
    Ok(incomes
        .into_iter()
        .map(|entity| models::Income {
            id: entity.id,
            name: entity.name,
            period: entity.period,
            amount: entity.amount,
        })
        .collect())
}

pub(crate) async fn total_income(core: &Core, query: TotalIncomeQuery) -> AppResult<f64> {
    core.queries().total_income(&query).await
}

pub(crate) async fn create_income(core: &Core, command: CreateIncomeCommand) -> AppResult<()> {
    let entity = entities::Income {
        budget_id: command.budget_id,
        id: new_uuid_v7(),
        name: command.name,
        period: command.period,
        amount: command.amount,
    };

    core.commands().create_income(&entity).await
}

pub(crate) async fn update_income(core: &Core, command: UpdateIncomeCommand) -> AppResult<()> {
    let Some(mut entity) = core
        .queries()
        .get_income(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::income_not_found(&command.budget_id, &command.id));
    };

    entity.name = command.name;
    entity.period = command.period;
    entity.amount = command.amount;

    core.commands().update_income(&entity).await
}

pub(crate) async fn delete_income(core: &Core, command: DeleteIncomeCommand) -> AppResult<()> {
    let Some(entity) = core
        .queries()
        .get_income(&command.budget_id, &command.id)
        .await?
    else {
        return Err(AppError::income_not_found(&command.budget_id, &command.id));
    };

    core.commands().delete_income(&entity).await
}
