//! Presentation models: the denormalized, aggregated shapes handed back to
//! the UI. `total` fields are yearly-normalized sums computed in SQL.

use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::period::{Period, PeriodType};
use crate::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
    pub category: EntityRef,
    pub account: EntityRef,
}

impl TryFrom<&SqliteRow> for Account {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            total: row.try_get("total").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Category {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            color: row.try_get("color").map_err(AppError::from)?,
            total: row.try_get("total").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Expense {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        let kind: String = row.try_get("period_type").map_err(AppError::from)?;
        Ok(Expense {
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            period: Period {
                kind: PeriodType::parse(&kind)?,
                amount: row.try_get("period_amount").map_err(AppError::from)?,
            },
            amount: row.try_get("amount").map_err(AppError::from)?,
            category: EntityRef {
                id: row.try_get("category_id").map_err(AppError::from)?,
                name: row.try_get("category_name").map_err(AppError::from)?,
            },
            account: EntityRef {
                id: row.try_get("account_id").map_err(AppError::from)?,
                name: row.try_get("account_name").map_err(AppError::from)?,
            },
        })
    }
}
