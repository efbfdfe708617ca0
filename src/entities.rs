//! Storage entities: the flat, full shape of each row as persisted.
//!
//! Row mapping is strict. A missing or NULL column means the schema drifted
//! from the code and surfaces as an error, never as a default.

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
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub budget_id: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub budget_id: String,
    pub id: String,
    pub name: String,
    pub period: Period,
    pub amount: f64,
    pub category_id: String,
    pub account_id: String,
}

fn period_from_row(row: &SqliteRow) -> Result<Period, AppError> {
    let kind: String = row.try_get("period_type").map_err(AppError::from)?;
    Ok(Period {
        kind: PeriodType::parse(&kind)?,
        amount: row.try_get("period_amount").map_err(AppError::from)?,
    })
}

impl TryFrom<&SqliteRow> for Budget {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Budget {
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Income {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Income {
            budget_id: row.try_get("budget_id").map_err(AppError::from)?,
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            period: period_from_row(row)?,
            amount: row.try_get("amount").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Account {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Account {
            budget_id: row.try_get("budget_id").map_err(AppError::from)?,
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Category {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Category {
            budget_id: row.try_get("budget_id").map_err(AppError::from)?,
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            color: row.try_get("color").map_err(AppError::from)?,
        })
    }
}

impl TryFrom<&SqliteRow> for Expense {
    type Error = AppError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        Ok(Expense {
            budget_id: row.try_get("budget_id").map_err(AppError::from)?,
            id: row.try_get("id").map_err(AppError::from)?,
            name: row.try_get("name").map_err(AppError::from)?,
            period: period_from_row(row)?,
            amount: row.try_get("amount").map_err(AppError::from)?,
            category_id: row.try_get("category_id").map_err(AppError::from)?,
            account_id: row.try_get("account_id").map_err(AppError::from)?,
        })
    }
}
