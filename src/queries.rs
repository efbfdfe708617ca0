//! Read-only repository. Listings return an empty `Vec` when nothing
//! matches; singular lookups return `None`; existence probes return `bool`.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::entities;
use crate::models;
use crate::scripts::QUERY_SCRIPTS;
use crate::AppResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBudgetsQuery {
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetIncomesQuery {
    pub budget_id: String,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalIncomeQuery {
    pub budget_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAccountsQuery {
    pub budget_id: String,
    pub search: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCategoriesQuery {
    pub budget_id: String,
    pub search: Option<String>,
}

/// Optional filters combine with AND semantics; an omitted filter is
/// unconstrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetExpensesQuery {
    pub budget_id: String,
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Clone)]
pub struct QueryRepository {
    pool: SqlitePool,
}

impl QueryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        QueryRepository { pool }
    }

    async fn exists(&self, script: &str, binds: &[&str]) -> AppResult<bool> {
        let sql = QUERY_SCRIPTS.load(script)?;
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for bind in binds {
            query = query.bind(*bind);
        }
        let count = query.fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    // Budgets

    pub async fn get_budgets(&self, query: &GetBudgetsQuery) -> AppResult<Vec<entities::Budget>> {
        let sql = QUERY_SCRIPTS.load("get_budgets")?;
        let rows = sqlx::query(sql)
            .bind(query.search.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(entities::Budget::try_from).collect()
    }

    pub async fn budget_exists(&self, id: &str) -> AppResult<bool> {
        self.exists("budget_exists", &[id]).await
    }

    pub async fn budget_name_exists(&self, name: &str) -> AppResult<bool> {
        self.exists("budget_name_exists", &[name]).await
    }

    // Incomes

    pub async fn get_income(
        &self,
        budget_id: &str,
        id: &str,
    ) -> AppResult<Option<entities::Income>> {
        let sql = QUERY_SCRIPTS.load("get_income")?;
        let row = sqlx::query(sql)
            .bind(budget_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entities::Income::try_from).transpose()
    }

    pub async fn get_incomes(&self, query: &GetIncomesQuery) -> AppResult<Vec<entities::Income>> {
        let sql = QUERY_SCRIPTS.load("get_incomes")?;
        let rows = sqlx::query(sql)
            .bind(&query.budget_id)
            .bind(query.search.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(entities::Income::try_from).collect()
    }

    pub async fn income_exists(&self, budget_id: &str, id: &str) -> AppResult<bool> {
        self.exists("income_exists", &[budget_id, id]).await
    }

    /// Yearly-normalized sum across all incomes in the budget, computed by
    /// the SQL script rather than in-process.
    pub async fn total_income(&self, query: &TotalIncomeQuery) -> AppResult<f64> {
        let sql = QUERY_SCRIPTS.load("total_income")?;
        let total: f64 = sqlx::query_scalar(sql)
            .bind(&query.budget_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    // Accounts

    pub async fn get_account(
        &self,
        budget_id: &str,
        id: &str,
    ) -> AppResult<Option<entities::Account>> {
        let sql = QUERY_SCRIPTS.load("get_account")?;
        let row = sqlx::query(sql)
            .bind(budget_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entities::Account::try_from).transpose()
    }

    pub async fn get_accounts(&self, query: &GetAccountsQuery) -> AppResult<Vec<models::Account>> {
        let sql = QUERY_SCRIPTS.load("get_accounts")?;
        let rows = sqlx::query(sql)
            .bind(&query.budget_id)
            .bind(query.search.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(models::Account::try_from).collect()
    }

    pub async fn account_exists(&self, budget_id: &str, id: &str) -> AppResult<bool> {
        self.exists("account_exists", &[budget_id, id]).await
    }

    // Categories

    pub async fn get_category(
        &self,
        budget_id: &str,
        id: &str,
    ) -> AppResult<Option<entities::Category>> {
        let sql = QUERY_SCRIPTS.load("get_category")?;
        let row = sqlx::query(sql)
            .bind(budget_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entities::Category::try_from).transpose()
    }

    pub async fn get_categories(
        &self,
        query: &GetCategoriesQuery,
    ) -> AppResult<Vec<models::Category>> {
        let sql = QUERY_SCRIPTS.load("get_categories")?;
        let rows = sqlx::query(sql)
            .bind(&query.budget_id)
            .bind(query.search.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(models::Category::try_from).collect()
    }

    pub async fn category_exists(&self, budget_id: &str, id: &str) -> AppResult<bool> {
        self.exists("category_exists", &[budget_id, id]).await
    }

    // Expenses

    pub async fn get_expense(
        &self,
        budget_id: &str,
        id: &str,
    ) -> AppResult<Option<entities::Expense>> {
        let sql = QUERY_SCRIPTS.load("get_expense")?;
        let row = sqlx::query(sql)
            .bind(budget_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(entities::Expense::try_from).transpose()
    }

    pub async fn get_expenses(&self, query: &GetExpensesQuery) -> AppResult<Vec<models::Expense>> {
        let sql = QUERY_SCRIPTS.load("get_expenses")?;
        let rows = sqlx::query(sql)
            .bind(&query.budget_id)
            .bind(query.search.as_deref())
            .bind(query.category_id.as_deref())
            .bind(query.account_id.as_deref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(models::Expense::try_from).collect()
    }

    pub async fn expense_exists(&self, budget_id: &str, id: &str) -> AppResult<bool> {
        self.exists("expense_exists", &[budget_id, id]).await
    }
}
