use std::collections::HashMap;
use std::fmt;
use std::io::Error as IoError;

use serde::{Deserialize, Serialize};
use serde_json::Error as SerdeJsonError;
use sqlx::Error as SqlxError;

/// A structured application error with a stable machine-readable code.
///
/// Every failure that crosses the worker boundary is carried in this shape,
/// so the UI side never has to downcast concrete error types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, String>,
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        AppError {
            code: code.into(),
            message: message.into(),
            context: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &HashMap<String, String> {
        &self.context
    }

    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    // Domain taxonomy. Handlers raise these before any write happens.

    pub fn budget_not_found(id: &str) -> Self {
        AppError::new("BUDGET/NOT_FOUND", "Budget does not exist").with_context("id", id)
    }

    pub fn budget_name_taken(name: &str) -> Self {
        AppError::new("BUDGET/NAME_TAKEN", "A budget with this name already exists")
            .with_context("name", name)
    }

    pub fn income_not_found(budget_id: &str, id: &str) -> Self {
        AppError::new("INCOME/NOT_FOUND", "Income does not exist")
            .with_context("budgetId", budget_id)
            .with_context("id", id)
    }

    pub fn account_not_found(budget_id: &str, id: &str) -> Self {
        AppError::new("ACCOUNT/NOT_FOUND", "Account does not exist")
            .with_context("budgetId", budget_id)
            .with_context("id", id)
    }

    pub fn category_not_found(budget_id: &str, id: &str) -> Self {
        AppError::new("CATEGORY/NOT_FOUND", "Category does not exist")
            .with_context("budgetId", budget_id)
            .with_context("id", id)
    }

    pub fn expense_not_found(budget_id: &str, id: &str) -> Self {
        AppError::new("EXPENSE/NOT_FOUND", "Expense does not exist")
            .with_context("budgetId", budget_id)
            .with_context("id", id)
    }

    pub fn category_has_expenses(budget_id: &str, category_id: &str) -> Self {
        AppError::new(
            "CATEGORY/HAS_EXPENSES",
            "Category still has associated expenses",
        )
        .with_context("budgetId", budget_id)
        .with_context("categoryId", category_id)
    }

    pub fn account_has_expenses(budget_id: &str, account_id: &str) -> Self {
        AppError::new(
            "ACCOUNT/HAS_EXPENSES",
            "Account still has associated expenses",
        )
        .with_context("budgetId", budget_id)
        .with_context("accountId", account_id)
    }

    pub fn script_not_found(catalog: &str, script: &str) -> Self {
        AppError::new("SCRIPTS/NOT_FOUND", "No such script in catalog")
            .with_context("catalog", catalog)
            .with_context("script", script)
    }

    pub fn worker_spawn_timeout(timeout_ms: u128) -> Self {
        AppError::new(
            "WORKER/SPAWN_TIMEOUT",
            "Core worker did not signal readiness within the timeout",
        )
        .with_context("timeoutMs", timeout_ms.to_string())
    }

    pub fn worker_gone() -> Self {
        AppError::new("WORKER/GONE", "Core worker is no longer reachable")
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.context.is_empty() {
            write!(f, "[{}] {}", self.code, self.message)
        } else {
            write!(f, "[{}] {} ({:?})", self.code, self.message, self.context)
        }
    }
}

impl std::error::Error for AppError {}

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        match error {
            SqlxError::RowNotFound => AppError::new("SQLX/ROW_NOT_FOUND", "Record not found"),
            SqlxError::ColumnNotFound(name) => {
                AppError::new("SQLX/COLUMN_NOT_FOUND", format!("Column not found: {name}"))
            }
            SqlxError::PoolClosed => AppError::new("SQLX/POOL_CLOSED", "Database pool is closed"),
            SqlxError::Io(err) => AppError::from(err).with_context("source", "sqlx"),
            SqlxError::Database(db) => {
                let code = db
                    .code()
                    .map(|code| format!("Sqlite/{code}"))
                    .unwrap_or_else(|| "SQLX/DATABASE".to_string());
                AppError::new(code, db.message().to_string())
            }
            SqlxError::ColumnDecode { index, source } => {
                AppError::new("SQLX/COLUMN_DECODE", source.to_string())
                    .with_context("column_index", index.to_string())
            }
            other => AppError::new("SQLX/ERROR", other.to_string()),
        }
    }
}

impl From<IoError> for AppError {
    fn from(error: IoError) -> Self {
        let code = format!("IO/{:?}", error.kind());
        AppError::new(code, error.to_string())
    }
}

impl From<SerdeJsonError> for AppError {
    fn from(error: SerdeJsonError) -> Self {
        let code = if error.is_data() {
            "JSON/DATA"
        } else if error.is_syntax() {
            "JSON/SYNTAX"
        } else {
            "JSON/ERROR"
        };
        AppError::new(code, error.to_string())
    }
}
