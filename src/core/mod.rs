//! The core façade: the single operation surface exposed across the worker
//! boundary. Handlers validate domain invariants before any repository
//! write; validation always happens outside the storage transaction.

pub mod account;
pub mod budget;
pub mod category;
pub mod expense;
pub mod income;

use std::path::PathBuf;

use sqlx::SqlitePool;
use tracing::info;

use crate::commands::CommandRepository;
use crate::db;
use crate::migrate;
use crate::models;
use crate::queries::{
    GetAccountsQuery, GetBudgetsQuery, GetCategoriesQuery, GetExpensesQuery, GetIncomesQuery,
    QueryRepository, TotalIncomeQuery,
};
use crate::scripts;
use crate::AppResult;

pub use account::{CreateAccountCommand, DeleteAccountCommand, UpdateAccountCommand};
pub use budget::{CreateBudgetCommand, DeleteBudgetCommand, UpdateBudgetCommand};
pub use category::{CreateCategoryCommand, DeleteCategoryCommand, UpdateCategoryCommand};
pub use expense::{CreateExpenseCommand, DeleteExpenseCommand, UpdateExpenseCommand};
pub use income::{CreateIncomeCommand, DeleteIncomeCommand, UpdateIncomeCommand};

pub struct Core {
    db_path: PathBuf,
    pool: SqlitePool,
    queries: QueryRepository,
    commands: CommandRepository,
}

impl Core {
    /// Open (or create) the database at `db_path`, run migrations, warm the
    /// script catalogs and wire up the repositories.
    pub async fn open(db_path: PathBuf) -> AppResult<Self> {
        let pool = db::open_pool(&db_path).await?;
        migrate::run_migrations(&pool).await?;
        scripts::initialize_all();

        Ok(Core {
            db_path,
            queries: QueryRepository::new(pool.clone()),
            commands: CommandRepository::new(pool.clone()),
            pool,
        })
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub(crate) fn queries(&self) -> &QueryRepository {
        &self.queries
    }

    pub(crate) fn commands(&self) -> &CommandRepository {
        &self.commands
    }

    // Budgets

    pub async fn get_budgets(&self, query: GetBudgetsQuery) -> AppResult<Vec<models::Budget>> {
        budget::get_budgets(self, query).await
    }

    pub async fn create_budget(&self, command: CreateBudgetCommand) -> AppResult<()> {
        budget::create_budget(self, command).await
    }

    pub async fn update_budget(&self, command: UpdateBudgetCommand) -> AppResult<()> {
        budget::update_budget(self, command).await
    }

    pub async fn delete_budget(&self, command: DeleteBudgetCommand) -> AppResult<()> {
        budget::delete_budget(self, command).await
    }

    // Incomes

    pub async fn get_incomes(&self, query: GetIncomesQuery) -> AppResult<Vec<models::Income>> {
        income::get_incomes(self, query).await
    }

    pub async fn total_income(&self, query: TotalIncomeQuery) -> AppResult<f64> {
        income::total_income(self, query).await
    }

    pub async fn create_income(&self, command: CreateIncomeCommand) -> AppResult<()> {
        income::create_income(self, command).await
    }

    pub async fn update_income(&self, command: UpdateIncomeCommand) -> AppResult<()> {
        income::update_income(self, command).await
    }

    pub async fn delete_income(&self, command: DeleteIncomeCommand) -> AppResult<()> {
        income::delete_income(self, command).await
    }

    // Accounts

    pub async fn get_accounts(&self, query: GetAccountsQuery) -> AppResult<Vec<models::Account>> {
        account::get_accounts(self, query).await
    }

    pub async fn create_account(&self, command: CreateAccountCommand) -> AppResult<()> {
        account::create_account(self, command).await
    }

    pub async fn update_account(&self, command: UpdateAccountCommand) -> AppResult<()> {
        account::update_account(self, command).await
    }

    pub async fn delete_account(&self, command: DeleteAccountCommand) -> AppResult<()> {
        account::delete_account(self, command).await
    }

    // Categories

    pub async fn get_categories(
        &self,
        query: GetCategoriesQuery,
    ) -> AppResult<Vec<models::Category>> {
        category::get_categories(self, query).await
    }

    pub async fn create_category(&self, command: CreateCategoryCommand) -> AppResult<()> {
        category::create_category(self, command).await
    }

    pub async fn update_category(&self, command: UpdateCategoryCommand) -> AppResult<()> {
        category::update_category(self, command).await
    }

    pub async fn delete_category(&self, command: DeleteCategoryCommand) -> AppResult<()> {
        category::delete_category(self, command).await
    }

    // Expenses

    pub async fn get_expenses(&self, query: GetExpensesQuery) -> AppResult<Vec<models::Expense>> {
        expense::get_expenses(self, query).await
    }

    pub async fn create_expense(&self, command: CreateExpenseCommand) -> AppResult<()> {
        expense::create_expense(self, command).await
    }

    pub async fn update_expense(&self, command: UpdateExpenseCommand) -> AppResult<()> {
        expense::update_expense(self, command).await
    }

    pub async fn delete_expense(&self, command: DeleteExpenseCommand) -> AppResult<()> {
        expense::delete_expense(self, command).await
    }

    // Lifecycle

    /// Wipe the store: close the handle, delete the database file, reopen a
    /// fresh handle and re-run migrations. The worker stays alive.
    pub async fn clear_data(&mut self) -> AppResult<()> {
        self.pool.close().await;
        db::remove_db_files(&self.db_path)?;

        let pool = db::open_pool(&self.db_path).await?;
        migrate::run_migrations(&pool).await?;

        self.queries = QueryRepository::new(pool.clone());
        self.commands = CommandRepository::new(pool.clone());
        self.pool = pool;

        info!(target: "pocketbook", event = "data_cleared", path = %self.db_path.display());
        Ok(())
    }

    /// Release the database handle ahead of a file-level import/export.
    /// The worker serving this core shuts down after answering.
    pub async fn disconnect(&mut self) -> AppResult<()> {
        self.pool.close().await;
        info!(target: "pocketbook", event = "core_disconnected");
        Ok(())
    }
}
