//! Mutation repository. Every public method performs exactly one entity
//! mutation plus one audit append inside a single transaction; either both
//! commit or neither does.

use sqlx::SqlitePool;

use crate::audits;
use crate::entities::{Account, Budget, Category, Expense, Income};
use crate::AppResult;

#[derive(Clone)]
pub struct CommandRepository {
    pool: SqlitePool,
}

impl CommandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CommandRepository { pool }
    }

    pub async fn create_budget(&self, budget: &Budget) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::create_budget(&mut tx, budget).await?;
        audits::append(&mut tx, "createBudget", budget).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_budget(&self, budget: &Budget) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::update_budget(&mut tx, budget).await?;
        audits::append(&mut tx, "updateBudget", budget).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_budget(&self, budget: &Budget) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::delete_budget(&mut tx, budget).await?;
        audits::append(&mut tx, "deleteBudget", budget).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_income(&self, income: &Income) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::create_income(&mut tx, income).await?;
        audits::append(&mut tx, "createIncome", income).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_income(&self, income: &Income) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::update_income(&mut tx, income).await?;
        audits::append(&mut tx, "updateIncome", income).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_income(&self, income: &Income) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::delete_income(&mut tx, income).await?;
        audits::append(&mut tx, "deleteIncome", income).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_account(&self, account: &Account) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::create_account(&mut tx, account).await?;
        audits::append(&mut tx, "createAccount", account).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_account(&self, account: &Account) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::update_account(&mut tx, account).await?;
        audits::append(&mut tx, "updateAccount", account).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_account(&self, account: &Account) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::delete_account(&mut tx, account).await?;
        audits::append(&mut tx, "deleteAccount", account).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_category(&self, category: &Category) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::create_category(&mut tx, category).await?;
        audits::append(&mut tx, "createCategory", category).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_category(&self, category: &Category) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::update_category(&mut tx, category).await?;
        audits::append(&mut tx, "updateCategory", category).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_category(&self, category: &Category) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::delete_category(&mut tx, category).await?;
        audits::append(&mut tx, "deleteCategory", category).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn create_expense(&self, expense: &Expense) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::create_expense(&mut tx, expense).await?;
        audits::append(&mut tx, "createExpense", expense).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn update_expense(&self, expense: &Expense) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::update_expense(&mut tx, expense).await?;
        audits::append(&mut tx, "updateExpense", expense).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_expense(&self, expense: &Expense) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;
        internal::delete_expense(&mut tx, expense).await?;
        audits::append(&mut tx, "deleteExpense", expense).await?;
        tx.commit().await?;
        Ok(())
    }
}

/// Per-entity mutations against a live transaction handle. These never
/// commit; the public repository owns the transaction boundary.
mod internal {
    use sqlx::SqliteConnection;

    use crate::entities::{Account, Budget, Category, Expense, Income};
    use crate::scripts::COMMAND_SCRIPTS;
    use crate::AppResult;

    pub async fn create_budget(conn: &mut SqliteConnection, budget: &Budget) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("create_budget")?;
        sqlx::query(sql)
            .bind(&budget.id)
            .bind(&budget.name)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update_budget(conn: &mut SqliteConnection, budget: &Budget) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("update_budget")?;
        sqlx::query(sql)
            .bind(&budget.id)
            .bind(&budget.name)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete_budget(conn: &mut SqliteConnection, budget: &Budget) -> AppResult<()> {
        // A budget takes its whole subtree with it; nothing may survive
        // scoped to a dead budget_id.
        for script in [
            "clear_budget_expenses",
            "clear_budget_incomes",
            "clear_budget_accounts",
            "clear_budget_categories",
        ] {
            let sql = COMMAND_SCRIPTS.load(script)?;
            sqlx::query(sql).bind(&budget.id).execute(&mut *conn).await?;
        }

        let sql = COMMAND_SCRIPTS.load("delete_budget")?;
        sqlx::query(sql).bind(&budget.id).execute(conn).await?;
        Ok(())
    }

    pub async fn create_income(conn: &mut SqliteConnection, income: &Income) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("create_income")?;
        sqlx::query(sql)
            .bind(&income.budget_id)
            .bind(&income.id)
            .bind(&income.name)
            .bind(income.period.kind.as_str())
            .bind(income.period.amount)
            .bind(income.amount)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update_income(conn: &mut SqliteConnection, income: &Income) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("update_income")?;
        sqlx::query(sql)
            .bind(&income.budget_id)
            .bind(&income.id)
            .bind(&income.name)
            .bind(income.period.kind.as_str())
            .bind(income.period.amount)
            .bind(income.amount)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete_income(conn: &mut SqliteConnection, income: &Income) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("delete_income")?;
        sqlx::query(sql)
            .bind(&income.budget_id)
            .bind(&income.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn create_account(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("create_account")?;
        sqlx::query(sql)
            .bind(&account.budget_id)
            .bind(&account.id)
            .bind(&account.name)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update_account(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("update_account")?;
        sqlx::query(sql)
            .bind(&account.budget_id)
            .bind(&account.id)
            .bind(&account.name)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete_account(conn: &mut SqliteConnection, account: &Account) -> AppResult<()> {
        // Storage-layer second line of defense beneath the facade guard:
        // no expense may keep referencing a deleted account.
        clear_account_expenses(conn, account).await?;

        let sql = COMMAND_SCRIPTS.load("delete_account")?;
        sqlx::query(sql)
            .bind(&account.budget_id)
            .bind(&account.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn clear_account_expenses(
        conn: &mut SqliteConnection,
        account: &Account,
    ) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("clear_account_expenses")?;
        sqlx::query(sql)
            .bind(&account.budget_id)
            .bind(&account.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn create_category(
        conn: &mut SqliteConnection,
        category: &Category,
    ) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("create_category")?;
        sqlx::query(sql)
            .bind(&category.budget_id)
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.color)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update_category(
        conn: &mut SqliteConnection,
        category: &Category,
    ) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("update_category")?;
        sqlx::query(sql)
            .bind(&category.budget_id)
            .bind(&category.id)
            .bind(&category.name)
            .bind(&category.color)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete_category(
        conn: &mut SqliteConnection,
        category: &Category,
    ) -> AppResult<()> {
        clear_category_expenses(conn, category).await?;

        let sql = COMMAND_SCRIPTS.load("delete_category")?;
        sqlx::query(sql)
            .bind(&category.budget_id)
            .bind(&category.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    async fn clear_category_expenses(
        conn: &mut SqliteConnection,
        category: &Category,
    ) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("clear_category_expenses")?;
        sqlx::query(sql)
            .bind(&category.budget_id)
            .bind(&category.id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn create_expense(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("create_expense")?;
        sqlx::query(sql)
            .bind(&expense.budget_id)
            .bind(&expense.id)
            .bind(&expense.name)
            .bind(expense.period.kind.as_str())
            .bind(expense.period.amount)
            .bind(expense.amount)
            .bind(&expense.category_id)
            .bind(&expense.account_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn update_expense(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("update_expense")?;
        sqlx::query(sql)
            .bind(&expense.budget_id)
            .bind(&expense.id)
            .bind(&expense.name)
            .bind(expense.period.kind.as_str())
            .bind(expense.period.amount)
            .bind(expense.amount)
            .bind(&expense.category_id)
            .bind(&expense.account_id)
            .execute(conn)
            .await?;
        Ok(())
    }

    pub async fn delete_expense(conn: &mut SqliteConnection, expense: &Expense) -> AppResult<()> {
        let sql = COMMAND_SCRIPTS.load("delete_expense")?;
        sqlx::query(sql)
            .bind(&expense.budget_id)
            .bind(&expense.id)
            .execute(conn)
            .await?;
        Ok(())
    }
}
