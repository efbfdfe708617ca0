//! UI-side proxy over the core worker: one typed async method per façade
//! operation, multiplexed over a single channel to at most one worker at a
//! time. The worker is spawned lazily on first use and discarded whenever
//! the channel fails, so the next call gets a clean respawn.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{error, info};

use crate::core::{
    CreateAccountCommand, CreateBudgetCommand, CreateCategoryCommand, CreateExpenseCommand,
    CreateIncomeCommand, DeleteAccountCommand, DeleteBudgetCommand, DeleteCategoryCommand,
    DeleteExpenseCommand, DeleteIncomeCommand, UpdateAccountCommand, UpdateBudgetCommand,
    UpdateCategoryCommand, UpdateExpenseCommand, UpdateIncomeCommand,
};
use crate::models;
use crate::queries::{
    GetAccountsQuery, GetBudgetsQuery, GetCategoriesQuery, GetExpensesQuery, GetIncomesQuery,
    TotalIncomeQuery,
};
use crate::worker::{self, CoreRequest, WorkerHandle};
use crate::{AppError, AppResult};

const DEFAULT_SPAWN_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Debug, Clone)]
pub struct CoreProxyConfig {
    pub db_path: PathBuf,
    pub spawn_timeout: Duration,
}

impl CoreProxyConfig {
    pub fn new(db_path: PathBuf) -> Self {
        CoreProxyConfig {
            db_path,
            spawn_timeout: DEFAULT_SPAWN_TIMEOUT,
        }
    }
}

pub struct CoreProxy {
    config: CoreProxyConfig,
    worker: Mutex<Option<WorkerHandle>>,
}

impl CoreProxy {
    pub fn new(config: CoreProxyConfig) -> Self {
        CoreProxy {
            config,
            worker: Mutex::new(None),
        }
    }

    /// Return a sender to the live worker, spawning one if absent. Waits
    /// for the readiness sentinel under the configured timeout.
    async fn acquire(&self) -> AppResult<mpsc::UnboundedSender<CoreRequest>> {
        let mut guard = self.worker.lock().await;

        if let Some(handle) = guard.as_ref() {
            return Ok(handle.sender());
        }

        let (handle, ready) = worker::spawn(self.config.db_path.clone())?;

        match tokio::time::timeout(self.config.spawn_timeout, ready).await {
            Ok(Ok(())) => {
                let sender = handle.sender();
                *guard = Some(handle);
                Ok(sender)
            }
            Ok(Err(_)) => {
                // Worker exited during boot without signalling readiness.
                handle.shutdown();
                Err(AppError::worker_gone())
            }
            Err(_) => {
                handle.abandon();
                Err(AppError::worker_spawn_timeout(
                    self.config.spawn_timeout.as_millis(),
                ))
            }
        }
    }

    /// Discard the cached worker so the next call spawns a fresh one.
    pub async fn invalidate(&self) {
        if let Some(handle) = self.worker.lock().await.take() {
            handle.shutdown();
        }
    }

    async fn call<T>(
        &self,
        make_request: impl FnOnce(oneshot::Sender<AppResult<T>>) -> CoreRequest,
    ) -> AppResult<T> {
        let sender = self.acquire().await?;
        let (reply_tx, reply_rx) = oneshot::channel();

        if sender.send(make_request(reply_tx)).is_err() {
            error!(target: "pocketbook", event = "proxy_send_failed");
            self.invalidate().await;
            return Err(AppError::worker_gone());
        }

        match reply_rx.await {
            Ok(result) => result,
            Err(_) => {
                error!(target: "pocketbook", event = "proxy_reply_dropped");
                self.invalidate().await;
                Err(AppError::worker_gone())
            }
        }
    }

    // Budgets

    pub async fn get_budgets(&self, query: GetBudgetsQuery) -> AppResult<Vec<models::Budget>> {
        self.call(|reply| CoreRequest::GetBudgets { query, reply })
            .await
    }

    pub async fn create_budget(&self, command: CreateBudgetCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::CreateBudget { command, reply })
            .await
    }

    pub async fn update_budget(&self, command: UpdateBudgetCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::UpdateBudget { command, reply })
            .await
    }

    pub async fn delete_budget(&self, command: DeleteBudgetCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::DeleteBudget { command, reply })
            .await
    }

    // Incomes

    pub async fn get_incomes(&self, query: GetIncomesQuery) -> AppResult<Vec<models::Income>> {
        self.call(|reply| CoreRequest::GetIncomes { query, reply })
            .await
    }

    pub async fn total_income(&self, query: TotalIncomeQuery) -> AppResult<f64> {
        self.call(|reply| CoreRequest::TotalIncome { query, reply })
            .await
    }

    pub async fn create_income(&self, command: CreateIncomeCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::CreateIncome { command, reply })
            .await
    }

    pub async fn update_income(&self, command: UpdateIncomeCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::UpdateIncome { command, reply })
            .await
    }

    pub async fn delete_income(&self, command: DeleteIncomeCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::DeleteIncome { command, reply })
            .await
    }

    // Accounts

    pub async fn get_accounts(&self, query: GetAccountsQuery) -> AppResult<Vec<models::Account>> {
        self.call(|reply| CoreRequest::GetAccounts { query, reply })
            .await
    }

    pub async fn create_account(&self, command: CreateAccountCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::CreateAccount { command, reply })
            .await
    }

    pub async fn update_account(&self, command: UpdateAccountCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::UpdateAccount { command, reply })
            .await
    }

    pub async fn delete_account(&self, command: DeleteAccountCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::DeleteAccount { command, reply })
            .await
    }

    // Categories

    pub async fn get_categories(
        &self,
        query: GetCategoriesQuery,
    ) -> AppResult<Vec<models::Category>> {
        self.call(|reply| CoreRequest::GetCategories { query, reply })
            .await
    }

    pub async fn create_category(&self, command: CreateCategoryCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::CreateCategory { command, reply })
            .await
    }

    pub async fn update_category(&self, command: UpdateCategoryCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::UpdateCategory { command, reply })
            .await
    }

    pub async fn delete_category(&self, command: DeleteCategoryCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::DeleteCategory { command, reply })
            .await
    }

    // Expenses

    pub async fn get_expenses(&self, query: GetExpensesQuery) -> AppResult<Vec<models::Expense>> {
        self.call(|reply| CoreRequest::GetExpenses { query, reply })
            .await
    }

    pub async fn create_expense(&self, command: CreateExpenseCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::CreateExpense { command, reply })
            .await
    }

    pub async fn update_expense(&self, command: UpdateExpenseCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::UpdateExpense { command, reply })
            .await
    }

    pub async fn delete_expense(&self, command: DeleteExpenseCommand) -> AppResult<()> {
        self.call(|reply| CoreRequest::DeleteExpense { command, reply })
            .await
    }

    // Lifecycle

    pub async fn clear_data(&self) -> AppResult<()> {
        self.call(|reply| CoreRequest::ClearData { reply }).await
    }

    /// Forward the disconnect, then always tear the worker down so the
    /// database file is free for import/export regardless of the outcome.
    pub async fn disconnect(&self) -> AppResult<()> {
        let result = self.call(|reply| CoreRequest::Disconnect { reply }).await;
        self.invalidate().await;
        info!(target: "pocketbook", event = "proxy_disconnected");
        result
    }
}
