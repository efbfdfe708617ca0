//! The isolated execution context. The core runs on its own OS thread with
//! a dedicated single-threaded runtime; all calls arrive over one message
//! channel and are served strictly in order against one database handle.

use std::path::PathBuf;
use std::thread::JoinHandle;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info};

use crate::core::{
    Core, CreateAccountCommand, CreateBudgetCommand, CreateCategoryCommand, CreateExpenseCommand,
    CreateIncomeCommand, DeleteAccountCommand, DeleteBudgetCommand, DeleteCategoryCommand,
    DeleteExpenseCommand, DeleteIncomeCommand, UpdateAccountCommand, UpdateBudgetCommand,
    UpdateCategoryCommand, UpdateExpenseCommand, UpdateIncomeCommand,
};
use crate::models;
use crate::queries::{
    GetAccountsQuery, GetBudgetsQuery, GetCategoriesQuery, GetExpensesQuery, GetIncomesQuery,
    TotalIncomeQuery,
};
use crate::{AppError, AppResult};

type Reply<T> = oneshot::Sender<AppResult<T>>;

/// One variant per façade operation. Only plain serializable data crosses
/// the boundary; replies travel back over per-call oneshot channels.
pub enum CoreRequest {
    GetBudgets {
        query: GetBudgetsQuery,
        reply: Reply<Vec<models::Budget>>,
    },
    CreateBudget {
        command: CreateBudgetCommand,
        reply: Reply<()>,
    },
    UpdateBudget {
        command: UpdateBudgetCommand,
        reply: Reply<()>,
    },
    DeleteBudget {
        command: DeleteBudgetCommand,
        reply: Reply<()>,
    },
    GetIncomes {
        query: GetIncomesQuery,
        reply: Reply<Vec<models::Income>>,
    },
    TotalIncome {
        query: TotalIncomeQuery,
        reply: Reply<f64>,
    },
    CreateIncome {
        command: CreateIncomeCommand,
        reply: Reply<()>,
    },
    UpdateIncome {
        command: UpdateIncomeCommand,
        reply: Reply<()>,
    },
    DeleteIncome {
        command: DeleteIncomeCommand,
        reply: Reply<()>,
    },
    GetAccounts {
        query: GetAccountsQuery,
        reply: Reply<Vec<models::Account>>,
    },
    CreateAccount {
        command: CreateAccountCommand,
        reply: Reply<()>,
    },
    UpdateAccount {
        command: UpdateAccountCommand,
        reply: Reply<()>,
    },
    DeleteAccount {
        command: DeleteAccountCommand,
        reply: Reply<()>,
    },
    GetCategories {
        query: GetCategoriesQuery,
        reply: Reply<Vec<models::Category>>,
    },
    CreateCategory {
        command: CreateCategoryCommand,
        reply: Reply<()>,
    },
    UpdateCategory {
        command: UpdateCategoryCommand,
        reply: Reply<()>,
    },
    DeleteCategory {
        command: DeleteCategoryCommand,
        reply: Reply<()>,
    },
    GetExpenses {
        query: GetExpensesQuery,
        reply: Reply<Vec<models::Expense>>,
    },
    CreateExpense {
        command: CreateExpenseCommand,
        reply: Reply<()>,
    },
    UpdateExpense {
        command: UpdateExpenseCommand,
        reply: Reply<()>,
    },
    DeleteExpense {
        command: DeleteExpenseCommand,
        reply: Reply<()>,
    },
    ClearData {
        reply: Reply<()>,
    },
    Disconnect {
        reply: Reply<()>,
    },
}

pub struct WorkerHandle {
    sender: mpsc::UnboundedSender<CoreRequest>,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn sender(&self) -> mpsc::UnboundedSender<CoreRequest> {
        self.sender.clone()
    }

    /// Close the channel and wait for the worker thread to finish. Used
    /// after a clean disconnect, when the thread is already winding down.
    pub fn shutdown(mut self) {
        drop(self.sender);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!(target: "pocketbook", event = "worker_join_panicked");
            }
        }
    }

    /// Drop the channel without joining. Used when the worker never became
    /// ready; it exits on its own once boot finishes or fails.
    pub fn abandon(mut self) {
        drop(self.sender);
        self.thread.take();
    }
}

/// Spawn the worker thread. The returned receiver resolves with the
/// readiness sentinel once boot (open + migrate + catalog warm-up) is done;
/// if boot fails the worker exits without ever signalling and the sender
/// side of the readiness channel is simply dropped.
pub fn spawn(db_path: PathBuf) -> AppResult<(WorkerHandle, oneshot::Receiver<()>)> {
    let (request_tx, request_rx) = mpsc::unbounded_channel();
    let (ready_tx, ready_rx) = oneshot::channel();

    let thread = std::thread::Builder::new()
        .name("pocketbook-core".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(target: "pocketbook", event = "worker_runtime_failed", error = %e);
                    return;
                }
            };
            runtime.block_on(serve(db_path, request_rx, ready_tx));
        })
        .map_err(|e| {
            AppError::new("WORKER/SPAWN_FAILED", "Could not spawn core worker thread")
                .with_context("error", e.to_string())
        })?;

    Ok((
        WorkerHandle {
            sender: request_tx,
            thread: Some(thread),
        },
        ready_rx,
    ))
}

async fn serve(
    db_path: PathBuf,
    mut requests: mpsc::UnboundedReceiver<CoreRequest>,
    ready: oneshot::Sender<()>,
) {
    debug!(target: "pocketbook", event = "worker_boot", path = %db_path.display());

    let mut core = match Core::open(db_path).await {
        Ok(core) => core,
        Err(e) => {
            // No readiness signal is ever sent; the proxy-side timeout is
            // the caller's backstop.
            error!(target: "pocketbook", event = "worker_boot_failed", error = %e);
            return;
        }
    };

    if ready.send(()).is_err() {
        info!(target: "pocketbook", event = "worker_abandoned_before_ready");
        return;
    }

    info!(target: "pocketbook", event = "worker_ready");

    while let Some(request) = requests.recv().await {
        let disconnect = matches!(request, CoreRequest::Disconnect { .. });
        dispatch(&mut core, request).await;
        if disconnect {
            info!(target: "pocketbook", event = "worker_stopped");
            return;
        }
    }
}

async fn dispatch(core: &mut Core, request: CoreRequest) {
    match request {
        CoreRequest::GetBudgets { query, reply } => {
            let _ = reply.send(core.get_budgets(query).await);
        }
        CoreRequest::CreateBudget { command, reply } => {
            let _ = reply.send(core.create_budget(command).await);
        }
        CoreRequest::UpdateBudget { command, reply } => {
            let _ = reply.send(core.update_budget(command).await);
        }
        CoreRequest::DeleteBudget { command, reply } => {
            let _ = reply.send(core.delete_budget(command).await);
        }
        CoreRequest::GetIncomes { query, reply } => {
            let _ = reply.send(core.get_incomes(query).await);
        }
        CoreRequest::TotalIncome { query, reply } => {
            let _ = reply.send(core.total_income(query).await);
        }
        CoreRequest::CreateIncome { command, reply } => {
            let _ = reply.send(core.create_income(command).await);
        }
        CoreRequest::UpdateIncome { command, reply } => {
            let _ = reply.send(core.update_income(command).await);
        }
        CoreRequest::DeleteIncome { command, reply } => {
            let _ = reply.send(core.delete_income(command).await);
        }
        CoreRequest::GetAccounts { query, reply } => {
            let _ = reply.send(core.get_accounts(query).await);
        }
        CoreRequest::CreateAccount { command, reply } => {
            let _ = reply.send(core.create_account(command).await);
        }
        CoreRequest::UpdateAccount { command, reply } => {
            let _ = reply.send(core.update_account(command).await);
        }
        CoreRequest::DeleteAccount { command, reply } => {
            let _ = reply.send(core.delete_account(command).await);
        }
        CoreRequest::GetCategories { query, reply } => {
            let _ = reply.send(core.get_categories(query).await);
        }
        CoreRequest::CreateCategory { command, reply } => {
            let _ = reply.send(core.create_category(command).await);
        }
        CoreRequest::UpdateCategory { command, reply } => {
            let _ = reply.send(core.update_category(command).await);
        }
        CoreRequest::DeleteCategory { command, reply } => {
            let _ = reply.send(core.delete_category(command).await);
        }
        CoreRequest::GetExpenses { query, reply } => {
            let _ = reply.send(core.get_expenses(query).await);
        }
        CoreRequest::CreateExpense { command, reply } => {
            let _ = reply.send(core.create_expense(command).await);
        }
        CoreRequest::UpdateExpense { command, reply } => {
            let _ = reply.send(core.update_expense(command).await);
        }
        CoreRequest::DeleteExpense { command, reply } => {
            let _ = reply.send(core.delete_expense(command).await);
        }
        CoreRequest::ClearData { reply } => {
            let _ = reply.send(core.clear_data().await);
        }
        CoreRequest::Disconnect { reply } => {
            let _ = reply.send(core.disconnect().await);
        }
    }
}
