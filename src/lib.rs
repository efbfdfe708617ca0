pub mod audits;
pub mod commands;
pub mod core;
pub mod db;
pub mod entities;
pub mod error;
pub mod file_ops;
pub mod id;
pub mod logging;
pub mod migrate;
pub mod models;
pub mod period;
pub mod proxy;
pub mod queries;
pub mod scripts;
pub mod time;
pub mod worker;

pub use crate::core::Core;
pub use error::{AppError, AppResult};
pub use proxy::{CoreProxy, CoreProxyConfig};
