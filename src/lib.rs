//! Banking Ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod store;

mod error;

pub use config::{Config, ConfigError, LogFormat};
pub use domain::{OperationContext, ValidationError};
pub use error::{AppError, AppResult, ErrorKind, ErrorResponse};
pub use store::{BankStore, MemoryStore, PgStore, StoreError, UnitOfWork};
