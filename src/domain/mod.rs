//! Domain module
//!
//! Core domain types and business rules.

pub mod account;
pub mod context;
pub mod customer;
pub mod error;
pub mod transaction;
pub mod validation;

pub use account::{Account, AccountId, AccountSnapshot, AccountStatus, AccountType, NewAccount};
pub use context::OperationContext;
pub use customer::{Customer, CustomerStatus};
pub use error::ValidationError;
pub use transaction::{
    NewTransaction, Transaction, TransactionId, TransactionKind, TransactionRequest,
};
pub use validation::{
    check_amount, validate_opening, validate_transaction, MAX_AMOUNT, MAX_BALANCE, MAX_SCALE,
    MIN_OPENING_DEPOSIT,
};
