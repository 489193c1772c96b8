//! Command Handlers module
//!
//! Orchestrators for the two write paths: posting a transaction and opening
//! an account.

mod commands;
mod open_account_handler;
mod post_transaction_handler;


pub use commands::*;
pub use open_account_handler::AccountOpener;
pub use post_transaction_handler::TransactionPoster;
