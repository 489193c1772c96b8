//! Store module
//!
//! Storage ports used by the handlers, with a PostgreSQL adapter and an
//! in-memory adapter for tests.
//!
//! A posting runs inside one [`UnitOfWork`]: the account row is locked and
//! read, the ledger record appended and the balance written, then the whole
//! unit is committed. Dropping a unit of work without committing aborts it,
//! so every early return (validation failure, storage error, timeout,
//! cancelled request) leaves no partial write.

mod error;
mod memory;
mod postgres;

use std::future::Future;

use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, AccountSnapshot, Customer, CustomerStatus, NewAccount, NewTransaction,
    Transaction, TransactionId,
};

pub use error::StoreError;
pub use memory::{MemoryStore, MemoryUnitOfWork};
pub use postgres::{PgStore, PgUnitOfWork};

/// Balance, ledger and customer storage
pub trait BankStore: Clone + Send + Sync + 'static {
    type UnitOfWork: UnitOfWork;

    /// Open a unit of work for one posting
    fn begin(&self) -> impl Future<Output = Result<Self::UnitOfWork, StoreError>> + Send;

    /// Atomically insert a new account and return it with its generated ID
    fn insert_account(
        &self,
        account: &NewAccount,
    ) -> impl Future<Output = Result<Account, StoreError>> + Send;

    fn find_customer(
        &self,
        customer_id: &str,
    ) -> impl Future<Output = Result<Option<Customer>, StoreError>> + Send;

    fn list_customers(
        &self,
        status: Option<CustomerStatus>,
    ) -> impl Future<Output = Result<Vec<Customer>, StoreError>> + Send;

    /// Committed account state, read without taking the posting lock
    fn find_account(
        &self,
        account_id: &AccountId,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send;

    /// Committed ledger records for one account, oldest first
    fn list_transactions(
        &self,
        account_id: &AccountId,
    ) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;
}

/// One atomic read-modify-write against balance and ledger storage
pub trait UnitOfWork: Send {
    /// Lock the account for the rest of this unit of work and read its
    /// balance and status. `None` if the account does not exist.
    fn lock_account(
        &mut self,
        account_id: &AccountId,
    ) -> impl Future<Output = Result<Option<AccountSnapshot>, StoreError>> + Send;

    /// Append a ledger record and return its assigned ID
    fn append_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> impl Future<Output = Result<TransactionId, StoreError>> + Send;

    /// Overwrite the locked account's balance
    fn write_balance(
        &mut self,
        account_id: &AccountId,
        balance: Decimal,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Make every write of this unit durable, or none of them
    fn commit(self) -> impl Future<Output = Result<(), StoreError>> + Send;
}
