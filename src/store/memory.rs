//! In-memory store
//!
//! Test double for [`PgStore`](super::PgStore). A unit of work owns the state
//! mutex for its whole lifetime, so units of work run one at a time, and
//! writes are staged until `commit`. Faults can be injected to exercise the
//! abort paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{
    Account, AccountId, AccountSnapshot, AccountStatus, AccountType, Customer, CustomerStatus,
    NewAccount, NewTransaction, Transaction, TransactionId,
};

use super::{BankStore, StoreError, UnitOfWork};

#[derive(Debug, Default)]
struct MemoryState {
    /// Keyed numerically so listing order matches the database
    customers: BTreeMap<u64, Customer>,
    accounts: BTreeMap<AccountId, Account>,
    transactions: Vec<Transaction>,
    next_customer_id: u64,
    next_account_id: u64,
    next_transaction_id: i64,
}

#[derive(Debug, Default)]
struct Faults {
    fail_next_append: AtomicBool,
    fail_next_commit: AtomicBool,
    latency_ms: AtomicU64,
    begins: AtomicUsize,
}

/// Canonical decimal form only, so `"007"` is not customer 7
fn customer_key(customer_id: &str) -> Option<u64> {
    customer_id
        .parse::<u64>()
        .ok()
        .filter(|key| key.to_string() == customer_id)
}

/// Store holding everything in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    faults: Arc<Faults>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a customer directly and return its ID
    pub async fn seed_customer(&self, name: &str, city: &str, status: CustomerStatus) -> String {
        let mut state = self.state.lock().await;
        state.next_customer_id += 1;
        let key = state.next_customer_id;
        let id = key.to_string();

        state.customers.insert(
            key,
            Customer {
                id: id.clone(),
                name: name.to_string(),
                city: city.to_string(),
                zipcode: "00000".to_string(),
                date_of_birth: Utc::now().date_naive(),
                status,
            },
        );

        id
    }

    /// Insert an account with an arbitrary balance and status, bypassing the
    /// opening rules
    pub async fn seed_account(
        &self,
        customer_id: &str,
        account_type: AccountType,
        balance: Decimal,
        status: AccountStatus,
    ) -> AccountId {
        let mut state = self.state.lock().await;
        state.next_account_id += 1;
        let id = AccountId::new(state.next_account_id.to_string());

        state.accounts.insert(
            id.clone(),
            Account {
                id: id.clone(),
                customer_id: customer_id.to_string(),
                account_type,
                balance,
                status,
                opening_date: Utc::now(),
            },
        );

        id
    }

    /// Number of units of work opened so far
    pub fn begin_count(&self) -> usize {
        self.faults.begins.load(Ordering::SeqCst)
    }

    /// Number of committed ledger records across all accounts
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }

    /// Make the next ledger append fail
    pub fn fail_next_append(&self) {
        self.faults.fail_next_append.store(true, Ordering::SeqCst);
    }

    /// Make the next commit fail after all writes were staged
    pub fn fail_next_commit(&self) {
        self.faults.fail_next_commit.store(true, Ordering::SeqCst);
    }

    /// Delay every balance read inside a unit of work
    pub fn set_latency(&self, latency: Duration) {
        let millis = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.faults.latency_ms.store(millis, Ordering::SeqCst);
    }
}

impl BankStore for MemoryStore {
    type UnitOfWork = MemoryUnitOfWork;

    async fn begin(&self) -> Result<MemoryUnitOfWork, StoreError> {
        self.faults.begins.fetch_add(1, Ordering::SeqCst);
        let state = Arc::clone(&self.state).lock_owned().await;

        Ok(MemoryUnitOfWork {
            state,
            faults: Arc::clone(&self.faults),
            balances: Vec::new(),
            transactions: Vec::new(),
        })
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        let mut state = self.state.lock().await;

        let known = customer_key(&account.customer_id)
            .is_some_and(|key| state.customers.contains_key(&key));
        if !known {
            return Err(StoreError::Constraint {
                operation: "inserting the account",
                detail: format!("customer {} does not exist", account.customer_id),
            });
        }

        state.next_account_id += 1;
        let id = AccountId::new(state.next_account_id.to_string());
        let created = account.clone().with_id(id.clone());
        state.accounts.insert(id, created.clone());

        Ok(created)
    }

    async fn find_customer(&self, customer_id: &str) -> Result<Option<Customer>, StoreError> {
        let Some(key) = customer_key(customer_id) else {
            return Ok(None);
        };
        Ok(self.state.lock().await.customers.get(&key).cloned())
    }

    async fn list_customers(
        &self,
        status: Option<CustomerStatus>,
    ) -> Result<Vec<Customer>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .customers
            .values()
            .filter(|c| status.map_or(true, |s| c.status == s))
            .cloned()
            .collect())
    }

    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.state.lock().await.accounts.get(account_id).cloned())
    }

    async fn list_transactions(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .transactions
            .iter()
            .filter(|t| &t.account_id == account_id)
            .cloned()
            .collect())
    }
}

/// Unit of work holding the store lock with staged writes
#[derive(Debug)]
pub struct MemoryUnitOfWork {
    state: OwnedMutexGuard<MemoryState>,
    faults: Arc<Faults>,
    balances: Vec<(AccountId, Decimal)>,
    transactions: Vec<Transaction>,
}

impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_account(
        &mut self,
        account_id: &AccountId,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        let latency = self.faults.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }

        let Some(account) = self.state.accounts.get(account_id) else {
            return Ok(None);
        };

        let balance = self
            .balances
            .iter()
            .rev()
            .find(|(id, _)| id == account_id)
            .map_or(account.balance, |(_, balance)| *balance);

        Ok(Some(AccountSnapshot {
            balance,
            status: account.status,
        }))
    }

    async fn append_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<TransactionId, StoreError> {
        if self.faults.fail_next_append.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation: "inserting the transaction",
            });
        }

        // IDs are consumed even if this unit is later aborted
        self.state.next_transaction_id += 1;
        let id = TransactionId::new(self.state.next_transaction_id);
        self.transactions.push(transaction.clone().with_id(id));

        Ok(id)
    }

    async fn write_balance(
        &mut self,
        account_id: &AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        if !self.state.accounts.contains_key(account_id) {
            return Err(StoreError::Constraint {
                operation: "updating the account balance",
                detail: format!("account {account_id} does not exist"),
            });
        }

        self.balances.push((account_id.clone(), balance));
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let Self {
            mut state,
            faults,
            balances,
            transactions,
        } = self;

        if faults.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                operation: "committing the transaction",
            });
        }

        for (account_id, balance) in balances {
            if let Some(account) = state.accounts.get_mut(&account_id) {
                account.balance = balance;
            }
        }
        state.transactions.extend(transactions);

        Ok(())
    }
}
