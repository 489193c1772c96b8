//! PostgreSQL store integration tests
//!
//! Need a migrated database at `DATABASE_URL`:
//! `cargo test --test integration_store -- --ignored --test-threads=1`

use std::time::Duration;

use rust_decimal_macros::dec;

use banking_ledger::domain::{AccountId, CustomerStatus, OperationContext};
use banking_ledger::handlers::{
    AccountOpener, OpenAccountCommand, PostTransactionCommand, TransactionPoster,
};
use banking_ledger::{BankStore, ErrorKind, PgStore, UnitOfWork};

mod common;

const TIMEOUT: Duration = Duration::from_secs(5);

async fn open_account(store: &PgStore, customer_id: &str) -> AccountId {
    AccountOpener::new(store.clone(), TIMEOUT)
        .execute(
            OpenAccountCommand::new(customer_id, "saving", dec!(5000.00)),
            &OperationContext::new(),
        )
        .await
        .expect("Failed to open account")
        .account_id
}

#[tokio::test]
#[ignore]
async fn test_posting_is_atomic_and_recorded() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);
    let account_id = open_account(&store, &customer_id).await;
    let poster = TransactionPoster::new(store.clone(), TIMEOUT);

    let result = poster
        .execute(
            PostTransactionCommand::new(account_id.clone(), dec!(200.00), "withdrawal"),
            &OperationContext::new(),
        )
        .await
        .unwrap();
    assert_eq!(result.resulting_balance, dec!(4800.00));

    let account = store.find_account(&account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(4800.00));

    let ledger = store.list_transactions(&account_id).await.unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].id, result.transaction_id);
    assert_eq!(ledger[0].resulting_balance, dec!(4800.00));
}

#[tokio::test]
#[ignore]
async fn test_overdraft_leaves_no_row() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);
    let account_id = open_account(&store, &customer_id).await;
    let poster = TransactionPoster::new(store.clone(), TIMEOUT);

    let err = poster
        .execute(
            PostTransactionCommand::new(account_id.clone(), dec!(5000.01), "withdrawal"),
            &OperationContext::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let account = store.find_account(&account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(5000.00));
    assert!(store.list_transactions(&account_id).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_dropped_unit_of_work_rolls_back() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);
    let account_id = open_account(&store, &customer_id).await;

    {
        let mut uow = store.begin().await.unwrap();
        let snapshot = uow.lock_account(&account_id).await.unwrap().unwrap();
        assert_eq!(snapshot.balance, dec!(5000.00));
        uow.write_balance(&account_id, dec!(1.00)).await.unwrap();
        // dropped without commit
    }

    let account = store.find_account(&account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(5000.00));
}

#[tokio::test]
#[ignore]
async fn test_concurrent_postings_serialize_on_row_lock() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);
    let account_id = open_account(&store, &customer_id).await;
    let poster = TransactionPoster::new(store.clone(), TIMEOUT);

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let poster = poster.clone();
            let account_id = account_id.clone();
            let (amount, kind) = if i % 2 == 0 {
                (dec!(100), "deposit")
            } else {
                (dec!(50), "withdrawal")
            };
            tokio::spawn(async move {
                poster
                    .execute(
                        PostTransactionCommand::new(account_id, amount, kind),
                        &OperationContext::new(),
                    )
                    .await
            })
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    // 10 deposits of 100 and 10 withdrawals of 50
    let account = store.find_account(&account_id).await.unwrap().unwrap();
    assert_eq!(account.balance, dec!(5500.00));

    let ledger = store.list_transactions(&account_id).await.unwrap();
    assert_eq!(ledger.len(), 20);
    assert_eq!(ledger.last().unwrap().resulting_balance, dec!(5500.00));
}

#[tokio::test]
#[ignore]
async fn test_non_numeric_ids_are_not_found() {
    let (pool, _) = common::setup_test_db().await;
    let store = PgStore::new(pool);

    assert!(store
        .find_account(&AccountId::from("does-not-exist"))
        .await
        .unwrap()
        .is_none());
    assert!(store.find_customer("abc").await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn test_padded_ids_do_not_alias_accounts() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);
    let account_id = open_account(&store, &customer_id).await;

    let padded = AccountId::new(format!("00{account_id}"));
    let signed = AccountId::new(format!("+{account_id}"));

    assert!(store.find_account(&account_id).await.unwrap().is_some());
    assert!(store.find_account(&padded).await.unwrap().is_none());
    assert!(store.find_account(&signed).await.unwrap().is_none());
    assert!(store
        .find_customer(&format!("0{customer_id}"))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore]
async fn test_list_customers_by_status() {
    let (pool, customer_id) = common::setup_test_db().await;
    let store = PgStore::new(pool);

    assert_eq!(store.list_customers(None).await.unwrap().len(), 2);

    let active = store
        .list_customers(Some(CustomerStatus::Active))
        .await
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, customer_id);
}
