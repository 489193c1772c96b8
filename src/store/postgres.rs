//! PostgreSQL store
//!
//! A unit of work is one database transaction. The account row is taken with
//! `SELECT ... FOR UPDATE`, so concurrent postings on the same account queue
//! behind the row lock and each one re-reads the balance committed by the
//! previous one. Dropping the transaction without committing rolls it back.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres};

use crate::domain::{
    Account, AccountId, AccountSnapshot, AccountStatus, AccountType, Customer, CustomerStatus,
    NewAccount, NewTransaction, Transaction, TransactionId, TransactionKind,
};

use super::error::database;
use super::{BankStore, StoreError, UnitOfWork};

type CustomerRow = (i64, String, String, String, NaiveDate, i16);
type TransactionRow = (i64, Decimal, String, DateTime<Utc>, Decimal);

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Keys are BIGSERIAL columns; anything that is not an integer cannot exist.
///
/// Only the canonical form is accepted, so `"007"` and `"+7"` do not alias 7.
fn parse_key(value: &str) -> Option<i64> {
    value
        .parse::<i64>()
        .ok()
        .filter(|key| key.to_string() == value)
}

fn customer_from_row((id, name, city, zipcode, date_of_birth, status): CustomerRow) -> Customer {
    Customer {
        id: id.to_string(),
        name,
        city,
        zipcode,
        date_of_birth,
        status: CustomerStatus::from_flag(status),
    }
}

fn transaction_from_row(
    account_id: &AccountId,
    (id, amount, kind, transaction_date, resulting_balance): TransactionRow,
) -> Result<Transaction, StoreError> {
    let kind: TransactionKind = kind.parse().map_err(|_| StoreError::InvalidData {
        operation: "querying transactions",
        detail: format!("unknown transaction type {kind:?}"),
    })?;

    Ok(Transaction {
        id: TransactionId::new(id),
        account_id: account_id.clone(),
        amount,
        kind,
        transaction_date,
        resulting_balance,
    })
}

impl BankStore for PgStore {
    type UnitOfWork = PgUnitOfWork;

    async fn begin(&self) -> Result<PgUnitOfWork, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(database("beginning the database transaction"))?;

        Ok(PgUnitOfWork { tx })
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, StoreError> {
        const OPERATION: &str = "inserting the account";

        let customer_id = parse_key(&account.customer_id).ok_or_else(|| StoreError::Constraint {
            operation: OPERATION,
            detail: format!("customer id {} is not a valid key", account.customer_id),
        })?;

        // Single statement: the row exists with its opening balance, or not at all
        let account_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO accounts (customer_id, opening_date, account_type, balance, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING account_id
            "#,
        )
        .bind(customer_id)
        .bind(account.opening_date)
        .bind(account.account_type.as_str())
        .bind(account.opening_balance)
        .bind(account.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(database(OPERATION))?;

        tracing::debug!(account_id, customer_id, "Account row inserted");

        Ok(account.clone().with_id(AccountId::new(account_id.to_string())))
    }

    async fn find_customer(&self, customer_id: &str) -> Result<Option<Customer>, StoreError> {
        let Some(customer_id) = parse_key(customer_id) else {
            return Ok(None);
        };

        let row: Option<CustomerRow> = sqlx::query_as(
            r#"
            SELECT customer_id, name, city, zipcode, date_of_birth, status
            FROM customers
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database("querying the customer"))?;

        Ok(row.map(customer_from_row))
    }

    async fn list_customers(
        &self,
        status: Option<CustomerStatus>,
    ) -> Result<Vec<Customer>, StoreError> {
        let rows: Vec<CustomerRow> = sqlx::query_as(
            r#"
            SELECT customer_id, name, city, zipcode, date_of_birth, status
            FROM customers
            WHERE $1::SMALLINT IS NULL OR status = $1
            ORDER BY customer_id
            "#,
        )
        .bind(status.map(|s| s.as_flag()))
        .fetch_all(&self.pool)
        .await
        .map_err(database("querying customers"))?;

        Ok(rows.into_iter().map(customer_from_row).collect())
    }

    async fn find_account(&self, account_id: &AccountId) -> Result<Option<Account>, StoreError> {
        const OPERATION: &str = "reading the account";

        let Some(key) = parse_key(account_id.as_str()) else {
            return Ok(None);
        };

        let row: Option<(i64, DateTime<Utc>, String, Decimal, String)> = sqlx::query_as(
            r#"
            SELECT customer_id, opening_date, account_type, balance, status
            FROM accounts
            WHERE account_id = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(database(OPERATION))?;

        let Some((customer_id, opening_date, account_type, balance, status)) = row else {
            return Ok(None);
        };

        let account_type: AccountType =
            account_type.parse().map_err(|_| StoreError::InvalidData {
                operation: OPERATION,
                detail: format!("unknown account type {account_type:?}"),
            })?;
        let status = AccountStatus::from_stored(&status).ok_or_else(|| StoreError::InvalidData {
            operation: OPERATION,
            detail: format!("unknown account status {status:?}"),
        })?;

        Ok(Some(Account {
            id: account_id.clone(),
            customer_id: customer_id.to_string(),
            account_type,
            balance,
            status,
            opening_date,
        }))
    }

    async fn list_transactions(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Transaction>, StoreError> {
        let Some(key) = parse_key(account_id.as_str()) else {
            return Ok(Vec::new());
        };

        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT transaction_id, amount, transaction_type, transaction_date, resulting_balance
            FROM transactions
            WHERE account_id = $1
            ORDER BY transaction_id ASC
            "#,
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(database("querying transactions"))?;

        rows.into_iter()
            .map(|row| transaction_from_row(account_id, row))
            .collect()
    }
}

/// Unit of work holding an open database transaction
#[derive(Debug)]
pub struct PgUnitOfWork {
    tx: sqlx::Transaction<'static, Postgres>,
}

impl UnitOfWork for PgUnitOfWork {
    async fn lock_account(
        &mut self,
        account_id: &AccountId,
    ) -> Result<Option<AccountSnapshot>, StoreError> {
        const OPERATION: &str = "reading the account balance";

        let Some(key) = parse_key(account_id.as_str()) else {
            return Ok(None);
        };

        let row: Option<(Decimal, String)> = sqlx::query_as(
            r#"
            SELECT balance, status FROM accounts
            WHERE account_id = $1
            FOR UPDATE
            "#,
        )
        .bind(key)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(database(OPERATION))?;

        row.map(|(balance, status)| -> Result<AccountSnapshot, StoreError> {
            let status =
                AccountStatus::from_stored(&status).ok_or_else(|| StoreError::InvalidData {
                    operation: OPERATION,
                    detail: format!("unknown account status {status:?}"),
                })?;
            Ok(AccountSnapshot { balance, status })
        })
        .transpose()
    }

    async fn append_transaction(
        &mut self,
        transaction: &NewTransaction,
    ) -> Result<TransactionId, StoreError> {
        const OPERATION: &str = "inserting the transaction";

        let account_key =
            parse_key(transaction.account_id.as_str()).ok_or_else(|| StoreError::InvalidData {
                operation: OPERATION,
                detail: format!("account id {} is not a valid key", transaction.account_id),
            })?;

        let transaction_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transactions (
                account_id, amount, transaction_type, transaction_date, resulting_balance
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING transaction_id
            "#,
        )
        .bind(account_key)
        .bind(transaction.amount)
        .bind(transaction.kind.as_str())
        .bind(transaction.transaction_date)
        .bind(transaction.resulting_balance)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(database(OPERATION))?;

        Ok(TransactionId::new(transaction_id))
    }

    async fn write_balance(
        &mut self,
        account_id: &AccountId,
        balance: Decimal,
    ) -> Result<(), StoreError> {
        const OPERATION: &str = "updating the account balance";

        let key = parse_key(account_id.as_str()).ok_or_else(|| StoreError::InvalidData {
            operation: OPERATION,
            detail: format!("account id {account_id} is not a valid key"),
        })?;

        let rows_affected = sqlx::query("UPDATE accounts SET balance = $1 WHERE account_id = $2")
            .bind(balance)
            .bind(key)
            .execute(&mut *self.tx)
            .await
            .map_err(database(OPERATION))?
            .rows_affected();

        if rows_affected != 1 {
            return Err(StoreError::Constraint {
                operation: OPERATION,
                detail: format!("expected one account row, updated {rows_affected}"),
            });
        }

        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(database("committing the transaction"))
    }
}
