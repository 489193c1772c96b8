//! Transaction Posting Handler
//!
//! Applies a deposit or withdrawal to one account and records it in the
//! ledger. The balance read, the validation against it, the ledger insert and
//! the balance write all happen inside a single unit of work; any early exit
//! drops the unit uncommitted, which aborts every write made so far.

use std::time::Duration;

use chrono::Utc;

use crate::domain::{
    validate_transaction, AccountId, AccountStatus, NewTransaction, OperationContext,
    TransactionRequest, ValidationError,
};
use crate::error::{AppError, ErrorKind};
use crate::store::{BankStore, UnitOfWork};

use super::{PostTransactionCommand, PostTransactionResult};

/// Handler for deposits and withdrawals
#[derive(Debug, Clone)]
pub struct TransactionPoster<S> {
    store: S,
    timeout: Duration,
}

impl<S: BankStore> TransactionPoster<S> {
    /// `timeout` bounds the whole unit of work, commit included
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Decode the command, then post it.
    ///
    /// Kind and amount sign are rejected here, before any storage access.
    pub async fn execute(
        &self,
        command: PostTransactionCommand,
        context: &OperationContext,
    ) -> Result<PostTransactionResult, AppError> {
        let request = TransactionRequest::parse(&command.transaction_type, command.amount)
            .map_err(|err| {
                tracing::warn!(
                    account_id = %command.account_id,
                    transaction_type = %command.transaction_type,
                    correlation_id = ?context.correlation_id,
                    "Transaction rejected: {}",
                    err
                );
                err
            })?;

        self.post(&command.account_id, request, context).await
    }

    /// Post an already decoded request
    pub async fn post(
        &self,
        account_id: &AccountId,
        request: TransactionRequest,
        context: &OperationContext,
    ) -> Result<PostTransactionResult, AppError> {
        let outcome =
            tokio::time::timeout(self.timeout, self.post_in_unit_of_work(account_id, request))
                .await;

        match outcome {
            Ok(Ok(result)) => {
                tracing::info!(
                    account_id = %account_id,
                    transaction_id = %result.transaction_id,
                    kind = %result.kind,
                    amount = %result.amount,
                    resulting_balance = %result.resulting_balance,
                    correlation_id = ?context.correlation_id,
                    "Transaction posted"
                );
                Ok(result)
            }
            Ok(Err(err)) => {
                if err.kind() != ErrorKind::Unexpected {
                    tracing::warn!(
                        account_id = %account_id,
                        kind = %request.kind,
                        amount = %request.amount,
                        correlation_id = ?context.correlation_id,
                        "Transaction rejected: {}",
                        err
                    );
                }
                Err(err)
            }
            Err(_elapsed) => Err(AppError::storage_timeout()),
        }
    }

    async fn post_in_unit_of_work(
        &self,
        account_id: &AccountId,
        request: TransactionRequest,
    ) -> Result<PostTransactionResult, AppError> {
        let mut uow = self.store.begin().await?;

        // 1. Lock and read; an unknown account is never treated as zero balance
        let snapshot = uow
            .lock_account(account_id)
            .await?
            .ok_or_else(AppError::account_not_found)?;

        if snapshot.status != AccountStatus::Active {
            return Err(ValidationError::AccountNotActive.into());
        }

        // 2. Validate against the balance read under the lock
        validate_transaction(&request, snapshot.balance)?;

        // 3. New balance
        let resulting_balance = request.apply_to(snapshot.balance)?;

        // 4. Ledger record
        let record = NewTransaction {
            account_id: account_id.clone(),
            amount: request.amount,
            kind: request.kind,
            transaction_date: Utc::now(),
            resulting_balance,
        };
        let transaction_id = uow.append_transaction(&record).await?;

        // 5. Balance
        uow.write_balance(account_id, resulting_balance).await?;

        // 6. Both writes become visible together
        uow.commit().await?;

        Ok(PostTransactionResult {
            transaction_id,
            account_id: account_id.clone(),
            kind: request.kind,
            amount: request.amount,
            resulting_balance,
        })
    }
}
