//! Account Opening Handler
//!
//! Opens a new account for an existing customer with an opening deposit.

use std::time::Duration;

use chrono::Utc;

use crate::domain::{validate_opening, Account, AccountStatus, NewAccount, OperationContext};
use crate::error::AppError;
use crate::store::BankStore;

use super::{OpenAccountCommand, OpenAccountResult};

/// Handler for account opening
#[derive(Debug, Clone)]
pub struct AccountOpener<S> {
    store: S,
    timeout: Duration,
}

impl<S: BankStore> AccountOpener<S> {
    pub fn new(store: S, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Execute the open account command
    pub async fn execute(
        &self,
        command: OpenAccountCommand,
        context: &OperationContext,
    ) -> Result<OpenAccountResult, AppError> {
        let account_type =
            validate_opening(command.opening_amount, &command.account_type).map_err(|err| {
                tracing::warn!(
                    customer_id = %command.customer_id,
                    account_type = %command.account_type,
                    amount = %command.opening_amount,
                    correlation_id = ?context.correlation_id,
                    "Account opening rejected: {}",
                    err
                );
                err
            })?;

        let new_account = NewAccount {
            customer_id: command.customer_id,
            account_type,
            opening_balance: command.opening_amount,
            status: AccountStatus::Active,
            opening_date: Utc::now(),
        };

        let account = tokio::time::timeout(self.timeout, self.persist(&new_account))
            .await
            .map_err(|_| AppError::storage_timeout())??;

        tracing::info!(
            account_id = %account.id,
            customer_id = %account.customer_id,
            account_type = %account.account_type,
            balance = %account.balance,
            correlation_id = ?context.correlation_id,
            "Account opened"
        );

        Ok(OpenAccountResult {
            account_id: account.id,
            customer_id: account.customer_id,
            account_type: account.account_type,
            balance: account.balance,
        })
    }

    async fn persist(&self, new_account: &NewAccount) -> Result<Account, AppError> {
        if self
            .store
            .find_customer(&new_account.customer_id)
            .await?
            .is_none()
        {
            return Err(AppError::customer_not_found());
        }

        Ok(self.store.insert_account(new_account).await?)
    }
}
