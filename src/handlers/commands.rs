//! Command definitions
//!
//! Commands carry caller input as received; handlers decode and validate it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountId, AccountType, TransactionId, TransactionKind};

// =========================================================================
// PostTransactionCommand
// =========================================================================

/// Command to post a deposit or withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostTransactionCommand {
    pub account_id: AccountId,
    pub amount: Decimal,
    /// Free-form kind, decoded case-insensitively
    pub transaction_type: String,
}

impl PostTransactionCommand {
    pub fn new(
        account_id: impl Into<AccountId>,
        amount: Decimal,
        transaction_type: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            amount,
            transaction_type: transaction_type.into(),
        }
    }
}

/// Result of an accepted posting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostTransactionResult {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub resulting_balance: Decimal,
}

// =========================================================================
// OpenAccountCommand
// =========================================================================

/// Command to open an account for an existing customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAccountCommand {
    pub customer_id: String,
    /// Free-form category, decoded case-insensitively
    pub account_type: String,
    pub opening_amount: Decimal,
}

impl OpenAccountCommand {
    pub fn new(
        customer_id: impl Into<String>,
        account_type: impl Into<String>,
        opening_amount: Decimal,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            account_type: account_type.into(),
            opening_amount,
        }
    }
}

/// Result of a successful account opening
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenAccountResult {
    pub account_id: AccountId,
    pub customer_id: String,
    pub account_type: AccountType,
    pub balance: Decimal,
}
