//! Transaction types
//!
//! A transaction is one accepted deposit or withdrawal. Records are created
//! once, inside the same unit of work that moves the account balance, and are
//! never modified afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::AccountId;
use super::error::ValidationError;
use super::validation::{check_amount, MAX_BALANCE};

/// Ledger-assigned transaction identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

impl TransactionId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Direction of a money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    /// Case-insensitive decode; anything else is a validation failure.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("deposit") {
            Ok(Self::Deposit)
        } else if s.eq_ignore_ascii_case("withdrawal") {
            Ok(Self::Withdrawal)
        } else {
            Err(ValidationError::InvalidTransactionKind)
        }
    }
}

/// A decoded posting request: kind and non-negative amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionRequest {
    pub kind: TransactionKind,
    pub amount: Decimal,
}

impl TransactionRequest {
    pub fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Self { kind, amount }
    }

    /// Decode free-form request fields.
    ///
    /// Checks the kind first, then the amount rules, so the reported error is
    /// deterministic when both are wrong.
    pub fn parse(kind: &str, amount: Decimal) -> Result<Self, ValidationError> {
        let kind: TransactionKind = kind.parse()?;
        check_amount(amount)?;
        Ok(Self { kind, amount })
    }

    /// Balance after applying this request to `balance`.
    ///
    /// Fails if the result does not fit in an account balance.
    pub fn apply_to(&self, balance: Decimal) -> Result<Decimal, ValidationError> {
        let resulting = match self.kind {
            TransactionKind::Deposit => balance.checked_add(self.amount),
            TransactionKind::Withdrawal => balance.checked_sub(self.amount),
        };

        resulting
            .filter(|b| *b <= MAX_BALANCE)
            .ok_or(ValidationError::BalanceLimitExceeded)
    }
}

/// Ledger record about to be appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    pub account_id: AccountId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub transaction_date: DateTime<Utc>,
    pub resulting_balance: Decimal,
}

impl NewTransaction {
    pub fn with_id(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            account_id: self.account_id,
            amount: self.amount,
            kind: self.kind,
            transaction_date: self.transaction_date,
            resulting_balance: self.resulting_balance,
        }
    }
}

/// Committed ledger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub transaction_date: DateTime<Utc>,
    /// Account balance right after this transaction was applied
    pub resulting_balance: Decimal,
}
