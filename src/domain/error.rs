//! Domain Error Types
//!
//! Business rule failures. These never touch storage and carry the exact
//! message shown to API callers.

use thiserror::Error;

/// A request that breaks a business rule.
///
/// Each variant renders a fixed, human-readable message. The message is part
/// of the public contract: callers match on it, so keep it stable.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Transaction type is neither `deposit` nor `withdrawal`
    #[error("error: transaction type must be either withdrawal or deposit")]
    InvalidTransactionKind,

    /// Transaction amount below zero
    #[error("error: transaction amount must be zero or greater")]
    NegativeAmount,

    /// Amount with sub-cent precision
    #[error("error: amount must have at most 2 decimal places")]
    TooManyDecimals,

    /// Amount above the per-request maximum
    #[error("error: amount must not exceed 1,000,000,000,000.00")]
    AmountTooLarge,

    /// Posting would push the balance past what an account can hold
    #[error("error: resulting balance exceeds the maximum account balance")]
    BalanceLimitExceeded,

    /// Withdrawal larger than the current balance
    #[error("error: transaction amount must be less than or equal to account's balance")]
    InsufficientFunds,

    /// Posting against an account that is not active
    #[error("error: account is not active")]
    AccountNotActive,

    /// Opening deposit below the minimum
    #[error("error: must deposit at least 5,000.00 to create new account")]
    OpeningDepositTooLow,

    /// Account type is neither `saving` nor `checking`
    #[error("error: account type must be either saving or checking")]
    InvalidAccountType,

    /// Customer status filter is neither `active` nor `inactive`
    #[error("error: status must be either active or inactive")]
    InvalidCustomerStatus,
}

impl ValidationError {
    /// Stable machine-readable code for this rule
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransactionKind => "invalid_transaction_type",
            Self::NegativeAmount => "negative_amount",
            Self::TooManyDecimals => "too_many_decimals",
            Self::AmountTooLarge => "amount_too_large",
            Self::BalanceLimitExceeded => "balance_limit_exceeded",
            Self::InsufficientFunds => "insufficient_funds",
            Self::AccountNotActive => "account_not_active",
            Self::OpeningDepositTooLow => "opening_deposit_too_low",
            Self::InvalidAccountType => "invalid_account_type",
            Self::InvalidCustomerStatus => "invalid_customer_status",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_stable() {
        assert_eq!(
            ValidationError::InvalidTransactionKind.to_string(),
            "error: transaction type must be either withdrawal or deposit"
        );
        assert_eq!(
            ValidationError::InsufficientFunds.to_string(),
            "error: transaction amount must be less than or equal to account's balance"
        );
        assert!(ValidationError::OpeningDepositTooLow
            .to_string()
            .contains("must deposit at least 5,000.00"));
    }

    #[test]
    fn test_codes_are_distinct() {
        let all = [
            ValidationError::InvalidTransactionKind,
            ValidationError::NegativeAmount,
            ValidationError::TooManyDecimals,
            ValidationError::AmountTooLarge,
            ValidationError::BalanceLimitExceeded,
            ValidationError::InsufficientFunds,
            ValidationError::AccountNotActive,
            ValidationError::OpeningDepositTooLow,
            ValidationError::InvalidAccountType,
            ValidationError::InvalidCustomerStatus,
        ];
        let mut codes: Vec<_> = all.iter().map(ValidationError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
