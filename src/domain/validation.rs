//! Business rule checks
//!
//! Pure functions: no I/O, no clock. Rules run in a fixed order and the first
//! failure is the one reported.

use rust_decimal::Decimal;

use super::account::AccountType;
use super::error::ValidationError;
use super::transaction::{TransactionKind, TransactionRequest};

/// Minimum opening deposit (5,000.00)
pub const MIN_OPENING_DEPOSIT: Decimal = Decimal::from_parts(500_000, 0, 0, false, 2);

/// Maximum amount for a single posting or opening deposit (1,000,000,000,000)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Largest balance a `NUMERIC(20, 2)` column holds (999,999,999,999,999,999.99)
pub const MAX_BALANCE: Decimal =
    Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

/// Money is stored in cents
pub const MAX_SCALE: u32 = 2;

/// Check a caller-supplied amount: sign, then precision, then magnitude.
///
/// Trailing zeros do not count towards the scale, so `200.000` is accepted.
pub fn check_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount);
    }

    if amount.normalize().scale() > MAX_SCALE {
        return Err(ValidationError::TooManyDecimals);
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }

    Ok(())
}

/// Check a posting request against the balance read in the same unit of work.
///
/// Order: amount rules (see [`check_amount`]), then (withdrawals only)
/// sufficiency. The kind rule has already run when the request was decoded.
pub fn validate_transaction(
    request: &TransactionRequest,
    current_balance: Decimal,
) -> Result<(), ValidationError> {
    check_amount(request.amount)?;

    if request.kind == TransactionKind::Withdrawal && request.amount > current_balance {
        return Err(ValidationError::InsufficientFunds);
    }

    Ok(())
}

/// Check an account opening request: deposit floor first, then the other
/// amount rules, then account type.
pub fn validate_opening(
    opening_amount: Decimal,
    account_type: &str,
) -> Result<AccountType, ValidationError> {
    if opening_amount < MIN_OPENING_DEPOSIT {
        return Err(ValidationError::OpeningDepositTooLow);
    }
    check_amount(opening_amount)?;

    account_type.parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn withdrawal(amount: Decimal) -> TransactionRequest {
        TransactionRequest::new(TransactionKind::Withdrawal, amount)
    }

    fn deposit(amount: Decimal) -> TransactionRequest {
        TransactionRequest::new(TransactionKind::Deposit, amount)
    }

    #[test]
    fn test_min_opening_deposit_constant() {
        assert_eq!(MIN_OPENING_DEPOSIT, dec!(5000.00));
    }

    #[test]
    fn test_withdrawal_within_balance() {
        assert!(validate_transaction(&withdrawal(dec!(200)), dec!(1000)).is_ok());
    }

    #[test]
    fn test_withdrawal_of_entire_balance() {
        assert!(validate_transaction(&withdrawal(dec!(1000)), dec!(1000)).is_ok());
    }

    #[test]
    fn test_withdrawal_exceeding_balance() {
        assert_eq!(
            validate_transaction(&withdrawal(dec!(2000)), dec!(1000)),
            Err(ValidationError::InsufficientFunds)
        );
    }

    #[test]
    fn test_deposit_ignores_balance() {
        assert!(validate_transaction(&deposit(dec!(10000)), Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_negative_amount_reported_before_sufficiency() {
        assert_eq!(
            validate_transaction(&withdrawal(dec!(-1)), dec!(-5)),
            Err(ValidationError::NegativeAmount)
        );
        assert_eq!(
            validate_transaction(&deposit(dec!(-1)), dec!(1000)),
            Err(ValidationError::NegativeAmount)
        );
    }

    #[test]
    fn test_opening_meets_minimum() {
        assert_eq!(validate_opening(dec!(5000.00), "saving"), Ok(AccountType::Saving));
        assert_eq!(validate_opening(dec!(12000), "Checking"), Ok(AccountType::Checking));
    }

    #[test]
    fn test_opening_below_minimum() {
        assert_eq!(
            validate_opening(dec!(100.00), "saving"),
            Err(ValidationError::OpeningDepositTooLow)
        );
        assert_eq!(
            validate_opening(dec!(4999.99), "checking"),
            Err(ValidationError::OpeningDepositTooLow)
        );
    }

    #[test]
    fn test_limit_constants() {
        assert_eq!(MAX_AMOUNT, dec!(1000000000000));
        assert_eq!(MAX_BALANCE, dec!(999999999999999999.99));
        assert!(MAX_AMOUNT < MAX_BALANCE);
    }

    #[test]
    fn test_check_amount_precision() {
        assert_eq!(check_amount(dec!(0.01)), Ok(()));
        assert_eq!(check_amount(dec!(200.000)), Ok(()));
        assert_eq!(check_amount(dec!(0.005)), Err(ValidationError::TooManyDecimals));
        assert_eq!(check_amount(dec!(1.001)), Err(ValidationError::TooManyDecimals));
    }

    #[test]
    fn test_check_amount_magnitude() {
        assert_eq!(check_amount(MAX_AMOUNT), Ok(()));
        assert_eq!(
            check_amount(MAX_AMOUNT + dec!(0.01)),
            Err(ValidationError::AmountTooLarge)
        );
        assert_eq!(check_amount(Decimal::MAX), Err(ValidationError::AmountTooLarge));
    }

    #[test]
    fn test_check_amount_rule_order() {
        // sign before precision, precision before magnitude
        assert_eq!(check_amount(dec!(-0.001)), Err(ValidationError::NegativeAmount));
        assert_eq!(
            check_amount(dec!(2000000000000.001)),
            Err(ValidationError::TooManyDecimals)
        );
    }

    #[test]
    fn test_sub_cent_withdrawal_rejected_before_sufficiency() {
        assert_eq!(
            validate_transaction(&withdrawal(dec!(0.005)), dec!(1000.00)),
            Err(ValidationError::TooManyDecimals)
        );
    }

    #[test]
    fn test_opening_amount_precision_and_limit() {
        assert_eq!(
            validate_opening(dec!(5000.001), "saving"),
            Err(ValidationError::TooManyDecimals)
        );
        assert_eq!(
            validate_opening(dec!(1000000000000.01), "saving"),
            Err(ValidationError::AmountTooLarge)
        );
        assert_eq!(validate_opening(MAX_AMOUNT, "saving"), Ok(AccountType::Saving));
    }

    #[test]
    fn test_opening_floor_checked_before_type() {
        assert_eq!(
            validate_opening(dec!(1), "brokerage"),
            Err(ValidationError::OpeningDepositTooLow)
        );
        assert_eq!(
            validate_opening(dec!(5000), "brokerage"),
            Err(ValidationError::InvalidAccountType)
        );
    }
}
