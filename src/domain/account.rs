//! Account types
//!
//! The balance held here is owned by the store and only moves through the
//! posting or opening paths.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::ValidationError;

/// Store-assigned account identifier (opaque to callers)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AccountId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Account category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Saving,
    Checking,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saving => "saving",
            Self::Checking => "checking",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("saving") {
            Ok(Self::Saving)
        } else if s.eq_ignore_ascii_case("checking") {
            Ok(Self::Checking)
        } else {
            Err(ValidationError::InvalidAccountType)
        }
    }
}

/// Account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Active,
    Inactive,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Decode the stored representation; `None` for anything unknown.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }
}

/// Persisted account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: String,
    pub account_type: AccountType,
    pub balance: Decimal,
    pub status: AccountStatus,
    pub opening_date: DateTime<Utc>,
}

/// Account row about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub customer_id: String,
    pub account_type: AccountType,
    pub opening_balance: Decimal,
    pub status: AccountStatus,
    pub opening_date: DateTime<Utc>,
}

impl NewAccount {
    pub fn with_id(self, id: AccountId) -> Account {
        Account {
            id,
            customer_id: self.customer_id,
            account_type: self.account_type,
            balance: self.opening_balance,
            status: self.status,
            opening_date: self.opening_date,
        }
    }
}

/// Balance and status read under the posting lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub balance: Decimal,
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_decode() {
        assert_eq!("saving".parse(), Ok(AccountType::Saving));
        assert_eq!("CHECKING".parse(), Ok(AccountType::Checking));
        assert_eq!(
            "brokerage".parse::<AccountType>(),
            Err(ValidationError::InvalidAccountType)
        );
    }

    #[test]
    fn test_status_from_stored() {
        assert_eq!(AccountStatus::from_stored("active"), Some(AccountStatus::Active));
        assert_eq!(AccountStatus::from_stored("inactive"), Some(AccountStatus::Inactive));
        assert_eq!(AccountStatus::from_stored("ACTIVE"), None);
    }

    #[test]
    fn test_account_id_is_opaque_string() {
        let id = AccountId::from("95471");
        assert_eq!(id.as_str(), "95471");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"95471\"");
    }
}
