//! Customer read model
//!
//! Customers are created outside this service; accounts reference them.

use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

use super::error::ValidationError;

/// Customer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl CustomerStatus {
    /// Stored flag: 1 = active, 0 = inactive
    pub fn as_flag(&self) -> i16 {
        match self {
            Self::Active => 1,
            Self::Inactive => 0,
        }
    }

    pub fn from_flag(flag: i16) -> Self {
        if flag == 0 {
            Self::Inactive
        } else {
            Self::Active
        }
    }
}

impl FromStr for CustomerStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("active") {
            Ok(Self::Active)
        } else if s.eq_ignore_ascii_case("inactive") {
            Ok(Self::Inactive)
        } else {
            Err(ValidationError::InvalidCustomerStatus)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    #[serde(rename = "customer_id")]
    pub id: String,
    #[serde(rename = "full_name")]
    pub name: String,
    pub city: String,
    pub zipcode: String,
    pub date_of_birth: NaiveDate,
    pub status: CustomerStatus,
}
