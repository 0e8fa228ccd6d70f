//! Account model
//!
//! The account record: `id` is the storage row locator used in URL paths,
//! `number` is the separately-assigned authorization subject embedded in
//! access tokens. The two are never assumed equal.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Account numbers are drawn from this half-open range at creation.
const ACCOUNT_NUMBER_RANGE: std::ops::Range<i64> = 0..1_000_000;

/// A bank account. Immutable after creation except for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Storage row id, assigned by the store
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Account number, assigned at creation. Authorization subject.
    pub number: i64,

    /// Balance in minor units. Stays zero while transfers are accepted
    /// but not executed.
    pub balance: i64,

    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a new account with a randomly assigned account number.
    /// The id is left at 0 until the store assigns one.
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            id: 0,
            first_name,
            last_name,
            number: rand::thread_rng().gen_range(ACCOUNT_NUMBER_RANGE),
            balance: 0,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new("Alice".to_string(), "Smith".to_string());

        assert_eq!(account.id, 0);
        assert_eq!(account.balance, 0);
        assert!(ACCOUNT_NUMBER_RANGE.contains(&account.number));
    }

    #[test]
    fn test_account_serializes_camel_case() {
        let account = Account::new("Alice".to_string(), "Smith".to_string());

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["firstName"], "Alice");
        assert_eq!(json["lastName"], "Smith");
        assert!(json["number"].is_i64());
        assert!(json["createdAt"].is_string());
    }
}
