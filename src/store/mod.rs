//! Account storage module
//!
//! The store is the only collaborator the access-policy guard suspends on.
//! It is kept behind a trait so the router can run against Postgres in
//! production and an in-memory store in tests.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::Account;

pub use memory::MemoryAccountStore;
pub use postgres::PostgresAccountStore;

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Account persistence operations.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account, returning it with its assigned row id.
    async fn create_account(&self, account: Account) -> Result<Account, StoreError>;

    /// List all accounts, ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Fetch an account by row id.
    async fn get_account(&self, id: i64) -> Result<Option<Account>, StoreError>;

    /// Delete an account by row id. Returns false if no row existed.
    async fn delete_account(&self, id: i64) -> Result<bool, StoreError>;
}
