//! In-memory account store.
//!
//! Thread-safe map keyed by row id, with sequential id assignment.
//! Suitable for tests and local development; nothing persists between
//! restarts.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Account;

use super::{AccountStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    accounts: BTreeMap<i64, Account>,
    next_id: i64,
}

/// In-memory implementation of [`AccountStore`]
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAccountStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(&self, account: Account) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;

        inner.next_id += 1;
        let account = Account {
            id: inner.next_id,
            ..account
        };
        inner.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.values().cloned().collect())
    }

    async fn get_account(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.get(&id).cloned())
    }

    async fn delete_account(&self, id: i64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.accounts.remove(&id).is_some())
    }
}
