// ============================================
// File: crates/nutkit-store/src/memory.rs
// ============================================
//! # In-Memory Store
//!
//! ## Creation Reason
//! Reference `Store` for tests, demos and single-process deployments.
//!
//! ## Main Functionality
//! - All maps behind one `parking_lot::Mutex`
//! - Never fails except for duplicate users
//!
//! ## Chain Resolution
//! ```text
//! save(T1{id: n0, next: n1})   first_of[n0] = n0, first_of[n1] = n0
//! save(T2{id: n1, next: n2})   first_of[n2] = n0
//! get_first_transaction(n2) ──► T1
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - Data is lost on restart
//! - The lock is never held across an `.await`
//! - Chains and idents are never evicted; used nuts are dropped only
//!   through `prune_used`
//!
//! ## Last Modified
//! v0.1.0 - Initial in-memory implementation

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use nutkit_common::time::Timestamp;
use nutkit_common::types::{Identity, Nut};

use crate::error::{Result, StoreError};
use crate::models::{IdentToken, Transaction, User};
use crate::traits::Store;

#[derive(Debug, Default)]
struct Inner {
    transactions: HashMap<Nut, Transaction>,
    first_of: HashMap<Nut, Nut>,
    idents: HashMap<Nut, IdentToken>,
    users: HashMap<Identity, User>,
    used: HashMap<Nut, Timestamp>,
}

/// Thread-safe in-memory [`Store`].
///
/// # Example
/// ```
/// use nutkit_common::time::Timestamp;
/// use nutkit_common::types::Nut;
/// use nutkit_store::{InMemoryStore, Store};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryStore::new();
/// let nut = Nut::from("n0");
/// let issued_at = Timestamp::from_secs(1_700_000_000);
/// assert!(store.mark_nut_used(&nut, issued_at).await?);
/// assert!(!store.mark_nut_used(&nut, issued_at).await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    #[must_use]
    pub fn user_count(&self) -> usize {
        self.inner.lock().users.len()
    }

    /// Number of nuts marked as used.
    #[must_use]
    pub fn used_count(&self) -> usize {
        self.inner.lock().used.len()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn save_transaction(&self, t: Transaction) -> Result<()> {
        let mut inner = self.inner.lock();

        let first = inner
            .first_of
            .get(&t.id)
            .cloned()
            .unwrap_or_else(|| t.id.clone());

        inner.first_of.entry(t.id.clone()).or_insert_with(|| first.clone());
        inner.first_of.insert(t.next.clone(), first);
        inner.transactions.insert(t.id.clone(), t);
        Ok(())
    }

    async fn get_first_transaction(&self, nut: &Nut) -> Result<Option<Transaction>> {
        let inner = self.inner.lock();
        Ok(inner
            .first_of
            .get(nut)
            .and_then(|first| inner.transactions.get(first))
            .cloned())
    }

    async fn save_ident_success(&self, nut: &Nut, token: IdentToken) -> Result<()> {
        self.inner.lock().idents.insert(nut.clone(), token);
        Ok(())
    }

    async fn get_ident_success(&self, nut: &Nut) -> Result<Option<IdentToken>> {
        Ok(self.inner.lock().idents.get(nut).cloned())
    }

    async fn create_user(&self, identity: &Identity) -> Result<User> {
        let mut inner = self.inner.lock();
        if inner.users.contains_key(identity) {
            return Err(StoreError::already_exists("user", identity.as_str()));
        }

        let user = User::new(identity.clone());
        inner.users.insert(identity.clone(), user.clone());
        debug!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_user_by_identity(&self, identity: &Identity) -> Result<Option<User>> {
        Ok(self.inner.lock().users.get(identity).cloned())
    }

    async fn mark_nut_used(&self, nut: &Nut, issued_at: Timestamp) -> Result<bool> {
        let mut inner = self.inner.lock();
        if inner.used.contains_key(nut) {
            return Ok(false);
        }
        inner.used.insert(nut.clone(), issued_at);
        Ok(true)
    }

    async fn prune_used(&self, issued_before: Timestamp) -> Result<usize> {
        let mut inner = self.inner.lock();
        let before = inner.used.len();
        inner.used.retain(|_, issued_at| *issued_at >= issued_before);
        let dropped = before - inner.used.len();
        if dropped > 0 {
            debug!(dropped, remaining = inner.used.len(), "Pruned used nuts");
        }
        Ok(dropped)
    }
}

// ============================================
// Tests
// ============================================
