// ============================================
// File: crates/nutkit-store/src/traits.rs
// ============================================
//! # Store Trait
//!
//! ## Creation Reason
//! Defines the persistence contract the login flow relies on, so the
//! server can run against the in-memory store in tests and a database in
//! production.
//!
//! ## Main Functionality
//! - Transaction chains: every nut of one login exchange resolves to the
//!   exchange's first transaction
//! - Ident successes: credentials keyed by the exchange's first nut
//! - Users: registry keyed by public identity
//! - Used nuts: a seen-set that makes each nut single-use
//!
//! ## ⚠️ Important Note for Next Developer
//! - All trait methods are async for consistency
//! - Implementations must be Send + Sync and safe under concurrent callers
//! - `mark_nut_used` must be atomic: two racing calls for the same nut may
//!   not both return `true`
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use async_trait::async_trait;

use nutkit_common::time::Timestamp;
use nutkit_common::types::{Identity, Nut};

use crate::error::Result;
use crate::models::{IdentToken, Transaction, User};

/// Persistence for login exchanges, ident results and users.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to allow sharing across
/// async tasks.
///
/// # Example
/// ```ignore
/// async fn resume<S: Store>(store: &S, nut: &Nut) -> Result<Option<IdentToken>> {
///     match store.get_first_transaction(nut).await? {
///         Some(first) => store.get_ident_success(&first.id).await,
///         None => Ok(None),
///     }
/// }
/// ```
#[async_trait]
pub trait Store: Send + Sync {
    /// Records one step of an exchange.
    ///
    /// The step joins the chain `t.id` already belongs to, or starts a new
    /// chain. Afterwards `t.next` resolves to that chain's first
    /// transaction.
    ///
    /// # Errors
    /// Backend failures.
    async fn save_transaction(&self, t: Transaction) -> Result<()>;

    /// Returns the first transaction of the chain `nut` belongs to.
    ///
    /// # Errors
    /// Backend failures.
    async fn get_first_transaction(&self, nut: &Nut) -> Result<Option<Transaction>>;

    /// Records that the exchange keyed by `nut` completed an ident.
    ///
    /// # Errors
    /// Backend failures.
    async fn save_ident_success(&self, nut: &Nut, token: IdentToken) -> Result<()>;

    /// Returns the ident credential recorded for `nut`, if any.
    ///
    /// # Errors
    /// Backend failures.
    async fn get_ident_success(&self, nut: &Nut) -> Result<Option<IdentToken>>;

    /// Registers a new user for `identity`.
    ///
    /// # Errors
    /// `AlreadyExists` if the identity is already registered.
    async fn create_user(&self, identity: &Identity) -> Result<User>;

    /// Looks up the user registered for `identity`.
    ///
    /// # Errors
    /// Backend failures.
    async fn get_user_by_identity(&self, identity: &Identity) -> Result<Option<User>>;

    /// Marks `nut`, issued at `issued_at`, as consumed.
    ///
    /// Returns `true` on first use and `false` if the nut was already
    /// marked.
    ///
    /// # Errors
    /// Backend failures.
    async fn mark_nut_used(&self, nut: &Nut, issued_at: Timestamp) -> Result<bool>;

    /// Forgets used nuts issued before `issued_before`.
    ///
    /// Only call this with a cutoff past which every nut is expired;
    /// otherwise a forgotten nut verifies again. Returns how many entries
    /// were dropped.
    ///
    /// # Errors
    /// Backend failures.
    async fn prune_used(&self, issued_before: Timestamp) -> Result<usize>;
}
