// ============================================
// File: crates/nutkit-server/src/services/challenge.rs
// ============================================
//! # Challenge Service
//!
//! ## Creation Reason
//! Orchestrates a login exchange, coordinating the stateless `Nutter`
//! with the `Store` that remembers chains, idents and used nuts.
//!
//! ## Main Functionality
//! - `issue`: Hand out a fresh nut
//! - `verify`: Validate a returned nut and consume it
//! - `advance`: Verify a nut, issue the next one, record the step
//! - `record_ident` / `poll_ident`: Publish and fetch ident results
//! - `prune_used`: Forget used nuts that can no longer validate
//!
//! ## Exchange Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ChallengeService                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  1. issue(client)            ──► n0                          │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  2. advance(n0, client)      ──► n1   Transaction{n0 → n1}   │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  3. record_ident(n1, idk)    ──► n1 consumed, token under n0 │
//! │     │                                                        │
//! │     ▼                                                        │
//! │  4. poll_ident(n0)           ──► token                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Error Handling
//! - Rejections collapse to `NutRejected(Validation)`; the log carries the
//!   outcome only, never the nut or the client identifier
//! - A nut verifies at most once (`NutReused` afterwards)
//! - Fatal core errors (random source) propagate unchanged
//!
//! ## ⚠️ Important Note for Next Developer
//! - The nut is consumed only after it validates, so garbage cannot
//!   poison the used set
//! - Ident results are keyed by the chain's FIRST nut
//! - `advance` records the step before consuming `prev`; if the store
//!   write fails the client may retry with the same nut
//! - `record_ident` consumes its nut, so an ident can be recorded once
//!   per issued nut
//!
//! ## Last Modified
//! v0.1.0 - Initial challenge service

use std::sync::Arc;

use tracing::{debug, info, warn};

use nutkit_common::types::{Identity, Nut};
use nutkit_core::{NutPayload, Nutter, Validation};
use nutkit_store::{IdentToken, Store, StoreError, Transaction, User};

use crate::error::{Result, ServerError};

/// Login exchange orchestration over a [`Nutter`] and a [`Store`].
pub struct ChallengeService<S: Store> {
    nutter: Arc<Nutter>,
    store: Arc<S>,
}

impl<S: Store> ChallengeService<S> {
    /// Creates a service over a shared nutter and store.
    pub fn new(nutter: Arc<Nutter>, store: Arc<S>) -> Self {
        Self { nutter, store }
    }

    /// Returns the nutter.
    #[must_use]
    pub fn nutter(&self) -> &Arc<Nutter> {
        &self.nutter
    }

    /// Returns the store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Issues a fresh nut for `client_id`.
    pub fn issue(&self, client_id: &str) -> Result<Nut> {
        let nut = self.nutter.issue(client_id)?;
        debug!(issued = self.nutter.issued_count(), "Issued nut");
        Ok(nut)
    }

    /// Validates `nut` for `client_id` and consumes it.
    pub async fn verify(&self, nut: &Nut, client_id: &str) -> Result<NutPayload> {
        let payload = self.validate(nut, client_id)?;
        self.consume(nut, &payload).await?;

        debug!(counter = payload.counter, "Nut verified");
        Ok(payload)
    }

    /// Verifies `prev`, issues the next nut and records the step.
    ///
    /// `prev` stays unused if the step cannot be recorded.
    pub async fn advance(&self, prev: &Nut, client_id: &str) -> Result<Nut> {
        let payload = self.validate(prev, client_id)?;

        let next = self.issue(client_id)?;
        self.store
            .save_transaction(Transaction::new(prev.clone(), next.clone(), client_id))
            .await?;

        self.consume(prev, &payload).await?;
        Ok(next)
    }

    /// Returns the first nut of the exchange `nut` belongs to.
    ///
    /// A nut that was never part of a recorded step is its own first nut.
    pub async fn first_nut(&self, nut: &Nut) -> Result<Nut> {
        Ok(self
            .store
            .get_first_transaction(nut)
            .await?
            .map_or_else(|| nut.clone(), |first| first.id))
    }

    /// Verifies `nut` for `client_id` and records a successful ident for
    /// the exchange it belongs to.
    ///
    /// Registers `identity` as a user on first sight. Nothing is stored
    /// when the nut is rejected.
    pub async fn record_ident(
        &self,
        nut: &Nut,
        client_id: &str,
        identity: &Identity,
    ) -> Result<IdentToken> {
        self.verify(nut, client_id).await?;

        let user = self.user_for(identity).await?;
        let first = self.first_nut(nut).await?;

        let token = IdentToken::generate();
        self.store.save_ident_success(&first, token.clone()).await?;

        info!(user_id = %user.id, "Ident recorded");
        Ok(token)
    }

    /// Returns the ident credential for the exchange `nut` belongs to.
    pub async fn poll_ident(&self, nut: &Nut) -> Result<Option<IdentToken>> {
        let first = self.first_nut(nut).await?;
        Ok(self.store.get_ident_success(&first).await?)
    }

    /// Drops used-nut entries that are past the expiry window.
    ///
    /// Those nuts fail validation on their own, so forgetting them cannot
    /// let one verify twice. Returns how many entries were dropped.
    pub async fn prune_used(&self) -> Result<usize> {
        let dropped = self
            .store
            .prune_used(self.nutter.oldest_valid_issue())
            .await?;
        debug!(dropped, "Pruned used nuts");
        Ok(dropped)
    }

    fn validate(&self, nut: &Nut, client_id: &str) -> Result<NutPayload> {
        match self.nutter.validate(nut.as_str(), client_id) {
            Ok(payload) => Ok(payload),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                let outcome = Validation::from_error(&e);
                warn!(outcome = %outcome, "Nut rejected");
                Err(ServerError::NutRejected(outcome))
            }
        }
    }

    async fn consume(&self, nut: &Nut, payload: &NutPayload) -> Result<()> {
        if !self.store.mark_nut_used(nut, payload.issued_at).await? {
            warn!(counter = payload.counter, "Nut reused");
            return Err(ServerError::NutReused);
        }
        Ok(())
    }

    async fn user_for(&self, identity: &Identity) -> Result<User> {
        if let Some(user) = self.store.get_user_by_identity(identity).await? {
            return Ok(user);
        }

        match self.store.create_user(identity).await {
            Ok(user) => Ok(user),
            // Lost a race with a concurrent registration
            Err(StoreError::AlreadyExists { .. }) => self
                .store
                .get_user_by_identity(identity)
                .await?
                .ok_or_else(|| {
                    StoreError::backend("get_user_by_identity", "user vanished after conflict")
                        .into()
                }),
            Err(e) => Err(e.into()),
        }
    }
}

impl<S: Store> std::fmt::Debug for ChallengeService<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeService")
            .field("nutter", &self.nutter)
            .finish_non_exhaustive()
    }
}
