//! Moving an ingredient from one list to another.
//!
//! The backend has no multi-list transaction, so a move is two calls: add to the
//! destination, then remove from the source. The add always comes first; if the
//! remove fails, compensation takes the ingredient back out of the destination.
//!
//! ```text
//! add(destination) ──fail──▶ Failed
//!        │ ok
//! remove(source) ──ok──▶ Moved
//!        │ fail
//! add(source), withdraw(destination)   (each retried)
//!        ├─ both ok ──▶ Failed
//!        └─ either fails ──▶ PartiallyReconciled
//! ```
//!
//! Withdrawing from the destination removes the entry when the move created it. When
//! the destination already held the same item, the add merged into it, so the entry
//! is edited back to its earlier value instead.

use std::future::Future;
use std::time::Duration;

use crate::backend::{succeeded, Backend};
use crate::client::auth::Credential;
use crate::lists::Ingredient;

/// How hard compensation tries before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompensationPolicy {
    /// Attempts per compensation step, at least one is always made
    pub max_attempts: u32,
    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for CompensationPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// In the destination, gone from the source.
    Moved,
    /// Nothing moved; any partial effect was undone.
    Failed,
    /// The move failed and undoing it failed too.
    PartiallyReconciled {
        restored_to_source: bool,
        withdrawn_from_destination: bool,
    },
}

pub struct MoveOperation<'a> {
    backend: &'a dyn Backend,
    credential: &'a Credential,
    policy: CompensationPolicy,
    destination_entry: Option<&'a Ingredient>,
}

impl<'a> MoveOperation<'a> {
    pub fn new(
        backend: &'a dyn Backend,
        credential: &'a Credential,
        policy: CompensationPolicy,
    ) -> Self {
        Self {
            backend,
            credential,
            policy,
            destination_entry: None,
        }
    }

    /// The destination's entry for the moved item as it stood before the move, if any.
    pub fn with_destination_entry(mut self, entry: Option<&'a Ingredient>) -> Self {
        self.destination_entry = entry;
        self
    }

    pub async fn run(
        &self,
        source: &str,
        destination: &str,
        ingredient: &Ingredient,
    ) -> MoveOutcome {
        tracing::debug!(
            "Moving '{}' from '{}' to '{}'",
            ingredient.name,
            source,
            destination
        );

        let added = succeeded(
            "add ingredient to destination",
            self.backend
                .add_ingredient(self.credential, destination, ingredient)
                .await,
        );
        if !added {
            tracing::warn!(
                "Move of '{}' aborted: destination '{}' refused it",
                ingredient.name,
                destination
            );
            return MoveOutcome::Failed;
        }

        let removed = succeeded(
            "remove ingredient from source",
            self.backend
                .remove_ingredient(self.credential, source, ingredient)
                .await,
        );
        if removed {
            tracing::info!(
                "Moved '{}' from '{}' to '{}'",
                ingredient.name,
                source,
                destination
            );
            return MoveOutcome::Moved;
        }

        tracing::warn!(
            "Removing '{}' from '{}' failed, undoing the move",
            ingredient.name,
            source
        );
        self.compensate(source, destination, ingredient).await
    }

    async fn compensate(
        &self,
        source: &str,
        destination: &str,
        ingredient: &Ingredient,
    ) -> MoveOutcome {
        let restored_to_source = self
            .retry("restore ingredient to source", || {
                self.backend
                    .add_ingredient(self.credential, source, ingredient)
            })
            .await;

        let withdrawn_from_destination = match self.destination_entry {
            Some(prior) => {
                let merged = Ingredient {
                    quantity: prior.quantity + ingredient.quantity,
                    ..prior.clone()
                };
                self.retry("restore destination entry", || {
                    self.backend
                        .edit_ingredient(self.credential, destination, &merged, prior)
                })
                .await
            }
            None => {
                self.retry("withdraw ingredient from destination", || {
                    self.backend
                        .remove_ingredient(self.credential, destination, ingredient)
                })
                .await
            }
        };

        if restored_to_source && withdrawn_from_destination {
            return MoveOutcome::Failed;
        }

        tracing::error!(
            "Could not undo move of '{}' from '{}' to '{}' \
             (restored to source: {}, withdrawn from destination: {})",
            ingredient.name,
            source,
            destination,
            restored_to_source,
            withdrawn_from_destination
        );
        MoveOutcome::PartiallyReconciled {
            restored_to_source,
            withdrawn_from_destination,
        }
    }

    async fn retry<F, Fut>(&self, step: &str, mut call: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = anyhow::Result<bool>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        for attempt in 1..=attempts {
            if succeeded(step, call().await) {
                return true;
            }
            if attempt < attempts {
                tracing::debug!("Retrying {} ({}/{})", step, attempt + 1, attempts);
                tokio::time::sleep(self.policy.backoff).await;
            }
        }
        false
    }
}
