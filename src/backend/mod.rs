//! # Lists Backend
//!
//! The capability surface the list engine persists through. Two implementations
//! exist and one is picked at process start:
//!
//! - [`InMemoryBackend`] - holds the lists itself, using the same merge rules
//! - [`HttpBackend`](crate::client::HttpBackend) - talks to the remote lists API
//!
//! Every call is fallible. `Err` means the call never completed (transport fault,
//! unexpected status); `Ok(false)` means the backend refused it. Callers treat the
//! two the same way.

mod memory;

use async_trait::async_trait;

use crate::client::auth::Credential;
use crate::lists::{CatalogItem, Ingredient, ListCollection};

pub use memory::InMemoryBackend;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Registers the user. Succeeds when the user already exists.
    async fn create_user(&self, credential: &Credential) -> anyhow::Result<bool>;

    async fn fetch_catalog(&self, credential: &Credential) -> anyhow::Result<Vec<CatalogItem>>;

    async fn fetch_units(&self, credential: &Credential) -> anyhow::Result<Vec<String>>;

    async fn fetch_lists(&self, credential: &Credential) -> anyhow::Result<ListCollection>;

    async fn create_list(&self, credential: &Credential, name: &str) -> anyhow::Result<bool>;

    async fn delete_list(&self, credential: &Credential, name: &str) -> anyhow::Result<bool>;

    async fn rename_list(
        &self,
        credential: &Credential,
        old_name: &str,
        new_name: &str,
    ) -> anyhow::Result<bool>;

    async fn add_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool>;

    /// `Ok(false)` when the list is missing or holds no matching entry.
    async fn remove_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool>;

    async fn edit_ingredient(
        &self,
        credential: &Credential,
        list: &str,
        old: &Ingredient,
        new: &Ingredient,
    ) -> anyhow::Result<bool>;
}

/// Collapses a backend reply into success or failure, logging whatever went wrong.
pub(crate) fn succeeded(operation: &str, result: anyhow::Result<bool>) -> bool {
    match result {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!("Backend rejected {}", operation);
            false
        }
        Err(e) => {
            tracing::error!("Backend call to {} failed: {}", operation, e);
            false
        }
    }
}
