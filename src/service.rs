//! # List Service
//!
//! The single entry point callers use to work with a user's lists. It owns the
//! backend handle, the user's credential and a cached [`ListCollection`] mirroring
//! the backend.
//!
//! Every operation validates its input, checks the cache, calls the backend and only
//! then applies the same rule to the cache. All operations run under one async mutex
//! held across their backend calls, so two callers never interleave on the same
//! lists.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::{succeeded, Backend};
use crate::client::auth::Credential;
use crate::error::{ListError, Result};
use crate::lists::{CatalogItem, Ingredient, IngredientList, ListCollection};
use crate::transfer::{CompensationPolicy, MoveOperation, MoveOutcome};

pub struct ListService {
    backend: Arc<dyn Backend>,
    credential: Credential,
    policy: CompensationPolicy,
    lists: Mutex<ListCollection>,
}

impl ListService {
    pub fn new(backend: Arc<dyn Backend>, credential: Credential) -> Self {
        Self::with_policy(backend, credential, CompensationPolicy::default())
    }

    pub fn with_policy(
        backend: Arc<dyn Backend>,
        credential: Credential,
        policy: CompensationPolicy,
    ) -> Self {
        Self {
            backend,
            credential,
            policy,
            lists: Mutex::new(ListCollection::new()),
        }
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Registers the user with the backend and loads their lists.
    pub async fn start(&self) -> Result<()> {
        tracing::info!("Starting list session for '{}'", self.credential.username());

        let registered = succeeded(
            "create user",
            self.backend.create_user(&self.credential).await,
        );
        if !registered {
            return Err(ListError::upstream("create user"));
        }

        self.refresh().await
    }

    /// Replaces the cache with the backend's current lists.
    pub async fn refresh(&self) -> Result<()> {
        let mut lists = self.lists.lock().await;
        self.reload(&mut lists).await
    }

    async fn reload(&self, lists: &mut ListCollection) -> Result<()> {
        match self.backend.fetch_lists(&self.credential).await {
            Ok(fetched) => {
                tracing::debug!("Loaded lists from backend: {:?}", fetched.names());
                *lists = fetched;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to fetch lists: {}", e);
                Err(ListError::upstream("fetch lists"))
            }
        }
    }

    pub async fn lists(&self) -> Vec<IngredientList> {
        self.lists.lock().await.all().to_vec()
    }

    pub async fn list(&self, name: &str) -> Option<IngredientList> {
        self.lists.lock().await.find_by_name(name).cloned()
    }

    pub async fn create_list(&self, name: &str) -> Result<()> {
        validate_list_name(name)?;
        let mut lists = self.lists.lock().await;

        if lists.find_by_name(name).is_some() {
            return Err(ListError::ListExists(name.to_string()));
        }

        if !succeeded("create list", self.backend.create_list(&self.credential, name).await) {
            return Err(ListError::upstream("create list"));
        }

        lists.create(name);
        tracing::info!("Created list '{}'", name);
        Ok(())
    }

    pub async fn delete_list(&self, name: &str) -> Result<()> {
        let mut lists = self.lists.lock().await;

        if lists.find_by_name(name).is_none() {
            return Err(ListError::ListNotFound(name.to_string()));
        }

        if !succeeded("delete list", self.backend.delete_list(&self.credential, name).await) {
            return Err(ListError::upstream("delete list"));
        }

        lists.delete(name);
        tracing::info!("Deleted list '{}'", name);
        Ok(())
    }

    pub async fn rename_list(&self, old_name: &str, new_name: &str) -> Result<()> {
        validate_list_name(new_name)?;
        let mut lists = self.lists.lock().await;

        if lists.find_by_name(old_name).is_none() {
            return Err(ListError::ListNotFound(old_name.to_string()));
        }
        if old_name == new_name {
            return Ok(());
        }
        if lists.find_by_name(new_name).is_some() {
            return Err(ListError::ListExists(new_name.to_string()));
        }

        let renamed = succeeded(
            "rename list",
            self.backend
                .rename_list(&self.credential, old_name, new_name)
                .await,
        );
        if !renamed {
            return Err(ListError::upstream("rename list"));
        }

        lists.rename(old_name, new_name);
        tracing::info!("Renamed list '{}' to '{}'", old_name, new_name);
        Ok(())
    }

    pub async fn add_ingredient(&self, list: &str, ingredient: Ingredient) -> Result<()> {
        ingredient.validate().map_err(ListError::InvalidInput)?;
        let mut lists = self.lists.lock().await;

        let target = lists
            .find_by_name_mut(list)
            .ok_or_else(|| ListError::ListNotFound(list.to_string()))?;

        let added = succeeded(
            "add ingredient",
            self.backend
                .add_ingredient(&self.credential, list, &ingredient)
                .await,
        );
        if !added {
            return Err(ListError::upstream("add ingredient"));
        }

        tracing::info!(
            "Added {} {} of '{}' to '{}'",
            ingredient.quantity,
            ingredient.unit,
            ingredient.name,
            list
        );
        target.add(ingredient);
        Ok(())
    }

    pub async fn remove_ingredient(&self, list: &str, ingredient: &Ingredient) -> Result<()> {
        let mut lists = self.lists.lock().await;

        let target = lists
            .find_by_name_mut(list)
            .ok_or_else(|| ListError::ListNotFound(list.to_string()))?;
        if !target.contains(ingredient) {
            return Err(ingredient_not_found(list, ingredient));
        }

        let removed = succeeded(
            "remove ingredient",
            self.backend
                .remove_ingredient(&self.credential, list, ingredient)
                .await,
        );
        if !removed {
            return Err(ListError::upstream("remove ingredient"));
        }

        target.remove(ingredient);
        tracing::info!("Removed '{}' from '{}'", ingredient.name, list);
        Ok(())
    }

    pub async fn edit_ingredient(
        &self,
        list: &str,
        old: &Ingredient,
        new: Ingredient,
    ) -> Result<()> {
        new.validate().map_err(ListError::InvalidInput)?;
        let mut lists = self.lists.lock().await;

        let target = lists
            .find_by_name_mut(list)
            .ok_or_else(|| ListError::ListNotFound(list.to_string()))?;
        if !target.contains(old) {
            return Err(ingredient_not_found(list, old));
        }

        let edited = succeeded(
            "edit ingredient",
            self.backend
                .edit_ingredient(&self.credential, list, old, &new)
                .await,
        );
        if !edited {
            return Err(ListError::upstream("edit ingredient"));
        }

        target.edit(old, &new);
        tracing::info!("Edited '{}' in '{}'", old.name, list);
        Ok(())
    }

    /// Moves the entry `source` holds for `ingredient` to `destination`. Only the
    /// identity of `ingredient` matters; the held quantity and unit move whole.
    ///
    /// Unless the move completes, the cache is reloaded afterwards since
    /// compensation may have left the backend in a state the cache cannot predict.
    pub async fn move_ingredient(
        &self,
        source: &str,
        destination: &str,
        ingredient: &Ingredient,
    ) -> Result<()> {
        if source == destination {
            return Err(ListError::InvalidInput(format!(
                "cannot move '{}' onto the list it is already on",
                ingredient.name
            )));
        }
        let mut lists = self.lists.lock().await;

        let moving = lists
            .find_by_name(source)
            .ok_or_else(|| ListError::ListNotFound(source.to_string()))?
            .find(ingredient)
            .cloned()
            .ok_or_else(|| ingredient_not_found(source, ingredient))?;
        let prior = lists
            .find_by_name(destination)
            .ok_or_else(|| ListError::ListNotFound(destination.to_string()))?
            .find(&moving)
            .cloned();

        let outcome = MoveOperation::new(self.backend.as_ref(), &self.credential, self.policy)
            .with_destination_entry(prior.as_ref())
            .run(source, destination, &moving)
            .await;

        match outcome {
            MoveOutcome::Moved => {
                if let Some(from) = lists.find_by_name_mut(source) {
                    from.remove(&moving);
                }
                if let Some(to) = lists.find_by_name_mut(destination) {
                    to.add(moving);
                }
                Ok(())
            }
            MoveOutcome::Failed => {
                self.reload_after_failed_move(&mut lists).await;
                Err(ListError::upstream("move ingredient"))
            }
            MoveOutcome::PartiallyReconciled { .. } => {
                self.reload_after_failed_move(&mut lists).await;
                Err(ListError::PartialReconciliation {
                    ingredient: moving.name,
                    from_list: source.to_string(),
                    to_list: destination.to_string(),
                })
            }
        }
    }

    async fn reload_after_failed_move(&self, lists: &mut ListCollection) {
        if let Err(e) = self.reload(lists).await {
            tracing::warn!("Keeping cached lists after failed move: {}", e);
        }
    }

    pub async fn search_list(&self, list: &str, text: &str) -> Result<Vec<Ingredient>> {
        let lists = self.lists.lock().await;
        lists
            .find_by_name(list)
            .map(|l| l.search(text))
            .ok_or_else(|| ListError::ListNotFound(list.to_string()))
    }

    /// Removes a deleted custom ingredient from every list that holds it.
    /// Returns how many lists were purged.
    pub async fn purge_custom_ingredient(&self, template: &Ingredient) -> Result<usize> {
        let mut lists = self.lists.lock().await;
        let mut purged = 0;
        let mut failed = false;

        for list in lists.all().to_vec() {
            let matches: Vec<&Ingredient> = list
                .ingredients()
                .iter()
                .filter(|e| e.same_definition(template))
                .collect();
            if matches.is_empty() {
                continue;
            }

            let mut all_removed = true;
            for entry in matches {
                all_removed &= succeeded(
                    "purge custom ingredient",
                    self.backend
                        .remove_ingredient(&self.credential, list.name(), entry)
                        .await,
                );
            }

            if all_removed {
                if let Some(cached) = lists.find_by_name_mut(list.name()) {
                    cached.cascade_delete(template);
                }
                purged += 1;
            } else {
                failed = true;
            }
        }

        if failed {
            self.reload(&mut lists).await?;
            return Err(ListError::upstream("purge custom ingredient"));
        }

        tracing::info!("Purged custom ingredient '{}' from {} lists", template.name, purged);
        Ok(purged)
    }

    pub async fn catalog(&self) -> Result<Vec<CatalogItem>> {
        self.backend
            .fetch_catalog(&self.credential)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch catalog: {}", e);
                ListError::upstream("fetch catalog")
            })
    }

    /// Catalog entries whose name contains `text`, ignoring case.
    pub async fn search_catalog(&self, text: &str) -> Result<Vec<CatalogItem>> {
        let needle = text.trim().to_lowercase();
        let catalog = self.catalog().await?;
        Ok(catalog
            .into_iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub async fn units(&self) -> Result<Vec<String>> {
        self.backend
            .fetch_units(&self.credential)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch measurement units: {}", e);
                ListError::upstream("fetch measurement units")
            })
    }
}

fn validate_list_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ListError::InvalidInput("list name cannot be empty".to_string()));
    }
    Ok(())
}

fn ingredient_not_found(list: &str, ingredient: &Ingredient) -> ListError {
    ListError::IngredientNotFound {
        list: list.to_string(),
        ingredient: ingredient.name.clone(),
    }
}
