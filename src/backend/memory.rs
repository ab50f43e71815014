use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Backend;
use crate::client::auth::Credential;
use crate::lists::{CatalogItem, Ingredient, IngredientList, ListCollection};

/// Backend that keeps everything in process memory.
///
/// Used for local runs and tests. Lists are mutated with the same rules the
/// service applies to its cache, so both views stay identical.
pub struct InMemoryBackend {
    catalog: Vec<CatalogItem>,
    units: Vec<String>,
    lists: Mutex<ListCollection>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            catalog: Vec::new(),
            units: Vec::new(),
            lists: Mutex::new(ListCollection::new()),
        }
    }

    /// A backend preloaded with the sample catalog, units and the
    /// "Grocery" and "Pantry" lists.
    pub fn with_sample_data() -> Self {
        let catalog = [
            ("Apple", "Fruit"),
            ("Milk", "Dairy"),
            ("Rice", "Grain"),
            ("Eggs", "Protein"),
            ("Bread", "Grain"),
            ("Beans", "Pantry"),
            ("Owl", "Poultry"),
            ("Chicken", "Poultry"),
            ("Oats", "Pantry"),
            ("Oranges", "Produce"),
            ("Carrot", "Produce"),
            ("Wheat", "Grain"),
            ("Lentils", "Grain"),
            ("Cookies", "Snacks"),
            ("Chips", "Snacks"),
        ]
        .into_iter()
        .map(|(name, category)| CatalogItem::new(name, category))
        .collect();

        let units = ["count", "g", "kg", "lb", "oz", "mL", "L", "gal"]
            .into_iter()
            .map(String::from)
            .collect();

        let grocery = IngredientList::with_ingredients(
            "Grocery",
            vec![
                Ingredient::new("Chicken", "Poultry", 2000.0, "g"),
                Ingredient::new("Beef", "Meat", 250.0, "g"),
                Ingredient::new("Rabbit", "Meat", 1.0, "count"),
                Ingredient::new("Chicken", "Poultry", 8.0, "count"),
            ],
        );
        let pantry = IngredientList::with_ingredients(
            "Pantry",
            vec![
                Ingredient::new("Cheese", "Dairy", 100.0, "g"),
                Ingredient::new("Milk", "Dairy", 250.0, "ml"),
                Ingredient::new("Cereal", "Pantry", 500.0, "g"),
                Ingredient::new("Carrot", "Produce", 4.0, "count"),
            ],
        );

        Self::with_lists(catalog, units, ListCollection::from_lists([grocery, pantry]))
    }

    pub fn with_lists(
        catalog: Vec<CatalogItem>,
        units: Vec<String>,
        lists: ListCollection,
    ) -> Self {
        Self {
            catalog,
            units,
            lists: Mutex::new(lists),
        }
    }

    /// Current state, for assertions.
    pub async fn snapshot(&self) -> ListCollection {
        self.lists.lock().await.clone()
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn create_user(&self, credential: &Credential) -> anyhow::Result<bool> {
        tracing::debug!("In-memory backend accepting user '{}'", credential.username());
        Ok(true)
    }

    async fn fetch_catalog(&self, _credential: &Credential) -> anyhow::Result<Vec<CatalogItem>> {
        Ok(self.catalog.clone())
    }

    async fn fetch_units(&self, _credential: &Credential) -> anyhow::Result<Vec<String>> {
        Ok(self.units.clone())
    }

    async fn fetch_lists(&self, _credential: &Credential) -> anyhow::Result<ListCollection> {
        Ok(self.lists.lock().await.clone())
    }

    async fn create_list(&self, _credential: &Credential, name: &str) -> anyhow::Result<bool> {
        Ok(self.lists.lock().await.create(name))
    }

    async fn delete_list(&self, _credential: &Credential, name: &str) -> anyhow::Result<bool> {
        Ok(self.lists.lock().await.delete(name))
    }

    async fn rename_list(
        &self,
        _credential: &Credential,
        old_name: &str,
        new_name: &str,
    ) -> anyhow::Result<bool> {
        Ok(self.lists.lock().await.rename(old_name, new_name))
    }

    async fn add_ingredient(
        &self,
        _credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool> {
        let mut lists = self.lists.lock().await;
        match lists.find_by_name_mut(list) {
            Some(target) => {
                target.add(ingredient.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_ingredient(
        &self,
        _credential: &Credential,
        list: &str,
        ingredient: &Ingredient,
    ) -> anyhow::Result<bool> {
        let mut lists = self.lists.lock().await;
        Ok(lists
            .find_by_name_mut(list)
            .is_some_and(|target| target.remove(ingredient)))
    }

    async fn edit_ingredient(
        &self,
        _credential: &Credential,
        list: &str,
        old: &Ingredient,
        new: &Ingredient,
    ) -> anyhow::Result<bool> {
        let mut lists = self.lists.lock().await;
        Ok(lists
            .find_by_name_mut(list)
            .is_some_and(|target| target.edit(old, new)))
    }
}
