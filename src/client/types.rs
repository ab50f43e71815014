//! Wire types for the remote lists API.
//!
//! Every read endpoint wraps its payload in a `{"result": [...]}` envelope
//! ([`ResultEnvelope`]). Ingredients travel in the shape of
//! [`Ingredient`](crate::lists::Ingredient) (`name`, `type`, `amount`, `unit`,
//! `custom`); lists arrive as [`ListRecord`] and are rebuilt through
//! [`IngredientList::with_ingredients`] so fetched data obeys the local merge and
//! ordering rules.

use serde::{Deserialize, Serialize};

use crate::lists::{Ingredient, IngredientList};

/// Standard response wrapper for collection endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    /// Items returned by the endpoint
    #[serde(default = "Vec::new")]
    pub result: Vec<T>,
}

/// A list as stored by the backend.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRecord {
    /// Unique list name
    pub name: String,
    /// Entries of the list; absent for a freshly created list
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

impl From<ListRecord> for IngredientList {
    fn from(record: ListRecord) -> Self {
        IngredientList::with_ingredients(record.name, record.ingredients)
    }
}

/// Body for creating or renaming a list.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListNameRequest {
    pub name: String,
}

/// Body for replacing one entry with another.
#[derive(Debug, Serialize, Deserialize)]
pub struct EditIngredientRequest {
    /// Entry as currently stored
    pub old: Ingredient,
    /// Replacement value
    pub new: Ingredient,
}

/// Body fragments the create-user endpoint answers with on success.
pub const USER_CREATED: &str = "Item created successfully";
pub const USER_EXISTS: &str = "Item already exists.";
