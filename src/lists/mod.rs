//! # Ingredient Lists
//!
//! The in-memory rules every backend and the service layer share:
//!
//! - [`Ingredient`] - a line item, identified by name and category
//! - [`IngredientList`] - merge-on-add, alphabetical insertion, remove, edit
//! - [`ListCollection`] - a user's named lists

mod collection;
mod ingredient;
mod list;

pub use collection::ListCollection;
pub use ingredient::{CatalogItem, Ingredient};
pub use list::{IngredientList, UNNAMED_LIST};
