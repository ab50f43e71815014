use std::cmp::Ordering;

use serde::Serialize;

use super::ingredient::Ingredient;

/// Name given to a list created with an empty name.
pub const UNNAMED_LIST: &str = "No Name";

/// A named, ordered list of ingredients.
///
/// No two entries share an identity: adding an ingredient that is already present
/// merges the quantities into the existing entry. New entries are inserted in
/// case-insensitive name order; merged entries keep their position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngredientList {
    name: String,
    ingredients: Vec<Ingredient>,
}

impl IngredientList {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_ingredients(name, Vec::new())
    }

    /// Builds a list by adding each ingredient in turn, so the result already
    /// satisfies the merge and ordering rules whatever order `ingredients` came in.
    pub fn with_ingredients(name: impl Into<String>, ingredients: Vec<Ingredient>) -> Self {
        let mut list = Self {
            name: String::new(),
            ingredients: Vec::with_capacity(ingredients.len()),
        };
        list.set_name(name);
        for ingredient in ingredients {
            list.add(ingredient);
        }
        list
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name = if name.is_empty() {
            UNNAMED_LIST.to_string()
        } else {
            name
        };
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    pub fn contains(&self, ingredient: &Ingredient) -> bool {
        self.find(ingredient).is_some()
    }

    pub fn find(&self, ingredient: &Ingredient) -> Option<&Ingredient> {
        self.ingredients.iter().find(|e| e.same_item(ingredient))
    }

    pub fn add(&mut self, ingredient: Ingredient) {
        if let Some(existing) = self
            .ingredients
            .iter_mut()
            .find(|e| e.same_item(&ingredient))
        {
            // Units are summed as-is, no conversion.
            existing.quantity += ingredient.quantity;
            return;
        }

        match self
            .ingredients
            .iter()
            .position(|e| compare_ignore_case(&e.name, &ingredient.name) == Ordering::Greater)
        {
            Some(index) => self.ingredients.insert(index, ingredient),
            None => self.ingredients.push(ingredient),
        }
    }

    /// Removes the first entry that is the same item as `ingredient`.
    /// Returns false, leaving the list untouched, when there is none.
    pub fn remove(&mut self, ingredient: &Ingredient) -> bool {
        match self.ingredients.iter().position(|e| e.same_item(ingredient)) {
            Some(index) => {
                self.ingredients.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the entry matching `old` with a copy of `new`, re-running the merge
    /// rule so an edit onto another entry's identity folds the two together.
    pub fn edit(&mut self, old: &Ingredient, new: &Ingredient) -> bool {
        if !self.remove(old) {
            return false;
        }
        self.add(new.clone());
        true
    }

    /// Drops every entry matching `template` by name, category and custom flag.
    /// Returns how many entries were removed.
    pub fn cascade_delete(&mut self, template: &Ingredient) -> usize {
        let before = self.ingredients.len();
        self.ingredients.retain(|e| !e.same_definition(template));
        before - self.ingredients.len()
    }

    /// Copies of the entries whose name contains `text`, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, text: &str) -> Vec<Ingredient> {
        let needle = text.trim().to_lowercase();
        self.ingredients
            .iter()
            .filter(|e| e.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Ordinal comparison after upper-casing both sides.
fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_uppercase)
        .cmp(b.chars().flat_map(char::to_uppercase))
}
