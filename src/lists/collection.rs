use serde::Serialize;

use super::list::IngredientList;

/// All of a user's lists, in creation order. Names are unique and compared
/// case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListCollection {
    lists: Vec<IngredientList>,
}

impl ListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from fetched lists, keeping the first list of any
    /// repeated name.
    pub fn from_lists(lists: impl IntoIterator<Item = IngredientList>) -> Self {
        let mut collection = Self::new();
        for list in lists {
            if collection.find_by_name(list.name()).is_some() {
                tracing::warn!("Dropping duplicate list '{}'", list.name());
                continue;
            }
            collection.lists.push(list);
        }
        collection
    }

    pub fn all(&self) -> &[IngredientList] {
        &self.lists
    }

    pub fn names(&self) -> Vec<String> {
        self.lists.iter().map(|l| l.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn create(&mut self, name: &str) -> bool {
        if self.find_by_name(name).is_some() {
            return false;
        }
        self.lists.push(IngredientList::new(name));
        true
    }

    pub fn delete(&mut self, name: &str) -> bool {
        match self.lists.iter().position(|l| l.name() == name) {
            Some(index) => {
                self.lists.remove(index);
                true
            }
            None => false,
        }
    }

    /// Fails when `old` is missing or `new` already names another list.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        if old != new && self.find_by_name(new).is_some() {
            return false;
        }
        match self.find_by_name_mut(old) {
            Some(list) => {
                list.set_name(new);
                true
            }
            None => false,
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&IngredientList> {
        self.lists.iter().find(|l| l.name() == name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut IngredientList> {
        self.lists.iter_mut().find(|l| l.name() == name)
    }
}
