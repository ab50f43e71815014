use serde::{Deserialize, Serialize};

/// A single line item on an ingredient list.
///
/// Two ingredients describe the same item when their `name` and `category` match
/// exactly (see [`Ingredient::same_item`]). Quantity and unit are payload and take no
/// part in that identity. Cloning yields a fully independent value, so any ingredient
/// handed out of a list is a clone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Display name, compared case-sensitively for identity
    pub name: String,
    /// Catalog category (e.g. "Dairy"), serialized as `type`
    #[serde(rename = "type")]
    pub category: String,
    /// Amount held on the list, serialized as `amount`
    #[serde(rename = "amount", default)]
    pub quantity: f64,
    /// Measurement unit; never converted when quantities merge
    #[serde(default)]
    pub unit: String,
    /// Whether the user defined this ingredient rather than picking it from the catalog
    #[serde(rename = "custom", default)]
    pub is_custom: bool,
}

impl Ingredient {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            quantity,
            unit: unit.into(),
            is_custom: false,
        }
    }

    pub fn custom(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            is_custom: true,
            ..Self::new(name, category, quantity, unit)
        }
    }

    /// True when `other` is the same line item: name and category match exactly.
    pub fn same_item(&self, other: &Ingredient) -> bool {
        self.name == other.name && self.category == other.category
    }

    /// Identity plus the custom flag, used when purging a deleted custom definition.
    pub fn same_definition(&self, other: &Ingredient) -> bool {
        self.same_item(other) && self.is_custom == other.is_custom
    }

    /// Checks the fields a caller must supply before the ingredient reaches a list.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("ingredient name must not be empty".to_string());
        }
        if self.unit.trim().is_empty() {
            return Err(format!("unit for '{}' must not be empty", self.name));
        }
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(format!(
                "quantity for '{}' must be greater than 0, got {}",
                self.name, self.quantity
            ));
        }
        Ok(())
    }
}

/// An entry of the global ingredient catalog, independent of any list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
}

impl CatalogItem {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_item_ignores_quantity_and_unit() {
        let a = Ingredient::new("Milk", "Dairy", 250.0, "ml");
        let b = Ingredient::new("Milk", "Dairy", 1.0, "L");

        assert!(a.same_item(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_item_is_case_sensitive() {
        let a = Ingredient::new("Milk", "Dairy", 1.0, "L");

        assert!(!a.same_item(&Ingredient::new("milk", "Dairy", 1.0, "L")));
        assert!(!a.same_item(&Ingredient::new("Milk", "dairy", 1.0, "L")));
    }

    #[test]
    fn test_clone_is_independent() {
        let rice = Ingredient::new("Rice", "Grain", 200.0, "g");
        let mut copy = rice.clone();
        copy.quantity = 1.0;
        copy.unit = "kg".to_string();

        assert_eq!(rice.quantity, 200.0);
        assert_eq!(rice.unit, "g");
    }

    #[test]
    fn test_same_definition_checks_custom_flag() {
        let custom = Ingredient::custom("Kimchi", "Fermented", 1.0, "count");
        let catalog = Ingredient::new("Kimchi", "Fermented", 1.0, "count");

        assert!(custom.same_item(&catalog));
        assert!(!custom.same_definition(&catalog));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(Ingredient::new("Eggs", "Protein", 12.0, "count").validate().is_ok());
        assert!(Ingredient::new("", "Protein", 12.0, "count").validate().is_err());
        assert!(Ingredient::new("Eggs", "Protein", 12.0, " ").validate().is_err());
        assert!(Ingredient::new("Eggs", "Protein", 0.0, "count").validate().is_err());
        assert!(Ingredient::new("Eggs", "Protein", -2.0, "count").validate().is_err());
        assert!(Ingredient::new("Eggs", "Protein", f64::NAN, "count").validate().is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let value = serde_json::to_value(Ingredient::new("Oats", "Pantry", 500.0, "g"))
            .expect("Failed to serialize ingredient");

        assert_eq!(value["name"], "Oats");
        assert_eq!(value["type"], "Pantry");
        assert_eq!(value["amount"], 500.0);
        assert_eq!(value["unit"], "g");
        assert_eq!(value["custom"], false);
    }
}
