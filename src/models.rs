//! Data models for items, recipes and crafting grids

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub sources: BTreeSet<String>, // e.g. "Crafting", "Mining", "Mob drop"
}

impl Item {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        sources: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            sources: sources.into_iter().collect(),
        }
    }
}

/// A crafting, cooking or smelting recipe.
///
/// All three mappings are keyed by item name. `requirements` are needed to
/// use the recipe (a furnace, a crafting table) but are not consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: i64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub requirements: BTreeMap<String, f64>,
    #[serde(default)]
    pub ingredients: BTreeMap<String, f64>,
    #[serde(default)]
    pub products: BTreeMap<String, f64>,
}

impl Recipe {
    pub fn new(id: i64, category: impl Into<String>) -> Self {
        Self {
            id,
            category: category.into(),
            requirements: BTreeMap::new(),
            ingredients: BTreeMap::new(),
            products: BTreeMap::new(),
        }
    }

    pub fn requirement(mut self, item: impl Into<String>, amount: f64) -> Self {
        self.requirements.insert(item.into(), amount);
        self
    }

    pub fn ingredient(mut self, item: impl Into<String>, amount: f64) -> Self {
        self.ingredients.insert(item.into(), amount);
        self
    }

    pub fn product(mut self, item: impl Into<String>, amount: f64) -> Self {
        self.products.insert(item.into(), amount);
        self
    }

    pub fn has_ingredient(&self, ingredient: &str) -> bool {
        self.ingredients.contains_key(ingredient)
    }

    pub fn has_product(&self, product: &str) -> bool {
        self.products.contains_key(product)
    }

    /// Ingredients consumed by crafting this recipe `num_crafts` times.
    ///
    /// Zero crafts gives an empty map.
    pub fn ingredients_for(&self, num_crafts: f64) -> Result<BTreeMap<String, f64>, QueryError> {
        if num_crafts.is_nan() || num_crafts < 0.0 {
            return Err(QueryError::InvalidCraftCount(num_crafts));
        }
        if num_crafts == 0.0 {
            return Ok(BTreeMap::new());
        }

        Ok(self
            .ingredients
            .iter()
            .map(|(name, amount)| (name.clone(), amount * num_crafts))
            .collect())
    }

    /// Whole number of crafts needed to end up with at least `amount` of `product`.
    ///
    /// Returns `Ok(None)` when this recipe does not yield `product`.
    pub fn num_crafts_for(&self, product: &str, amount: f64) -> Result<Option<u64>, QueryError> {
        if amount.is_nan() || amount < 0.0 {
            return Err(QueryError::InvalidCraftCount(amount));
        }
        Ok(self
            .products
            .get(product)
            .filter(|per_craft| **per_craft > 0.0)
            .map(|per_craft| (amount / per_craft).ceil() as u64))
    }
}

/// Shaped crafting layout, cell ("A1".."C3") to item name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CraftingGrid {
    #[serde(default)]
    pub product: String,
    #[serde(default)]
    pub crafting_coordinates: BTreeMap<String, String>,
}

impl CraftingGrid {
    pub fn has_product(&self, product: &str) -> bool {
        self.product == product
    }

    /// Item placed in a cell, `None` for missing or "empty" cells
    pub fn cell(&self, coordinate: &str) -> Option<&str> {
        self.crafting_coordinates
            .get(coordinate)
            .map(String::as_str)
            .filter(|item| !item.is_empty() && *item != "empty")
    }
}

/// One step of a recipe chain: a recipe with its identity, category and
/// requirements stripped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecipeStep {
    pub ingredients: BTreeMap<String, f64>,
    pub products: BTreeMap<String, f64>,
}

impl From<&Recipe> for RecipeStep {
    fn from(recipe: &Recipe) -> Self {
        Self {
            ingredients: recipe.ingredients.clone(),
            products: recipe.products.clone(),
        }
    }
}
