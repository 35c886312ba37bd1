//! Indexed store of a game's items, recipes and fuels

use std::collections::{BTreeMap, HashMap};

use crate::error::CatalogError;
use crate::graph::ItemGraph;
use crate::models::{CraftingGrid, Item, Recipe};

/// All crafting data for one game.
///
/// Built once from fully loaded items and recipes; read-only afterwards.
#[derive(Debug)]
pub struct Catalog {
    name: String,
    items: Vec<Item>,
    recipes: Vec<Recipe>,
    crafting_grids: Vec<CraftingGrid>,
    fuels: BTreeMap<String, f64>,
    item_id_map: HashMap<i64, usize>,
    item_name_map: HashMap<String, usize>,
    recipe_id_map: HashMap<i64, usize>,
    item_graph: ItemGraph,
}

impl Catalog {
    pub fn new(
        name: impl Into<String>,
        items: Vec<Item>,
        recipes: Vec<Recipe>,
    ) -> Result<Self, CatalogError> {
        let mut item_id_map = HashMap::with_capacity(items.len());
        let mut item_name_map = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if let Some(&existing) = item_id_map.get(&item.id) {
                let existing: &Item = &items[existing];
                return Err(CatalogError::DuplicateItemId {
                    id: item.id,
                    name: item.name.clone(),
                    existing: existing.name.clone(),
                });
            }
            if let Some(&existing) = item_name_map.get(&item.name) {
                let existing: &Item = &items[existing];
                return Err(CatalogError::DuplicateItemName {
                    id: item.id,
                    name: item.name.clone(),
                    existing_id: existing.id,
                });
            }
            item_id_map.insert(item.id, idx);
            item_name_map.insert(item.name.clone(), idx);
        }

        let mut recipe_id_map = HashMap::with_capacity(recipes.len());
        for (idx, recipe) in recipes.iter().enumerate() {
            if recipe_id_map.insert(recipe.id, idx).is_some() {
                return Err(CatalogError::DuplicateRecipeId(recipe.id));
            }
        }

        let mut item_graph = ItemGraph::new();
        item_graph.add_items(items.iter().map(|item| item.name.as_str()));
        item_graph.add_recipes(&recipes)?;

        Ok(Self {
            name: name.into(),
            items,
            recipes,
            crafting_grids: Vec::new(),
            fuels: BTreeMap::new(),
            item_id_map,
            item_name_map,
            recipe_id_map,
            item_graph,
        })
    }

    pub fn with_crafting_grids(mut self, crafting_grids: Vec<CraftingGrid>) -> Self {
        self.crafting_grids = crafting_grids;
        self
    }

    pub fn with_fuels(mut self, fuels: BTreeMap<String, f64>) -> Self {
        self.fuels = fuels;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn graph(&self) -> &ItemGraph {
        &self.item_graph
    }

    pub fn fuels(&self) -> &BTreeMap<String, f64> {
        &self.fuels
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    pub fn num_recipes(&self) -> usize {
        self.recipes.len()
    }

    pub fn num_crafting_grids(&self) -> usize {
        self.crafting_grids.len()
    }

    pub fn item_by_id(&self, id: i64) -> Option<&Item> {
        self.item_id_map.get(&id).map(|&idx| &self.items[idx])
    }

    pub fn item_by_name(&self, name: &str) -> Option<&Item> {
        self.item_name_map.get(name).map(|&idx| &self.items[idx])
    }

    pub fn recipe_by_id(&self, id: i64) -> Option<&Recipe> {
        self.recipe_id_map.get(&id).map(|&idx| &self.recipes[idx])
    }

    /// Every recipe that yields `item`, in catalog order
    pub fn recipes_for_item<'a>(&'a self, item: &'a str) -> impl Iterator<Item = &'a Recipe> + 'a {
        self.recipes.iter().filter(move |recipe| recipe.has_product(item))
    }

    /// How many units of `item` one craft yields, from the first recipe
    /// producing it; 1 when nothing produces it.
    pub fn output_count(&self, item: &str) -> f64 {
        self.recipes_for_item(item)
            .next()
            .and_then(|recipe| recipe.products.get(item).copied())
            .unwrap_or(1.0)
    }

    pub fn crafting_grids_for_item<'a>(
        &'a self,
        item: &'a str,
    ) -> impl Iterator<Item = &'a CraftingGrid> + 'a {
        self.crafting_grids
            .iter()
            .filter(move |grid| grid.has_product(item))
    }

    pub fn fuel_value(&self, fuel: &str) -> Option<f64> {
        self.fuels.get(fuel).copied()
    }
}
