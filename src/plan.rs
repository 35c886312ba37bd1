//! Crafting plans: everything needed for a set of products, in crafting order

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::catalog::Catalog;
use crate::error::QueryError;
use crate::graph::{EPSILON, ItemGraph};

/// Bill of materials for a set of desired products.
///
/// `steps` lists every item to gather or craft with its amount, ordered so an
/// item's ingredients always come before it. `leftovers` holds the surplus
/// from rounding up to whole crafts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CraftingPlan {
    pub steps: Vec<(String, f64)>,
    pub leftovers: BTreeMap<String, f64>,
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    Active,
    Done,
}

/// Depth-first walk over ingredients. Edges back into an item still being
/// walked are recorded so cycles (Gold Ingot <-> Gold Nugget) can be ignored.
pub(crate) struct Walk<'a> {
    graph: &'a ItemGraph,
    state: HashMap<String, Visit>,
    order: Vec<String>,
    back_edges: HashSet<(String, String)>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(graph: &'a ItemGraph) -> Self {
        Self {
            graph,
            state: HashMap::new(),
            order: Vec::new(),
            back_edges: HashSet::new(),
        }
    }

    pub(crate) fn visit(&mut self, item: &str) {
        if self.state.contains_key(item) {
            return;
        }
        self.state.insert(item.to_string(), Visit::Active);

        for ingredient in self.graph.predecessors(item) {
            match self.state.get(&ingredient) {
                Some(Visit::Active) => {
                    self.back_edges.insert((ingredient, item.to_string()));
                }
                Some(Visit::Done) => {}
                None => self.visit(&ingredient),
            }
        }

        self.state.insert(item.to_string(), Visit::Done);
        self.order.push(item.to_string());
    }

    pub(crate) fn graph(&self) -> &'a ItemGraph {
        self.graph
    }

    /// Visited items, every consumer ahead of its ingredients.
    pub(crate) fn consumers_first(&self) -> impl Iterator<Item = &String> {
        self.order.iter().rev()
    }

    pub(crate) fn is_back_edge(&self, ingredient: &str, product: &str) -> bool {
        self.back_edges
            .contains(&(ingredient.to_string(), product.to_string()))
    }

    /// Push demand from every product down to its ingredients. Consumers are
    /// handled before their ingredients, so each item's total is final by
    /// the time it is expanded.
    fn demand(&self, targets: &BTreeMap<String, f64>) -> HashMap<String, f64> {
        let mut demand: HashMap<String, f64> = targets.clone().into_iter().collect();

        for item in self.consumers_first() {
            let needed = demand.get(item).copied().unwrap_or(0.0);
            if needed <= 0.0 {
                continue;
            }
            for (ingredient, weight) in self.graph.recipe_for(item) {
                if self.is_back_edge(&ingredient, item) {
                    continue;
                }
                *demand.entry(ingredient).or_default() += needed * weight;
            }
        }

        demand
    }
}

/// Fractional amount of every item needed for `targets`, targets included.
pub fn propagate_demand(
    graph: &ItemGraph,
    targets: &BTreeMap<String, f64>,
) -> BTreeMap<String, f64> {
    let mut walk = Walk::new(graph);
    for item in targets.keys() {
        walk.visit(item);
    }
    walk.demand(targets)
        .into_iter()
        .filter(|(_, amount)| *amount > 0.0)
        .collect()
}

/// Plan the crafting of `products` (item name to desired amount).
///
/// For 23 Iron Pickaxes this lists Coal, Raw Iron, Iron Ingot, Logs, Planks,
/// Sticks and the pickaxes, with 2 Sticks left over because Sticks come in
/// batches of 4.
pub fn make_crafting_plan(
    catalog: &Catalog,
    products: &BTreeMap<String, f64>,
) -> Result<CraftingPlan, QueryError> {
    if let Some(&bad) = products.values().find(|amount| !amount.is_finite() || **amount < 0.0) {
        return Err(QueryError::InvalidCraftCount(bad));
    }

    let graph = catalog.graph();
    let mut walk = Walk::new(graph);
    for item in products.keys() {
        walk.visit(item);
    }
    let demand = walk.demand(products);

    let mut plan = CraftingPlan::default();
    for item in &walk.order {
        let needed = demand.get(item).copied().unwrap_or(0.0);
        if needed <= 0.0 {
            continue;
        }

        let planned = if graph.has_recipe_for(item) {
            let per_craft = catalog.output_count(item);
            (needed / per_craft - EPSILON).ceil() * per_craft
        } else {
            (needed - EPSILON).ceil()
        };

        let leftover = planned - needed;
        if leftover > EPSILON {
            plan.leftovers.insert(item.clone(), leftover);
        }
        plan.steps.push((item.clone(), planned));
    }

    Ok(plan)
}

impl fmt::Display for CraftingPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Crafting Plan ===")?;
        for (item, amount) in &self.steps {
            writeln!(f, "  {:>8} {}", amount, item)?;
        }

        if !self.leftovers.is_empty() {
            writeln!(f)?;
            writeln!(f, "Leftovers:")?;
            for (item, amount) in &self.leftovers {
                writeln!(f, "  {:>8.3} {}", amount, item)?;
            }
        }

        Ok(())
    }
}
