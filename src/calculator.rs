//! Ratio and craftable-amount calculations

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::Direction;

use crate::catalog::Catalog;
use crate::graph::{EPSILON, ItemGraph};
use crate::plan::Walk;

/// Amount of `ingredient` needed to craft one `product`.
///
/// With "1x Planks -> 4x Sticks" and "2x Sticks, 3x Iron Ingot -> 1x Iron Pickaxe"
/// a recursive lookup gives 0.5 Planks per Iron Pickaxe: ratios along the
/// cheapest path are multiplied. Returns `None` when there is no connection.
pub fn amount_needed_for(
    graph: &ItemGraph,
    ingredient: &str,
    product: &str,
    recursive: bool,
) -> Option<f64> {
    if !recursive {
        return graph.weight(ingredient, product);
    }

    let path = graph.shortest_path(ingredient, product)?;
    path.windows(2)
        .map(|edge| graph.weight(&edge[0], &edge[1]))
        .product()
}

/// Maximum whole amount of `product` craftable from `inventory`.
///
/// Every ingredient limits the result on its own; the smallest limit wins
/// and is rounded down to whole crafts of the product's recipe. When
/// `recursive` is set, missing ingredients may themselves be crafted from
/// what is on hand, and every unit in the inventory is spent only once
/// across all the recipes that need it.
pub fn amount_craftable_with(
    catalog: &Catalog,
    inventory: &HashMap<String, f64>,
    product: &str,
    recursive: bool,
) -> f64 {
    let graph = catalog.graph();
    let output_count = catalog.output_count(product);

    if !recursive {
        let bottleneck = graph
            .recipe_for(product)
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(ingredient, weight)| available(inventory, ingredient) / weight)
            .reduce(f64::min)
            .unwrap_or(0.0);
        return whole_crafts(bottleneck, output_count) as f64 * output_count;
    }

    let mut craft = RecursiveCraft {
        graph,
        inventory,
        memo: HashMap::new(),
        visiting: HashSet::new(),
    };
    let estimate = whole_crafts(craft.craftable(product), output_count);

    let mut walk = Walk::new(graph);
    walk.visit(product);
    let fits =
        |crafts: u64| can_supply(&walk, inventory, product, crafts as f64 * output_count);

    // Grow from the estimate until it no longer fits, then bisect.
    let mut lo = 0;
    let mut hi = estimate.max(1);
    while hi < MAX_CRAFTS && fits(hi) {
        lo = hi;
        hi = hi.saturating_mul(2).min(MAX_CRAFTS);
    }
    while lo < hi {
        let mid = lo + (hi - lo).div_ceil(2);
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }

    lo as f64 * output_count
}

/// Cap on the number of crafts searched, the largest count an f64 holds exactly.
const MAX_CRAFTS: u64 = 1 << 53;

fn available(inventory: &HashMap<String, f64>, item: &str) -> f64 {
    inventory.get(item).copied().unwrap_or(0.0).max(0.0)
}

fn whole_crafts(amount: f64, output_count: f64) -> u64 {
    if !amount.is_finite() || amount <= 0.0 || output_count <= 0.0 {
        return 0;
    }
    (amount / output_count + EPSILON).floor() as u64
}

/// Whether `inventory` covers `amount` of `product`, crafting whatever
/// intermediates are short.
///
/// Items are settled consumers first, so an item's full demand is known
/// before its stock is spent; only the shortfall is passed on to its
/// ingredients. An ingredient reached through a cycle can only be taken
/// from stock. The product's own stock is not counted towards itself.
fn can_supply(
    walk: &Walk<'_>,
    inventory: &HashMap<String, f64>,
    product: &str,
    amount: f64,
) -> bool {
    let graph = walk.graph();
    let mut stock: HashMap<String, f64> = HashMap::new();
    let mut demand: HashMap<String, f64> = HashMap::from([(product.to_string(), amount)]);

    for item in walk.consumers_first() {
        let needed = demand.get(item).copied().unwrap_or(0.0);
        if needed <= EPSILON {
            continue;
        }

        let shortfall = if item == product {
            needed
        } else {
            let left = stock
                .entry(item.clone())
                .or_insert_with(|| available(inventory, item));
            let used = left.min(needed);
            *left -= used;
            needed - used
        };
        if shortfall <= EPSILON {
            continue;
        }

        let ingredients = graph.recipe_for(item);
        if ingredients.is_empty() {
            return false;
        }
        for (ingredient, weight) in ingredients {
            let required = shortfall * weight;
            if walk.is_back_edge(&ingredient, item) {
                let left = stock
                    .entry(ingredient.clone())
                    .or_insert_with(|| available(inventory, &ingredient));
                if *left + EPSILON < required {
                    return false;
                }
                *left = (*left - required).max(0.0);
            } else {
                *demand.entry(ingredient).or_default() += required;
            }
        }
    }

    true
}

/// Top-down propagation over everything that feeds into a product.
///
/// `synthesizable(n)` is what is on hand plus what can be crafted; an item
/// already on the current path only counts its inventory, which cuts cycles.
/// Branches don't share stock here, so the result is only a starting point
/// for the search in `amount_craftable_with`.
struct RecursiveCraft<'a> {
    graph: &'a ItemGraph,
    inventory: &'a HashMap<String, f64>,
    memo: HashMap<String, f64>,
    visiting: HashSet<String>,
}

impl RecursiveCraft<'_> {
    fn synthesizable(&mut self, item: &str) -> f64 {
        let on_hand = available(self.inventory, item);
        if self.visiting.contains(item) {
            return on_hand;
        }
        if let Some(&amount) = self.memo.get(item) {
            return amount;
        }

        let amount = on_hand + self.craftable(item);
        self.memo.insert(item.to_string(), amount);
        amount
    }

    fn craftable(&mut self, item: &str) -> f64 {
        let ingredients = self.graph.recipe_for(item);
        if ingredients.is_empty() {
            return 0.0;
        }

        self.visiting.insert(item.to_string());
        let mut limit = f64::INFINITY;
        for (ingredient, weight) in ingredients {
            if weight <= 0.0 {
                continue;
            }
            limit = limit.min(self.synthesizable(&ingredient) / weight);
            if limit <= 0.0 {
                break;
            }
        }
        self.visiting.remove(item);

        if limit.is_finite() { limit } else { 0.0 }
    }
}

/// Items that can be crafted from `ingredient`.
///
/// Starting with Planks one can craft Sticks directly, and an Iron Pickaxe
/// from the Sticks, so a recursive lookup lists both.
pub fn possible_products(graph: &ItemGraph, ingredient: &str, recursive: bool) -> Vec<String> {
    if !recursive {
        return graph.successors(ingredient);
    }

    let mut products: BTreeSet<String> = graph
        .reachable(ingredient, Direction::Outgoing)
        .into_iter()
        .collect();
    products.remove(ingredient);
    products.into_iter().collect()
}
