//! Resource classification by position in the dependency graph
//!
//! - basic: never crafted, but used as an ingredient (Dirt, Logs)
//! - intermediate: crafted and used again (Iron Ingot, Sticks)
//! - advanced: crafted but used nowhere (Iron Pickaxe)

use std::collections::{BTreeMap, BTreeSet};

use crate::graph::ItemGraph;
use crate::plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Basic,
    Intermediate,
    Advanced,
}

impl ResourceKind {
    pub fn of(graph: &ItemGraph, item: &str) -> Option<Self> {
        match (graph.in_degree(item) > 0, graph.out_degree(item) > 0) {
            (false, true) => Some(Self::Basic),
            (true, true) => Some(Self::Intermediate),
            (true, false) => Some(Self::Advanced),
            (false, false) => None,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

fn resources_of_kind(graph: &ItemGraph, kind: ResourceKind) -> Vec<String> {
    graph
        .item_names()
        .into_iter()
        .filter(|item| ResourceKind::of(graph, item) == Some(kind))
        .collect()
}

pub fn basic_resources(graph: &ItemGraph) -> Vec<String> {
    resources_of_kind(graph, ResourceKind::Basic)
}

pub fn intermediate_resources(graph: &ItemGraph) -> Vec<String> {
    resources_of_kind(graph, ResourceKind::Intermediate)
}

pub fn advanced_resources(graph: &ItemGraph) -> Vec<String> {
    resources_of_kind(graph, ResourceKind::Advanced)
}

/// Basic resources needed for one `item`, with the amount of each.
///
/// Logs are a basic resource for an Iron Pickaxe even though only Sticks
/// go into the pickaxe itself, because Sticks come from Planks and Planks
/// from Logs. Without `recursive` only direct ingredients are considered.
pub fn basic_resources_for(
    graph: &ItemGraph,
    item: &str,
    recursive: bool,
) -> BTreeMap<String, f64> {
    resources_for(graph, item, recursive, ResourceKind::Basic)
}

/// Intermediate resources needed for one `item`, with the amount of each.
pub fn intermediate_resources_for(
    graph: &ItemGraph,
    item: &str,
    recursive: bool,
) -> BTreeMap<String, f64> {
    resources_for(graph, item, recursive, ResourceKind::Intermediate)
}

fn resources_for(
    graph: &ItemGraph,
    item: &str,
    recursive: bool,
    kind: ResourceKind,
) -> BTreeMap<String, f64> {
    let candidates = if recursive {
        let Some(subgraph) = graph.reverse_reachable_subgraph(item) else {
            return BTreeMap::new();
        };
        let demand = plan::propagate_demand(&subgraph, &BTreeMap::from([(item.to_string(), 1.0)]));
        demand
            .into_iter()
            .filter(|(name, _)| name != item)
            .collect::<BTreeMap<_, _>>()
    } else {
        graph.recipe_for(item)
    };

    // Classify against the whole graph: an item used elsewhere is still intermediate.
    candidates
        .into_iter()
        .filter(|(name, _)| ResourceKind::of(graph, name) == Some(kind))
        .collect()
}

/// Pairs of items that can be crafted into each other, e.g. Gold Ingot and
/// Gold Nugget. Each pair is listed once, in name order.
pub fn recyclables(graph: &ItemGraph) -> Vec<(String, String)> {
    let mut pairs = BTreeSet::new();
    for item in graph.item_names() {
        for product in graph.successors(&item) {
            if item < product && graph.weight(&product, &item).is_some() {
                pairs.insert((item.clone(), product));
            }
        }
    }
    pairs.into_iter().collect()
}
