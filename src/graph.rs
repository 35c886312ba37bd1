//! Item dependency graph
//!
//! Nodes are item names. An edge `ingredient -> product` carries the number
//! of ingredient units consumed per single unit of product. Only the first
//! recipe seen for a product contributes its incoming edges, so every item
//! has at most one way of being crafted.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::fmt::Write;

use petgraph::Direction;
use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::warn;

use crate::error::GraphError;
use crate::models::Recipe;

/// Slack for float noise in amounts derived from edge weights, which are
/// stored as `input / output` and rarely exact.
pub(crate) const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct ItemGraph {
    graph: DiGraph<String, f64>,
    nodes: HashMap<String, NodeIndex>,
}

impl ItemGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    fn index(&self, name: &str) -> Option<NodeIndex> {
        self.nodes.get(name).copied()
    }

    pub fn add_items<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.node(name.as_ref());
        }
    }

    /// Add the edges of each recipe, skipping products that already have one.
    ///
    /// Say "2x Brick -> Pillar" and later "3x Stone -> Pillar" are added: only
    /// the bricks end up connected to the pillar. Returns the number of
    /// skipped products.
    pub fn add_recipes<'a, I>(&mut self, recipes: I) -> Result<usize, GraphError>
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        let mut skipped = 0;

        for recipe in recipes {
            if recipe.products.is_empty() {
                warn!(recipe_id = recipe.id, "ignoring recipe without products");
                continue;
            }

            for (output, &output_count) in &recipe.products {
                check_quantity(recipe.id, output, output_count)?;

                if self.has_recipe_for(output) {
                    warn!(
                        recipe_id = recipe.id,
                        product = %output,
                        "skipping recipe, product already covered by an earlier recipe"
                    );
                    skipped += 1;
                    continue;
                }

                let product = self.node(output);
                for (ingredient, &input_count) in &recipe.ingredients {
                    check_quantity(recipe.id, ingredient, input_count)?;
                    let source = self.node(ingredient);
                    self.graph
                        .update_edge(source, product, input_count / output_count);
                }
            }
        }

        Ok(skipped)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.nodes.contains_key(item)
    }

    pub fn num_items(&self) -> usize {
        self.graph.node_count()
    }

    pub fn num_edges(&self) -> usize {
        self.graph.edge_count()
    }

    /// All item names, sorted
    pub fn item_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn has_recipe_for(&self, item: &str) -> bool {
        self.in_degree(item) > 0
    }

    /// Direct ingredients of `item` with their per-unit weights.
    ///
    /// Empty when the item can't be crafted or isn't in the graph.
    pub fn recipe_for(&self, item: &str) -> BTreeMap<String, f64> {
        let Some(idx) = self.index(item) else {
            return BTreeMap::new();
        };
        self.graph
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| (self.graph[edge.source()].clone(), *edge.weight()))
            .collect()
    }

    /// Weight of the direct edge `ingredient -> product`
    pub fn weight(&self, ingredient: &str, product: &str) -> Option<f64> {
        let edge = self
            .graph
            .find_edge(self.index(ingredient)?, self.index(product)?)?;
        self.graph.edge_weight(edge).copied()
    }

    pub fn in_degree(&self, item: &str) -> usize {
        self.degree(item, Direction::Incoming)
    }

    pub fn out_degree(&self, item: &str) -> usize {
        self.degree(item, Direction::Outgoing)
    }

    fn degree(&self, item: &str, direction: Direction) -> usize {
        self.index(item)
            .map_or(0, |idx| self.graph.neighbors_directed(idx, direction).count())
    }

    pub fn predecessors(&self, item: &str) -> Vec<String> {
        self.neighbors(item, Direction::Incoming)
    }

    pub fn successors(&self, item: &str) -> Vec<String> {
        self.neighbors(item, Direction::Outgoing)
    }

    fn neighbors(&self, item: &str, direction: Direction) -> Vec<String> {
        let Some(idx) = self.index(item) else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .graph
            .neighbors_directed(idx, direction)
            .map(|n| self.graph[n].clone())
            .collect();
        names.sort();
        names
    }

    /// Items reachable from `item` following edges in `direction`, `item` excluded
    /// unless it sits on a cycle.
    pub fn reachable(&self, item: &str, direction: Direction) -> HashSet<String> {
        let Some(start) = self.index(item) else {
            return HashSet::new();
        };

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(idx) = queue.pop_front() {
            for next in self.graph.neighbors_directed(idx, direction) {
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        seen.into_iter().map(|idx| self.graph[idx].clone()).collect()
    }

    /// Subgraph induced by `item` and every item that can reach it.
    pub fn reverse_reachable_subgraph(&self, item: &str) -> Option<ItemGraph> {
        let root = self.index(item)?;

        let mut keep = self.reachable(item, Direction::Incoming);
        keep.insert(self.graph[root].clone());

        let graph = self.graph.filter_map(
            |_, name| keep.contains(name).then(|| name.clone()),
            |_, weight| Some(*weight),
        );
        let nodes = graph
            .node_indices()
            .map(|idx| (graph[idx].clone(), idx))
            .collect();

        Some(ItemGraph { graph, nodes })
    }

    /// Lowest total-weight path from `from` to `to`, both ends included.
    pub fn shortest_path(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let start = self.index(from)?;
        let goal = self.index(to)?;

        let (_, path) = astar(
            &self.graph,
            start,
            |n| n == goal,
            |edge| *edge.weight(),
            |_| 0.0,
        )?;

        Some(path.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    /// Average number of unique ingredients over items that have a recipe.
    ///
    /// With "2x Sticks, 3x Iron Ingot -> 1x Iron Pickaxe" and
    /// "0.25x Planks -> 1x Sticks" this is (2 + 1) / 2 = 1.5.
    pub fn avg_unique_ingredients_per_item(&self) -> f64 {
        let counts: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .filter(|&count| count > 0)
            .collect();

        if counts.is_empty() {
            return 0.0;
        }
        counts.iter().sum::<usize>() as f64 / counts.len() as f64
    }

    pub fn avg_ingredient_amount(&self) -> f64 {
        if self.graph.edge_count() == 0 {
            return 0.0;
        }
        self.graph.edge_weights().sum::<f64>() / self.graph.edge_count() as f64
    }

    pub fn min_ingredient_amount(&self) -> f64 {
        self.graph
            .edge_weights()
            .copied()
            .reduce(f64::min)
            .unwrap_or(0.0)
    }

    pub fn max_ingredient_amount(&self) -> f64 {
        self.graph
            .edge_weights()
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Graphviz rendering, for drawing with an external tool
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph items {\n");
        let mut indices: Vec<NodeIndex> = self.graph.node_indices().collect();
        indices.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));

        for idx in &indices {
            let _ = writeln!(out, "    {} [label = {:?}]", idx.index(), self.graph[*idx]);
        }
        for edge in self.graph.edge_references() {
            let _ = writeln!(
                out,
                "    {} -> {} [label = \"{}\"]",
                edge.source().index(),
                edge.target().index(),
                edge.weight()
            );
        }
        out.push_str("}\n");
        out
    }
}

fn check_quantity(recipe_id: i64, item: &str, quantity: f64) -> Result<(), GraphError> {
    if quantity.is_finite() && quantity > 0.0 {
        Ok(())
    } else {
        Err(GraphError::NonPositiveQuantity {
            recipe_id,
            item: item.to_string(),
            quantity,
        })
    }
}
