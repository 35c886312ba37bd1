//! Crafting economy calculator
//!
//! Loads item and recipe data for a game, builds the item dependency graph
//! and answers questions about it: conversion ratios, how much can be
//! crafted from an inventory, and which recipes lead from one item to
//! another.

pub mod calculator;
pub mod catalog;
pub mod chain;
pub mod error;
pub mod fuel;
pub mod graph;
pub mod loader;
pub mod models;
pub mod plan;
pub mod resources;

pub use catalog::Catalog;
pub use error::{CatalogError, GraphError, LoadError, QueryError};
pub use graph::ItemGraph;
pub use loader::{CatalogCache, GameLoader};
pub use models::{CraftingGrid, Item, Recipe, RecipeStep};
