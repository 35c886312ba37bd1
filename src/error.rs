//! Error types for catalog construction, loading and queries

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("recipe {recipe_id} lists {item} with non-positive quantity {quantity}")]
    NonPositiveQuantity {
        recipe_id: i64,
        item: String,
        quantity: f64,
    },
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("can't add item {name}[id={id}], ID conflict with {existing}[id={id}]")]
    DuplicateItemId { id: i64, name: String, existing: String },

    #[error("can't add item {name}[id={id}], name conflict with {name}[id={existing_id}]")]
    DuplicateItemName { id: i64, name: String, existing_id: i64 },

    #[error("can't add recipe[id={0}], ID conflict with an existing recipe")]
    DuplicateRecipeId(i64),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no data folder for game {game} at {}", path.display())]
    MissingGameDir { game: String, path: PathBuf },

    #[error("no root.json found in data folder for {game}")]
    MissingManifest { game: String },

    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("top-level JSON value in {} must be an array", path.display())]
    NotAnArray { path: PathBuf },

    #[error("fuel {name} has negative burn value {value}")]
    NegativeFuelValue { name: String, value: f64 },

    #[error("invalid crafting data for game {game}")]
    Catalog {
        game: String,
        #[source]
        source: CatalogError,
    },
}

#[derive(Debug, Error, PartialEq)]
pub enum QueryError {
    #[error("invalid number of crafts: {0}")]
    InvalidCraftCount(f64),

    #[error("unknown fuel type: {0}")]
    UnknownFuel(String),

    #[error("fuel {0} has a burn value of zero")]
    ZeroBurnValue(String),
}
