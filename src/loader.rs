//! Loading crafting data from a game data folder
//!
//! Layout, relative to the data root:
//!
//! ```text
//! games/<game>/root.json    manifest: item_files, recipe_files, crafting_grid_files
//! games/<game>/*.json       top-level arrays of item / recipe / grid records
//! games/<game>/fuels.json   optional, fuel name -> burn value
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::models::{CraftingGrid, Item, Recipe};

const MANIFEST_FILE: &str = "root.json";
const FUELS_FILE: &str = "fuels.json";

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    game: Option<String>,
    #[serde(default)]
    item_files: Vec<String>,
    #[serde(default)]
    recipe_files: Vec<String>,
    #[serde(default)]
    crafting_grid_files: Vec<String>,
}

/// Process-wide store of loaded catalogs, one per game id.
///
/// Each game gets its own slot lock, so concurrent loads of the same game
/// build it once and share the result, while other games load in parallel.
#[derive(Debug, Default)]
pub struct CatalogCache {
    slots: Mutex<HashMap<String, Arc<Mutex<Option<Arc<Catalog>>>>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, game: &str) -> Option<Arc<Catalog>> {
        let slot = self.slots.lock().get(game).cloned()?;
        let cached = slot.lock().clone();
        cached
    }

    /// Cached catalog for `game`, building it with `build` if absent.
    pub fn get_or_try_insert_with<E>(
        &self,
        game: &str,
        build: impl FnOnce() -> Result<Catalog, E>,
    ) -> Result<Arc<Catalog>, E> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(game.to_string()).or_default())
        };

        let mut entry = slot.lock();
        if let Some(catalog) = entry.as_ref() {
            return Ok(Arc::clone(catalog));
        }

        let catalog = Arc::new(build()?);
        info!(game, items = catalog.num_items(), recipes = catalog.num_recipes(), "cached catalog");
        *entry = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads game data folders below a root directory.
#[derive(Debug, Clone)]
pub struct GameLoader {
    root: PathBuf,
    cache: Arc<CatalogCache>,
}

impl GameLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_cache(root, Arc::new(CatalogCache::new()))
    }

    pub fn with_cache(root: impl Into<PathBuf>, cache: Arc<CatalogCache>) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    fn game_dir(&self, game: &str) -> PathBuf {
        self.root.join("games").join(game)
    }

    /// Load (or fetch from the cache) the catalog for `game`.
    pub fn load(&self, game: &str) -> Result<Arc<Catalog>, LoadError> {
        self.cache
            .get_or_try_insert_with(game, || self.read_game(game))
    }

    fn read_game(&self, game: &str) -> Result<Catalog, LoadError> {
        let dir = self.game_dir(game);
        if !dir.is_dir() {
            return Err(LoadError::MissingGameDir {
                game: game.to_string(),
                path: dir,
            });
        }

        let manifest_path = dir.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(LoadError::MissingManifest {
                game: game.to_string(),
            });
        }
        let manifest: Manifest = serde_json::from_value(read_json(&manifest_path)?)
            .map_err(|source| LoadError::Json {
                path: manifest_path.clone(),
                source,
            })?;

        let mut stats = LoadStats::default();

        let mut items = Vec::new();
        for filename in &manifest.item_files {
            items.extend(read_records::<Item>(&dir.join(filename), &mut stats)?);
        }
        let mut recipes = Vec::new();
        for filename in &manifest.recipe_files {
            recipes.extend(read_records::<Recipe>(&dir.join(filename), &mut stats)?);
        }
        let mut grids = Vec::new();
        for filename in &manifest.crafting_grid_files {
            grids.extend(read_records::<CraftingGrid>(&dir.join(filename), &mut stats)?);
        }
        stats.items = items.len();
        stats.recipes = recipes.len();
        stats.crafting_grids = grids.len();

        let fuels = read_fuels(&dir.join(FUELS_FILE))?;
        stats.fuels = fuels.len();

        let name = manifest.game.unwrap_or_else(|| game.to_string());
        let catalog = Catalog::new(name, items, recipes)
            .map_err(|source| LoadError::Catalog {
                game: game.to_string(),
                source,
            })?
            .with_crafting_grids(grids)
            .with_fuels(fuels);

        debug!(game, %stats, "loaded game data");
        Ok(catalog)
    }

    /// Game ids with a manifest below `<root>/games`, sorted
    pub fn list_games(&self) -> Vec<String> {
        let games_dir = self.root.join("games");
        let mut games: Vec<String> = WalkDir::new(&games_dir)
            .min_depth(2)
            .max_depth(2)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|entry| entry.file_name() == MANIFEST_FILE)
            .filter_map(|entry| {
                entry
                    .path()
                    .parent()
                    .and_then(|dir| dir.file_name())
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .collect();
        games.sort();
        games
    }
}

fn read_json(path: &Path) -> Result<Value, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a file holding a top-level array of flat records.
///
/// Elements that aren't objects are skipped.
fn read_records<T: DeserializeOwned>(
    path: &Path,
    stats: &mut LoadStats,
) -> Result<Vec<T>, LoadError> {
    let Value::Array(values) = read_json(path)? else {
        return Err(LoadError::NotAnArray {
            path: path.to_path_buf(),
        });
    };

    let mut records = Vec::with_capacity(values.len());
    for value in values {
        if !value.is_object() {
            warn!(path = %path.display(), "skipping non-object record");
            stats.skipped += 1;
            continue;
        }
        records.push(serde_json::from_value(value).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?);
    }
    stats.files += 1;
    Ok(records)
}

fn read_fuels(path: &Path) -> Result<BTreeMap<String, f64>, LoadError> {
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }

    let fuels: BTreeMap<String, f64> =
        serde_json::from_value(read_json(path)?).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if let Some((name, &value)) = fuels.iter().find(|(_, value)| **value < 0.0) {
        return Err(LoadError::NegativeFuelValue {
            name: name.clone(),
            value,
        });
    }
    Ok(fuels)
}

#[derive(Debug, Default)]
pub struct LoadStats {
    pub files: usize,
    pub items: usize,
    pub recipes: usize,
    pub crafting_grids: usize,
    pub fuels: usize,
    pub skipped: usize,
}

impl std::fmt::Display for LoadStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Loaded {} files ({} items, {} recipes, {} grids, {} fuels). Skipped: {}",
            self.files, self.items, self.recipes, self.crafting_grids, self.fuels, self.skipped
        )
    }
}
