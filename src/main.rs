//! Crafting Calculator
//!
//! Command-line front end for querying a game's crafting data.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crafting_calculator::resources::{self, ResourceKind};
use crafting_calculator::{GameLoader, calculator, chain, fuel, plan};

#[derive(Parser)]
#[command(name = "crafting-calculator")]
#[command(about = "Crafting economy calculator for game item and recipe data")]
struct Cli {
    /// Root directory holding games/<game>/root.json
    #[arg(short, long, env = "CRAFT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Game to load (e.g., "minecraft")
    #[arg(short, long, env = "CRAFT_GAME", default_value = "minecraft")]
    game: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List games available in the data directory
    Games,

    /// Show item, recipe and graph statistics
    Stats,

    /// Show an item and the recipes that produce it
    Item {
        /// Item name (e.g., "Iron Pickaxe")
        name: String,

        /// Also show how many crafts yield this many items
        #[arg(short, long)]
        amount: Option<f64>,
    },

    /// Amount of an ingredient needed for one unit of a product
    Needed {
        ingredient: String,
        product: String,

        /// Follow intermediate recipes
        #[arg(short, long)]
        recursive: bool,
    },

    /// Maximum amount of a product craftable from an inventory
    Craftable {
        product: String,

        /// Inventory entries as NAME=AMOUNT (e.g., "Logs=10")
        #[arg(required = true, value_parser = parse_amount)]
        inventory: Vec<(String, f64)>,

        /// Craft missing intermediates from what is on hand
        #[arg(short, long)]
        recursive: bool,
    },

    /// Recipe steps leading from one item to another
    Chain {
        ingredient: String,
        product: String,

        /// Put repeated ingredients into the first step that uses them
        #[arg(short, long)]
        combine: bool,
    },

    /// List basic, intermediate and advanced resources
    Resources {
        /// Only resources needed for this item
        #[arg(long = "for")]
        item: Option<String>,

        /// Include indirect ingredients when using --for
        #[arg(short, long)]
        recursive: bool,
    },

    /// List item pairs that can be crafted into each other
    Recyclables,

    /// Items that can be crafted from an ingredient
    Products {
        ingredient: String,

        #[arg(short, long)]
        recursive: bool,
    },

    /// Full crafting plan for a set of products
    Plan {
        /// Desired products as NAME=AMOUNT (e.g., "Iron Pickaxe=23")
        #[arg(required = true, value_parser = parse_amount)]
        products: Vec<(String, f64)>,
    },

    /// Convert an amount of one fuel into another
    Fuel {
        amount: f64,

        /// Target fuel (e.g., "Logs")
        to: String,

        /// Fuel to convert from
        #[arg(long, default_value = "Coal")]
        from: String,
    },

    /// Show the crafting grid for an item
    Grid { item: String },

    /// Print the item graph in Graphviz DOT format
    Dot {
        /// Only the part of the graph that leads into this item
        #[arg(long = "for")]
        item: Option<String>,
    },
}

fn parse_amount(s: &str) -> Result<(String, f64), String> {
    let (name, amount) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=AMOUNT, got '{}'", s))?;
    let amount: f64 = amount
        .trim()
        .parse()
        .map_err(|e| format!("invalid amount in '{}': {}", s, e))?;
    Ok((name.trim().to_string(), amount))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = GameLoader::new(&cli.data_dir);

    let load = || {
        loader
            .load(&cli.game)
            .with_context(|| format!("Failed to load data for game '{}'", cli.game))
    };

    match cli.command {
        Commands::Games => {
            let games = loader.list_games();
            if games.is_empty() {
                println!("No games found in {}", cli.data_dir.display());
            } else {
                for game in games {
                    println!("  {}", game);
                }
            }
        }

        Commands::Stats => {
            let catalog = load()?;
            let graph = catalog.graph();
            println!("Game: {}", catalog.name());
            println!("  Items:          {}", catalog.num_items());
            println!("  Recipes:        {}", catalog.num_recipes());
            println!("  Crafting grids: {}", catalog.num_crafting_grids());
            println!("  Fuels:          {}", catalog.fuels().len());
            println!("  Graph nodes:    {}", graph.num_items());
            println!("  Graph edges:    {}", graph.num_edges());
            println!(
                "  Avg unique ingredients per item: {:.3}",
                graph.avg_unique_ingredients_per_item()
            );
            println!(
                "  Ingredient amount: avg {:.3}, min {:.3}, max {:.3}",
                graph.avg_ingredient_amount(),
                graph.min_ingredient_amount(),
                graph.max_ingredient_amount()
            );
        }

        Commands::Item { name, amount } => {
            let catalog = load()?;
            let Some(item) = catalog.item_by_name(&name) else {
                bail!("Item '{}' not found", name);
            };
            println!("Item: {}", item.name);
            println!("  ID: {}", item.id);
            if !item.sources.is_empty() {
                let sources: Vec<&str> = item.sources.iter().map(String::as_str).collect();
                println!("  Obtained by: {}", sources.join(", "));
            }

            for recipe in catalog.recipes_for_item(&name) {
                println!("  Recipe {} ({}):", recipe.id, recipe.category);
                for (ingredient, qty) in &recipe.ingredients {
                    println!("    consumes {} {}", qty, ingredient);
                }
                for (requirement, qty) in &recipe.requirements {
                    println!("    requires {} {}", qty, requirement);
                }
                if let Some(amount) = amount {
                    if let Some(crafts) = recipe.num_crafts_for(&name, amount)? {
                        println!("    {} craft(s) for {} {}", crafts, amount, name);
                    }
                }
            }
        }

        Commands::Needed {
            ingredient,
            product,
            recursive,
        } => {
            let catalog = load()?;
            let graph = catalog.graph();
            match calculator::amount_needed_for(graph, &ingredient, &product, recursive) {
                Some(amount) => println!(
                    "{:.4} {} is needed to craft one {}",
                    amount, ingredient, product
                ),
                None => println!("{} is not used to craft {}", ingredient, product),
            }
        }

        Commands::Craftable {
            product,
            inventory,
            recursive,
        } => {
            let catalog = load()?;
            let inventory: HashMap<String, f64> = inventory.into_iter().collect();
            let amount =
                calculator::amount_craftable_with(&catalog, &inventory, &product, recursive);
            println!("With this inventory you can craft {} {}", amount, product);
        }

        Commands::Chain {
            ingredient,
            product,
            combine,
        } => {
            let catalog = load()?;
            match chain::recipe_chain(&catalog, &ingredient, &product, combine) {
                Some(steps) => {
                    println!("Make {} from {}:", product, ingredient);
                    print!("{}", chain::format_recipe_chain(&steps));
                }
                None => println!("No recipe chain from {} to {}", ingredient, product),
            }
        }

        Commands::Resources { item, recursive } => {
            let catalog = load()?;
            let graph = catalog.graph();
            match item {
                Some(item) => {
                    let groups = [
                        (
                            ResourceKind::Basic,
                            resources::basic_resources_for(graph, &item, recursive),
                        ),
                        (
                            ResourceKind::Intermediate,
                            resources::intermediate_resources_for(graph, &item, recursive),
                        ),
                    ];
                    for (kind, needed) in groups {
                        println!("{} resources for {}:", kind.display_name(), item);
                        for (name, amount) in needed {
                            println!("  {:.3} {}", amount, name);
                        }
                    }
                }
                None => {
                    let groups = [
                        (ResourceKind::Basic, resources::basic_resources(graph)),
                        (ResourceKind::Intermediate, resources::intermediate_resources(graph)),
                        (ResourceKind::Advanced, resources::advanced_resources(graph)),
                    ];
                    for (kind, names) in groups {
                        println!("{} resources ({}):", kind.display_name(), names.len());
                        for name in names {
                            println!("  {}", name);
                        }
                    }
                }
            }
        }

        Commands::Recyclables => {
            let catalog = load()?;
            let pairs = resources::recyclables(catalog.graph());
            if pairs.is_empty() {
                println!("No recyclable items.");
            }
            for (a, b) in pairs {
                println!("  {} <-> {}", a, b);
            }
        }

        Commands::Products {
            ingredient,
            recursive,
        } => {
            let catalog = load()?;
            let products = calculator::possible_products(catalog.graph(), &ingredient, recursive);
            println!("Craftable from {}:", ingredient);
            for product in products {
                println!("  {}", product);
            }
        }

        Commands::Plan { products } => {
            let catalog = load()?;
            let mut desired = BTreeMap::new();
            for (name, amount) in products {
                *desired.entry(name).or_insert(0.0) += amount;
            }
            let crafting_plan = plan::make_crafting_plan(&catalog, &desired)?;
            print!("{}", crafting_plan);
        }

        Commands::Fuel { amount, to, from } => {
            let catalog = load()?;
            println!("{}", fuel::describe_fuel_conversion(&catalog, &from, &to, amount)?);
        }

        Commands::Grid { item } => {
            let catalog = load()?;
            let mut found = false;
            for grid in catalog.crafting_grids_for_item(&item) {
                found = true;
                println!("Crafting grid for {}:", item);
                for row in ["A", "B", "C"] {
                    let cells: Vec<String> = (1..=3)
                        .map(|col| {
                            let cell = grid.cell(&format!("{}{}", row, col)).unwrap_or("");
                            format!("{:^14}", cell)
                        })
                        .collect();
                    println!("|{}|", cells.join("|"));
                }
            }
            if !found {
                println!("No crafting grid for {}", item);
            }
        }

        Commands::Dot { item } => {
            let catalog = load()?;
            match item {
                Some(item) => {
                    let subgraph = catalog
                        .graph()
                        .reverse_reachable_subgraph(&item)
                        .with_context(|| format!("Item '{}' is not in the item graph", item))?;
                    print!("{}", subgraph.to_dot());
                }
                None => print!("{}", catalog.graph().to_dot()),
            }
        }
    }

    Ok(())
}
