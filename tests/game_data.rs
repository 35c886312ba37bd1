//! End-to-end queries against the fixture games in tests/data

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crafting_calculator::resources;
use crafting_calculator::{Catalog, GameLoader, RecipeStep, calculator, chain, fuel, plan};

fn loader() -> &'static GameLoader {
    static LOADER: OnceLock<GameLoader> = OnceLock::new();
    LOADER.get_or_init(|| {
        GameLoader::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data"))
    })
}

fn load(game: &str) -> Arc<Catalog> {
    loader().load(game).expect("fixture game should load")
}

fn amounts(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(name, amount)| (name.to_string(), *amount))
        .collect()
}

fn inventory(entries: &[(&str, f64)]) -> HashMap<String, f64> {
    amounts(entries).into_iter().collect()
}

fn step(ingredients: &[(&str, f64)], products: &[(&str, f64)]) -> RecipeStep {
    RecipeStep {
        ingredients: amounts(ingredients),
        products: amounts(products),
    }
}

#[test]
fn test_list_fixture_games() {
    assert_eq!(
        loader().list_games(),
        vec!["minecraft", "test_game", "test_game2", "test_game3"]
    );
}

#[test]
fn test_same_game_returns_cached_instance() {
    let first = load("test_game");
    let second = load("test_game");
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_catalog_contents() {
    let catalog = load("minecraft");
    assert_eq!(catalog.name(), "Minecraft");
    assert_eq!(catalog.num_recipes(), 14);
    assert_eq!(catalog.num_crafting_grids(), 1);

    let nugget = catalog.item_by_name("Gold Nugget").unwrap();
    assert!(nugget.sources.contains("Mob drop"));
    assert_eq!(catalog.item_by_id(nugget.id).unwrap().name, "Gold Nugget");
    assert_eq!(catalog.recipe_by_id(4).unwrap().category, "Smelting");
    assert_eq!(catalog.recipes_for_item("Planks").count(), 2);
}

#[test]
fn test_second_planks_recipe_is_not_in_graph() {
    let catalog = load("minecraft");
    let graph = catalog.graph();
    assert_eq!(graph.recipe_for("Planks").len(), 1);
    assert_eq!(graph.weight("Logs", "Planks"), Some(0.25));
    assert_eq!(graph.weight("Birch Logs", "Planks"), None);
}

#[test]
fn test_amount_needed() {
    let catalog = load("test_game");
    let graph = catalog.graph();

    assert_eq!(calculator::amount_needed_for(graph, "Flour", "Dough", false), Some(2.0));
    assert_eq!(calculator::amount_needed_for(graph, "Vinegar", "Cheese", false), Some(0.5));
    assert_eq!(
        calculator::amount_needed_for(graph, "Pizza Sauce", "Pepperoni Pizza", false),
        Some(1.0)
    );
    assert_eq!(
        calculator::amount_needed_for(graph, "Cornstarch", "Pepperoni Pizza", false),
        None
    );
    assert_eq!(calculator::amount_needed_for(graph, "Vinegar", "Dough", false), None);

    assert_eq!(calculator::amount_needed_for(graph, "Flour", "Dough", true), Some(2.0));
    assert_eq!(
        calculator::amount_needed_for(graph, "Meat", "Pepperoni Pizza", true),
        Some(0.5)
    );
}

#[test]
fn test_amount_needed_long_chain() {
    let catalog = load("test_game2");
    assert_eq!(
        calculator::amount_needed_for(catalog.graph(), "Silica Sand", "Computer", true),
        Some(9072.0)
    );
}

#[test]
fn test_craftable_non_recursive() {
    let catalog = load("test_game");
    let cases = [
        (inventory(&[("Flour", 10.0), ("Water", 10.0)]), "Dough", 5.0),
        (inventory(&[("Flour", 1_000_000.0), ("Water", 500_000.0)]), "Dough", 250_000.0),
        (inventory(&[("Flour", 10.0), ("Pepperoni", 2.0)]), "Dough", 0.0),
        (inventory(&[]), "Dough", 0.0),
        (inventory(&[("Flour", 10.0), ("Water", 4.0)]), "Dough", 2.0),
        (inventory(&[("Vinegar", 3.0), ("Milk", 6.0)]), "Cheese", 4.0),
        (inventory(&[("Vinegar", 3.0), ("Milk", 10.0)]), "Cheese", 6.0),
        (inventory(&[("Vinegar", 3.0), ("Milk", 5.0)]), "Cheese", 2.0),
        (inventory(&[("Flour", 10.0)]), "Bread", 0.0),
    ];

    for (inv, product, expected) in cases {
        assert_eq!(
            calculator::amount_craftable_with(&catalog, &inv, product, false),
            expected,
            "{} from {:?}",
            product,
            inv
        );
    }
}

#[test]
fn test_craftable_recursive_pizza() {
    let catalog = load("test_game");

    let everything = inventory(&[
        ("Flour", 8.0),
        ("Water", 8.0),
        ("Milk", 12.0),
        ("Vinegar", 4.0),
        ("Meat", 2.0),
        ("Salt", 6.0),
        ("Tomato", 8.0),
        ("Basil", 2.0),
    ]);
    assert_eq!(
        calculator::amount_craftable_with(&catalog, &everything, "Pepperoni Pizza", true),
        2.0
    );

    let no_basil = inventory(&[
        ("Flour", 4.0),
        ("Water", 4.0),
        ("Milk", 6.0),
        ("Vinegar", 2.0),
        ("Meat", 1.0),
        ("Salt", 3.0),
        ("Tomato", 4.0),
    ]);
    assert_eq!(
        calculator::amount_craftable_with(&catalog, &no_basil, "Pepperoni Pizza", true),
        0.0
    );

    let mixed = inventory(&[
        ("Flour", 8.0),
        ("Dough", 3.0),
        ("Milk", 12.0),
        ("Vinegar", 4.0),
        ("Pepperoni", 8.0),
        ("Tomato", 8.0),
        ("Basil", 2.0),
    ]);
    assert_eq!(
        calculator::amount_craftable_with(&catalog, &mixed, "Pepperoni Pizza", true),
        1.0
    );

    let basics = inventory(&[("Flour", 10.0), ("Water", 10.0)]);
    assert_eq!(calculator::amount_craftable_with(&catalog, &basics, "Basil", true), 0.0);
}

#[test]
fn test_craftable_recursive_pickaxe() {
    let catalog = load("minecraft");
    let inv = inventory(&[("Logs", 10.0), ("Iron Ingot", 7.0)]);
    assert_eq!(
        calculator::amount_craftable_with(&catalog, &inv, "Iron Pickaxe", true),
        2.0
    );
}

#[test]
fn test_recipe_chain_silicon() {
    let catalog = load("test_game2");

    let direct = chain::recipe_chain(&catalog, "Silica Sand", "Silicon", false).unwrap();
    assert_eq!(direct, vec![step(&[("Silica Sand", 36.0)], &[("Silicon", 1.0)])]);
    assert_eq!(
        chain::recipe_chain(&catalog, "Silica Sand", "Silicon", true).unwrap(),
        direct
    );

    let full = chain::recipe_chain(&catalog, "Silica Sand", "Computer", false).unwrap();
    assert_eq!(
        full,
        vec![
            step(&[("Silica Sand", 36.0)], &[("Silicon", 1.0)]),
            step(&[("Silicon", 2.0)], &[("Polysilicon", 1.0)]),
            step(&[("Polysilicon", 3.0)], &[("Silicon Wafers", 2.0)]),
            step(&[("Silicon Wafers", 3.0)], &[("Integrated Circuit", 1.0)]),
            step(&[("Integrated Circuit", 4.0)], &[("Electronics Module", 1.0)]),
            step(&[("Electronics Module", 7.0)], &[("Computer", 1.0)]),
        ]
    );
}

#[test]
fn test_recipe_chain_not_found() {
    let catalog = load("test_game2");
    assert!(chain::recipe_chain(&catalog, "-", "Silicon", false).is_none());
    assert!(chain::recipe_chain(&catalog, "", "Silicon", false).is_none());
    assert!(chain::recipe_chain(&catalog, "Silicon", "-", false).is_none());
    assert!(chain::recipe_chain(&catalog, "Silicon", "Silica Sand", false).is_none());
    assert!(chain::recipe_chain(&catalog, "Silicon", "Silicon", false).is_none());
}

#[test]
fn test_recipe_chain_recyclables() {
    let catalog = load("minecraft");
    assert_eq!(
        chain::recipe_chain(&catalog, "Gold Ingot", "Gold Nugget", false).unwrap(),
        vec![step(&[("Gold Ingot", 1.0)], &[("Gold Nugget", 9.0)])]
    );
    assert_eq!(
        chain::recipe_chain(&catalog, "Gold Nugget", "Gold Ingot", false).unwrap(),
        vec![step(&[("Gold Nugget", 9.0)], &[("Gold Ingot", 1.0)])]
    );
    assert!(chain::recipe_chain(&catalog, "Gold Ingot", "Gold Ingot", false).is_none());
}

#[test]
fn test_recipe_chain_combined_brewing() {
    let catalog = load("minecraft");
    let steps = chain::recipe_chain(
        &catalog,
        "Water Bottle",
        "Splash Potion of Invisibility",
        true,
    )
    .unwrap();

    assert_eq!(
        steps,
        vec![
            step(
                &[("Water Bottle", 3.0), ("Nether Wart", 1.0), ("Blaze Powder", 1.0)],
                &[("Awkward Potion", 3.0)]
            ),
            step(
                &[("Awkward Potion", 3.0), ("Golden Carrot", 1.0)],
                &[("Potion of Night Vision", 3.0)]
            ),
            step(
                &[("Potion of Night Vision", 3.0), ("Fermented Spider Eye", 1.0)],
                &[("Potion of Invisibility", 3.0)]
            ),
            step(
                &[("Potion of Invisibility", 3.0), ("Gunpowder", 1.0)],
                &[("Splash Potion of Invisibility", 3.0)]
            ),
        ]
    );
}

#[test]
fn test_recipe_chain_combined_sand_castle() {
    let catalog = load("test_game3");
    let steps = chain::recipe_chain(&catalog, "Shovel", "Large Sand Castle", true).unwrap();
    assert_eq!(
        steps,
        vec![
            step(
                &[("Sand", 3.0), ("Water", 6.0), ("Shovel", 1.0)],
                &[("Sand Pile", 1.0)]
            ),
            step(&[("Sand Pile", 1.0), ("Bucket", 2.0)], &[("Sand Castle", 1.0)]),
            step(&[("Sand Castle", 1.0)], &[("Large Sand Castle", 1.0)]),
        ]
    );
}

#[test]
fn test_graph_statistics() {
    let pizza = load("test_game");
    assert_eq!(pizza.graph().min_ingredient_amount(), 0.25);
    assert_eq!(pizza.graph().max_ingredient_amount(), 4.0);
    // 2 + 2 + 2 + 2 + 4 ingredients over 5 crafted items
    assert_eq!(pizza.graph().avg_unique_ingredients_per_item(), 2.4);
}

#[test]
fn test_resource_classification() {
    let catalog = load("minecraft");
    let graph = catalog.graph();

    let basic = resources::basic_resources(graph);
    assert!(basic.contains(&"Logs".to_string()));
    assert!(basic.contains(&"Blaze Powder".to_string()));
    assert!(!basic.contains(&"Birch Logs".to_string()));

    let intermediate = resources::intermediate_resources(graph);
    assert!(intermediate.contains(&"Planks".to_string()));
    assert!(intermediate.contains(&"Gold Nugget".to_string()));

    let advanced = resources::advanced_resources(graph);
    assert!(advanced.contains(&"Iron Pickaxe".to_string()));
    assert!(advanced.contains(&"Charcoal".to_string()));
    assert!(!advanced.contains(&"Planks".to_string()));

    assert_eq!(
        resources::recyclables(graph),
        vec![("Gold Ingot".to_string(), "Gold Nugget".to_string())]
    );
}

#[test]
fn test_basic_resources_for_pickaxe() {
    let catalog = load("minecraft");
    let basics = resources::basic_resources_for(catalog.graph(), "Iron Pickaxe", true);
    assert_eq!(
        basics,
        amounts(&[("Coal", 0.375), ("Logs", 0.25), ("Raw Iron", 3.0)])
    );
}

#[test]
fn test_possible_products() {
    let catalog = load("minecraft");
    assert_eq!(
        calculator::possible_products(catalog.graph(), "Planks", false),
        vec!["Crafting Table", "Sticks"]
    );
    assert_eq!(
        calculator::possible_products(catalog.graph(), "Planks", true),
        vec!["Crafting Table", "Iron Pickaxe", "Sticks"]
    );
}

#[test]
fn test_crafting_plan() {
    let catalog = load("minecraft");
    let crafting_plan =
        plan::make_crafting_plan(&catalog, &amounts(&[("Iron Pickaxe", 23.0)])).unwrap();

    let planned: BTreeMap<String, f64> = crafting_plan.steps.iter().cloned().collect();
    assert_eq!(
        planned,
        amounts(&[
            ("Coal", 9.0),
            ("Iron Ingot", 69.0),
            ("Iron Pickaxe", 23.0),
            ("Logs", 6.0),
            ("Planks", 24.0),
            ("Raw Iron", 69.0),
            ("Sticks", 48.0),
        ])
    );
    assert_eq!(
        crafting_plan.leftovers,
        amounts(&[("Coal", 0.375), ("Logs", 0.25), ("Planks", 1.0), ("Sticks", 2.0)])
    );
}

#[test]
fn test_fuel_conversion() {
    let catalog = load("minecraft");
    assert_eq!(fuel::convert_fuel(&catalog, "Coal", "Sticks", 0.125).unwrap(), 2.0);
    assert_eq!(
        fuel::describe_fuel_conversion(&catalog, "Coal", "Lava Bucket", 25.0).unwrap(),
        "25 coal ≈ 2.000 lava bucket"
    );
    assert!(fuel::convert_fuel(&catalog, "Coal", "Dirt", 1.0).is_err());
}

#[test]
fn test_crafting_grid() {
    let catalog = load("minecraft");
    let grid = catalog.crafting_grids_for_item("Furnace").next().unwrap();
    assert_eq!(grid.cell("A1"), Some("Cobblestone"));
    assert_eq!(grid.cell("B2"), None);
    assert_eq!(catalog.crafting_grids_for_item("Iron Pickaxe").count(), 0);
}
