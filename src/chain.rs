//! Recipe chains between two items

use tracing::warn;

use crate::catalog::Catalog;
use crate::models::RecipeStep;

/// Recipes connecting `ingredient` to `product` along the cheapest path.
///
/// Each step holds only the ingredients and products of its recipe. With
/// `combine_ingredients`, an ingredient used again in a later step is added
/// to the first step that used it and dropped from the later one, so it can
/// all be put in up front (e.g. Blaze Powder in every brewing step).
///
/// Returns `None` when the items are the same or not connected.
pub fn recipe_chain(
    catalog: &Catalog,
    ingredient: &str,
    product: &str,
    combine_ingredients: bool,
) -> Option<Vec<RecipeStep>> {
    if ingredient == product {
        return None;
    }

    let path = catalog.graph().shortest_path(ingredient, product)?;

    let mut steps = Vec::with_capacity(path.len().saturating_sub(1));
    for edge in path.windows(2) {
        let (from, to) = (&edge[0], &edge[1]);
        let Some(recipe) = catalog
            .recipes_for_item(to)
            .find(|recipe| recipe.has_ingredient(from))
        else {
            warn!(from = %from, to = %to, "no recipe backs graph edge");
            return None;
        };
        steps.push(RecipeStep::from(recipe));
    }

    if combine_ingredients {
        combine(&mut steps);
    }

    Some(steps)
}

fn combine(steps: &mut [RecipeStep]) {
    for current in 1..steps.len() {
        let (earlier, rest) = steps.split_at_mut(current);
        let step = &mut rest[0];

        let names: Vec<String> = step.ingredients.keys().cloned().collect();
        for name in names {
            let Some(first) = earlier
                .iter_mut()
                .find(|prior| prior.ingredients.contains_key(&name))
            else {
                continue;
            };
            if let Some(amount) = step.ingredients.remove(&name) {
                *first.ingredients.entry(name).or_default() += amount;
            }
        }
    }
}

/// Format a recipe chain as numbered steps
pub fn format_recipe_chain(steps: &[RecipeStep]) -> String {
    let mut output = String::new();

    for (i, step) in steps.iter().enumerate() {
        let ingredients: Vec<String> = step
            .ingredients
            .iter()
            .map(|(name, amount)| format!("{} {}", amount, name))
            .collect();
        let products: Vec<String> = step
            .products
            .iter()
            .map(|(name, amount)| format!("{} {}", amount, name))
            .collect();

        output.push_str(&format!(
            "Step {}. {} -> {}\n",
            i + 1,
            ingredients.join(" + "),
            products.join(" + ")
        ));
    }

    output
}
