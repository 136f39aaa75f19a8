use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::catalog::{Ingredient, IngredientCategory, Recipe};
use crate::detection::DetectionResult;
use crate::matching::ScoredRecipe;
use crate::output::format_minutes;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn score_cell(score: u8) -> Cell {
    let color = match score {
        80..=100 => Color::Green,
        50..=79 => Color::Yellow,
        _ => Color::Red,
    };
    Cell::new(format!("{score}%")).fg(color)
}

pub fn render_scored_table(recipes: &[ScoredRecipe]) -> String {
    let mut table = new_table();
    table.set_header(vec![
        "ID",
        "Recipe",
        "Match",
        "Time",
        "Difficulty",
        "Missing",
        "Substitutions",
    ]);
    for scored in recipes {
        let recipe = &scored.recipe;
        let substitutions = scored
            .substitutions
            .iter()
            .map(|s| format!("{} -> {}", s.original, s.substitute))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(Row::from(vec![
            Cell::new(&recipe.id),
            Cell::new(&recipe.name),
            score_cell(scored.match_score),
            Cell::new(format_minutes(recipe.total_time())),
            Cell::new(recipe.difficulty.to_string()),
            Cell::new(if scored.missing_ingredients.is_empty() {
                "-".to_string()
            } else {
                scored.missing_ingredients.join(", ")
            }),
            Cell::new(if substitutions.is_empty() {
                "-".to_string()
            } else {
                substitutions
            }),
        ]));
    }
    table.to_string()
}

pub fn render_recipes_table(recipes: &[&Recipe]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Recipe", "Time", "Servings", "Difficulty", "Tags"]);
    for recipe in recipes {
        table.add_row(vec![
            recipe.id.clone(),
            recipe.name.clone(),
            format_minutes(recipe.total_time()),
            recipe.servings.to_string(),
            recipe.difficulty.to_string(),
            recipe.tags.join(", "),
        ]);
    }
    table.to_string()
}

pub fn render_recipe_detail(recipe: &Recipe) -> String {
    let mut summary = new_table();
    summary.set_header(vec!["Field", "Value"]);
    summary.add_row(vec!["Name".to_string(), recipe.name.clone()]);
    summary.add_row(vec!["Description".to_string(), recipe.description.clone()]);
    summary.add_row(vec![
        "Time".to_string(),
        format!(
            "{} prep + {} cook = {}",
            format_minutes(recipe.prep_time),
            format_minutes(recipe.cook_time),
            format_minutes(recipe.total_time())
        ),
    ]);
    summary.add_row(vec!["Servings".to_string(), recipe.servings.to_string()]);
    summary.add_row(vec!["Difficulty".to_string(), recipe.difficulty.to_string()]);
    summary.add_row(vec!["Tags".to_string(), recipe.tags.join(", ")]);
    if let Some(n) = &recipe.nutrition {
        summary.add_row(vec![
            "Nutrition".to_string(),
            format!(
                "{:.0} kcal, {:.0}g protein, {:.0}g carbs, {:.0}g fat, {:.0}g fiber",
                n.calories, n.protein, n.carbs, n.fat, n.fiber
            ),
        ]);
    }

    let mut ingredients = new_table();
    ingredients.set_header(vec!["Ingredient", "Amount", "Essential"]);
    for ing in &recipe.ingredients {
        let essential = if ing.essential {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("optional")
        };
        ingredients.add_row(Row::from(vec![
            Cell::new(&ing.name),
            Cell::new(format!("{} {}", ing.amount, ing.unit)),
            essential,
        ]));
    }

    let steps = recipe
        .instructions
        .iter()
        .enumerate()
        .map(|(idx, step)| format!("{:>2}. {step}", idx + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{summary}\n{ingredients}\n{steps}")
}

pub fn render_ingredients_table(ingredients: &[&Ingredient]) -> String {
    let mut table = new_table();
    table.set_header(vec!["ID", "Ingredient", "Category", "Confidence"]);
    for ing in ingredients {
        table.add_row(vec![
            ing.id.clone(),
            ing.name.clone(),
            ing.category.to_string(),
            ing.confidence
                .map(|c| format!("{:.0}%", c * 100.0))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.to_string()
}

pub fn render_categories_table(categories: &[(IngredientCategory, usize)]) -> String {
    let mut table = new_table();
    table.set_header(vec!["Category", "Ingredients"]);
    for (category, count) in categories {
        table.add_row(vec![category.to_string(), count.to_string()]);
    }
    table.to_string()
}

pub fn render_detection_table(result: &DetectionResult) -> String {
    if let Some(error) = &result.error {
        return format!("Detection failed: {error}");
    }
    let mut table = new_table();
    table.set_header(vec!["Ingredient", "Confidence"]);
    for ing in &result.ingredients {
        let confidence = ing.confidence.unwrap_or(0.0);
        let cell = if confidence >= 0.8 {
            Cell::new(format!("{:.0}%", confidence * 100.0)).fg(Color::Green)
        } else {
            Cell::new(format!("{:.0}%", confidence * 100.0)).fg(Color::Yellow)
        };
        table.add_row(Row::from(vec![Cell::new(&ing.name), cell]));
    }
    format!(
        "{table}\nOverall confidence: {:.0}% ({})",
        result.confidence * 100.0,
        result.detected_at.format("%Y-%m-%d %H:%M:%S UTC")
    )
}

/// One-column table for suggestions, recent searches and similar lists.
pub fn render_list_table(header: &str, items: &[String]) -> String {
    let mut table = new_table();
    table.set_header(vec![header]);
    for item in items {
        table.add_row(vec![item.clone()]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::Catalog;
    use crate::matching::{score_catalog, MatchSettings};

    #[test]
    fn scored_table_shows_missing_and_substitutions() {
        let mut rng = StdRng::seed_from_u64(1);
        let pantry = vec!["eggs".to_string(), "olive oil".to_string()];
        let scored = score_catalog(Catalog::builtin(), &pantry, &MatchSettings::default(), &mut rng);
        let out = render_scored_table(&scored);
        assert!(out.contains("Fluffy Scrambled Eggs"));
        assert!(out.contains("butter -> olive oil"));
        assert!(out.contains("80%"));
    }

    #[test]
    fn detail_lists_numbered_steps_and_nutrition() {
        let recipe = Catalog::builtin().recipe_by_id("6").unwrap();
        let out = render_recipe_detail(recipe);
        assert!(out.contains(" 1. Wash and dry spinach leaves thoroughly"));
        assert!(out.contains("120 kcal"));
        assert!(out.contains("10m prep + 0m cook = 10m"));
    }

    #[test]
    fn failed_detection_renders_the_error() {
        let err = crate::error::RecipeError::DetectionFailed("image is empty".to_string());
        let out = render_detection_table(&DetectionResult::failed(&err));
        assert!(out.starts_with("Detection failed:"));
    }

    #[test]
    fn categories_table_lists_counts() {
        let out = render_categories_table(&Catalog::builtin().category_counts());
        assert!(out.contains("vegetables"));
        assert!(out.contains("Ingredients"));
    }
}
