use anyhow::Result;

use crate::catalog::{Ingredient, IngredientCategory, Recipe};
use crate::matching::ScoredRecipe;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn scored_to_csv(recipes: &[ScoredRecipe]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "name",
        "match_score",
        "total_time",
        "difficulty",
        "available",
        "missing",
        "substitutions",
    ])?;
    for scored in recipes {
        let substitutions = scored
            .substitutions
            .iter()
            .map(|s| format!("{}:{}:{:.2}", s.original, s.substitute, s.confidence))
            .collect::<Vec<_>>()
            .join(";");
        writer.write_record([
            scored.recipe.id.clone(),
            scored.recipe.name.clone(),
            scored.match_score.to_string(),
            scored.total_time().to_string(),
            scored.recipe.difficulty.to_string(),
            scored.available_ingredients.join(";"),
            scored.missing_ingredients.join(";"),
            substitutions,
        ])?;
    }
    finish(writer)
}

pub fn recipes_to_csv(recipes: &[&Recipe]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "id",
        "name",
        "prep_time",
        "cook_time",
        "servings",
        "difficulty",
        "tags",
    ])?;
    for recipe in recipes {
        writer.write_record([
            recipe.id.clone(),
            recipe.name.clone(),
            recipe.prep_time.to_string(),
            recipe.cook_time.to_string(),
            recipe.servings.to_string(),
            recipe.difficulty.to_string(),
            recipe.tags.join(";"),
        ])?;
    }
    finish(writer)
}

pub fn ingredients_to_csv(ingredients: &[&Ingredient]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["id", "name", "category", "confidence"])?;
    for ing in ingredients {
        writer.write_record([
            ing.id.clone(),
            ing.name.clone(),
            ing.category.as_slug().to_string(),
            ing.confidence.map(|c| format!("{c:.4}")).unwrap_or_default(),
        ])?;
    }
    finish(writer)
}

pub fn categories_to_csv(categories: &[(IngredientCategory, usize)]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["category", "ingredients"])?;
    for (category, count) in categories {
        writer.write_record([category.as_slug().to_string(), count.to_string()])?;
    }
    finish(writer)
}

pub fn list_to_csv(header: &str, items: &[String]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([header])?;
    for item in items {
        writer.write_record([item])?;
    }
    finish(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn recipe_rows_follow_the_header() {
        let catalog = Catalog::builtin();
        let popular: Vec<&Recipe> = catalog.popular_recipes().iter().collect();
        let out = recipes_to_csv(&popular).unwrap();
        let mut lines = out.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,prep_time,cook_time,servings,difficulty,tags")
        );
        assert_eq!(
            lines.next(),
            Some("1,Classic Chicken Stir Fry,15,10,4,Easy,quick;healthy;asian;protein-rich")
        );
        assert_eq!(out.lines().count(), 4);
    }

    #[test]
    fn ingredient_rows_use_category_slugs() {
        let catalog = Catalog::builtin();
        let oils: Vec<&Ingredient> = catalog
            .ingredients()
            .iter()
            .filter(|i| i.name == "olive oil")
            .collect();
        let out = ingredients_to_csv(&oils).unwrap();
        assert!(out.contains("11,olive oil,oils,"));
    }
}
