pub mod ingredients;
pub mod recipes;
pub mod schema;
pub mod substitutions;

use once_cell::sync::Lazy;

pub use schema::{
    normalize_name, CategoryParseError, Difficulty, DifficultyParseError, Ingredient,
    IngredientCategory, Nutrition, Recipe, RecipeIngredient,
};
pub use substitutions::SubstitutionTable;

const POPULAR_RECIPE_COUNT: usize = 3;

static BUILTIN_CATALOG: Lazy<Catalog> = Lazy::new(|| {
    Catalog::new(
        recipes::builtin_recipes(),
        ingredients::builtin_ingredients(),
        SubstitutionTable::builtin(),
    )
});

/// Read-only recipe, ingredient and substitution data. Built once and shared
/// by reference with every query.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    ingredients: Vec<Ingredient>,
    substitutions: SubstitutionTable,
}

impl Catalog {
    pub fn new(
        recipes: Vec<Recipe>,
        ingredients: Vec<Ingredient>,
        substitutions: SubstitutionTable,
    ) -> Self {
        Self {
            recipes,
            ingredients,
            substitutions,
        }
    }

    pub fn builtin() -> &'static Catalog {
        &BUILTIN_CATALOG
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    pub fn recipe_by_id(&self, id: &str) -> Option<&Recipe> {
        let id = id.trim();
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn popular_recipes(&self) -> &[Recipe] {
        let end = POPULAR_RECIPE_COUNT.min(self.recipes.len());
        &self.recipes[..end]
    }

    pub fn recipes_by_category(&self, tag: &str) -> Vec<&Recipe> {
        self.recipes.iter().filter(|r| r.has_tag(tag)).collect()
    }

    pub fn ingredient_by_name(&self, name: &str) -> Option<&Ingredient> {
        let name = normalize_name(name);
        self.ingredients
            .iter()
            .find(|ing| ing.normalized_name() == name)
    }

    pub fn ingredients_by_category(&self, category: IngredientCategory) -> Vec<&Ingredient> {
        self.ingredients
            .iter()
            .filter(|ing| ing.category == category)
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<IngredientCategory> {
        let mut out = Vec::new();
        for ingredient in &self.ingredients {
            if !out.contains(&ingredient.category) {
                out.push(ingredient.category);
            }
        }
        out
    }

    /// Categories paired with how many catalog ingredients fall under each.
    pub fn category_counts(&self) -> Vec<(IngredientCategory, usize)> {
        self.categories()
            .into_iter()
            .map(|category| (category, self.ingredients_by_category(category).len()))
            .collect()
    }

    /// Every ingredient name used by a recipe, lowercased, first-seen order.
    pub fn recipe_ingredient_names(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for recipe in &self.recipes {
            for name in recipe.ingredient_names() {
                if !out.contains(&name) {
                    out.push(name);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{Catalog, IngredientCategory};

    #[test]
    fn builtin_catalog_has_expected_shape() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.recipes().len(), 6);
        assert_eq!(catalog.ingredients().len(), 25);
        assert_eq!(catalog.substitutions().len(), 7);
    }

    #[test]
    fn looks_up_recipe_by_id() {
        let catalog = Catalog::builtin();
        let recipe = catalog.recipe_by_id("4").expect("recipe 4 missing");
        assert_eq!(recipe.name, "Fluffy Scrambled Eggs");
        assert!(catalog.recipe_by_id("404").is_none());
    }

    #[test]
    fn popular_recipes_are_the_first_three() {
        let popular = Catalog::builtin().popular_recipes();
        let ids: Vec<&str> = popular.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn filters_recipes_by_tag() {
        let vegan = Catalog::builtin().recipes_by_category("vegan");
        let ids: Vec<&str> = vegan.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "5", "6"]);
    }

    #[test]
    fn category_counts_cover_every_ingredient() {
        let catalog = Catalog::builtin();
        let counts = catalog.category_counts();
        let total: usize = counts.iter().map(|(_, n)| n).sum();
        assert_eq!(total, catalog.ingredients().len());
        assert!(counts.iter().all(|(_, n)| *n > 0));
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let categories = Catalog::builtin().categories();
        assert_eq!(
            categories,
            vec![
                IngredientCategory::Vegetables,
                IngredientCategory::Spices,
                IngredientCategory::Protein,
                IngredientCategory::Grains,
                IngredientCategory::Oils,
                IngredientCategory::Dairy,
                IngredientCategory::Fruits,
            ]
        );
        let dairy = Catalog::builtin().ingredients_by_category(IngredientCategory::Dairy);
        assert_eq!(dairy.len(), 3);
    }

    #[test]
    fn recipe_ingredient_names_are_deduplicated() {
        let names = Catalog::builtin().recipe_ingredient_names();
        assert_eq!(names.iter().filter(|n| n.as_str() == "garlic").count(), 1);
        assert!(names.contains(&"chicken breast".to_string()));
    }
}
