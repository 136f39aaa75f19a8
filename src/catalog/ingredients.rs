use crate::catalog::schema::{Ingredient, IngredientCategory};

const COMMON_INGREDIENTS: [(&str, IngredientCategory); 25] = [
    ("tomato", IngredientCategory::Vegetables),
    ("onion", IngredientCategory::Vegetables),
    ("garlic", IngredientCategory::Vegetables),
    ("ginger", IngredientCategory::Spices),
    ("chicken breast", IngredientCategory::Protein),
    ("ground beef", IngredientCategory::Protein),
    ("eggs", IngredientCategory::Protein),
    ("rice", IngredientCategory::Grains),
    ("pasta", IngredientCategory::Grains),
    ("flour", IngredientCategory::Grains),
    ("olive oil", IngredientCategory::Oils),
    ("butter", IngredientCategory::Dairy),
    ("milk", IngredientCategory::Dairy),
    ("cheese", IngredientCategory::Dairy),
    ("bell pepper", IngredientCategory::Vegetables),
    ("carrot", IngredientCategory::Vegetables),
    ("potato", IngredientCategory::Vegetables),
    ("spinach", IngredientCategory::Vegetables),
    ("mushrooms", IngredientCategory::Vegetables),
    ("lemon", IngredientCategory::Fruits),
    ("cucumber", IngredientCategory::Vegetables),
    ("lettuce", IngredientCategory::Vegetables),
    ("broccoli", IngredientCategory::Vegetables),
    ("salmon", IngredientCategory::Protein),
    ("shrimp", IngredientCategory::Protein),
];

/// Ids are 1-based positions, stable across releases.
pub fn builtin_ingredients() -> Vec<Ingredient> {
    COMMON_INGREDIENTS
        .iter()
        .enumerate()
        .map(|(idx, (name, category))| Ingredient::new((idx + 1).to_string(), *name, *category))
        .collect()
}
