use crate::catalog::schema::{Difficulty, Nutrition, Recipe, RecipeIngredient};

const IMAGE_PARAMS: &str = "?auto=compress&cs=tinysrgb&w=500";

fn image_url(photo_id: u32) -> String {
    format!("https://images.pexels.com/photos/{photo_id}/pexels-photo-{photo_id}.jpeg{IMAGE_PARAMS}")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn builtin_recipes() -> Vec<Recipe> {
    vec![
        Recipe {
            id: "1".to_string(),
            name: "Classic Chicken Stir Fry".to_string(),
            description: "A quick and delicious stir fry with tender chicken and crisp vegetables"
                .to_string(),
            image: image_url(1143754),
            prep_time: 15,
            cook_time: 10,
            servings: 4,
            difficulty: Difficulty::Easy,
            ingredients: vec![
                RecipeIngredient::essential("chicken breast", "1", "lb"),
                RecipeIngredient::essential("bell pepper", "2", "pieces"),
                RecipeIngredient::essential("onion", "1", "medium"),
                RecipeIngredient::essential("garlic", "3", "cloves"),
                RecipeIngredient::optional("ginger", "1", "tbsp"),
                RecipeIngredient::essential("olive oil", "2", "tbsp"),
            ],
            instructions: strings(&[
                "Cut chicken breast into bite-sized pieces and season with salt and pepper",
                "Heat olive oil in a large wok or skillet over high heat",
                "Add chicken and cook for 3-4 minutes until golden brown",
                "Add garlic and ginger, stir for 30 seconds until fragrant",
                "Add bell peppers and onion, stir-fry for 3-4 minutes until crisp-tender",
                "Season with soy sauce and serve over rice",
            ]),
            tags: strings(&["quick", "healthy", "asian", "protein-rich"]),
            nutrition: Some(Nutrition {
                calories: 285.0,
                protein: 32.0,
                carbs: 12.0,
                fat: 14.0,
                fiber: 3.0,
            }),
        },
        Recipe {
            id: "2".to_string(),
            name: "Creamy Mushroom Pasta".to_string(),
            description: "Rich and creamy pasta with sautéed mushrooms and herbs".to_string(),
            image: image_url(1279330),
            prep_time: 10,
            cook_time: 20,
            servings: 4,
            difficulty: Difficulty::Medium,
            ingredients: vec![
                RecipeIngredient::essential("pasta", "12", "oz"),
                RecipeIngredient::essential("mushrooms", "8", "oz"),
                RecipeIngredient::essential("garlic", "4", "cloves"),
                RecipeIngredient::essential("butter", "3", "tbsp"),
                RecipeIngredient::essential("milk", "1", "cup"),
                RecipeIngredient::optional("cheese", "1/2", "cup"),
            ],
            instructions: strings(&[
                "Cook pasta according to package directions until al dente",
                "Slice mushrooms and mince garlic",
                "In a large skillet, melt butter over medium-high heat",
                "Add mushrooms and cook until golden brown, about 5 minutes",
                "Add garlic and cook for 1 minute until fragrant",
                "Pour in milk and simmer until slightly thickened",
                "Add drained pasta and toss to combine",
                "Stir in cheese if using and season with salt and pepper",
            ]),
            tags: strings(&["vegetarian", "comfort-food", "creamy", "italian"]),
            nutrition: Some(Nutrition {
                calories: 420.0,
                protein: 16.0,
                carbs: 58.0,
                fat: 16.0,
                fiber: 4.0,
            }),
        },
        Recipe {
            id: "3".to_string(),
            name: "Mediterranean Vegetable Bowl".to_string(),
            description: "Fresh and healthy bowl with roasted vegetables and herbs".to_string(),
            image: image_url(1640777),
            prep_time: 20,
            cook_time: 25,
            servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: vec![
                RecipeIngredient::essential("tomato", "2", "large"),
                RecipeIngredient::essential("bell pepper", "1", "piece"),
                RecipeIngredient::essential("onion", "1", "medium"),
                RecipeIngredient::essential("olive oil", "3", "tbsp"),
                RecipeIngredient::essential("garlic", "2", "cloves"),
                RecipeIngredient::optional("lemon", "1", "piece"),
            ],
            instructions: strings(&[
                "Preheat oven to 425°F (220°C)",
                "Chop all vegetables into bite-sized pieces",
                "Toss vegetables with olive oil, salt, and pepper",
                "Spread on a baking sheet in a single layer",
                "Roast for 20-25 minutes until tender and lightly caramelized",
                "Squeeze lemon juice over vegetables before serving",
            ]),
            tags: strings(&["vegan", "healthy", "mediterranean", "gluten-free"]),
            nutrition: Some(Nutrition {
                calories: 245.0,
                protein: 6.0,
                carbs: 28.0,
                fat: 14.0,
                fiber: 8.0,
            }),
        },
        Recipe {
            id: "4".to_string(),
            name: "Fluffy Scrambled Eggs".to_string(),
            description: "Perfect creamy scrambled eggs with butter and herbs".to_string(),
            image: image_url(566566),
            prep_time: 2,
            cook_time: 5,
            servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: vec![
                RecipeIngredient::essential("eggs", "6", "large"),
                RecipeIngredient::essential("butter", "2", "tbsp"),
                RecipeIngredient::optional("milk", "2", "tbsp"),
            ],
            instructions: strings(&[
                "Crack eggs into a bowl and whisk with milk and a pinch of salt",
                "Heat butter in a non-stick pan over low-medium heat",
                "Pour in egg mixture when butter is melted",
                "Gently stir with a spatula, pushing eggs from edges to center",
                "Continue stirring gently until eggs are just set but still creamy",
                "Remove from heat and serve immediately",
            ]),
            tags: strings(&["breakfast", "quick", "protein-rich", "vegetarian"]),
            nutrition: Some(Nutrition {
                calories: 320.0,
                protein: 18.0,
                carbs: 2.0,
                fat: 26.0,
                fiber: 0.0,
            }),
        },
        Recipe {
            id: "5".to_string(),
            name: "Garlic Herb Roasted Potatoes".to_string(),
            description: "Crispy golden potatoes with fresh herbs and garlic".to_string(),
            image: image_url(1435741),
            prep_time: 15,
            cook_time: 35,
            servings: 4,
            difficulty: Difficulty::Easy,
            ingredients: vec![
                RecipeIngredient::essential("potato", "2", "lbs"),
                RecipeIngredient::essential("olive oil", "3", "tbsp"),
                RecipeIngredient::essential("garlic", "4", "cloves"),
            ],
            instructions: strings(&[
                "Preheat oven to 425°F (220°C)",
                "Wash and quarter potatoes (leave skin on)",
                "Toss with olive oil, minced garlic, salt, and pepper",
                "Arrange on baking sheet in single layer",
                "Roast for 30-35 minutes until golden and crispy",
                "Garnish with fresh herbs before serving",
            ]),
            tags: strings(&["side-dish", "vegan", "crispy", "comfort-food"]),
            nutrition: Some(Nutrition {
                calories: 180.0,
                protein: 4.0,
                carbs: 32.0,
                fat: 10.0,
                fiber: 4.0,
            }),
        },
        Recipe {
            id: "6".to_string(),
            name: "Fresh Spinach Salad".to_string(),
            description: "Light and refreshing salad with baby spinach and vegetables".to_string(),
            image: image_url(1059905),
            prep_time: 10,
            cook_time: 0,
            servings: 2,
            difficulty: Difficulty::Easy,
            ingredients: vec![
                RecipeIngredient::essential("spinach", "4", "cups"),
                RecipeIngredient::essential("tomato", "1", "large"),
                RecipeIngredient::essential("cucumber", "1", "medium"),
                RecipeIngredient::essential("olive oil", "2", "tbsp"),
                RecipeIngredient::essential("lemon", "1/2", "piece"),
            ],
            instructions: strings(&[
                "Wash and dry spinach leaves thoroughly",
                "Dice tomatoes and cucumber into bite-sized pieces",
                "Combine spinach, tomatoes, and cucumber in a large bowl",
                "Whisk olive oil with lemon juice, salt, and pepper",
                "Toss salad with dressing just before serving",
            ]),
            tags: strings(&["salad", "vegan", "healthy", "no-cook", "gluten-free"]),
            nutrition: Some(Nutrition {
                calories: 120.0,
                protein: 4.0,
                carbs: 8.0,
                fat: 14.0,
                fiber: 4.0,
            }),
        },
    ]
}
