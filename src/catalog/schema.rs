use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Sort rank: Easy(1) < Medium(2) < Hard(3).
    pub fn rank(self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown difficulty: {0}")]
pub struct DifficultyParseError(pub String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Vegetables,
    Protein,
    Dairy,
    Grains,
    Oils,
    Spices,
    Fruits,
    Manual,
}

impl IngredientCategory {
    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Vegetables => "vegetables",
            Self::Protein => "protein",
            Self::Dairy => "dairy",
            Self::Grains => "grains",
            Self::Oils => "oils",
            Self::Spices => "spices",
            Self::Fruits => "fruits",
            Self::Manual => "manual",
        }
    }
}

impl Display for IngredientCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

#[derive(Debug, Error)]
#[error("unknown ingredient category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for IngredientCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "vegetables" | "vegetable" | "veg" => Ok(Self::Vegetables),
            "protein" | "proteins" => Ok(Self::Protein),
            "dairy" => Ok(Self::Dairy),
            "grains" | "grain" => Ok(Self::Grains),
            "oils" | "oil" => Ok(Self::Oils),
            "spices" | "spice" => Ok(Self::Spices),
            "fruits" | "fruit" => Ok(Self::Fruits),
            "manual" => Ok(Self::Manual),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// A catalog or session ingredient. `confidence` is only set for detected
/// or validated entries; `is_available` only for session entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: IngredientCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}

impl Ingredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: IngredientCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            confidence: None,
            is_available: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeIngredient {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub essential: bool,
}

impl RecipeIngredient {
    pub fn essential(name: &str, amount: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            amount: amount.to_string(),
            unit: unit.to_string(),
            essential: true,
        }
    }

    pub fn optional(name: &str, amount: &str, unit: &str) -> Self {
        Self {
            essential: false,
            ..Self::essential(name, amount, unit)
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<String>,
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,
}

impl Recipe {
    pub fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn has_any_tag(&self, tags: &[String]) -> bool {
        tags.iter().any(|tag| self.has_tag(tag))
    }

    pub fn ingredient_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .map(|ing| normalize_name(&ing.name))
            .collect()
    }
}

/// Canonical form used for every name comparison.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_difficulty_case_insensitively() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_ranks_are_ordered() {
        assert!(Difficulty::Easy.rank() < Difficulty::Medium.rank());
        assert!(Difficulty::Medium.rank() < Difficulty::Hard.rank());
    }

    #[test]
    fn parses_category_aliases() {
        assert_eq!(
            "Vegetable".parse::<IngredientCategory>().unwrap(),
            IngredientCategory::Vegetables
        );
        assert_eq!(
            "oil".parse::<IngredientCategory>().unwrap(),
            IngredientCategory::Oils
        );
        assert!("candy".parse::<IngredientCategory>().is_err());
    }

    #[test]
    fn tag_lookup_ignores_case() {
        let recipe = Recipe {
            id: "x".to_string(),
            name: "X".to_string(),
            description: String::new(),
            image: String::new(),
            prep_time: 5,
            cook_time: 7,
            servings: 1,
            difficulty: Difficulty::Easy,
            ingredients: vec![RecipeIngredient::essential("Eggs", "2", "large")],
            instructions: Vec::new(),
            tags: vec!["Vegan".to_string()],
            nutrition: None,
        };
        assert!(recipe.has_tag("vegan"));
        assert_eq!(recipe.total_time(), 12);
        assert_eq!(recipe.ingredient_names(), vec!["eggs".to_string()]);
    }
}
