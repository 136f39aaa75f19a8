use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RecipeError;
use crate::matching::ScoredRecipe;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Highest match score first.
    #[default]
    Match,
    /// Shortest total time first.
    Time,
    /// Easy, then medium, then hard.
    Difficulty,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Match, SortKey::Time, SortKey::Difficulty];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Time => "time",
            Self::Difficulty => "difficulty",
        }
    }

    fn compare(self, a: &ScoredRecipe, b: &ScoredRecipe) -> Ordering {
        match self {
            Self::Match => b.match_score.cmp(&a.match_score),
            Self::Time => a.total_time().cmp(&b.total_time()),
            Self::Difficulty => a.recipe.difficulty.rank().cmp(&b.recipe.difficulty.rank()),
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for SortKey {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match" | "score" => Ok(Self::Match),
            "time" | "total_time" => Ok(Self::Time),
            "difficulty" => Ok(Self::Difficulty),
            _ => Err(RecipeError::UnknownSortKey(s.to_string())),
        }
    }
}

/// Stable: recipes that compare equal keep their incoming order.
pub fn sort_recipes(mut recipes: Vec<ScoredRecipe>, key: SortKey) -> Vec<ScoredRecipe> {
    recipes.sort_by(|a, b| key.compare(a, b));
    recipes
}
