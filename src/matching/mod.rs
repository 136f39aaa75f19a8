pub mod loose;
pub mod weighted;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{normalize_name, Catalog, Recipe, SubstitutionTable};
use crate::error::RecipeError;

/// Which matching rule the pipeline runs. The two rules disagree on
/// partial names ("onion" vs "red onion"), so they are never mixed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Exact names plus the substitution table, essential ingredients weighted 4:1.
    #[default]
    Weighted,
    /// Either name contains the other; plain matched/total ratio.
    Loose,
}

impl MatchStrategy {
    /// Loose matching drops recipes that share nothing with the pantry.
    pub fn excludes_unmatched(self) -> bool {
        matches!(self, Self::Loose)
    }

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Weighted => "weighted",
            Self::Loose => "loose",
        }
    }
}

impl Display for MatchStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_slug())
    }
}

impl FromStr for MatchStrategy {
    type Err = RecipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weighted" | "exact" | "substitution" => Ok(Self::Weighted),
            "loose" | "substring" | "contains" => Ok(Self::Loose),
            _ => Err(RecipeError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Half-open range `[min, max)` substitution confidences are drawn from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ConfidenceBand {
    pub min: f64,
    pub max: f64,
}

impl ConfidenceBand {
    pub const DEFAULT: ConfidenceBand = ConfidenceBand {
        min: 0.80,
        max: 0.95,
    };

    pub fn new(min: f64, max: f64) -> Result<Self, RecipeError> {
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min >= max {
            return Err(RecipeError::InvalidConfidenceBand { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        rng.gen_range(self.min..self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

impl Default for ConfidenceBand {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchSettings {
    pub strategy: MatchStrategy,
    pub confidence: ConfidenceBand,
}

impl MatchSettings {
    pub fn new(strategy: MatchStrategy, confidence: ConfidenceBand) -> Self {
        Self {
            strategy,
            confidence,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Substitution {
    pub original: String,
    pub substitute: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MatchOutcome {
    pub match_score: u8,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub substitutions: Vec<Substitution>,
}

/// A catalog recipe annotated for one query. The catalog entry itself is
/// never touched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecipe {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub match_score: u8,
    pub available_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub substitutions: Vec<Substitution>,
}

impl ScoredRecipe {
    pub fn new(recipe: &Recipe, outcome: MatchOutcome) -> Self {
        Self {
            recipe: recipe.clone(),
            match_score: outcome.match_score,
            available_ingredients: outcome.matched,
            missing_ingredients: outcome.missing,
            substitutions: outcome.substitutions,
        }
    }

    pub fn total_time(&self) -> u32 {
        self.recipe.total_time()
    }
}

/// Lowercase, trim, drop blanks and case-folded duplicates; keeps input order.
pub fn normalize_available(names: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let normalized = normalize_name(name);
        if normalized.is_empty() || out.contains(&normalized) {
            continue;
        }
        out.push(normalized);
    }
    out
}

pub fn score_recipe<R: Rng + ?Sized>(
    recipe: &Recipe,
    available: &[String],
    substitutions: &SubstitutionTable,
    settings: &MatchSettings,
    rng: &mut R,
) -> MatchOutcome {
    let available = normalize_available(available);
    match settings.strategy {
        MatchStrategy::Weighted => weighted::score(
            recipe,
            &available,
            substitutions,
            &settings.confidence,
            rng,
        ),
        MatchStrategy::Loose => loose::score(recipe, &available),
    }
}

/// Scores every catalog recipe, in catalog order.
pub fn score_catalog<R: Rng + ?Sized>(
    catalog: &Catalog,
    available: &[String],
    settings: &MatchSettings,
    rng: &mut R,
) -> Vec<ScoredRecipe> {
    catalog
        .recipes()
        .iter()
        .filter_map(|recipe| {
            let outcome = score_recipe(
                recipe,
                available,
                catalog.substitutions(),
                settings,
                &mut *rng,
            );
            if settings.strategy.excludes_unmatched() && outcome.matched.is_empty() {
                return None;
            }
            Some(ScoredRecipe::new(recipe, outcome))
        })
        .collect()
}
