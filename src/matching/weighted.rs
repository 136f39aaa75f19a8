use rand::Rng;

use crate::catalog::{normalize_name, Recipe, RecipeIngredient, SubstitutionTable};
use crate::matching::{ConfidenceBand, MatchOutcome, Substitution};

pub const ESSENTIAL_WEIGHT: f64 = 0.8;
pub const OPTIONAL_WEIGHT: f64 = 0.2;

/// Exact-name matching with substitution fallback. `available` must already
/// be normalized.
///
/// An empty ingredient group contributes its full weight: against an empty
/// pantry, a recipe with only optional ingredients scores 80, one with only
/// essentials scores 20 and one with no ingredients scores 100.
pub fn score<R: Rng + ?Sized>(
    recipe: &Recipe,
    available: &[String],
    substitutions: &SubstitutionTable,
    band: &ConfidenceBand,
    rng: &mut R,
) -> MatchOutcome {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut found_substitutions = Vec::new();

    for name in recipe.ingredient_names() {
        if available.contains(&name) {
            matched.push(name);
            continue;
        }
        match substitutions.find_available(&name, available) {
            Some(substitute) => {
                found_substitutions.push(Substitution {
                    original: name.clone(),
                    substitute: substitute.to_string(),
                    confidence: band.sample(rng),
                });
                matched.push(name);
            }
            None => missing.push(name),
        }
    }

    let essential = group_share(
        recipe.ingredients.iter().filter(|ing| ing.essential),
        &matched,
        ESSENTIAL_WEIGHT,
    );
    let optional = group_share(
        recipe.ingredients.iter().filter(|ing| !ing.essential),
        &matched,
        OPTIONAL_WEIGHT,
    );
    let match_score = ((essential + optional) * 100.0).round().clamp(0.0, 100.0) as u8;

    MatchOutcome {
        match_score,
        matched,
        missing,
        substitutions: found_substitutions,
    }
}

fn group_share<'a>(
    group: impl Iterator<Item = &'a RecipeIngredient>,
    matched: &[String],
    weight: f64,
) -> f64 {
    let mut total = 0usize;
    let mut hits = 0usize;
    for ingredient in group {
        total += 1;
        if matched.contains(&normalize_name(&ingredient.name)) {
            hits += 1;
        }
    }
    if total == 0 {
        return weight;
    }
    (hits as f64 / total as f64) * weight
}
