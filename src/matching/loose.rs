use crate::catalog::Recipe;
use crate::matching::MatchOutcome;

/// Containment either way: "onion" and "red onion" overlap.
pub fn overlaps(recipe_name: &str, available_name: &str) -> bool {
    recipe_name.contains(available_name) || available_name.contains(recipe_name)
}

/// Substring matching with no weighting and no substitutions. `matched`
/// lists the pantry names that hit something, so several pantry names can
/// hit one recipe ingredient; the score is capped at 100 for that reason.
pub fn score(recipe: &Recipe, available: &[String]) -> MatchOutcome {
    let recipe_names = recipe.ingredient_names();

    let matched: Vec<String> = available
        .iter()
        .filter(|have| recipe_names.iter().any(|need| overlaps(need, have)))
        .cloned()
        .collect();
    let missing: Vec<String> = recipe_names
        .iter()
        .filter(|need| !available.iter().any(|have| overlaps(need, have)))
        .cloned()
        .collect();

    let match_score = if recipe_names.is_empty() {
        0
    } else {
        let ratio = matched.len() as f64 / recipe_names.len() as f64;
        (ratio * 100.0).round().min(100.0) as u8
    };

    MatchOutcome {
        match_score,
        matched,
        missing,
        substitutions: Vec::new(),
    }
}
