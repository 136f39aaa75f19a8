//! Filter, query and sort over scored recipes, plus the two end-to-end
//! lookups built on them.

pub mod filters;
pub mod sort;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::catalog::Catalog;
use crate::matching::{score_catalog, MatchSettings, ScoredRecipe};

pub use filters::{apply_filters, query_recipes, SearchFilters};
pub use sort::{sort_recipes, SortKey};

/// Scores the whole catalog against `available`, keeps what passes
/// `filters`, best match first.
pub fn find_matching_recipes<R: Rng + ?Sized>(
    catalog: &Catalog,
    available: &[String],
    filters: &SearchFilters,
    settings: &MatchSettings,
    rng: &mut R,
) -> Vec<ScoredRecipe> {
    let scored = score_catalog(catalog, available, settings, rng);
    let scored_count = scored.len();
    let filtered = apply_filters(scored, filters);
    debug!(
        strategy = %settings.strategy,
        available = available.len(),
        scored = scored_count,
        kept = filtered.len(),
        "matched recipes"
    );
    sort_recipes(filtered, SortKey::Match)
}

/// Free-text lookup with no pantry. Every recipe is scored against an empty
/// available set, so scores only reflect the weighting policy. Catalog
/// order is preserved.
pub fn search_by_query(catalog: &Catalog, query: &str, filters: &SearchFilters) -> Vec<ScoredRecipe> {
    // An empty pantry never reaches the substitution sampler.
    let mut rng = StdRng::seed_from_u64(0);
    let scored = score_catalog(catalog, &[], &MatchSettings::default(), &mut rng);
    let hits = query_recipes(scored, query);
    apply_filters(hits, filters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Difficulty;
    use crate::matching::{ConfidenceBand, MatchStrategy};

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn stir_fry_pantry_ranks_stir_fry_first() {
        let catalog = Catalog::builtin();
        let pantry = names(&["Chicken Breast", "bell pepper", "onion", "garlic", "olive oil"]);
        let mut rng = StdRng::seed_from_u64(21);
        let results = find_matching_recipes(
            catalog,
            &pantry,
            &SearchFilters::default(),
            &MatchSettings::default(),
            &mut rng,
        );
        let top = &results[0];
        assert_eq!(top.recipe.id, "1");
        assert_eq!(top.match_score, 80);
        assert_eq!(top.missing_ingredients, names(&["ginger"]));
        for pair in results.windows(2) {
            assert!(pair[0].match_score >= pair[1].match_score);
        }
    }

    #[test]
    fn filters_apply_before_ranking() {
        let catalog = Catalog::builtin();
        let filters = SearchFilters {
            min_match_score: Some(50),
            difficulty: Some(vec![Difficulty::Easy]),
            ..SearchFilters::default()
        };
        let mut rng = StdRng::seed_from_u64(4);
        let results = find_matching_recipes(
            catalog,
            &names(&["eggs", "butter"]),
            &filters,
            &MatchSettings::default(),
            &mut rng,
        );
        let ids: Vec<&str> = results.iter().map(|r| r.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["4"]);
        assert_eq!(results[0].match_score, 80);
    }

    #[test]
    fn loose_strategy_drops_recipes_with_no_overlap() {
        let catalog = Catalog::builtin();
        let settings = MatchSettings::new(MatchStrategy::Loose, ConfidenceBand::DEFAULT);
        let mut rng = StdRng::seed_from_u64(4);
        let results = find_matching_recipes(
            catalog,
            &names(&["spinach"]),
            &SearchFilters::default(),
            &settings,
            &mut rng,
        );
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].recipe.id, "6");
        assert_eq!(results[0].match_score, 20);
    }

    #[test]
    fn query_search_combines_text_and_filters() {
        let catalog = Catalog::builtin();
        let all_garlic = search_by_query(catalog, "garlic", &SearchFilters::default());
        let ids: Vec<&str> = all_garlic.iter().map(|r| r.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "5"]);

        let vegan = SearchFilters {
            dietary: Some(names(&["vegan"])),
            ..SearchFilters::default()
        };
        let ids: Vec<String> = search_by_query(catalog, "garlic", &vegan)
            .into_iter()
            .map(|r| r.recipe.id)
            .collect();
        assert_eq!(ids, names(&["3", "5"]));
    }
}
