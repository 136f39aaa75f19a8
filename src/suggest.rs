//! Ingredient autocomplete over the catalog.

use serde::{Deserialize, Serialize};

use crate::catalog::{normalize_name, Catalog};

pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionPool {
    /// Ingredient catalog names only.
    Catalog,
    /// Catalog names plus every ingredient a recipe uses.
    #[default]
    CatalogAndRecipes,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuggestOptions {
    pub pool: SuggestionPool,
    pub limit: usize,
    pub min_query_len: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            pool: SuggestionPool::default(),
            limit: DEFAULT_SUGGESTION_LIMIT,
            min_query_len: DEFAULT_MIN_QUERY_LEN,
        }
    }
}

/// Lowercased, deduplicated candidate names in first-seen order.
pub fn candidate_pool(catalog: &Catalog, pool: SuggestionPool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let catalog_names = catalog.ingredients().iter().map(|ing| ing.normalized_name());
    let recipe_names = match pool {
        SuggestionPool::Catalog => Vec::new(),
        SuggestionPool::CatalogAndRecipes => catalog.recipe_ingredient_names(),
    };
    for name in catalog_names.chain(recipe_names) {
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

pub fn suggest(
    catalog: &Catalog,
    query: &str,
    already_selected: &[String],
    options: &SuggestOptions,
) -> Vec<String> {
    let candidates = candidate_pool(catalog, options.pool);
    suggest_from(&candidates, query, already_selected, options)
}

/// Prefix hits first, then substring hits; each group sorted by name.
pub fn suggest_from(
    candidates: &[String],
    query: &str,
    already_selected: &[String],
    options: &SuggestOptions,
) -> Vec<String> {
    let query = normalize_name(query);
    if query.chars().count() < options.min_query_len.max(1) {
        return Vec::new();
    }
    let selected: Vec<String> = already_selected.iter().map(|s| normalize_name(s)).collect();

    let mut hits: Vec<(bool, String)> = candidates
        .iter()
        .map(|candidate| normalize_name(candidate))
        .filter(|candidate| candidate.contains(&query) && !selected.contains(candidate))
        .map(|candidate| (candidate.starts_with(&query), candidate))
        .collect();
    // Names are case-folded by `normalize_name`, so ties order by folded
    // code point and "Tomato" sorts with "tomatillo" rather than before it.
    hits.sort_by(|(a_prefix, a), (b_prefix, b)| {
        b_prefix.cmp(a_prefix).then_with(|| a.cmp(b))
    });
    hits.dedup_by(|a, b| a.1 == b.1);
    hits.into_iter()
        .take(options.limit)
        .map(|(_, name)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn prefix_hits_rank_before_substring_hits() {
        let pool = names(&["tomato", "potato", "onion"]);
        let opts = SuggestOptions::default();
        assert_eq!(suggest_from(&pool, "tom", &[], &opts), names(&["tomato"]));
        assert_eq!(
            suggest_from(&pool, "to", &[], &opts),
            names(&["tomato", "potato"])
        );
    }

    #[test]
    fn short_queries_return_nothing() {
        let pool = names(&["tomato", "onion"]);
        let opts = SuggestOptions::default();
        assert!(suggest_from(&pool, "t", &[], &opts).is_empty());
        assert!(suggest_from(&pool, "  ", &[], &opts).is_empty());
    }

    #[test]
    fn excludes_already_selected_case_insensitively() {
        let pool = names(&["tomato", "potato"]);
        let opts = SuggestOptions::default();
        let got = suggest_from(&pool, "TO", &names(&["Tomato"]), &opts);
        assert_eq!(got, names(&["potato"]));
    }

    #[test]
    fn truncates_to_limit() {
        let pool: Vec<String> = (0..12).map(|i| format!("salt {i:02}")).collect();
        let opts = SuggestOptions::default();
        let got = suggest_from(&pool, "salt", &[], &opts);
        assert_eq!(got.len(), DEFAULT_SUGGESTION_LIMIT);
        assert_eq!(got[0], "salt 00");
    }

    #[test]
    fn recipe_pool_adds_recipe_only_names() {
        let catalog = Catalog::builtin();
        let mut catalog_only = Catalog::builtin().ingredients().to_vec();
        catalog_only.truncate(2);
        let small = Catalog::new(
            catalog.recipes().to_vec(),
            catalog_only,
            catalog.substitutions().clone(),
        );
        let narrow = SuggestOptions {
            pool: SuggestionPool::Catalog,
            ..SuggestOptions::default()
        };
        assert!(suggest(&small, "garl", &[], &narrow).is_empty());
        assert_eq!(
            suggest(&small, "garl", &[], &SuggestOptions::default()),
            names(&["garlic"])
        );
    }

    #[test]
    fn builtin_catalog_suggests_oils() {
        let got = suggest(
            Catalog::builtin(),
            "oil",
            &[],
            &SuggestOptions::default(),
        );
        assert_eq!(got, names(&["olive oil"]));
    }

    #[test]
    fn ties_ignore_letter_case() {
        let pool = names(&["Tomato", "tomatillo", "TOMATE", "tomato"]);
        let opts = SuggestOptions::default();
        assert_eq!(
            suggest_from(&pool, "tom", &[], &opts),
            names(&["tomate", "tomatillo", "tomato"])
        );
        let pool = names(&["Éclair", "eclair", "ÉCLAIR"]);
        assert_eq!(
            suggest_from(&pool, "éc", &[], &opts),
            names(&["éclair"])
        );
    }
}
