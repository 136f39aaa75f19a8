use serde::{Deserialize, Serialize};

use crate::catalog::Difficulty;
use crate::matching::ScoredRecipe;

/// Every field is optional. Dimensions combine with AND; the values inside
/// one set-valued dimension combine with OR. An empty set, or a `cook_time`
/// of zero, leaves that dimension unconstrained.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Vec<Difficulty>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_match_score: Option<u8>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        active(&self.difficulty).is_none()
            && self.max_total_time().is_none()
            && active(&self.dietary).is_none()
            && active(&self.cuisine).is_none()
            && self.min_match_score.is_none()
    }

    /// Fields set on `update` replace ours; unset fields are left alone.
    pub fn merge(&mut self, update: SearchFilters) {
        if update.difficulty.is_some() {
            self.difficulty = update.difficulty;
        }
        if update.cook_time.is_some() {
            self.cook_time = update.cook_time;
        }
        if update.dietary.is_some() {
            self.dietary = update.dietary;
        }
        if update.cuisine.is_some() {
            self.cuisine = update.cuisine;
        }
        if update.min_match_score.is_some() {
            self.min_match_score = update.min_match_score;
        }
    }

    fn max_total_time(&self) -> Option<u32> {
        self.cook_time.filter(|minutes| *minutes > 0)
    }

    pub fn matches(&self, scored: &ScoredRecipe) -> bool {
        let recipe = &scored.recipe;
        if let Some(allowed) = active(&self.difficulty) {
            if !allowed.contains(&recipe.difficulty) {
                return false;
            }
        }
        if let Some(max) = self.max_total_time() {
            if recipe.total_time() > max {
                return false;
            }
        }
        if let Some(dietary) = active(&self.dietary) {
            if !recipe.has_any_tag(dietary) {
                return false;
            }
        }
        if let Some(cuisine) = active(&self.cuisine) {
            if !recipe.has_any_tag(cuisine) {
                return false;
            }
        }
        if let Some(min) = self.min_match_score {
            if scored.match_score < min {
                return false;
            }
        }
        true
    }
}

fn active<T>(values: &Option<Vec<T>>) -> Option<&[T]> {
    values.as_deref().filter(|v| !v.is_empty())
}

pub fn apply_filters(recipes: Vec<ScoredRecipe>, filters: &SearchFilters) -> Vec<ScoredRecipe> {
    if filters.is_empty() {
        return recipes;
    }
    recipes
        .into_iter()
        .filter(|scored| filters.matches(scored))
        .collect()
}

/// Case-insensitive substring search over name, description, tags and
/// ingredient names. A blank query keeps everything.
pub fn query_recipes(recipes: Vec<ScoredRecipe>, query: &str) -> Vec<ScoredRecipe> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return recipes;
    }
    recipes
        .into_iter()
        .filter(|scored| {
            let recipe = &scored.recipe;
            recipe.name.to_lowercase().contains(&query)
                || recipe.description.to_lowercase().contains(&query)
                || recipe
                    .tags
                    .iter()
                    .any(|tag| tag.to_lowercase().contains(&query))
                || recipe
                    .ingredients
                    .iter()
                    .any(|ing| ing.name.to_lowercase().contains(&query))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::catalog::Catalog;
    use crate::matching::{score_catalog, MatchSettings};

    fn scored(pantry: &[&str]) -> Vec<ScoredRecipe> {
        let pantry: Vec<String> = pantry.iter().map(|s| s.to_string()).collect();
        let mut rng = StdRng::seed_from_u64(42);
        score_catalog(Catalog::builtin(), &pantry, &MatchSettings::default(), &mut rng)
    }

    fn ids(recipes: &[ScoredRecipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.recipe.id.as_str()).collect()
    }

    #[test]
    fn empty_filters_return_input_unchanged() {
        let all = scored(&["garlic"]);
        let out = apply_filters(all.clone(), &SearchFilters::default());
        assert_eq!(out, all);
    }

    #[test]
    fn empty_sets_do_not_constrain() {
        let filters = SearchFilters {
            difficulty: Some(Vec::new()),
            dietary: Some(Vec::new()),
            cook_time: Some(0),
            ..SearchFilters::default()
        };
        assert!(filters.is_empty());
        assert_eq!(apply_filters(scored(&[]), &filters).len(), 6);
    }

    #[test]
    fn total_time_includes_prep() {
        let filters = SearchFilters {
            cook_time: Some(25),
            ..SearchFilters::default()
        };
        let out = apply_filters(scored(&[]), &filters);
        assert_eq!(ids(&out), vec!["1", "4", "6"]);
    }

    #[test]
    fn set_dimensions_are_disjunctive_and_dimensions_conjunctive() {
        let filters = SearchFilters {
            dietary: Some(vec!["vegan".to_string(), "vegetarian".to_string()]),
            difficulty: Some(vec![Difficulty::Easy]),
            ..SearchFilters::default()
        };
        let out = apply_filters(scored(&[]), &filters);
        assert_eq!(ids(&out), vec!["3", "4", "5", "6"]);
    }

    #[test]
    fn cuisine_matches_against_tags() {
        let filters = SearchFilters {
            cuisine: Some(vec!["italian".to_string(), "asian".to_string()]),
            ..SearchFilters::default()
        };
        let out = apply_filters(scored(&[]), &filters);
        assert_eq!(ids(&out), vec!["1", "2"]);
    }

    #[test]
    fn min_match_score_is_a_floor() {
        let filters = SearchFilters {
            min_match_score: Some(80),
            ..SearchFilters::default()
        };
        let pantry = ["chicken breast", "bell pepper", "onion", "garlic", "olive oil"];
        let out = apply_filters(scored(&pantry), &filters);
        assert!(out.iter().all(|r| r.match_score >= 80));
        assert!(ids(&out).contains(&"1"));
    }

    #[test]
    fn filtering_is_idempotent() {
        let filters = SearchFilters {
            dietary: Some(vec!["healthy".to_string()]),
            cook_time: Some(45),
            min_match_score: Some(20),
            ..SearchFilters::default()
        };
        let once = apply_filters(scored(&["tomato", "garlic"]), &filters);
        let twice = apply_filters(once.clone(), &filters);
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_only_overwrites_set_fields() {
        let mut filters = SearchFilters {
            cook_time: Some(30),
            dietary: Some(vec!["vegan".to_string()]),
            ..SearchFilters::default()
        };
        filters.merge(SearchFilters {
            cook_time: Some(60),
            ..SearchFilters::default()
        });
        assert_eq!(filters.cook_time, Some(60));
        assert_eq!(filters.dietary, Some(vec!["vegan".to_string()]));
    }

    #[test]
    fn free_text_query_searches_every_text_field() {
        assert_eq!(ids(&query_recipes(scored(&[]), "PASTA")), vec!["2"]);
        assert_eq!(ids(&query_recipes(scored(&[]), "no-cook")), vec!["6"]);
        assert_eq!(ids(&query_recipes(scored(&[]), "cucumber")), vec!["6"]);
        assert_eq!(ids(&query_recipes(scored(&[]), "crisp")), vec!["1", "5"]);
        assert_eq!(query_recipes(scored(&[]), "  ").len(), 6);
    }
}
