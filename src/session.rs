//! Mutable per-user state: the pantry being built up and the filters
//! picked so far.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::catalog::{normalize_name, Catalog, Ingredient, IngredientCategory};
use crate::error::RecipeError;
use crate::search::SearchFilters;

const MANUAL_ID_HEX_LEN: usize = 12;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionState {
    ingredients: Vec<Ingredient>,
    filters: SearchFilters,
}

/// Stable id for a hand-entered ingredient, derived from its name.
pub fn manual_ingredient_id(name: &str) -> String {
    let digest = Sha256::digest(normalize_name(name).as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("manual-{}", &hex[..MANUAL_ID_HEX_LEN])
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub fn filters(&self) -> &SearchFilters {
        &self.filters
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = normalize_name(name);
        self.ingredients
            .iter()
            .position(|ing| ing.normalized_name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Returns false for blank names and names already present.
    pub fn add_ingredient(&mut self, name: &str, category: IngredientCategory) -> bool {
        let name = normalize_name(name);
        if name.is_empty() || self.contains(&name) {
            return false;
        }
        let mut ingredient = Ingredient::new(manual_ingredient_id(&name), name, category);
        ingredient.is_available = Some(true);
        self.ingredients.push(ingredient);
        true
    }

    /// Merges detector output, skipping names already in the session.
    /// Returns how many were added.
    pub fn add_detected(&mut self, detected: &[Ingredient]) -> usize {
        let mut added = 0;
        for ingredient in detected {
            let name = ingredient.normalized_name();
            if name.is_empty() || self.contains(&name) {
                continue;
            }
            let mut entry = ingredient.clone();
            entry.name = name;
            entry.is_available = Some(true);
            self.ingredients.push(entry);
            added += 1;
        }
        debug!(added, total = self.ingredients.len(), "merged detected ingredients");
        added
    }

    /// Splits on commas; each name takes its catalog category when known.
    pub fn add_from_input(&mut self, catalog: &Catalog, raw: &str) -> Vec<String> {
        let mut added = Vec::new();
        for part in raw.split(',') {
            let name = normalize_name(part);
            if name.is_empty() {
                continue;
            }
            let category = catalog
                .ingredient_by_name(&name)
                .map(|ing| ing.category)
                .unwrap_or(IngredientCategory::Manual);
            if self.add_ingredient(&name, category) {
                added.push(name);
            }
        }
        added
    }

    pub fn remove_ingredient(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.ingredients.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Flips availability and returns the new value, or None when absent.
    pub fn toggle_ingredient(&mut self, name: &str) -> Option<bool> {
        let idx = self.position(name)?;
        let ingredient = &mut self.ingredients[idx];
        let now = !ingredient.is_available.unwrap_or(true);
        ingredient.is_available = Some(now);
        Some(now)
    }

    pub fn update_confidence(&mut self, name: &str, confidence: f64) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.ingredients[idx].confidence = Some(confidence.clamp(0.0, 1.0));
                true
            }
            None => false,
        }
    }

    pub fn clear_ingredients(&mut self) {
        self.ingredients.clear();
    }

    /// Names marked available, in insertion order.
    pub fn available_names(&self) -> Vec<String> {
        self.ingredients
            .iter()
            .filter(|ing| ing.is_available.unwrap_or(true))
            .map(|ing| ing.name.clone())
            .collect()
    }

    pub fn update_filters(&mut self, partial: SearchFilters) {
        self.filters.merge(partial);
    }

    pub fn clear_filters(&mut self) {
        self.filters = SearchFilters::default();
    }

    pub fn ensure_searchable(&self) -> Result<(), RecipeError> {
        if self.available_names().is_empty() {
            return Err(RecipeError::EmptyIngredients);
        }
        Ok(())
    }
}
