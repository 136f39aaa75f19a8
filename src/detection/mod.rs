pub mod simulated;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Ingredient;
use crate::error::RecipeError;

pub use simulated::{validate_ingredient, SimulatedDetector};

/// Terminal state of one detection run. `error` is only set when the run
/// failed, in which case `ingredients` is empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionResult {
    pub ingredients: Vec<Ingredient>,
    pub confidence: f64,
    pub processing: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub detected_at: DateTime<Utc>,
}

impl DetectionResult {
    /// Overall confidence is the mean of the per-ingredient confidences.
    pub fn completed(ingredients: Vec<Ingredient>) -> Self {
        let confidences: Vec<f64> = ingredients.iter().filter_map(|i| i.confidence).collect();
        let confidence = if confidences.is_empty() {
            0.0
        } else {
            confidences.iter().sum::<f64>() / confidences.len() as f64
        };
        Self {
            ingredients,
            confidence,
            processing: false,
            error: None,
            detected_at: Utc::now(),
        }
    }

    pub fn failed(error: &RecipeError) -> Self {
        Self {
            ingredients: Vec::new(),
            confidence: 0.0,
            processing: false,
            error: Some(error.to_string()),
            detected_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

#[async_trait]
pub trait IngredientDetector: Send + Sync {
    fn name(&self) -> &str;
    async fn detect(&self, image: &[u8]) -> Result<DetectionResult, RecipeError>;
    /// Confidence in [0, 1] that a hand-typed name is a real ingredient.
    async fn validate(&self, name: &str) -> Result<f64, RecipeError>;
}

/// Runs every image concurrently; results come back in input order. A
/// failed image yields a failed `DetectionResult` rather than aborting the
/// batch.
pub async fn detect_batch(
    detector: Arc<dyn IngredientDetector>,
    images: Vec<Vec<u8>>,
) -> Vec<DetectionResult> {
    let handles: Vec<_> = images
        .into_iter()
        .map(|image| {
            let detector = Arc::clone(&detector);
            tokio::spawn(async move { detector.detect(&image).await })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for (idx, handle) in handles.into_iter().enumerate() {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(err) => Err(RecipeError::DetectionFailed(err.to_string())),
        };
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                warn!(image = idx, error = %err, "batch detection failed for image");
                results.push(DetectionResult::failed(&err));
            }
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::IngredientCategory;

    #[test]
    fn completed_result_averages_confidences() {
        let result = DetectionResult::completed(vec![
            Ingredient::new("det_1", "tomato", IngredientCategory::Vegetables).with_confidence(0.9),
            Ingredient::new("det_2", "onion", IngredientCategory::Vegetables).with_confidence(0.7),
        ]);
        assert!((result.confidence - 0.8).abs() < 1e-9);
        assert!(!result.processing);
        assert!(!result.is_failed());
    }

    #[test]
    fn failed_result_carries_the_error_text() {
        let err = RecipeError::DetectionFailed("empty image".to_string());
        let result = DetectionResult::failed(&err);
        assert!(result.is_failed());
        assert!(result.ingredients.is_empty());
        assert_eq!(
            result.error.as_deref(),
            Some("ingredient detection failed: empty image")
        );
    }

    #[tokio::test]
    async fn batch_keeps_order_and_isolates_failures() {
        let detector: Arc<dyn IngredientDetector> = Arc::new(SimulatedDetector::seeded(5));
        let results = detect_batch(
            detector,
            vec![b"first".to_vec(), Vec::new(), b"third".to_vec()],
        )
        .await;
        assert_eq!(results.len(), 3);
        assert!(!results[0].is_failed());
        assert!(results[1].is_failed());
        assert!(!results[2].is_failed());
    }
}
