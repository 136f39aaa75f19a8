use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::catalog::{normalize_name, Ingredient, IngredientCategory};
use crate::detection::{DetectionResult, IngredientDetector};
use crate::error::RecipeError;

const DETECTION_POOL: [(&str, &str, f64); 5] = [
    ("det_1", "tomato", 0.95),
    ("det_2", "onion", 0.88),
    ("det_3", "garlic", 0.82),
    ("det_4", "bell pepper", 0.91),
    ("det_5", "carrot", 0.76),
];
const MIN_DETECTED: usize = 2;
const MAX_DETECTED: usize = 5;
const CONFIDENCE_JITTER: f64 = 0.1;
const CONFIDENCE_FLOOR: f64 = 0.6;

const COMMON_NAMES: [&str; 7] = ["tomato", "onion", "garlic", "chicken", "beef", "rice", "pasta"];

/// Confidence for a typed ingredient name: [0.9, 1.0) when it overlaps a
/// common ingredient, [0.6, 0.9) otherwise.
pub fn validate_ingredient<R: Rng + ?Sized>(name: &str, rng: &mut R) -> f64 {
    let name = normalize_name(name);
    let common = !name.is_empty()
        && COMMON_NAMES
            .iter()
            .any(|common| name.contains(common) || common.contains(name.as_str()));
    if common {
        rng.gen_range(0.9..1.0)
    } else {
        rng.gen_range(0.6..0.9)
    }
}

/// Stand-in for an image model: picks a random handful of a fixed pool of
/// vegetables after a configurable delay.
pub struct SimulatedDetector {
    rng: Mutex<StdRng>,
    delay: Duration,
    delay_jitter: Duration,
    validate_delay: Duration,
}

impl SimulatedDetector {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            delay: Duration::ZERO,
            delay_jitter: Duration::ZERO,
            validate_delay: Duration::ZERO,
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Detection waits `delay` plus up to `jitter`.
    pub fn with_delay(mut self, delay: Duration, jitter: Duration) -> Self {
        self.delay = delay;
        self.delay_jitter = jitter;
        self
    }

    pub fn with_validate_delay(mut self, delay: Duration) -> Self {
        self.validate_delay = delay;
        self
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> Result<T, RecipeError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| RecipeError::DetectionFailed("random source poisoned".to_string()))?;
        Ok(f(&mut *rng))
    }

    fn draw(&self) -> Result<(Duration, Vec<Ingredient>), RecipeError> {
        let jitter_ms = self.delay_jitter.as_millis() as u64;
        self.with_rng(|rng| {
            let wait = self.delay + Duration::from_millis(rng.gen_range(0..=jitter_ms));
            let mut pool = DETECTION_POOL.to_vec();
            pool.shuffle(rng);
            let count = rng.gen_range(MIN_DETECTED..=MAX_DETECTED);
            let picked = pool
                .into_iter()
                .take(count)
                .map(|(id, name, base)| {
                    let jitter = rng.gen_range(-CONFIDENCE_JITTER..CONFIDENCE_JITTER);
                    let confidence = (base + jitter).clamp(CONFIDENCE_FLOOR, 1.0);
                    Ingredient::new(id, name, IngredientCategory::Vegetables)
                        .with_confidence(confidence)
                })
                .collect();
            (wait, picked)
        })
    }
}

#[async_trait]
impl IngredientDetector for SimulatedDetector {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn detect(&self, image: &[u8]) -> Result<DetectionResult, RecipeError> {
        if image.is_empty() {
            return Err(RecipeError::DetectionFailed("image is empty".to_string()));
        }
        let (wait, ingredients) = self.draw()?;
        debug!(bytes = image.len(), wait_ms = wait.as_millis() as u64, "simulating detection");
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        let result = DetectionResult::completed(ingredients);
        info!(
            detected = result.ingredients.len(),
            confidence = result.confidence,
            "detection complete"
        );
        Ok(result)
    }

    async fn validate(&self, name: &str) -> Result<f64, RecipeError> {
        if !self.validate_delay.is_zero() {
            tokio::time::sleep(self.validate_delay).await;
        }
        self.with_rng(|rng| validate_ingredient(name, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_between_two_and_five_distinct_pool_items() {
        let detector = SimulatedDetector::seeded(17);
        for _ in 0..50 {
            let result = tokio_test::block_on(detector.detect(b"jpeg")).unwrap();
            let count = result.ingredients.len();
            assert!((MIN_DETECTED..=MAX_DETECTED).contains(&count));
            let mut names: Vec<&str> = result.ingredients.iter().map(|i| i.name.as_str()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), count);
            for ingredient in &result.ingredients {
                let confidence = ingredient.confidence.unwrap();
                assert!((CONFIDENCE_FLOOR..=1.0).contains(&confidence));
                let base = DETECTION_POOL
                    .iter()
                    .find(|(_, name, _)| *name == ingredient.name)
                    .map(|(_, _, base)| *base)
                    .unwrap();
                assert!((confidence - base).abs() <= CONFIDENCE_JITTER + 1e-9);
            }
        }
    }

    #[test]
    fn overall_confidence_is_the_mean() {
        let detector = SimulatedDetector::seeded(2);
        let result = tokio_test::block_on(detector.detect(b"png")).unwrap();
        let sum: f64 = result.ingredients.iter().filter_map(|i| i.confidence).sum();
        let mean = sum / result.ingredients.len() as f64;
        assert!((result.confidence - mean).abs() < 1e-9);
    }

    #[test]
    fn same_seed_same_detection() {
        let a = tokio_test::block_on(SimulatedDetector::seeded(99).detect(b"x")).unwrap();
        let b = tokio_test::block_on(SimulatedDetector::seeded(99).detect(b"x")).unwrap();
        assert_eq!(a.ingredients, b.ingredients);
    }

    #[test]
    fn empty_image_fails() {
        let detector = SimulatedDetector::seeded(1);
        let err = tokio_test::block_on(detector.detect(&[])).unwrap_err();
        assert!(matches!(err, RecipeError::DetectionFailed(_)));
    }

    #[test]
    fn validation_bands_depend_on_common_names() {
        let mut rng = StdRng::seed_from_u64(3);
        for name in ["Tomato", "cherry tomatoes", "rice", "ground beef", "pas"] {
            let score = validate_ingredient(name, &mut rng);
            assert!((0.9..1.0).contains(&score), "{name}: {score}");
        }
        for name in ["saffron", "kohlrabi", ""] {
            let score = validate_ingredient(name, &mut rng);
            assert!((0.6..0.9).contains(&score), "{name}: {score}");
        }
    }

    #[test]
    fn detector_validate_uses_its_random_source() {
        let detector = SimulatedDetector::seeded(8);
        let score = tokio_test::block_on(detector.validate("garlic")).unwrap();
        assert!(score >= 0.9);
    }
}
