use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("add at least one ingredient before searching")]
    EmptyIngredients,
    #[error("ingredient detection failed: {0}")]
    DetectionFailed(String),
    #[error("invalid confidence band [{min}, {max})")]
    InvalidConfidenceBand { min: f64, max: f64 },
    #[error("recipe not found: {0}")]
    RecipeNotFound(String),
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    #[error("unknown match strategy: {0}")]
    UnknownStrategy(String),
}

impl RecipeError {
    /// Validation failures are the caller's fault; everything else is ours.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyIngredients
                | Self::InvalidConfidenceBand { .. }
                | Self::UnknownSortKey(_)
                | Self::UnknownStrategy(_)
        )
    }
}
