/// Core validation errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("invalid score range: min {min} must be below max {max}")]
    InvalidScoreRange { min: i64, max: i64 },

    #[error("invalid risk thresholds: {0}")]
    InvalidThresholds(String),
}
