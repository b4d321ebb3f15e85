//! Error types for the banditry library.

use thiserror::Error;

/// Result type alias for bandit operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur while configuring or running a bandit experiment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// A policy or environment was configured with zero arms.
    #[error("no arms available")]
    NoArmsAvailable,

    /// A parameter lies outside its support.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Two collaborators disagree on a size (arm count, repetition count).
    #[error("dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    /// A builder was finalised with a required field missing.
    #[error("builder error: {message}")]
    BuilderError { message: String },

    /// A regret checkpoint does not name a round of the game.
    #[error("invalid checkpoint: round {round} is outside 1..={horizon}")]
    InvalidCheckpoint { round: usize, horizon: usize },
}

impl BanditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BanditError::InvalidParameter {
            message: message.into(),
        }
    }
}

/// Fails with [`BanditError::NoArmsAvailable`] when `nb_arms` is zero.
pub(crate) fn ensure_arms(nb_arms: usize) -> Result<()> {
    if nb_arms == 0 {
        return Err(BanditError::NoArmsAvailable);
    }
    Ok(())
}

/// Fails unless `value` is finite and strictly positive.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(BanditError::invalid(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}
