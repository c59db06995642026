//! Error types for ladder configuration and both engines.

use thiserror::Error;

/// Everything that can go wrong before or during an estimate.
///
/// All variants are input-validation failures: every computation is
/// deterministic given its inputs, so nothing here is retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LadderError {
    #[error("win probability {p} is outside [0, 1]")]
    InvalidProbability { p: f64 },

    #[error("sample count must be at least 1, got {samples}")]
    InvalidSampleCount { samples: usize },

    #[error("{name} must be at least 1, got {value}")]
    InvalidThreshold { name: &'static str, value: u32 },

    #[error("match ceiling must be at least 1, got {ceiling}")]
    InvalidCeiling { ceiling: u32 },

    #[error("state (rank {rank}, points {points}) is not on this ladder")]
    UnknownState { rank: u32, points: i32 },

    #[error("transition matrix is singular at p = {p}; the chain never absorbs")]
    SingularTransition { p: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LadderError>;

impl From<toml::de::Error> for LadderError {
    fn from(err: toml::de::Error) -> Self {
        LadderError::Config(err.to_string())
    }
}

/// Reject NaN and anything outside the closed unit interval.
pub fn check_probability(p: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&p) {
        Ok(p)
    } else {
        Err(LadderError::InvalidProbability { p })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds_are_closed() {
        assert_eq!(check_probability(0.0), Ok(0.0));
        assert_eq!(check_probability(1.0), Ok(1.0));
        assert!(check_probability(-0.01).is_err());
        assert!(check_probability(1.0001).is_err());
    }

    #[test]
    fn nan_probability_is_rejected() {
        assert!(matches!(
            check_probability(f64::NAN),
            Err(LadderError::InvalidProbability { .. })
        ));
    }
}
