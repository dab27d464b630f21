//! Action construction errors.

use crate::error::{BattleFault, ErrorSeverity};

/// Reasons an action value is rejected by [`ActionBuilder`](super::ActionBuilder).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// Percentage base above 100.
    #[error("base percent {0} exceeds 100")]
    BasePercentOutOfRange(i32),

    /// Percentage variance above 1000.
    #[error("variance percent {0} exceeds 1000")]
    VariancePercentOutOfRange(i32),

    /// Negative variance.
    #[error("variance {0} is negative")]
    NegativeVariance(i32),

    /// Ailment duration with `max < min`.
    #[error("duration max {max} is below min {min}")]
    InvertedDuration { min: u32, max: u32 },

    /// Hit chance above 100.
    #[error("chance {0} exceeds 100")]
    ChanceOutOfRange(u32),
}

impl BattleFault for ActionError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            BasePercentOutOfRange(_) => "ACTION_BASE_PERCENT_OUT_OF_RANGE",
            VariancePercentOutOfRange(_) => "ACTION_VARIANCE_PERCENT_OUT_OF_RANGE",
            NegativeVariance(_) => "ACTION_NEGATIVE_VARIANCE",
            InvertedDuration { .. } => "ACTION_INVERTED_DURATION",
            ChanceOutOfRange(_) => "ACTION_CHANCE_OUT_OF_RANGE",
        }
    }
}
