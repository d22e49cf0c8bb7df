//! Validation errors for deal input.

use thiserror::Error;

/// Errors raised while validating deal records before aggregation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// A deal value was negative, NaN, or infinite.
    #[error("deal #{index} ({client}) has invalid value {value}: must be a finite, non-negative amount")]
    InvalidValue {
        index: usize,
        client: String,
        value: f64,
    },

    /// A deal value on the wire was not a number at all.
    #[error("deal #{index} ({client}) has a non-numeric value: {raw}")]
    NonNumericValue {
        index: usize,
        client: String,
        raw: String,
    },

    /// The deals were individually valid but their total is not representable.
    #[error("total value of {deals} deals overflows")]
    Overflow { deals: usize },
}

impl MetricsError {
    /// Position of the offending record, if a single record is at fault.
    pub fn index(&self) -> Option<usize> {
        match self {
            MetricsError::InvalidValue { index, .. }
            | MetricsError::NonNumericValue { index, .. } => Some(*index),
            MetricsError::Overflow { .. } => None,
        }
    }
}
