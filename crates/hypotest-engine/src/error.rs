use std::fmt;

use crate::dataset::StoreError;

/// Malformed or insufficient data, rejected before any computation.
///
/// Always recoverable by entering corrected data.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error)]
pub struct InputError {
    pub reasons: Vec<String>,
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid input: {}", self.reasons.join("; "))
    }
}

/// The requested statistic is mathematically undefined for the data.
///
/// Zero variance where a variance divides, zero expected frequencies,
/// singular regressions and similar cases end up here instead of producing
/// a silent `NaN` or a default value.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("degenerate input: {reason}")]
pub struct DegenerateInput {
    pub reason: String,
}

impl DegenerateInput {
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Any failure of a single test invocation.
///
/// None of these is fatal to the session.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::From,
    derive_more::IsVariant,
)]
pub enum EngineError {
    #[display("{_0}")]
    Input(InputError),
    #[display("{_0}")]
    Degenerate(DegenerateInput),
    #[display("{_0}")]
    Store(StoreError),
}
