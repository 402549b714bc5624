// Copyright 2025 Cowboy AI, LLC.

//! Outcome of a persona step body
//!
//! Step bodies tell the dispatcher apart "not written yet" from a genuine
//! failure with an explicit tag instead of a special error type.

use std::fmt;

/// Why a step body did not complete
pub enum StepError {
    /// The step exists but its body is still to be written
    Pending,
    /// The step ran and failed; passed through to the scenario unchanged
    Failed(anyhow::Error),
}

/// Result returned by every persona step body
pub type StepResult = Result<(), StepError>;

/// Mark a step body as unfinished
///
/// ```rust
/// use cim_narrative::{pending, StepResult};
///
/// fn cancel_order() -> StepResult {
///     pending()
/// }
///
/// assert!(cancel_order().is_err());
/// ```
pub fn pending() -> StepResult {
    Err(StepError::Pending)
}

impl StepError {
    /// Wrap any error as a step failure
    pub fn failed(err: impl Into<anyhow::Error>) -> Self {
        StepError::Failed(err.into())
    }

    /// Check if this is the unfinished marker
    pub fn is_pending(&self) -> bool {
        matches!(self, StepError::Pending)
    }
}

impl<E> From<E> for StepError
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(err: E) -> Self {
        StepError::Failed(anyhow::Error::new(err))
    }
}

impl fmt::Debug for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Pending => f.write_str("Pending"),
            StepError::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::Pending => f.write_str("pending implementation"),
            StepError::Failed(err) => write!(f, "{err}"),
        }
    }
}
