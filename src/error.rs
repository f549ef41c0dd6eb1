//! Error types for MargaPlan.

use thiserror::Error;

/// MargaPlan error type.
///
/// Recoverable planning outcomes (timeout, approximate solutions) are not
/// errors; they are reported through result statuses. These variants cover
/// the conditions that abort a solve outright.
#[derive(Error, Debug)]
pub enum PlanError {
    /// Agents declared different propagation step sizes.
    #[error("propagation step size mismatch across agents: {first} vs {other}")]
    StepSizeMismatch { first: f64, other: f64 },

    /// An agent could not be given an initial trajectory, so no root plan
    /// exists.
    #[error("no valid initial trajectory for agent {0}")]
    InvalidStart(usize),

    /// Intermediate-state insertion and constraint checking cannot be
    /// combined; the per-substep constraint policy is undefined.
    #[error("intermediate states cannot be combined with a non-empty constraint set")]
    IntermediateStatesWithConstraints,
}

pub type Result<T> = std::result::Result<T, PlanError>;
