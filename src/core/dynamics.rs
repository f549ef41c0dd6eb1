//! Control inputs and the dynamics propagation seam.

use super::state::AgentState;
use serde::{Deserialize, Serialize};

/// Control input for one vehicle.
///
/// The planner treats controls as opaque values; only the vehicle's
/// [`Propagator`] gives the slots meaning (e.g. steering + throttle for a
/// car, linear + angular velocity for a differential drive).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Control {
    pub values: [f64; 2],
}

impl Control {
    #[inline]
    pub fn new(values: [f64; 2]) -> Self {
        Self { values }
    }
}

/// Forward integration of one vehicle's dynamics.
///
/// Implementations must be deterministic: propagating the same state with
/// the same control and step count reproduces the same result bit for bit.
pub trait Propagator {
    /// Apply `control` to `state` for `steps` substeps of size `dt` seconds.
    fn propagate(&self, state: &AgentState, control: &Control, steps: u32, dt: f64) -> AgentState;
}
