//! Per-vehicle description shared read-only across all planners.

use crate::core::{AgentState, Polygon};
use serde::{Deserialize, Serialize};

/// Immutable description of one vehicle in the shared workspace.
///
/// `id` is the vehicle's index into the world's agent list; joint plans and
/// constraints are keyed by it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    id: usize,
    name: String,
    width: f64,
    height: f64,
    start: AgentState,
}

impl Agent {
    pub fn new(id: usize, name: impl Into<String>, width: f64, height: f64, start: AgentState) -> Self {
        Self {
            id,
            name: name.into(),
            width,
            height,
            start,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Body dimensions as (width, height) in meters
    #[inline]
    pub fn shape(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    #[inline]
    pub fn start(&self) -> &AgentState {
        &self.start
    }

    /// Footprint rectangle occupied at the given state
    #[inline]
    pub fn footprint_at(&self, state: &AgentState) -> Polygon {
        Polygon::footprint(state.x, state.y, state.theta, self.width, self.height)
    }
}
