//! Shared workspace: the ordered team of agents, static obstacle polygons,
//! and the workspace boundary. Read-only once built.

pub mod agent;
pub mod validity;

pub use agent::Agent;
pub use validity::{StateValidityChecker, WorkspaceValidityChecker};

use crate::core::{Aabb, Polygon};
use serde::{Deserialize, Serialize};

/// The 2D workspace shared by every planner.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct World {
    agents: Vec<Agent>,
    obstacles: Vec<Polygon>,
    bounds: Aabb,
}

impl World {
    pub fn new(agents: Vec<Agent>, obstacles: Vec<Polygon>, bounds: Aabb) -> Self {
        debug_assert!(
            agents.iter().enumerate().all(|(i, a)| a.id() == i),
            "agent ids must match their position in the world"
        );
        Self {
            agents,
            obstacles,
            bounds,
        }
    }

    /// Ordered agent list; an agent's id is its index here
    #[inline]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    #[inline]
    pub fn agent(&self, id: usize) -> &Agent {
        &self.agents[id]
    }

    #[inline]
    pub fn static_obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}
