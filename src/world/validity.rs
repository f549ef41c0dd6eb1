//! Static state validity checking.

use super::World;
use crate::core::AgentState;
use std::sync::Arc;

/// Pure predicate deciding whether a single state is statically admissible
/// for one agent. Implementations must not depend on time or on the other
/// agents' trajectories; dynamic separation is handled by constraints.
pub trait StateValidityChecker {
    fn is_valid(&self, state: &AgentState) -> bool;
}

/// Workspace-backed checker: the agent's footprint must lie inside the
/// workspace bounds and stay clear of every static obstacle.
#[derive(Clone, Debug)]
pub struct WorkspaceValidityChecker {
    world: Arc<World>,
    agent: usize,
}

impl WorkspaceValidityChecker {
    pub fn new(world: Arc<World>, agent: usize) -> Self {
        Self { world, agent }
    }
}

impl StateValidityChecker for WorkspaceValidityChecker {
    fn is_valid(&self, state: &AgentState) -> bool {
        let footprint = self.world.agent(self.agent).footprint_at(state);
        if !self.world.bounds().contains(footprint.aabb()) {
            return false;
        }
        self.world
            .static_obstacles()
            .iter()
            .all(|obstacle| footprint.disjoint(obstacle))
    }
}
