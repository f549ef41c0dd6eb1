//! Per-agent planning problem abstractions.
//!
//! The planning core stays vehicle-agnostic: concrete state spaces, control
//! samplers, propagators, and goal definitions are supplied by the caller
//! through the traits below, bundled per agent into an [`AgentProblem`].

pub mod termination;

pub use termination::TerminationCondition;

use crate::core::{AgentState, Control, Propagator};
use crate::world::{Agent, StateValidityChecker};
use rand::rngs::StdRng;

/// The agent's state space: metric plus uniform sampling over the region
/// the planner may explore.
pub trait StateSpace {
    /// Distance between two states under the space's metric.
    ///
    /// This is the metric the search tree is keyed by: the planner's
    /// nearest-neighbour query shortlists candidates through
    /// [`nn_key`](StateSpace::nn_key) and then selects the candidate
    /// minimizing this distance to the sampled target.
    fn distance(&self, a: &AgentState, b: &AgentState) -> f64;

    /// Draw a uniform sample from the space
    fn sample_uniform(&self, rng: &mut StdRng) -> AgentState;

    /// Weight applied to the heading term of the default nearest-neighbour
    /// embedding. Spaces whose metric ignores heading return 0.
    fn orientation_weight(&self) -> f64 {
        1.0
    }

    /// Embed a state for the k-d tree candidate index.
    ///
    /// The default chordal embedding `[x, y, w*cos(theta), w*sin(theta)]`
    /// orders neighbours like a weighted SE(2) metric while staying
    /// Euclidean, which is what the index requires. The embedding only
    /// shortlists candidates; the final neighbour among them is chosen by
    /// [`distance`](StateSpace::distance), so an embedding that roughly
    /// tracks the metric is sufficient.
    fn nn_key(&self, state: &AgentState) -> [f64; 4] {
        let w = self.orientation_weight();
        let (sin_t, cos_t) = state.theta.sin_cos();
        [state.x, state.y, w * cos_t, w * sin_t]
    }
}

/// Directed control sampling: propose a control, and a duration in
/// propagation substeps, that attempts to drive `from` toward `target`.
pub trait ControlSampler {
    fn sample_to(
        &mut self,
        rng: &mut StdRng,
        from: &AgentState,
        target: &AgentState,
    ) -> (Control, u32);
}

/// Goal region with a membership test and, optionally, direct sampling.
pub trait GoalRegion {
    /// Membership test returning (satisfied, distance to the region)
    fn is_satisfied(&self, state: &AgentState) -> (bool, f64);

    /// Whether [`sample`](GoalRegion::sample) can produce goal states
    fn can_sample(&self) -> bool {
        false
    }

    /// Draw a state from the goal region, if supported
    fn sample(&self, _rng: &mut StdRng) -> Option<AgentState> {
        None
    }
}

/// Everything the planners need to plan for one agent.
///
/// All agents in one solve must declare the same `dt`; the high level
/// rejects mismatches up front. `min_control_duration` and
/// `max_control_duration` bound edge lengths in substeps of `dt`.
pub struct AgentProblem {
    pub agent: Agent,
    pub space: Box<dyn StateSpace>,
    pub control_sampler: Box<dyn ControlSampler>,
    pub propagator: Box<dyn Propagator>,
    pub goal: Box<dyn GoalRegion>,
    pub validity: Box<dyn StateValidityChecker>,
    /// Propagation step size in seconds
    pub dt: f64,
    /// Shortest admissible edge, in substeps
    pub min_control_duration: u32,
    /// Longest admissible edge, in substeps
    pub max_control_duration: u32,
}

impl AgentProblem {
    /// Footprint of this agent at a state
    #[inline]
    pub fn footprint_at(&self, state: &AgentState) -> crate::core::Polygon {
        self.agent.footprint_at(state)
    }
}
