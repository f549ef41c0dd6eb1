//! Constrained kinodynamic RRT.
//!
//! Grows a tree of motions by sampling controls toward random states and
//! integrating the agent's dynamics. Edges are truncated at the first
//! statically invalid substep; a motion whose arrival time falls inside an
//! active constraint window is discarded when its footprint touches a
//! forbidden region. Constraint windows produced by the high level cover
//! whole conflict episodes, which is what makes the end-of-edge check
//! sufficient.

use super::constraint::ConstraintSet;
use super::SolveStatus;
use crate::core::{AgentState, Control, Trajectory};
use crate::error::{PlanError, Result};
use crate::problem::{AgentProblem, TerminationCondition};
use kiddo::{KdTree, SquaredEuclidean};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::Rng;

/// Configuration for the constrained kinodynamic RRT.
#[derive(Clone, Debug)]
pub struct RrtConfig {
    /// Probability of sampling the goal region instead of the state space
    pub goal_bias: f64,
    /// Insert every propagation substep as its own motion. Cannot be
    /// combined with constraints.
    pub intermediate_states: bool,
    /// Iteration cap independent of the termination condition
    pub max_iterations: usize,
    /// Candidates shortlisted by the embedding index per nearest-neighbour
    /// query; the state space's metric picks the neighbour among them
    pub nn_candidates: usize,
    /// Random seed for deterministic behavior (0 for random)
    pub seed: u64,
}

impl Default for RrtConfig {
    fn default() -> Self {
        Self {
            goal_bias: 0.05,
            intermediate_states: false,
            max_iterations: 100_000,
            nn_candidates: 8,
            seed: 0,
        }
    }
}

/// Outcome of one low-level solve.
#[derive(Clone, Debug)]
pub struct SolveResult {
    pub status: SolveStatus,
    /// Trajectory from the agent's start; reaches the goal region when
    /// `status` is [`SolveStatus::Exact`], otherwise the closest approach
    pub trajectory: Option<Trajectory>,
    /// Goal distance of the trajectory's final state
    pub goal_distance: f64,
    /// Motions in the tree when the solve ended
    pub tree_size: usize,
    /// Sampling iterations spent
    pub iterations: usize,
}

/// One edge of the search tree, for introspection and plotting.
#[derive(Clone, Debug)]
pub struct TreeEdge {
    pub parent: AgentState,
    pub state: AgentState,
    pub control: Control,
    pub steps: u32,
}

/// Tree node: the state reached by applying `control` for `steps` substeps
/// from the parent motion. The root has neither.
struct Motion {
    state: AgentState,
    control: Option<Control>,
    steps: u32,
    parent: Option<usize>,
    /// Substeps accumulated from the root; arrival time is
    /// `total_steps * dt`
    total_steps: u64,
}

/// Constrained kinodynamic RRT for a single agent.
///
/// Motions live in an arena indexed by `usize`; the nearest-neighbour
/// index maps embedded states back to arena slots. `clear` drops the whole
/// tree at once.
pub struct ConstraintRrt {
    config: RrtConfig,
    motions: Vec<Motion>,
    index: KdTree<f64, 4>,
    rng: StdRng,
}

impl ConstraintRrt {
    pub fn new(config: RrtConfig) -> Self {
        let rng = super::rng_from_seed(config.seed);
        Self {
            config,
            motions: Vec::new(),
            index: KdTree::new(),
            rng,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RrtConfig::default())
    }

    /// Drop the search tree
    pub fn clear(&mut self) {
        self.motions.clear();
        self.index = KdTree::new();
    }

    /// Edges of the tree built by the last solve
    pub fn tree_edges(&self) -> Vec<TreeEdge> {
        self.motions
            .iter()
            .filter_map(|m| {
                let parent = m.parent?;
                Some(TreeEdge {
                    parent: self.motions[parent].state,
                    state: m.state,
                    control: m.control?,
                    steps: m.steps,
                })
            })
            .collect()
    }

    /// Search for a trajectory from the agent's start into its goal region
    /// satisfying the static checker and every constraint on this agent.
    ///
    /// Returns an approximate (closest-approach) trajectory if the
    /// iteration cap or termination condition fires first.
    pub fn solve(
        &mut self,
        problem: &mut AgentProblem,
        constraints: &ConstraintSet,
        ptc: &TerminationCondition,
    ) -> Result<SolveResult> {
        if self.config.intermediate_states && !constraints.is_empty() {
            return Err(PlanError::IntermediateStatesWithConstraints);
        }

        self.clear();
        let agent_id = problem.agent.id();
        let start = *problem.agent.start();
        if !problem.validity.is_valid(&start) {
            warn!("[Rrt] agent {agent_id}: start state is invalid");
            return Ok(SolveResult {
                status: SolveStatus::None,
                trajectory: None,
                goal_distance: f64::INFINITY,
                tree_size: 0,
                iterations: 0,
            });
        }

        let active = constraints.for_agent(agent_id).count();
        if active > 0 {
            debug!("[Rrt] agent {agent_id}: resolving {active} constraints");
        }

        self.insert(
            problem,
            Motion {
                state: start,
                control: None,
                steps: 0,
                parent: None,
                total_steps: 0,
            },
        );

        let mut solution = None;
        let mut best = 0usize;
        let (start_solved, start_dist) = problem.goal.is_satisfied(&start);
        let mut best_dist = start_dist;
        if start_solved {
            solution = Some((0, start_dist));
        }

        let mut iterations = 0;
        while solution.is_none() && iterations < self.config.max_iterations && !ptc.is_triggered() {
            iterations += 1;

            let target = self.sample_target(problem);
            let near_idx = self.nearest(problem, &target);
            let near_state = self.motions[near_idx].state;

            let (control, steps) =
                problem
                    .control_sampler
                    .sample_to(&mut self.rng, &near_state, &target);
            let steps = steps.min(problem.max_control_duration);

            if self.config.intermediate_states {
                let substates = propagate_collecting(problem, &near_state, &control, steps);
                if (substates.len() as u32) < problem.min_control_duration.max(1) {
                    continue;
                }
                let mut parent = near_idx;
                for state in substates {
                    let total_steps = self.motions[parent].total_steps + 1;
                    parent = self.insert(
                        problem,
                        Motion {
                            state,
                            control: Some(control),
                            steps: 1,
                            parent: Some(parent),
                            total_steps,
                        },
                    );
                    let (solved, dist) = problem.goal.is_satisfied(&state);
                    if solved {
                        solution = Some((parent, dist));
                        break;
                    }
                    if dist < best_dist {
                        best_dist = dist;
                        best = parent;
                    }
                }
            } else {
                let (end, valid) = propagate_while_valid(problem, &near_state, &control, steps);
                if valid < problem.min_control_duration.max(1) {
                    continue;
                }
                let total_steps = self.motions[near_idx].total_steps + valid as u64;
                if active > 0
                    && !satisfies_constraints(
                        problem,
                        constraints,
                        &end,
                        total_steps as f64 * problem.dt,
                    )
                {
                    continue;
                }
                let idx = self.insert(
                    problem,
                    Motion {
                        state: end,
                        control: Some(control),
                        steps: valid,
                        parent: Some(near_idx),
                        total_steps,
                    },
                );
                let (solved, dist) = problem.goal.is_satisfied(&end);
                if solved {
                    solution = Some((idx, dist));
                } else if dist < best_dist {
                    best_dist = dist;
                    best = idx;
                }
            }
        }

        let result = match solution {
            Some((idx, dist)) => SolveResult {
                status: SolveStatus::Exact,
                trajectory: Some(self.extract_trajectory(problem, idx)),
                goal_distance: dist,
                tree_size: self.motions.len(),
                iterations,
            },
            None => SolveResult {
                status: SolveStatus::Approximate,
                trajectory: Some(self.extract_trajectory(problem, best)),
                goal_distance: best_dist,
                tree_size: self.motions.len(),
                iterations,
            },
        };
        debug!(
            "[Rrt] agent {agent_id}: {:?} with {} motions after {iterations} iterations",
            result.status, result.tree_size
        );
        Ok(result)
    }

    fn sample_target(&mut self, problem: &mut AgentProblem) -> AgentState {
        if problem.goal.can_sample() && self.rng.random_bool(self.config.goal_bias) {
            if let Some(state) = problem.goal.sample(&mut self.rng) {
                return state;
            }
        }
        problem.space.sample_uniform(&mut self.rng)
    }

    /// Nearest motion to `target` under the state space's own metric.
    ///
    /// The k-d tree shortlists `nn_candidates` motions through the
    /// Euclidean embedding; the shortlisted motion minimizing
    /// `space.distance` to the target wins, so the tree stays keyed by the
    /// provider metric even when it is not Euclidean.
    fn nearest(&self, problem: &AgentProblem, target: &AgentState) -> usize {
        let candidates = self
            .index
            .nearest_n::<SquaredEuclidean>(&problem.space.nn_key(target), self.config.nn_candidates);
        let mut best = candidates[0].item as usize;
        let mut best_dist = problem.space.distance(&self.motions[best].state, target);
        for candidate in &candidates[1..] {
            let idx = candidate.item as usize;
            let dist = problem.space.distance(&self.motions[idx].state, target);
            if dist < best_dist {
                best = idx;
                best_dist = dist;
            }
        }
        best
    }

    fn insert(&mut self, problem: &AgentProblem, motion: Motion) -> usize {
        let idx = self.motions.len();
        self.index.add(&problem.space.nn_key(&motion.state), idx as u64);
        self.motions.push(motion);
        idx
    }

    /// Rebuild the path by walking parent links from `last` to the root.
    fn extract_trajectory(&self, problem: &AgentProblem, last: usize) -> Trajectory {
        let mut chain = Vec::new();
        let mut cursor = Some(last);
        while let Some(idx) = cursor {
            chain.push(idx);
            cursor = self.motions[idx].parent;
        }
        chain.reverse();

        let mut trajectory = Trajectory::from_start(self.motions[chain[0]].state);
        for &idx in &chain[1..] {
            let motion = &self.motions[idx];
            let control = motion.control.expect("non-root motions carry a control");
            trajectory.append(motion.state, control, motion.steps as f64 * problem.dt);
        }
        trajectory
    }
}

/// Integrate substep by substep, stopping at the first statically invalid
/// state. Returns the last valid state and the number of valid substeps.
fn propagate_while_valid(
    problem: &AgentProblem,
    from: &AgentState,
    control: &Control,
    steps: u32,
) -> (AgentState, u32) {
    let mut current = *from;
    let mut valid = 0;
    for _ in 0..steps {
        let next = problem.propagator.propagate(&current, control, 1, problem.dt);
        if !problem.validity.is_valid(&next) {
            break;
        }
        current = next;
        valid += 1;
    }
    (current, valid)
}

/// Like [`propagate_while_valid`] but returning every valid intermediate
/// state in order.
fn propagate_collecting(
    problem: &AgentProblem,
    from: &AgentState,
    control: &Control,
    steps: u32,
) -> Vec<AgentState> {
    let mut states = Vec::with_capacity(steps as usize);
    let mut current = *from;
    for _ in 0..steps {
        let next = problem.propagator.propagate(&current, control, 1, problem.dt);
        if !problem.validity.is_valid(&next) {
            break;
        }
        states.push(next);
        current = next;
    }
    states
}

/// End-of-edge constraint check: the arrival footprint must be clear of
/// every constraint whose window contains the arrival time.
fn satisfies_constraints(
    problem: &AgentProblem,
    constraints: &ConstraintSet,
    state: &AgentState,
    time: f64,
) -> bool {
    let footprint = problem.footprint_at(state);
    for constraint in constraints.for_agent(problem.agent.id()) {
        if constraint.active_at(time) && constraint.blocks(&footprint) {
            return false;
        }
    }
    true
}
