//! Kinodynamic Conflict-Based Search.
//!
//! The high level searches a binary tree of conflict nodes. The root plans
//! every agent independently; each popped node is validated on the shared
//! time grid, and the earliest conflict episode spawns two children, each
//! constraining one of the involved agents away from the other's footprints
//! over the episode window and re-planning that agent. The cheapest node is
//! expanded first, ties broken in insertion order so runs replay
//! deterministically under a fixed seed.

use super::conflict::{detect_conflicts, Conflict, Plan};
use super::constraint::{Constraint, ConstraintSet};
use super::rrt::{ConstraintRrt, RrtConfig, SolveResult};
use super::SolveStatus;
use crate::error::{PlanError, Result};
use crate::problem::{AgentProblem, TerminationCondition};
use crate::world::World;
use log::{debug, info, warn};
use rand::Rng;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the high-level search.
#[derive(Clone, Debug)]
pub struct CbsConfig {
    /// Template for the low-level planners; the seed field is replaced by a
    /// derived per-call seed
    pub rrt: RrtConfig,
    /// Wall-clock budget handed to each low-level call
    pub low_level_budget: Duration,
    /// Random seed for deterministic behavior (0 for random)
    pub seed: u64,
}

impl Default for CbsConfig {
    fn default() -> Self {
        Self {
            rrt: RrtConfig::default(),
            low_level_budget: Duration::from_secs(1),
            seed: 0,
        }
    }
}

/// Outcome of a high-level solve.
#[derive(Clone, Debug)]
pub struct CbsOutcome {
    pub status: SolveStatus,
    /// Conflict-free joint plan when `status` is exact; the cheapest
    /// still-conflicting plan on timeout; `None` when the search space was
    /// exhausted
    pub plan: Option<Plan>,
    /// Low-level status of each agent's trajectory in the returned plan,
    /// ordered by agent id. Queued plans only ever hold trajectories from
    /// exact low-level solves, so these are `Exact` whenever `plan` is
    /// present and `None` otherwise.
    pub agent_statuses: Vec<SolveStatus>,
    /// Sum of trajectory durations of the returned plan
    pub cost: f64,
    /// High-level nodes expanded
    pub expansions: usize,
    /// High-level nodes created (including the root)
    pub nodes_created: usize,
}

/// Node of the high-level tree: a joint plan and the constraints that
/// produced it. The constraint set structurally shares its parent's.
struct ConflictNode {
    plan: Plan,
    constraints: ConstraintSet,
    cost: f64,
    parent: Option<usize>,
}

/// Depth of a node in the high-level tree (root = 0).
fn node_depth(nodes: &[ConflictNode], mut idx: usize) -> usize {
    let mut depth = 0;
    while let Some(parent) = nodes[idx].parent {
        depth += 1;
        idx = parent;
    }
    depth
}

/// Queue entry keyed by cost with FIFO insertion-order tiebreak.
struct HeapEntry {
    cost: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on cost; earlier insertion wins ties
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Kinodynamic Conflict-Based Search planner.
pub struct KdCbs {
    world: Arc<World>,
    config: CbsConfig,
    master_seed: u64,
    invocations: u64,
}

impl KdCbs {
    pub fn new(world: Arc<World>, config: CbsConfig) -> Self {
        let master_seed = if config.seed == 0 {
            rand::rng().random()
        } else {
            config.seed
        };
        Self {
            world,
            config,
            master_seed,
            invocations: 0,
        }
    }

    pub fn with_defaults(world: Arc<World>) -> Self {
        Self::new(world, CbsConfig::default())
    }

    /// Plan the whole team.
    ///
    /// All problems must declare the same propagation step size and be
    /// ordered by agent id. Fails fast on a step-size mismatch or when any
    /// agent cannot be given an initial trajectory.
    pub fn solve(
        &mut self,
        problems: &mut [AgentProblem],
        ptc: &TerminationCondition,
    ) -> Result<CbsOutcome> {
        if problems.is_empty() {
            return Ok(CbsOutcome {
                status: SolveStatus::Exact,
                plan: Some(Vec::new()),
                agent_statuses: Vec::new(),
                cost: 0.0,
                expansions: 0,
                nodes_created: 0,
            });
        }
        debug_assert_eq!(problems.len(), self.world.agents().len());

        let dt = problems[0].dt;
        for problem in problems.iter() {
            if problem.dt != dt {
                return Err(PlanError::StepSizeMismatch {
                    first: dt,
                    other: problem.dt,
                });
            }
        }

        info!(
            "[KdCbs] planning {} agents at dt={dt}, seed {}",
            problems.len(),
            self.master_seed
        );

        // root: every agent planned independently
        let mut root_plan = Plan::with_capacity(problems.len());
        for (i, problem) in problems.iter_mut().enumerate() {
            let result = self.plan_agent(problem, &ConstraintSet::new(), ptc)?;
            match (result.status, result.trajectory) {
                (SolveStatus::Exact, Some(trajectory)) => root_plan.push(trajectory),
                _ if ptc.is_triggered() => {
                    // cancelled before a root plan existed
                    return Ok(CbsOutcome {
                        status: SolveStatus::None,
                        plan: None,
                        agent_statuses: vec![SolveStatus::None; problems.len()],
                        cost: f64::INFINITY,
                        expansions: 0,
                        nodes_created: 0,
                    });
                }
                _ => {
                    warn!("[KdCbs] agent {i}: no initial trajectory");
                    return Err(PlanError::InvalidStart(i));
                }
            }
        }

        let mut nodes = vec![ConflictNode {
            cost: plan_cost(&root_plan),
            plan: root_plan,
            constraints: ConstraintSet::new(),
            parent: None,
        }];
        let mut queue = BinaryHeap::new();
        let mut next_seq = 0u64;
        queue.push(HeapEntry {
            cost: nodes[0].cost,
            seq: next_seq,
            node: 0,
        });

        let mut expansions = 0;
        while !ptc.is_triggered() {
            let Some(entry) = queue.pop() else {
                // search space exhausted without a conflict-free plan
                debug!("[KdCbs] queue drained after {expansions} expansions");
                return Ok(CbsOutcome {
                    status: SolveStatus::None,
                    plan: None,
                    agent_statuses: vec![SolveStatus::None; problems.len()],
                    cost: f64::INFINITY,
                    expansions,
                    nodes_created: nodes.len(),
                });
            };

            let episode = detect_conflicts(problems, &nodes[entry.node].plan);
            if episode.is_empty() {
                info!(
                    "[KdCbs] solution at depth {} after {expansions} expansions, cost {:.3}",
                    node_depth(&nodes, entry.node),
                    nodes[entry.node].cost
                );
                return Ok(CbsOutcome {
                    status: SolveStatus::Exact,
                    plan: Some(nodes[entry.node].plan.clone()),
                    agent_statuses: vec![SolveStatus::Exact; problems.len()],
                    cost: nodes[entry.node].cost,
                    expansions,
                    nodes_created: nodes.len(),
                });
            }

            expansions += 1;
            let window = (episode[0].time, episode[episode.len() - 1].time);
            let (agent_a, agent_b) = (episode[0].agent_a, episode[0].agent_b);
            debug!(
                "[KdCbs] agents {agent_a} and {agent_b} in conflict over [{:.3}, {:.3}], \
                 resolving ({} nodes queued)",
                window.0,
                window.1,
                queue.len()
            );

            let parent_plan = nodes[entry.node].plan.clone();
            let parent_constraints = nodes[entry.node].constraints.clone();

            // a-side child first, then b-side: fixed order keeps replays
            // deterministic
            for (agent, polygons) in [
                (agent_a, opposing_footprints(&episode, agent_a)),
                (agent_b, opposing_footprints(&episode, agent_b)),
            ] {
                let constraints =
                    parent_constraints.with(Constraint::new(agent, polygons, window));
                let result = self.plan_agent(&mut problems[agent], &constraints, ptc)?;
                match (result.status, result.trajectory) {
                    (SolveStatus::Exact, Some(trajectory)) => {
                        let mut plan = parent_plan.clone();
                        plan[agent] = trajectory;
                        let cost = plan_cost(&plan);
                        let node = nodes.len();
                        nodes.push(ConflictNode {
                            plan,
                            constraints,
                            cost,
                            parent: Some(entry.node),
                        });
                        next_seq += 1;
                        queue.push(HeapEntry {
                            cost,
                            seq: next_seq,
                            node,
                        });
                    }
                    (status, _) => {
                        debug!("[KdCbs] dropping {agent}-side child: replan was {status:?}");
                    }
                }
            }
        }

        // termination fired: hand back the most promising plan still queued
        debug!("[KdCbs] terminated after {expansions} expansions");
        match queue.pop() {
            Some(entry) => Ok(CbsOutcome {
                status: SolveStatus::Approximate,
                plan: Some(nodes[entry.node].plan.clone()),
                agent_statuses: vec![SolveStatus::Exact; problems.len()],
                cost: nodes[entry.node].cost,
                expansions,
                nodes_created: nodes.len(),
            }),
            None => Ok(CbsOutcome {
                status: SolveStatus::None,
                plan: None,
                agent_statuses: vec![SolveStatus::None; problems.len()],
                cost: f64::INFINITY,
                expansions,
                nodes_created: nodes.len(),
            }),
        }
    }

    fn plan_agent(
        &mut self,
        problem: &mut AgentProblem,
        constraints: &ConstraintSet,
        ptc: &TerminationCondition,
    ) -> Result<SolveResult> {
        let seed = self.derive_seed();
        let mut rrt = ConstraintRrt::new(RrtConfig {
            seed,
            ..self.config.rrt.clone()
        });
        rrt.solve(
            problem,
            constraints,
            &ptc.with_deadline(self.config.low_level_budget),
        )
    }

    /// Per-call seed stream derived from the master seed; never 0 so a
    /// derived planner cannot fall back to entropy seeding.
    fn derive_seed(&mut self) -> u64 {
        self.invocations += 1;
        let seed = self
            .master_seed
            .wrapping_add(self.invocations.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        if seed == 0 {
            1
        } else {
            seed
        }
    }
}

/// Sum of trajectory durations; monotone and per-agent additive.
fn plan_cost(plan: &Plan) -> f64 {
    plan.iter().map(|trajectory| trajectory.duration()).sum()
}

/// The other agent's footprints over a conflict episode, in step order.
fn opposing_footprints(episode: &[Conflict], agent: usize) -> Vec<crate::core::Polygon> {
    episode
        .iter()
        .map(|c| {
            if c.agent_a == agent {
                c.polygon_b
            } else {
                c.polygon_a
            }
        })
        .collect()
}
