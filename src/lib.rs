//! MargaPlan - kinodynamically feasible, collision-free trajectories for a
//! team of rigid-body vehicles sharing a 2D workspace.
//!
//! # Architecture
//!
//! The crate is organized into 4 logical layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    planner/                         │  ← Search
//! │        (constraints, RRT, conflicts, KD-CBS)        │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                    problem/                         │  ← Abstractions
//! │      (state space, samplers, goals, termination)    │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                     world/                          │  ← Workspace
//! │          (agents, obstacles, validity)              │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                      core/                          │  ← Foundation
//! │      (geometry, states, controls, trajectories)     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # How it plans
//!
//! Each agent gets a constrained kinodynamic RRT: a tree of motions grown
//! by sampling controls toward random states and integrating the agent's
//! dynamics, with time-bounded polygonal constraints pruning motions whose
//! arrival footprint enters a forbidden region. The team is coordinated by
//! KD-CBS: every joint plan is validated on a shared time grid, the
//! earliest footprint overlap between two agents becomes a conflict
//! episode, and two children are spawned, each keeping one agent out of
//! the other's footprints over the episode window. The cheapest node is
//! expanded first; a conflict-free node is the solution.
//!
//! Solves are deterministic for a fixed seed: the queue breaks ties in
//! insertion order, children are created a-side first, and every low-level
//! call consumes a seed derived from the configured master seed.

// ============================================================================
// Layer 1: Core foundation (no internal deps)
// ============================================================================
pub mod core;

// ============================================================================
// Layer 2: Shared workspace (depends on core)
// ============================================================================
pub mod world;

// ============================================================================
// Layer 3: Planning problem abstractions (depends on core, world)
// ============================================================================
pub mod problem;

// ============================================================================
// Layer 4: Planners (depends on all layers)
// ============================================================================
pub mod planner;

pub mod error;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use crate::core::{Aabb, AgentState, Control, Point2D, Polygon, Propagator, Trajectory};
pub use error::{PlanError, Result};
pub use planner::{
    detect_conflicts, CbsConfig, CbsOutcome, Conflict, Constraint, ConstraintRrt, ConstraintSet,
    KdCbs, Plan, RrtConfig, SolveResult, SolveStatus, TreeEdge,
};
pub use problem::{
    AgentProblem, ControlSampler, GoalRegion, StateSpace, TerminationCondition,
};
pub use world::{Agent, StateValidityChecker, WorkspaceValidityChecker, World};
