//! Planning layer: constraints, conflict detection, the low-level
//! constrained kinodynamic RRT, and the high-level KD-CBS coordinator.

pub mod cbs;
pub mod conflict;
pub mod constraint;
pub mod rrt;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cbs::{CbsConfig, CbsOutcome, KdCbs};
pub use conflict::{detect_conflicts, Conflict, Plan};
pub use constraint::{Constraint, ConstraintSet};
pub use rrt::{ConstraintRrt, RrtConfig, SolveResult, TreeEdge};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// How a solve ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// The returned trajectory or plan satisfies the goal and is
    /// conflict-free
    Exact,
    /// Best-effort result: the closest approach (low level) or the cheapest
    /// still-conflicting plan (high level)
    Approximate,
    /// No result to return
    None,
}

/// Seeded RNG per the crate convention: 0 requests entropy seeding.
pub(crate) fn rng_from_seed(seed: u64) -> StdRng {
    if seed == 0 {
        StdRng::from_os_rng()
    } else {
        StdRng::seed_from_u64(seed)
    }
}
