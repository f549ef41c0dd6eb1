//! Joint-plan validation: sweep all trajectories on a shared time grid and
//! report the earliest footprint overlap between two agents.

use crate::core::{Polygon, Trajectory};
use crate::problem::AgentProblem;
use log::trace;
use serde::{Deserialize, Serialize};

/// One trajectory per agent, ordered by agent id.
pub type Plan = Vec<Trajectory>;

/// A detected footprint overlap between two agents at a grid time.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Conflict {
    pub agent_a: usize,
    pub agent_b: usize,
    pub polygon_a: Polygon,
    pub polygon_b: Polygon,
    /// Grid time of the overlap, in seconds
    pub time: f64,
}

/// Validate a joint plan at the shared propagation step size.
///
/// Every trajectory is interpolated to its problem's `dt` and the footprints
/// are compared pairwise at each grid step. The first colliding pair is
/// followed forward for as long as both agents remain defined and in
/// collision, yielding one conflict per step of the contiguous overlap
/// episode. Later, unrelated conflicts are left for subsequent validations.
///
/// An empty return means the plan is collision-free on the `dt` grid; grid
/// aliasing finer than `dt` is not detected.
pub fn detect_conflicts(problems: &[AgentProblem], plan: &Plan) -> Vec<Conflict> {
    debug_assert_eq!(problems.len(), plan.len());
    if plan.len() < 2 {
        return Vec::new();
    }
    let dt = problems[0].dt;

    let interpolated: Vec<Trajectory> = plan
        .iter()
        .zip(problems)
        .map(|(traj, problem)| traj.interpolate(&*problem.propagator, dt))
        .collect();

    let footprint = |agent: usize, step: usize| -> Polygon {
        problems[agent].footprint_at(interpolated[agent].state(step))
    };

    let max_states = interpolated
        .iter()
        .map(Trajectory::state_count)
        .max()
        .unwrap_or(0);

    for k in 0..max_states {
        let alive: Vec<usize> = (0..interpolated.len())
            .filter(|&i| k < interpolated[i].state_count())
            .collect();

        for (ai, &i) in alive.iter().enumerate() {
            let shape_i = footprint(i, k);
            for &j in &alive[ai + 1..] {
                let shape_j = footprint(j, k);
                if shape_i.disjoint(&shape_j) {
                    continue;
                }

                // first overlap: follow the episode while it lasts
                let mut conflicts = vec![Conflict {
                    agent_a: i,
                    agent_b: j,
                    polygon_a: shape_i,
                    polygon_b: shape_j,
                    time: k as f64 * dt,
                }];
                let mut step = k + 1;
                while step < interpolated[i].state_count()
                    && step < interpolated[j].state_count()
                {
                    let next_i = footprint(i, step);
                    let next_j = footprint(j, step);
                    if next_i.disjoint(&next_j) {
                        break;
                    }
                    conflicts.push(Conflict {
                        agent_a: i,
                        agent_b: j,
                        polygon_a: next_i,
                        polygon_b: next_j,
                        time: step as f64 * dt,
                    });
                    step += 1;
                }
                trace!(
                    "[Conflict] agents {} and {} overlap for {} steps from t={:.3}",
                    i,
                    j,
                    conflicts.len(),
                    conflicts[0].time
                );
                return conflicts;
            }
        }
    }

    Vec::new()
}
