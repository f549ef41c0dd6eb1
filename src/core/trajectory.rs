//! Timed control trajectories and time-uniform interpolation.

use super::dynamics::{Control, Propagator};
use super::state::AgentState;
use serde::{Deserialize, Serialize};

/// A control trajectory: waypoint states with the control applied between
/// consecutive waypoints and its duration in seconds.
///
/// Invariant: `states.len() == controls.len() + 1 == durations.len() + 1`.
/// Applying `controls[i]` for `durations[i]` to `states[i]` under the
/// vehicle's dynamics yields `states[i + 1]`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    states: Vec<AgentState>,
    controls: Vec<Control>,
    durations: Vec<f64>,
}

impl Trajectory {
    /// Trajectory consisting of a single start state
    pub fn from_start(start: AgentState) -> Self {
        Self {
            states: vec![start],
            controls: Vec::new(),
            durations: Vec::new(),
        }
    }

    /// Append a segment: the control applied from the current final state
    /// for `duration` seconds, arriving at `state`.
    pub fn append(&mut self, state: AgentState, control: Control, duration: f64) {
        debug_assert!(duration > 0.0);
        self.states.push(state);
        self.controls.push(control);
        self.durations.push(duration);
    }

    #[inline]
    pub fn states(&self) -> &[AgentState] {
        &self.states
    }

    #[inline]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    #[inline]
    pub fn durations(&self) -> &[f64] {
        &self.durations
    }

    /// Number of waypoint states
    #[inline]
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn state(&self, index: usize) -> &AgentState {
        &self.states[index]
    }

    #[inline]
    pub fn last_state(&self) -> &AgentState {
        self.states.last().expect("trajectory holds at least the start state")
    }

    /// Total elapsed time in seconds
    pub fn duration(&self) -> f64 {
        self.durations.iter().sum()
    }

    /// Resample so that every segment lasts exactly `dt` seconds.
    ///
    /// Each segment is subdivided into `round(duration / dt)` substeps; the
    /// control is replicated across them and the intermediate states are
    /// produced by `propagator`. Segments no longer than one substep are
    /// copied verbatim. Stored waypoints stay authoritative: the substep
    /// chain restarts from the recorded state at every segment boundary.
    pub fn interpolate(&self, propagator: &dyn Propagator, dt: f64) -> Trajectory {
        let mut states = Vec::new();
        let mut controls = Vec::new();
        let mut durations = Vec::new();

        for i in 0..self.controls.len() {
            let duration = self.durations[i];
            let steps = (0.5 + duration / dt).floor() as usize;
            states.push(self.states[i]);
            if steps <= 1 {
                controls.push(self.controls[i]);
                durations.push(duration);
                continue;
            }
            // the substep landing on states[i + 1] is implied; that waypoint
            // is pushed by the next segment (or the tail push below)
            controls.push(self.controls[i]);
            durations.push(dt);
            let mut current = self.states[i];
            for _ in 1..steps {
                current = propagator.propagate(&current, &self.controls[i], 1, dt);
                states.push(current);
                controls.push(self.controls[i]);
                durations.push(dt);
            }
        }
        states.push(*self.last_state());

        Trajectory {
            states,
            controls,
            durations,
        }
    }
}
