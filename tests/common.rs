//! Test utilities for MargaPlan integration tests.
//!
//! Provides a differential-drive reference vehicle and builders for worlds
//! and per-agent planning problems.

#![allow(dead_code)]

use marga_plan::core::math::{angle_diff, wrap_angle};
use marga_plan::{
    Aabb, Agent, AgentProblem, AgentState, Control, ControlSampler, GoalRegion, Polygon,
    Propagator, StateSpace, WorkspaceValidityChecker, World,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::TAU;
use std::sync::Arc;

pub const DT: f64 = 0.1;

/// SE(2) space over the workspace rectangle with a weighted heading term.
pub struct UnicycleSpace {
    pub bounds: Aabb,
}

impl StateSpace for UnicycleSpace {
    fn distance(&self, a: &AgentState, b: &AgentState) -> f64 {
        a.position_distance(b) + 0.5 * angle_diff(a.theta, b.theta).abs()
    }

    fn sample_uniform(&self, rng: &mut StdRng) -> AgentState {
        AgentState::new(
            rng.random_range(self.bounds.min_x..=self.bounds.max_x),
            rng.random_range(self.bounds.min_y..=self.bounds.max_y),
            rng.random_range(0.0..TAU),
        )
    }

    fn orientation_weight(&self) -> f64 {
        0.5
    }
}

/// Steers toward the target at constant speed for a random substep count.
pub struct UnicycleSampler {
    pub speed: f64,
    pub max_turn: f64,
    pub dt: f64,
    pub min_steps: u32,
    pub max_steps: u32,
}

impl ControlSampler for UnicycleSampler {
    fn sample_to(
        &mut self,
        rng: &mut StdRng,
        from: &AgentState,
        target: &AgentState,
    ) -> (Control, u32) {
        let steps = rng.random_range(self.min_steps..=self.max_steps);
        let bearing = (target.y - from.y).atan2(target.x - from.x);
        let error = angle_diff(from.theta, bearing);
        let turn = (error / (steps as f64 * self.dt)).clamp(-self.max_turn, self.max_turn);
        (Control::new([self.speed, turn]), steps)
    }
}

/// Euler-integrated unicycle: `values = [forward speed, turn rate]`.
pub struct UnicyclePropagator;

impl Propagator for UnicyclePropagator {
    fn propagate(&self, state: &AgentState, control: &Control, steps: u32, dt: f64) -> AgentState {
        let (v, omega) = (control.values[0], control.values[1]);
        let mut next = *state;
        for _ in 0..steps {
            next.x += v * next.theta.cos() * dt;
            next.y += v * next.theta.sin() * dt;
            next.theta = wrap_angle(next.theta + omega * dt);
        }
        next
    }
}

/// Disk goal region centered at `(x, y)`.
pub struct DiskGoal {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl DiskGoal {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

impl GoalRegion for DiskGoal {
    fn is_satisfied(&self, state: &AgentState) -> (bool, f64) {
        let d = state.position_distance(&AgentState::new(self.x, self.y, 0.0));
        (d <= self.radius, (d - self.radius).max(0.0))
    }

    fn can_sample(&self) -> bool {
        true
    }

    fn sample(&self, rng: &mut StdRng) -> Option<AgentState> {
        let angle = rng.random_range(0.0..TAU);
        let r = self.radius * rng.random_range(0.0f64..=1.0).sqrt();
        Some(AgentState::new(
            self.x + r * angle.cos(),
            self.y + r * angle.sin(),
            rng.random_range(0.0..TAU),
        ))
    }
}

/// World of unit-square vehicles at the given starts.
pub fn world_with(starts: &[AgentState], obstacles: Vec<Polygon>, bounds: Aabb) -> Arc<World> {
    let agents = starts
        .iter()
        .enumerate()
        .map(|(i, &s)| Agent::new(i, format!("a{i}"), 1.0, 1.0, s))
        .collect();
    Arc::new(World::new(agents, obstacles, bounds))
}

pub fn default_world(starts: &[AgentState], obstacles: Vec<Polygon>) -> Arc<World> {
    world_with(starts, obstacles, Aabb::new(-10.0, -10.0, 10.0, 10.0))
}

/// Unicycle planning problem for one agent of `world`.
pub fn problem_for(world: &Arc<World>, agent: usize, goal: DiskGoal, dt: f64) -> AgentProblem {
    AgentProblem {
        agent: world.agent(agent).clone(),
        space: Box::new(UnicycleSpace {
            bounds: *world.bounds(),
        }),
        control_sampler: Box::new(UnicycleSampler {
            speed: 1.0,
            max_turn: 2.5,
            dt,
            min_steps: 1,
            max_steps: 10,
        }),
        propagator: Box::new(UnicyclePropagator),
        goal: Box::new(goal),
        validity: Box::new(WorkspaceValidityChecker::new(Arc::clone(world), agent)),
        dt,
        min_control_duration: 1,
        max_control_duration: 10,
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
