//! Foundation layer: math helpers, planar geometry, vehicle states,
//! controls, and timed trajectories. No internal dependencies.

pub mod dynamics;
pub mod geometry;
pub mod math;
pub mod state;
pub mod trajectory;

pub use dynamics::{Control, Propagator};
pub use geometry::{Aabb, Point2D, Polygon};
pub use state::AgentState;
pub use trajectory::Trajectory;
