//! Vehicle state representation.

use super::geometry::Point2D;
use super::math::wrap_angle;
use serde::{Deserialize, Serialize};

/// State of one vehicle: planar pose plus dynamics-specific scalars.
///
/// Coordinate system: X forward, Y left, `theta` in radians CCW from +X,
/// wrapped to [0, 2*pi). The `aux` slots carry whatever the vehicle's
/// propagator needs beyond the pose (forward speed, steering angle); the
/// planning core never interprets them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Heading in radians, wrapped to [0, 2*pi)
    pub theta: f64,
    /// Dynamics-specific scalars, opaque to the planner
    pub aux: [f64; 2],
}

impl AgentState {
    /// Create a pose-only state (aux zeroed)
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self {
            x,
            y,
            theta: wrap_angle(theta),
            aux: [0.0; 2],
        }
    }

    /// Create a state with dynamics scalars
    #[inline]
    pub fn with_aux(x: f64, y: f64, theta: f64, aux: [f64; 2]) -> Self {
        Self {
            x,
            y,
            theta: wrap_angle(theta),
            aux,
        }
    }

    /// Get the position as a point
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Euclidean distance between positions, ignoring heading and aux
    #[inline]
    pub fn position_distance(&self, other: &AgentState) -> f64 {
        self.position().distance(&other.position())
    }
}
