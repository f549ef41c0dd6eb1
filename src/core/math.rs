//! Angle helpers shared across the crate.

use std::f64::consts::{PI, TAU};

/// Wrap an angle to [0, 2*pi).
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle % TAU;
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}

/// Shortest signed angular difference `b - a`, normalized to [-pi, pi].
#[inline]
pub fn angle_diff(a: f64, b: f64) -> f64 {
    let mut d = (b - a) % TAU;
    if d > PI {
        d -= TAU;
    } else if d < -PI {
        d += TAU;
    }
    d
}
