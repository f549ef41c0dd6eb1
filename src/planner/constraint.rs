//! Time-bounded polygonal constraints and the persistent set that carries
//! them down the high-level search tree.

use crate::core::Polygon;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Forbids one agent's footprint from intersecting any of the listed
/// polygons at any time inside the closed interval `time_range`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Constraint {
    /// Constrained agent id
    pub agent: usize,
    /// Forbidden regions
    pub polygons: Vec<Polygon>,
    /// Closed time interval (seconds) during which the regions are forbidden
    pub time_range: (f64, f64),
}

impl Constraint {
    pub fn new(agent: usize, polygons: Vec<Polygon>, time_range: (f64, f64)) -> Self {
        debug_assert!(time_range.0 <= time_range.1);
        Self {
            agent,
            polygons,
            time_range,
        }
    }

    /// True if the constraint applies at time `t`
    #[inline]
    pub fn active_at(&self, t: f64) -> bool {
        self.time_range.0 <= t && t <= self.time_range.1
    }

    /// True if the footprint intersects any forbidden polygon
    pub fn blocks(&self, footprint: &Polygon) -> bool {
        self.polygons.iter().any(|p| !footprint.disjoint(p))
    }
}

/// Append-only constraint set with structural sharing.
///
/// A child node's set extends its parent's in O(1) by prepending one link;
/// the tail is shared, so a branch of depth d costs O(d) space overall.
#[derive(Clone, Debug, Default)]
pub struct ConstraintSet {
    head: Option<Arc<Link>>,
    len: usize,
}

#[derive(Debug)]
struct Link {
    constraint: Constraint,
    next: Option<Arc<Link>>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// New set consisting of this set plus one more constraint
    pub fn with(&self, constraint: Constraint) -> Self {
        Self {
            head: Some(Arc::new(Link {
                constraint,
                next: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate all constraints, newest first
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Iterate the constraints that apply to one agent
    pub fn for_agent(&self, agent: usize) -> impl Iterator<Item = &Constraint> {
        self.iter().filter(move |c| c.agent == agent)
    }
}

pub struct Iter<'a> {
    next: Option<&'a Link>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Constraint;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.next.as_deref();
        Some(&link.constraint)
    }
}
