//! Route segments used to describe route compositions.

use crate::models::{Route, Solution, VertexId};

/// A contiguous run of node positions `start..end` of an existing route,
/// optionally traversed in reverse.
///
/// New routes produced by a move are described as a concatenation of such
/// segments; since each route caches prefix labels, a segment's distance and
/// load are available in O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteSegment {
    /// Route the nodes are taken from.
    pub route: usize,
    /// First node position (inclusive).
    pub start: usize,
    /// Last node position (exclusive).
    pub end: usize,
    /// Whether the nodes are visited back to front.
    pub reversed: bool,
}

impl RouteSegment {
    /// Segment traversed in route order.
    pub fn forward(route: usize, start: usize, end: usize) -> Self {
        Self {
            route,
            start,
            end,
            reversed: false,
        }
    }

    /// Segment traversed back to front.
    pub fn backward(route: usize, start: usize, end: usize) -> Self {
        Self {
            route,
            start,
            end,
            reversed: true,
        }
    }

    /// Same segment, optionally flipped.
    pub fn oriented(route: usize, start: usize, end: usize, reversed: bool) -> Self {
        Self {
            route,
            start,
            end,
            reversed,
        }
    }

    /// Number of nodes covered.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the segment covers no nodes.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// First vertex visited. The segment must be non-empty.
    pub fn first(&self, route: &Route) -> VertexId {
        if self.reversed {
            route.node(self.end - 1)
        } else {
            route.node(self.start)
        }
    }

    /// Last vertex visited. The segment must be non-empty.
    pub fn last(&self, route: &Route) -> VertexId {
        if self.reversed {
            route.node(self.start)
        } else {
            route.node(self.end - 1)
        }
    }

    /// Appends the segment's vertices, in visiting order, to `out`.
    pub fn extend_into(&self, solution: &Solution, out: &mut Vec<VertexId>) {
        let nodes = &solution.route(self.route).nodes()[self.start..self.end];
        if self.reversed {
            out.extend(nodes.iter().rev());
        } else {
            out.extend_from_slice(nodes);
        }
    }
}
