//! Moves and their route-segment plans.
//!
//! Every move describes the routes it produces as a concatenation of at most
//! [`MAX_SEGMENTS`] segments of the current routes. Delta evaluation and
//! application both work from this description, so the cost a move reports
//! is exactly the cost it produces.

use crate::arc_set::ArcSet;
use crate::evaluation::RouteSegment;
use crate::models::{CostComponents, NodeLocation, Solution, VertexId};

/// Minimum improvement for a move to count as improving.
pub const EPSILON: f64 = 1e-9;

/// Upper bound on the number of segments composing a planned route.
pub const MAX_SEGMENTS: usize = 5;

/// New composition of one route, as segments of the current routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePlan {
    route: usize,
    segments: [RouteSegment; MAX_SEGMENTS],
    count: usize,
}

impl RoutePlan {
    fn new(route: usize) -> Self {
        Self {
            route,
            segments: [RouteSegment::forward(0, 0, 0); MAX_SEGMENTS],
            count: 0,
        }
    }

    fn push(&mut self, segment: RouteSegment) -> &mut Self {
        self.segments[self.count] = segment;
        self.count += 1;
        self
    }

    /// Index of the route being replaced.
    pub fn route(&self) -> usize {
        self.route
    }

    /// Segments composing the new route, in visiting order.
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments[..self.count]
    }

    /// Node sequence of the new route.
    pub fn materialize(&self, solution: &Solution) -> Vec<VertexId> {
        let len = self.segments().iter().map(RouteSegment::len).sum();
        let mut nodes = Vec::with_capacity(len);
        for segment in self.segments() {
            segment.extend_into(solution, &mut nodes);
        }
        nodes
    }

    /// Arcs joining consecutive non-empty segments.
    ///
    /// A plan that leaves only the two depot ends describes an empty route,
    /// which traverses no arc, so no depot-to-depot junction is reported.
    pub fn junctions<'a>(&'a self, solution: &'a Solution) -> impl Iterator<Item = (VertexId, VertexId)> + 'a {
        let mut prev: Option<VertexId> = None;
        self.segments()
            .iter()
            .filter(|s| !s.is_empty())
            .filter_map(move |s| {
                let route = solution.route(s.route);
                let arc = prev.map(|p| (p, s.first(route)));
                prev = Some(s.last(route));
                arc
            })
            .filter(|&(u, v)| u != v)
    }

    /// Arcs traversed inside reversed segments, in visiting order.
    pub fn reversed_arcs<'a>(&'a self, solution: &'a Solution) -> impl Iterator<Item = (VertexId, VertexId)> + 'a {
        self.segments()
            .iter()
            .filter(|s| s.reversed && s.len() >= 2)
            .flat_map(move |s| {
                solution.route(s.route).nodes()[s.start..s.end]
                    .windows(2)
                    .rev()
                    .map(|w| (w[1], w[0]))
            })
    }
}

/// A run of `len` consecutive node positions starting at `start`.
///
/// An empty span marks the insertion point in front of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Route index.
    pub route: usize,
    /// First node position.
    pub start: usize,
    /// Number of nodes.
    pub len: usize,
}

impl Span {
    /// Creates a span.
    pub fn new(route: usize, start: usize, len: usize) -> Self {
        Self { route, start, len }
    }

    /// One past the last position.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    fn segment(&self, reversed: bool) -> RouteSegment {
        RouteSegment::oriented(self.route, self.start, self.end(), reversed)
    }

    fn fits(&self, solution: &Solution) -> bool {
        if self.route >= solution.num_routes() || self.start == 0 {
            return false;
        }
        self.end() < solution.route(self.route).nodes().len()
    }
}

/// Exchanges two customer segments, either of which may be empty.
///
/// The nodes of `first` move to the slot of `second` and vice versa. With an
/// empty `first` this relocates `second` in front of `first.start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExchangeMove {
    /// Segment moving to the slot of `second`.
    pub first: Span,
    /// Segment moving to the slot of `first`.
    pub second: Span,
    /// Whether `first` is inserted back to front.
    pub reverse_first: bool,
    /// Whether `second` is inserted back to front.
    pub reverse_second: bool,
}

impl ExchangeMove {
    fn is_well_formed(&self, solution: &Solution) -> bool {
        let (x, y) = (self.first, self.second);
        if !x.fits(solution) || !y.fits(solution) || (x.len == 0 && y.len == 0) {
            return false;
        }
        if x.route != y.route {
            return true;
        }
        let touches = |ins: &Span, seg: &Span| seg.start <= ins.start && ins.start <= seg.end();
        match (x.len, y.len) {
            (0, _) => !touches(&x, &y),
            (_, 0) => !touches(&y, &x),
            _ => x.end() <= y.start || y.end() <= x.start,
        }
    }

    fn plans(&self, solution: &Solution) -> [Option<RoutePlan>; 2] {
        let (x, y) = (self.first, self.second);
        let x_moved = x.segment(self.reverse_first);
        let y_moved = y.segment(self.reverse_second);
        let end_of = |r: usize| solution.route(r).nodes().len();

        if x.route != y.route {
            let mut first = RoutePlan::new(x.route);
            first
                .push(RouteSegment::forward(x.route, 0, x.start))
                .push(y_moved)
                .push(RouteSegment::forward(x.route, x.end(), end_of(x.route)));
            let mut second = RoutePlan::new(y.route);
            second
                .push(RouteSegment::forward(y.route, 0, y.start))
                .push(x_moved)
                .push(RouteSegment::forward(y.route, y.end(), end_of(y.route)));
            return [Some(first), Some(second)];
        }

        let r = x.route;
        let (lead, lead_moved, tail, tail_moved) = if x.start < y.start {
            (x, y_moved, y, x_moved)
        } else {
            (y, x_moved, x, y_moved)
        };
        let mut plan = RoutePlan::new(r);
        plan.push(RouteSegment::forward(r, 0, lead.start))
            .push(lead_moved)
            .push(RouteSegment::forward(r, lead.end(), tail.start))
            .push(tail_moved)
            .push(RouteSegment::forward(r, tail.end(), end_of(r)));
        [Some(plan), None]
    }
}

/// Inter-route 2-opt: cuts the arc after `first` and the arc after
/// `second` and reconnects the four loose ends.
///
/// Without `crossed` the tails are exchanged (`u → v⁺`, `v → u⁺`). With
/// `crossed` the heads are joined (`u → v`, `u⁺ → v⁺`), which reverses the
/// head of the second route and the tail of the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TwoOptStarMove {
    /// Position of `u` in the first route.
    pub first: NodeLocation,
    /// Position of `v` in the second route.
    pub second: NodeLocation,
    /// Whether the crossed reconnection is used.
    pub crossed: bool,
}

impl TwoOptStarMove {
    fn is_well_formed(&self, solution: &Solution) -> bool {
        let (a, b) = (self.first, self.second);
        a.route != b.route
            && a.route < solution.num_routes()
            && b.route < solution.num_routes()
            && a.position + 2 <= solution.route(a.route).nodes().len()
            && b.position + 2 <= solution.route(b.route).nodes().len()
    }

    fn plans(&self, solution: &Solution) -> [Option<RoutePlan>; 2] {
        let (r1, i) = (self.first.route, self.first.position);
        let (r2, j) = (self.second.route, self.second.position);
        let n1 = solution.route(r1).nodes().len();
        let n2 = solution.route(r2).nodes().len();

        let mut first = RoutePlan::new(r1);
        let mut second = RoutePlan::new(r2);
        if self.crossed {
            first
                .push(RouteSegment::forward(r1, 0, i + 1))
                .push(RouteSegment::backward(r2, 0, j + 1));
            second
                .push(RouteSegment::backward(r1, i + 1, n1))
                .push(RouteSegment::forward(r2, j + 1, n2));
        } else {
            first
                .push(RouteSegment::forward(r1, 0, i + 1))
                .push(RouteSegment::forward(r2, j + 1, n2));
            second
                .push(RouteSegment::forward(r2, 0, j + 1))
                .push(RouteSegment::forward(r1, i + 1, n1));
        }
        [Some(first), Some(second)]
    }
}

/// A neighborhood move, tagged by the operator family that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Segment exchange or relocation.
    Exchange(ExchangeMove),
    /// Inter-route 2-opt.
    TwoOptStar(TwoOptStarMove),
}

impl Move {
    /// Returns `true` if applying the move keeps every customer exactly
    /// once and the depot only at route ends.
    pub fn is_well_formed(&self, solution: &Solution) -> bool {
        match self {
            Move::Exchange(m) => m.is_well_formed(solution),
            Move::TwoOptStar(m) => m.is_well_formed(solution),
        }
    }

    /// Plans of the routes the move rewrites. The move must be well formed.
    pub fn plans(&self, solution: &Solution) -> [Option<RoutePlan>; 2] {
        match self {
            Move::Exchange(m) => m.plans(solution),
            Move::TwoOptStar(m) => m.plans(solution),
        }
    }

    /// Returns `true` if every arc the move introduces is in `arcs`.
    ///
    /// Junctions between segments are always checked. For exchanges the arcs
    /// inside a reversed segment are checked too; their number is bounded by
    /// the segment length. The reversed head and tail of a crossed 2-opt*
    /// span whole route parts and are taken as given.
    pub fn respects(&self, solution: &Solution, arcs: &ArcSet) -> bool {
        self.plans_respect(&self.plans(solution), solution, arcs)
    }

    pub(crate) fn plans_respect(&self, plans: &[Option<RoutePlan>], solution: &Solution, arcs: &ArcSet) -> bool {
        let allowed = |(u, v): (VertexId, VertexId)| arcs.includes_arc(u, v);
        plans.iter().flatten().all(|plan| {
            plan.junctions(solution).all(allowed)
                && match self {
                    Move::Exchange(_) => plan.reversed_arcs(solution).all(allowed),
                    Move::TwoOptStar(_) => true,
                }
        })
    }
}

/// A move together with its evaluated delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMove {
    /// The move.
    pub mv: Move,
    /// Component delta of applying it.
    pub delta: CostComponents,
    /// Weighted cost delta.
    pub cost_delta: f64,
}
