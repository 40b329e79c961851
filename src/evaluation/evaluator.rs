//! CVRP evaluation: distance plus weighted capacity overload.

use std::sync::Arc;

use crate::local_search::{Move, RoutePlan};
use crate::models::{CostComponents, Instance, Route, Solution, VertexId};

use super::RouteSegment;

/// Evaluates routes and moves for the capacitated VRP.
///
/// Cost components are `[distance, overload]` where overload is
/// `max(0, load - capacity)`; the scalar cost is
/// `distance + overload * overload_penalty_factor`.
///
/// Move deltas are computed by concatenating route segments whose distance
/// and load come from the routes' cached prefix labels, so the work done per
/// candidate is proportional to the number of arcs the move touches.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::models::{CostComponents, Instance, Vertex};
///
/// let vertices = vec![Vertex::depot(0), Vertex::customer(1, 10.0), Vertex::customer(2, 20.0)];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 1).unwrap());
///
/// let evaluation = Evaluation::new(instance, 25.0).with_overload_penalty_factor(2.0);
/// let components = evaluation.evaluate_customers(&[1, 2]);
/// assert_eq!(components, CostComponents::new(20.0, 5.0));
/// assert!((evaluation.cost(&components) - 30.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Evaluation {
    instance: Arc<Instance>,
    capacity: f64,
    overload_penalty_factor: f64,
}

impl Evaluation {
    /// Creates an evaluation for vehicles of the given capacity.
    ///
    /// The overload penalty factor defaults to 1.0.
    pub fn new(instance: Arc<Instance>, capacity: f64) -> Self {
        Self {
            instance,
            capacity,
            overload_penalty_factor: 1.0,
        }
    }

    /// Sets the overload penalty factor.
    pub fn with_overload_penalty_factor(mut self, factor: f64) -> Self {
        self.overload_penalty_factor = factor;
        self
    }

    /// Changes the overload penalty factor between optimization runs.
    pub fn set_overload_penalty_factor(&mut self, factor: f64) {
        self.overload_penalty_factor = factor;
    }

    /// Penalty charged per unit of overload.
    pub fn overload_penalty_factor(&self) -> f64 {
        self.overload_penalty_factor
    }

    /// Penalty factor scaling one unit of demand to the longest arc,
    /// `max_distance / max_demand` (1.0 without demand).
    pub fn suggested_penalty_factor(instance: &Instance) -> f64 {
        let max_demand = instance.max_demand();
        if max_demand > 0.0 {
            instance.max_distance() / max_demand
        } else {
            1.0
        }
    }

    /// Vehicle capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// The instance this evaluation reads arc and vertex data from.
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Components for a route with the given distance and load.
    #[inline]
    pub fn components(&self, distance: f64, load: f64) -> CostComponents {
        CostComponents::new(distance, (load - self.capacity).max(0.0))
    }

    /// Weighted scalar cost.
    #[inline]
    pub fn cost(&self, components: &CostComponents) -> f64 {
        components.distance + components.overload * self.overload_penalty_factor
    }

    /// Returns `true` if the components carry no overload.
    pub fn is_feasible(&self, components: &CostComponents) -> bool {
        components.overload <= 0.0
    }

    /// Evaluates a customer sequence from scratch.
    pub fn evaluate_customers(&self, customers: &[VertexId]) -> CostComponents {
        let depot = self.instance.depot();
        let mut distance = 0.0;
        let mut load = 0.0;
        let mut prev = depot;
        for &c in customers {
            distance += self.instance.distance(prev, c);
            load += self.instance.demand(c);
            prev = c;
        }
        distance += self.instance.distance(prev, depot);
        self.components(distance, load)
    }

    /// Evaluates a route from scratch, ignoring its cached labels.
    ///
    /// O(route length); meant for verification rather than the search loop.
    pub fn evaluate_route(&self, route: &Route) -> CostComponents {
        self.evaluate_customers(route.customers())
    }

    /// Evaluates the route formed by concatenating `segments` of the
    /// solution's routes. O(number of segments).
    pub fn evaluate_segments(&self, solution: &Solution, segments: &[RouteSegment]) -> CostComponents {
        let mut distance = 0.0;
        let mut load = 0.0;
        let mut prev: Option<VertexId> = None;
        for segment in segments.iter().filter(|s| !s.is_empty()) {
            let route = solution.route(segment.route);
            distance += route.segment_distance(segment.start, segment.end, segment.reversed);
            load += route.segment_load(segment.start, segment.end);
            if let Some(p) = prev {
                distance += self.instance.distance(p, segment.first(route));
            }
            prev = Some(segment.last(route));
        }
        self.components(distance, load)
    }

    /// Component delta of replacing the planned routes.
    pub fn evaluate_plans(&self, solution: &Solution, plans: &[Option<RoutePlan>]) -> CostComponents {
        plans
            .iter()
            .flatten()
            .map(|plan| {
                self.evaluate_segments(solution, plan.segments())
                    - solution.route(plan.route()).components()
            })
            .sum()
    }

    /// Component delta of applying `mv` to `solution`.
    pub fn evaluate_delta(&self, solution: &Solution, mv: &Move) -> CostComponents {
        self.evaluate_plans(solution, &mv.plans(solution))
    }
}
