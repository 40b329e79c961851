//! Solution type.

use std::fmt;
use std::sync::Arc;

use crate::error::{RoutingError, RoutingResult};
use crate::evaluation::Evaluation;
use crate::local_search::Move;

use super::{CostComponents, Instance, NodeLocation, Route, VertexId};

/// An assignment of every customer to exactly one route.
///
/// Holds the routes together with a vertex → position index and the
/// aggregate cost. All mutation goes through [`Solution::apply_move`], which
/// keeps the cached costs in sync incrementally.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::models::{Instance, Solution, Vertex};
///
/// let vertices = vec![Vertex::depot(0), Vertex::customer(1, 4.0), Vertex::customer(2, 6.0)];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 2).unwrap());
/// let evaluation = Evaluation::new(instance, 20.0);
///
/// let sol = Solution::new(&evaluation, vec![vec![1], vec![2]]).unwrap();
/// assert_eq!(sol.num_routes(), 2);
/// assert!((sol.cost() - 26.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct Solution {
    instance: Arc<Instance>,
    routes: Vec<Route>,
    locations: Vec<Option<NodeLocation>>,
    components: CostComponents,
    cost: f64,
}

impl Solution {
    /// Creates a solution from customer sequences, one per route.
    ///
    /// Fails if there are more routes than vehicles, if a route references
    /// an unknown vertex or a depot, or if any customer is missing or visited
    /// twice. Empty routes are kept; they give operators somewhere to move
    /// customers to.
    pub fn new(evaluation: &Evaluation, routes: Vec<Vec<VertexId>>) -> RoutingResult<Self> {
        let instance = Arc::clone(evaluation.instance());
        if routes.len() > instance.fleet_size() {
            return Err(RoutingError::FleetSizeExceeded {
                routes: routes.len(),
                fleet_size: instance.fleet_size(),
            });
        }

        let mut locations = vec![None; instance.len()];
        for (r, customers) in routes.iter().enumerate() {
            for (i, &v) in customers.iter().enumerate() {
                if v >= instance.len() {
                    return Err(RoutingError::UnknownVertex(v));
                }
                if instance.vertex(v).is_depot() {
                    return Err(RoutingError::DepotInRoute { route: r });
                }
                if locations[v].is_some() {
                    return Err(RoutingError::DuplicateVertex(v));
                }
                locations[v] = Some(NodeLocation::new(r, i + 1));
            }
        }
        if let Some(&missing) = instance.customers().iter().find(|&&c| locations[c].is_none()) {
            return Err(RoutingError::MissingVertex(missing));
        }

        let routes: Vec<Route> = routes.iter().map(|r| Route::new(evaluation, r)).collect();
        let components = routes.iter().map(|r| r.components()).sum();
        Ok(Self {
            instance,
            routes,
            locations,
            components,
            cost: evaluation.cost(&components),
        })
    }

    /// The instance this solution belongs to.
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Routes in this solution.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route at the given index.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    /// Number of routes, empty ones included.
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Number of routes serving at least one customer.
    pub fn num_used_routes(&self) -> usize {
        self.routes.iter().filter(|r| !r.is_empty()).count()
    }

    /// Aggregate cost components.
    pub fn components(&self) -> CostComponents {
        self.components
    }

    /// Total weighted cost.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns `true` if no route exceeds the vehicle capacity.
    pub fn is_feasible(&self) -> bool {
        self.routes.iter().all(|r| r.components().overload <= 0.0)
    }

    /// Customer sequences of all routes.
    pub fn route_customers(&self) -> Vec<Vec<VertexId>> {
        self.routes.iter().map(|r| r.customers().to_vec()).collect()
    }

    /// Location of a customer, `None` for depots.
    pub fn location(&self, vertex: VertexId) -> Option<NodeLocation> {
        self.locations.get(vertex).copied().flatten()
    }

    /// Positions at which `vertex` is followed by another node.
    ///
    /// A customer has exactly one; the depot has one per route (its start).
    pub fn departure_positions(&self, vertex: VertexId) -> Vec<NodeLocation> {
        if self.instance.vertex(vertex).is_depot() {
            (0..self.routes.len()).map(|r| NodeLocation::new(r, 0)).collect()
        } else {
            self.location(vertex).into_iter().collect()
        }
    }

    /// Positions at which `vertex` is preceded by another node.
    ///
    /// A customer has exactly one; the depot has one per route (its end).
    pub fn arrival_positions(&self, vertex: VertexId) -> Vec<NodeLocation> {
        if self.instance.vertex(vertex).is_depot() {
            self.routes
                .iter()
                .enumerate()
                .map(|(r, route)| NodeLocation::new(r, route.nodes().len() - 1))
                .collect()
        } else {
            self.location(vertex).into_iter().collect()
        }
    }

    /// Checks that every customer appears exactly once and that the
    /// location index matches the routes.
    pub fn validate(&self) -> RoutingResult<()> {
        let mut seen = vec![false; self.instance.len()];
        for (r, route) in self.routes.iter().enumerate() {
            let nodes = route.nodes();
            if nodes.len() < 2
                || nodes[0] != self.instance.depot()
                || nodes[nodes.len() - 1] != self.instance.depot()
            {
                return Err(RoutingError::InvariantViolation(format!(
                    "route {} does not start and end at the depot",
                    r
                )));
            }
            for (p, &v) in nodes.iter().enumerate().take(nodes.len() - 1).skip(1) {
                if v >= self.instance.len() {
                    return Err(RoutingError::UnknownVertex(v));
                }
                if self.instance.vertex(v).is_depot() {
                    return Err(RoutingError::DepotInRoute { route: r });
                }
                if seen[v] {
                    return Err(RoutingError::DuplicateVertex(v));
                }
                seen[v] = true;
                if self.location(v) != Some(NodeLocation::new(r, p)) {
                    return Err(RoutingError::InvariantViolation(format!(
                        "stale location for vertex {}",
                        v
                    )));
                }
            }
        }
        match self.instance.customers().iter().find(|&&c| !seen[c]) {
            Some(&missing) => Err(RoutingError::MissingVertex(missing)),
            None => Ok(()),
        }
    }

    /// Re-weights cached costs for `evaluation`, e.g. after its penalty
    /// factor changed between runs. O(routes).
    pub fn refresh(&mut self, evaluation: &Evaluation) {
        for route in &mut self.routes {
            route.refresh(evaluation);
        }
        self.components = self.routes.iter().map(|r| r.components()).sum();
        self.cost = evaluation.cost(&self.components);
    }

    /// Applies a move in place and returns its cost component delta.
    ///
    /// This is the single mutation path: the touched routes are rebuilt from
    /// the move's segment plans, their cached components are set from the
    /// concatenation evaluation, and the aggregate is updated by the delta.
    pub fn apply_move(&mut self, evaluation: &Evaluation, mv: &Move) -> CostComponents {
        debug_assert!(
            mv.is_well_formed(self),
            "malformed move would duplicate or drop a vertex: {:?}",
            mv
        );

        let plans = mv.plans(self);
        let mut delta = CostComponents::zero();
        let mut rebuilt = Vec::with_capacity(plans.len());
        for plan in plans.iter().flatten() {
            let components = evaluation.evaluate_segments(self, plan.segments());
            delta += components - self.routes[plan.route()].components();
            rebuilt.push((plan.route(), plan.materialize(self), components));
        }

        for (r, nodes, components) in rebuilt {
            let mut route = Route::from_nodes(evaluation, nodes);
            debug_assert!(
                route.components().approx_eq(&components, 1e-6),
                "incremental components {:?} diverged from labels {:?}",
                components,
                route.components()
            );
            route.set_components(components);
            for (p, &v) in route.nodes().iter().enumerate().take(route.nodes().len() - 1).skip(1) {
                self.locations[v] = Some(NodeLocation::new(r, p));
            }
            self.routes[r] = route;
        }

        self.components += delta;
        self.cost = evaluation.cost(&self.components);
        delta
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, route) in self.routes.iter().enumerate() {
            let labels: Vec<&str> = route
                .nodes()
                .iter()
                .map(|&v| self.instance.vertex(v).label())
                .collect();
            writeln!(
                f,
                "Route {}: [{}] distance={:.3} load={:.3}",
                r,
                labels.join(", "),
                route.distance(),
                route.load()
            )?;
        }
        write!(
            f,
            "Cost: {:.3} (distance={:.3}, overload={:.3})",
            self.cost, self.components.distance, self.components.overload
        )
    }
}
