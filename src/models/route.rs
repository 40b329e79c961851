//! Route type with cached prefix labels.

use crate::evaluation::Evaluation;

use super::{CostComponents, Instance, VertexId};

/// Position of a vertex inside a solution.
///
/// `position` indexes the route's node sequence, where position 0 and the
/// last position hold the depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeLocation {
    /// Route index within the solution.
    pub route: usize,
    /// Index into the route's node sequence.
    pub position: usize,
}

impl NodeLocation {
    /// Creates a location.
    pub fn new(route: usize, position: usize) -> Self {
        Self { route, position }
    }
}

/// An ordered sequence of customers served by one vehicle.
///
/// The node sequence is stored with the depot at both ends
/// (`[depot, c1, ..., ck, depot]`). Alongside it the route caches prefix
/// labels so that the distance and load of any contiguous segment, in
/// either direction, is available in O(1):
///
/// - `forward_distance[p]`: distance travelled from position 0 to `p`
/// - `backward_distance[p]`: same arcs traversed in reverse
/// - `load[p]`: demand of the nodes strictly before `p`
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::models::{Instance, Route, Vertex};
///
/// let vertices = vec![Vertex::depot(0), Vertex::customer(1, 4.0), Vertex::customer(2, 6.0)];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 1).unwrap());
/// let evaluation = Evaluation::new(instance, 20.0);
///
/// let route = Route::new(&evaluation, &[1, 2]);
/// assert_eq!(route.customers(), &[1, 2]);
/// assert_eq!(route.nodes(), &[0, 1, 2, 0]);
/// assert!((route.distance() - 18.0).abs() < 1e-10);
/// assert_eq!(route.load(), 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Route {
    nodes: Vec<VertexId>,
    forward_distance: Vec<f64>,
    backward_distance: Vec<f64>,
    load: Vec<f64>,
    components: CostComponents,
}

impl Route {
    /// Builds a route visiting `customers` in order.
    pub fn new(evaluation: &Evaluation, customers: &[VertexId]) -> Self {
        let depot = evaluation.instance().depot();
        let mut nodes = Vec::with_capacity(customers.len() + 2);
        nodes.push(depot);
        nodes.extend_from_slice(customers);
        nodes.push(depot);
        Self::from_nodes(evaluation, nodes)
    }

    /// Builds a route from a full node sequence (depot at both ends).
    pub(crate) fn from_nodes(evaluation: &Evaluation, nodes: Vec<VertexId>) -> Self {
        let mut route = Self {
            nodes,
            forward_distance: Vec::new(),
            backward_distance: Vec::new(),
            load: Vec::new(),
            components: CostComponents::zero(),
        };
        route.update_labels(evaluation.instance());
        route.components = evaluation.components(route.distance(), route.load());
        route
    }

    /// Recomputes the prefix labels from the node sequence.
    fn update_labels(&mut self, instance: &Instance) {
        let n = self.nodes.len();
        self.forward_distance.clear();
        self.backward_distance.clear();
        self.load.clear();
        self.forward_distance.reserve(n);
        self.backward_distance.reserve(n);
        self.load.reserve(n + 1);

        let (mut fwd, mut bwd, mut load) = (0.0, 0.0, 0.0);
        self.load.push(0.0);
        for (p, &v) in self.nodes.iter().enumerate() {
            if p > 0 {
                let prev = self.nodes[p - 1];
                fwd += instance.distance(prev, v);
                bwd += instance.distance(v, prev);
            }
            load += instance.demand(v);
            self.forward_distance.push(fwd);
            self.backward_distance.push(bwd);
            self.load.push(load);
        }
    }

    /// Full node sequence, depot at both ends.
    pub fn nodes(&self) -> &[VertexId] {
        &self.nodes
    }

    /// Customers in visiting order, depot excluded.
    pub fn customers(&self) -> &[VertexId] {
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// Vertex at a node position.
    #[inline]
    pub fn node(&self, position: usize) -> VertexId {
        self.nodes[position]
    }

    /// Number of customers on this route.
    pub fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    /// Returns `true` if the route serves no customers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total distance from depot back to depot.
    pub fn distance(&self) -> f64 {
        self.forward_distance[self.nodes.len() - 1]
    }

    /// Total demand served.
    pub fn load(&self) -> f64 {
        self.load[self.nodes.len()]
    }

    /// Cached cost components.
    pub fn components(&self) -> CostComponents {
        self.components
    }

    /// Internal distance of the node positions `start..end`, traversed
    /// backwards when `reversed` is set.
    #[inline]
    pub(crate) fn segment_distance(&self, start: usize, end: usize, reversed: bool) -> f64 {
        if end <= start + 1 {
            return 0.0;
        }
        if reversed {
            self.backward_distance[end - 1] - self.backward_distance[start]
        } else {
            self.forward_distance[end - 1] - self.forward_distance[start]
        }
    }

    /// Demand of the node positions `start..end`.
    #[inline]
    pub(crate) fn segment_load(&self, start: usize, end: usize) -> f64 {
        self.load[end] - self.load[start]
    }

    pub(crate) fn set_components(&mut self, components: CostComponents) {
        self.components = components;
    }

    /// Re-weights the cached components for a (possibly reconfigured)
    /// evaluation without touching the labels.
    pub(crate) fn refresh(&mut self, evaluation: &Evaluation) {
        self.components = evaluation.components(self.distance(), self.load());
    }
}
