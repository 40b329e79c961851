//! Immutable problem instance.

use crate::distance::ArcMatrix;
use crate::error::{RoutingError, RoutingResult};

use super::{Vertex, VertexId};

/// A routing instance: vertices, the dense arc matrix, and the fleet size.
///
/// Instances are frozen after construction and meant to be shared behind a
/// [`std::sync::Arc`] by evaluations, solutions, arc sets and operators.
///
/// # Examples
///
/// ```
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::models::{Instance, Vertex};
///
/// let vertices = vec![Vertex::depot(0), Vertex::customer(1, 4.0), Vertex::customer(2, 6.0)];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]);
/// let instance = Instance::new(vertices, arcs, 2).unwrap();
///
/// assert_eq!(instance.depot(), 0);
/// assert_eq!(instance.customers(), &[1, 2]);
/// assert_eq!(instance.fleet_size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    vertices: Vec<Vertex>,
    arcs: ArcMatrix,
    fleet_size: usize,
    depot: VertexId,
    customers: Vec<VertexId>,
}

impl Instance {
    /// Creates an instance after validating its data.
    ///
    /// Vertex ids must equal their position, the matrix must be n×n, exactly
    /// one depot must exist, the fleet must be non-empty, and all demands and
    /// distances must be finite and non-negative.
    pub fn new(vertices: Vec<Vertex>, arcs: ArcMatrix, fleet_size: usize) -> RoutingResult<Self> {
        if let Some((idx, v)) = vertices.iter().enumerate().find(|(i, v)| v.id() != *i) {
            return Err(RoutingError::InvalidInstance(format!(
                "vertex at position {} has id {}",
                idx,
                v.id()
            )));
        }
        if arcs.size() != vertices.len() {
            return Err(RoutingError::InvalidInstance(format!(
                "arc matrix is {0}x{0} but there are {1} vertices",
                arcs.size(),
                vertices.len()
            )));
        }
        if fleet_size == 0 {
            return Err(RoutingError::InvalidInstance(
                "fleet size must be at least 1".to_string(),
            ));
        }

        let depots: Vec<VertexId> = vertices.iter().filter(|v| v.is_depot()).map(|v| v.id()).collect();
        let depot = match depots.as_slice() {
            [depot] => *depot,
            _ => {
                return Err(RoutingError::InvalidInstance(format!(
                    "expected exactly one depot, found {}",
                    depots.len()
                )))
            }
        };

        if let Some(v) = vertices
            .iter()
            .find(|v| !v.demand().is_finite() || v.demand() < 0.0)
        {
            return Err(RoutingError::InvalidInstance(format!(
                "vertex {} has invalid demand {}",
                v.id(),
                v.demand()
            )));
        }
        if arcs
            .arcs()
            .any(|a| !a.distance().is_finite() || a.distance() < 0.0)
        {
            return Err(RoutingError::InvalidInstance(
                "arc distances must be finite and non-negative".to_string(),
            ));
        }

        let customers = vertices.iter().filter(|v| !v.is_depot()).map(|v| v.id()).collect();

        Ok(Self {
            vertices,
            arcs,
            fleet_size,
            depot,
            customers,
        })
    }

    /// The depot all routes start and end at.
    pub fn depot(&self) -> VertexId {
        self.depot
    }

    /// Customer ids in ascending order.
    pub fn customers(&self) -> &[VertexId] {
        &self.customers
    }

    /// All vertices, indexed by id.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns the vertex with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id]
    }

    /// Returns `true` if `id` is a customer of this instance.
    pub fn is_customer(&self, id: VertexId) -> bool {
        id < self.vertices.len() && !self.vertices[id].is_depot()
    }

    /// The arc matrix.
    pub fn arcs(&self) -> &ArcMatrix {
        &self.arcs
    }

    /// Distance of the arc from `from` to `to`.
    #[inline]
    pub fn distance(&self, from: VertexId, to: VertexId) -> f64 {
        self.arcs.distance(from, to)
    }

    /// Demand of a vertex. Depots never contribute load.
    #[inline]
    pub fn demand(&self, id: VertexId) -> f64 {
        let v = &self.vertices[id];
        if v.is_depot() {
            0.0
        } else {
            v.demand()
        }
    }

    /// Number of available vehicles (maximum number of routes).
    pub fn fleet_size(&self) -> usize {
        self.fleet_size
    }

    /// Number of vertices, depot included.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: a valid instance holds at least its depot.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Largest customer demand, zero without customers.
    pub fn max_demand(&self) -> f64 {
        self.customers
            .iter()
            .map(|&c| self.vertices[c].demand())
            .fold(0.0, f64::max)
    }

    /// Largest arc distance.
    pub fn max_distance(&self) -> f64 {
        self.arcs.arcs().map(|a| a.distance()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertices() -> Vec<Vertex> {
        vec![
            Vertex::depot(0),
            Vertex::customer(1, 10.0),
            Vertex::customer(2, 20.0),
        ]
    }

    fn arcs() -> ArcMatrix {
        ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)])
    }

    #[test]
    fn test_instance_new() {
        let inst = Instance::new(vertices(), arcs(), 2).expect("valid");
        assert_eq!(inst.len(), 3);
        assert_eq!(inst.depot(), 0);
        assert_eq!(inst.customers(), &[1, 2]);
        assert!(inst.is_customer(2));
        assert!(!inst.is_customer(0));
        assert!(!inst.is_customer(9));
        assert!((inst.distance(0, 1) - 5.0).abs() < 1e-10);
        assert_eq!(inst.max_demand(), 20.0);
        assert!((inst.max_distance() - 8.0).abs() < 1e-10);
    }

    #[test]
    fn test_depot_demand_ignored() {
        let mut vs = vertices();
        vs[0] = Vertex::new(0, "D", true, 50.0);
        let inst = Instance::new(vs, arcs(), 1).expect("valid");
        assert_eq!(inst.demand(0), 0.0);
        assert_eq!(inst.demand(1), 10.0);
    }

    #[test]
    fn test_rejects_misnumbered_vertices() {
        let vs = vec![Vertex::depot(0), Vertex::customer(2, 1.0), Vertex::customer(1, 1.0)];
        assert!(matches!(
            Instance::new(vs, arcs(), 1),
            Err(RoutingError::InvalidInstance(_))
        ));
    }

    #[test]
    fn test_rejects_matrix_size() {
        let am = ArcMatrix::new(2);
        assert!(Instance::new(vertices(), am, 1).is_err());
    }

    #[test]
    fn test_rejects_depot_count() {
        let vs = vec![Vertex::customer(0, 1.0), Vertex::customer(1, 1.0), Vertex::customer(2, 1.0)];
        assert!(Instance::new(vs, arcs(), 1).is_err());

        let vs = vec![Vertex::depot(0), Vertex::depot(1), Vertex::customer(2, 1.0)];
        assert!(Instance::new(vs, arcs(), 1).is_err());
    }

    #[test]
    fn test_rejects_zero_fleet() {
        assert!(Instance::new(vertices(), arcs(), 0).is_err());
    }

    #[test]
    fn test_rejects_negative_values() {
        let mut vs = vertices();
        vs[1] = Vertex::customer(1, -1.0);
        assert!(Instance::new(vs, arcs(), 1).is_err());

        let am = ArcMatrix::from_distances(3, vec![0.0, -1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0])
            .expect("square");
        assert!(Instance::new(vertices(), am, 1).is_err());
    }
}
