//! Error types shared across the crate.

use crate::models::VertexId;

/// Errors raised when inputs to the search are inconsistent.
///
/// All variants describe caller misuse detected before any mutation takes
/// place. Malformed moves produced internally by operators are never
/// surfaced here; they are skipped during enumeration.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// Instance data failed validation.
    InvalidInstance(String),
    /// Evaluation, solution, or an operator were built for different instances.
    InstanceMismatch,
    /// An arc set does not cover the instance's vertices.
    ArcSetSizeMismatch {
        /// Number of vertices in the instance.
        expected: usize,
        /// Number of vertices the arc set was built for.
        actual: usize,
    },
    /// No operators were supplied while the configuration requires some.
    EmptyOperatorList,
    /// Operator parameters are invalid.
    InvalidOperator(String),
    /// More routes than available vehicles.
    FleetSizeExceeded {
        /// Routes supplied.
        routes: usize,
        /// Fleet size of the instance.
        fleet_size: usize,
    },
    /// A route references a vertex id outside the instance.
    UnknownVertex(VertexId),
    /// A depot appears among a route's customers.
    DepotInRoute {
        /// Index of the offending route.
        route: usize,
    },
    /// A customer is visited more than once.
    DuplicateVertex(VertexId),
    /// A customer is not visited by any route.
    MissingVertex(VertexId),
    /// Cached state no longer matches the routes.
    InvariantViolation(String),
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingError::InvalidInstance(reason) => write!(f, "Invalid instance: {}", reason),
            RoutingError::InstanceMismatch => write!(
                f,
                "Evaluation, solution and operators must reference the same instance"
            ),
            RoutingError::ArcSetSizeMismatch { expected, actual } => write!(
                f,
                "Arc set covers {} vertices but the instance has {}",
                actual, expected
            ),
            RoutingError::EmptyOperatorList => write!(f, "At least one operator is required"),
            RoutingError::InvalidOperator(reason) => write!(f, "Invalid operator: {}", reason),
            RoutingError::FleetSizeExceeded { routes, fleet_size } => write!(
                f,
                "Solution has {} routes but the fleet size is {}",
                routes, fleet_size
            ),
            RoutingError::UnknownVertex(id) => write!(f, "Vertex {} is not part of the instance", id),
            RoutingError::DepotInRoute { route } => {
                write!(f, "Route {} lists a depot among its customers", route)
            }
            RoutingError::DuplicateVertex(id) => write!(f, "Vertex {} is visited more than once", id),
            RoutingError::MissingVertex(id) => write!(f, "Vertex {} is not visited", id),
            RoutingError::InvariantViolation(reason) => write!(f, "Invariant violated: {}", reason),
        }
    }
}

impl std::error::Error for RoutingError {}

/// Result alias for fallible operations in this crate.
pub type RoutingResult<T> = std::result::Result<T, RoutingError>;
