//! Domain model types for capacitated vehicle routing.
//!
//! Provides the instance (vertices, arcs, fleet), the cost component vector,
//! routes with cached prefix labels, and solutions that keep every customer
//! assigned exactly once.

mod cost;
mod instance;
mod route;
mod solution;
mod vertex;

pub use cost::CostComponents;
pub use instance::Instance;
pub use route::{NodeLocation, Route};
pub use solution::Solution;
pub use vertex::{Vertex, VertexId};
