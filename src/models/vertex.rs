//! Vertex type.

use serde::{Deserialize, Serialize};

/// Stable vertex identifier. Equals the vertex's index in its instance.
pub type VertexId = usize;

/// A depot or customer of a routing instance.
///
/// # Examples
///
/// ```
/// use u_localsearch::models::Vertex;
///
/// let depot = Vertex::depot(0);
/// assert!(depot.is_depot());
/// assert_eq!(depot.demand(), 0.0);
///
/// let c = Vertex::customer(3, 12.0);
/// assert_eq!(c.id(), 3);
/// assert_eq!(c.label(), "3");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    id: VertexId,
    label: String,
    is_depot: bool,
    demand: f64,
}

impl Vertex {
    /// Creates a vertex.
    pub fn new(id: VertexId, label: impl Into<String>, is_depot: bool, demand: f64) -> Self {
        Self {
            id,
            label: label.into(),
            is_depot,
            demand,
        }
    }

    /// Creates a depot labelled by its id, without demand.
    pub fn depot(id: VertexId) -> Self {
        Self::new(id, id.to_string(), true, 0.0)
    }

    /// Creates a customer labelled by its id.
    pub fn customer(id: VertexId, demand: f64) -> Self {
        Self::new(id, id.to_string(), false, demand)
    }

    /// Vertex id.
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Human readable label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether this vertex is a depot.
    pub fn is_depot(&self) -> bool {
        self.is_depot
    }

    /// Demand to deliver at this vertex.
    pub fn demand(&self) -> f64 {
        self.demand
    }
}
