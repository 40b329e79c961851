//! Constructive heuristics for building initial solutions.
//!
//! - [`random_solution`] — Uniform random assignment of customers to routes
//! - [`nearest_neighbor`] — Greedy capacity-aware nearest-neighbor, O(n²)

mod nearest_neighbor;
mod random;

pub use nearest_neighbor::nearest_neighbor;
pub use random::random_solution;
