//! Arc sets restricting which arcs local search may introduce.

mod set;

pub use set::{ArcSet, Successors};
