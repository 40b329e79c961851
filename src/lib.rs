//! # u-localsearch
//!
//! Local search engine for vehicle routing, exemplified by the capacitated
//! VRP. Routes cache prefix labels so that every candidate move is evaluated
//! in time proportional to the arcs it touches.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Vertex, Instance, Route, Solution, CostComponents)
//! - [`distance`] — Dense arc matrix
//! - [`evaluation`] — Distance plus overload-penalty evaluation and segment concatenation
//! - [`arc_set`] — Arc sets restricting which arcs moves may introduce
//! - [`local_search`] — Operators (segment swap, inter-route 2-opt) and the search driver
//! - [`constructive`] — Initial solutions (random, nearest neighbor)
//! - [`error`] — Error type shared across the crate

pub mod arc_set;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;

pub use error::{RoutingError, RoutingResult};
