//! Arc payloads and the dense arc matrix.

mod matrix;

pub use matrix::{ArcData, ArcMatrix};
