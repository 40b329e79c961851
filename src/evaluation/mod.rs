//! Cost evaluation of routes, solutions, and moves.

mod evaluator;
mod segment;

pub use evaluator::Evaluation;
pub use segment::RouteSegment;
