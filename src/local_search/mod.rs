//! Local search for capacitated vehicle routing.
//!
//! - [`SwapOperator`] — Exchange of a `k`-segment with an `l`-segment
//!   (relocation when `k = 0`)
//! - [`InterRouteTwoOptOperator`] — Inter-route 2-opt (2-opt*)
//! - [`LocalSearch`] — Driver applying improving moves until convergence
//!
//! Operators propose [`Move`]s whose resulting routes are described as
//! concatenations of segments of the current routes, which keeps delta
//! evaluation independent of route length.

mod config;
mod driver;
mod moves;
mod operator;
mod swap;
mod two_opt_star;

pub use config::{AcceptancePolicy, LocalSearchConfig};
pub use driver::{LocalSearch, SearchReport, SearchState};
pub use moves::{ExchangeMove, Move, RoutePlan, ScoredMove, Span, TwoOptStarMove, EPSILON, MAX_SEGMENTS};
pub use operator::Operator;
pub use swap::SwapOperator;
pub use two_opt_star::InterRouteTwoOptOperator;
