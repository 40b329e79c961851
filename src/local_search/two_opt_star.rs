//! Inter-route 2-opt (2-opt*) operator.
//!
//! # Algorithm
//!
//! Removes an arc `(u, u⁺)` from one route and an arc `(v, v⁺)` from
//! another, then reconnects them in one of two ways:
//!
//! - tails: `u → v⁺` and `v → u⁺`, exchanging the route tails;
//! - crossed: `u → v` and `u⁺ → v⁺`, joining the two heads and the two
//!   tails, each of them partly reversed.
//!
//! Candidates are anchored on the arc introduced at `u`, so only pairs with
//! that arc in the arc set are enumerated. Cutting at the depot lets the
//! operator merge one route into another or split one across an empty route.
//!
//! Only the two reconnecting arcs are checked against the arc set. The
//! reversed parts of a crossed move are taken as given; disable crossed
//! moves with [`InterRouteTwoOptOperator::with_crossed`] when every
//! introduced arc must come from the set.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows". JORS 46(12).

use std::sync::Arc;

use crate::arc_set::ArcSet;
use crate::error::RoutingResult;
use crate::evaluation::Evaluation;
use crate::models::{Instance, NodeLocation, Solution};

use super::moves::{Move, ScoredMove, TwoOptStarMove};
use super::operator::{BestMove, Operator};

/// Inter-route 2-opt operator.
#[derive(Debug, Clone)]
pub struct InterRouteTwoOptOperator {
    instance: Arc<Instance>,
    arc_set: Arc<ArcSet>,
    crossed: bool,
}

impl InterRouteTwoOptOperator {
    /// Creates the operator. Fails if the arc set does not match the instance.
    pub fn new(instance: Arc<Instance>, arc_set: Arc<ArcSet>) -> RoutingResult<Self> {
        arc_set.check_size(&instance)?;
        Ok(Self {
            instance,
            arc_set,
            crossed: true,
        })
    }

    /// Enables or disables the crossed reconnection.
    pub fn with_crossed(mut self, crossed: bool) -> Self {
        self.crossed = crossed;
        self
    }
}

impl Operator for InterRouteTwoOptOperator {
    fn name(&self) -> &str {
        "InterRouteTwoOptOperator"
    }

    fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    fn find_best_move(&self, evaluation: &Evaluation, solution: &Solution) -> Option<ScoredMove> {
        let depot = self.instance.depot();
        let mut best = BestMove::default();

        for u in 0..self.instance.len() {
            for first in solution.departure_positions(u) {
                for w in self.arc_set.successors(u) {
                    if w == u && w != depot {
                        continue;
                    }
                    // tails: w is v⁺, the node after the cut in the other route
                    for at in solution.arrival_positions(w) {
                        if at.route == first.route || at.position == 0 {
                            continue;
                        }
                        let second = NodeLocation::new(at.route, at.position - 1);
                        let mv = Move::TwoOptStar(TwoOptStarMove {
                            first,
                            second,
                            crossed: false,
                        });
                        best.consider(evaluation, solution, &self.arc_set, mv);
                    }
                    if !self.crossed {
                        continue;
                    }
                    // crossed: w is v, the node before the cut
                    for second in solution.departure_positions(w) {
                        if second.route == first.route {
                            continue;
                        }
                        let mv = Move::TwoOptStar(TwoOptStarMove {
                            first,
                            second,
                            crossed: true,
                        });
                        best.consider(evaluation, solution, &self.arc_set, mv);
                    }
                }
            }
        }

        let best = best.into_inner();
        if let Some(mv) = &best {
            log::trace!("{} best move {:?} delta {:.6}", self.name(), mv.mv, mv.cost_delta);
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::error::RoutingError;
    use crate::models::Vertex;

    fn setup() -> (Arc<Instance>, Evaluation) {
        // two clusters left and right of the depot
        let coords = [(0.0, 0.0), (-5.0, 1.0), (-5.0, -1.0), (5.0, 1.0), (5.0, -1.0)];
        let vertices = (0..coords.len())
            .map(|i| if i == 0 { Vertex::depot(0) } else { Vertex::customer(i, 1.0) })
            .collect();
        let instance = Arc::new(Instance::new(vertices, ArcMatrix::euclidean(&coords), 2).expect("valid"));
        let evaluation = Evaluation::new(Arc::clone(&instance), 2.0);
        (instance, evaluation)
    }

    fn operator(instance: &Arc<Instance>) -> InterRouteTwoOptOperator {
        InterRouteTwoOptOperator::new(Arc::clone(instance), Arc::new(ArcSet::new(instance.len()))).expect("valid")
    }

    #[test]
    fn test_size_mismatch() {
        let (instance, _) = setup();
        assert_eq!(
            InterRouteTwoOptOperator::new(instance, Arc::new(ArcSet::new(2))).unwrap_err(),
            RoutingError::ArcSetSizeMismatch {
                expected: 5,
                actual: 2
            }
        );
    }

    #[test]
    fn test_uncrosses_routes() {
        let (instance, eval) = setup();
        // each route jumps between the clusters
        let sol = Solution::new(&eval, vec![vec![1, 3], vec![2, 4]]).expect("valid");
        let op = operator(&instance);
        let mv = op.find_best_move(&eval, &sol).expect("improving");
        let mut after = sol.clone();
        op.apply(&eval, &mut after, &mv);
        assert!(after.validate().is_ok());
        assert!((after.cost() - (4.0 * 26f64.sqrt() + 4.0)).abs() < 1e-9);
        assert!((after.cost() - sol.cost() - mv.cost_delta).abs() < 1e-9);
        for route in after.route_customers() {
            let xs: Vec<bool> = route.iter().map(|&c| c <= 2).collect();
            assert!(xs.iter().all(|&left| left == xs[0]));
        }
    }

    #[test]
    fn test_only_inter_route() {
        let (instance, eval) = setup();
        let sol = Solution::new(&eval, vec![vec![1, 3, 2, 4]]).expect("valid");
        // a single route has no partner to exchange with
        assert!(operator(&instance).find_best_move(&eval, &sol).is_none());
    }

    #[test]
    fn test_splits_overloaded_route() {
        let (instance, eval) = setup();
        let sol = Solution::new(&eval, vec![vec![1, 2, 4, 3], vec![]]).expect("valid");
        let op = operator(&instance);
        let mv = op.find_best_move(&eval, &sol).expect("improving");
        let mut after = sol.clone();
        op.apply(&eval, &mut after, &mv);
        assert!(after.is_feasible());
        assert_eq!(after.num_used_routes(), 2);
    }

    #[test]
    fn test_without_crossed() {
        let (instance, eval) = setup();
        let sol = Solution::new(&eval, vec![vec![1, 3], vec![2, 4]]).expect("valid");
        let mv = operator(&instance)
            .with_crossed(false)
            .find_best_move(&eval, &sol)
            .expect("improving");
        assert!(matches!(mv.mv, Move::TwoOptStar(TwoOptStarMove { crossed: false, .. })));
    }

    #[test]
    fn test_merges_routes_under_granular_set() {
        let coords = [(0.0, 0.0), (10.0, 0.0), (11.0, 0.0)];
        let vertices = (0..3)
            .map(|i| if i == 0 { Vertex::depot(0) } else { Vertex::customer(i, 1.0) })
            .collect();
        let instance = Arc::new(Instance::new(vertices, ArcMatrix::euclidean(&coords), 2).expect("valid"));
        let eval = Evaluation::new(Arc::clone(&instance), 10.0);
        let sol = Solution::new(&eval, vec![vec![1], vec![2]]).expect("valid");
        let op = InterRouteTwoOptOperator::new(Arc::clone(&instance), Arc::new(ArcSet::granular(&instance, 1)))
            .expect("valid");

        let mv = op.find_best_move(&eval, &sol).expect("merging improves");
        let mut after = sol.clone();
        op.apply(&eval, &mut after, &mv);
        assert_eq!(after.num_used_routes(), 1);
        assert!((after.cost() - 22.0).abs() < 1e-9);
    }
}
