//! Neighborhood operator trait.

use std::sync::Arc;

use crate::arc_set::ArcSet;
use crate::evaluation::Evaluation;
use crate::models::{CostComponents, Instance, Solution};

use super::moves::{Move, ScoredMove, EPSILON};

/// A neighborhood explored by local search.
///
/// Operators are immutable during search and can be shared across threads
/// running independent searches.
pub trait Operator: Send + Sync {
    /// Human-readable operator name.
    fn name(&self) -> &str;

    /// Instance the operator was configured for.
    fn instance(&self) -> &Arc<Instance>;

    /// Returns the most improving move of the neighborhood, or `None` if no
    /// move improves the cost by more than [`EPSILON`].
    ///
    /// Ties keep the first move in enumeration order.
    fn find_best_move(&self, evaluation: &Evaluation, solution: &Solution) -> Option<ScoredMove>;

    /// Applies a move previously returned by [`Operator::find_best_move`].
    fn apply(&self, evaluation: &Evaluation, solution: &mut Solution, mv: &ScoredMove) -> CostComponents {
        solution.apply_move(evaluation, &mv.mv)
    }
}

/// Keeps the strictly best improving candidate seen so far.
#[derive(Debug, Default)]
pub(crate) struct BestMove {
    best: Option<ScoredMove>,
}

impl BestMove {
    /// Evaluates `mv` and keeps it if it beats the current best.
    ///
    /// Malformed moves and moves introducing arcs outside `arcs` are skipped.
    pub(crate) fn consider(&mut self, evaluation: &Evaluation, solution: &Solution, arcs: &ArcSet, mv: Move) {
        if !mv.is_well_formed(solution) {
            return;
        }
        let plans = mv.plans(solution);
        if !mv.plans_respect(&plans, solution, arcs) {
            return;
        }
        let delta = evaluation.evaluate_plans(solution, &plans);
        let cost_delta = evaluation.cost(&delta);
        let threshold = self.best.as_ref().map_or(-EPSILON, |b| b.cost_delta);
        if cost_delta < threshold {
            self.best = Some(ScoredMove { mv, delta, cost_delta });
        }
    }

    pub(crate) fn into_inner(self) -> Option<ScoredMove> {
        self.best
    }
}
