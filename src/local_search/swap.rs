//! Segment swap and relocation operator.
//!
//! # Algorithm
//!
//! `SwapOperator(k, l)` exchanges a segment of `k` customers with a segment
//! of `l` customers, in the same route or across routes. `k = 0` moves an
//! `l`-segment without anything moving back, so `(0, 1)` is the classic
//! relocate and `(1, 1)` the classic exchange.
//!
//! Candidates are anchored on the arc `(a, b)` the move introduces: `b`
//! becomes the first visited node of the `l`-segment, placed right after
//! `a` where the `k` nodes following `a` used to be. Only pairs with
//! `a → b` in the arc set are enumerated.
//!
//! # Complexity
//!
//! O(Σ|successors(a)|) delta evaluations per call, each O(1).
//!
//! # Reference
//!
//! Vidal, T. et al. (2012). "A Hybrid Genetic Algorithm for Multidepot and
//! Periodic Vehicle Routing Problems". Operations Research 60(3).

use std::sync::Arc;

use crate::arc_set::ArcSet;
use crate::error::{RoutingError, RoutingResult};
use crate::evaluation::Evaluation;
use crate::models::{Instance, Solution};

use super::moves::{ExchangeMove, Move, ScoredMove, Span};
use super::operator::{BestMove, Operator};

/// Exchanges a `k`-segment with an `l`-segment.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::arc_set::ArcSet;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::local_search::{Operator, SwapOperator};
/// use u_localsearch::models::{Instance, Solution, Vertex};
///
/// let vertices = (0..4)
///     .map(|i| if i == 0 { Vertex::depot(0) } else { Vertex::customer(i, 1.0) })
///     .collect();
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 1).unwrap());
/// let evaluation = Evaluation::new(Arc::clone(&instance), 10.0);
///
/// let relocate = SwapOperator::new(Arc::clone(&instance), Arc::new(ArcSet::new(4)), 0, 1).unwrap();
/// assert_eq!(relocate.name(), "SwapOperator(0, 1)");
///
/// let mut sol = Solution::new(&evaluation, vec![vec![2, 1, 3]]).unwrap();
/// assert!((sol.cost() - 8.0).abs() < 1e-10);
/// let mv = relocate.find_best_move(&evaluation, &sol).expect("improving move");
/// relocate.apply(&evaluation, &mut sol, &mv);
/// assert!((sol.cost() - 6.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct SwapOperator {
    instance: Arc<Instance>,
    arc_set: Arc<ArcSet>,
    k: usize,
    l: usize,
    reversal: bool,
    name: String,
}

impl SwapOperator {
    /// Creates a `(k, l)` swap operator.
    ///
    /// `(k, 0)` is normalized to `(0, k)`. Fails if both are zero or if
    /// the arc set does not match the instance.
    pub fn new(instance: Arc<Instance>, arc_set: Arc<ArcSet>, k: usize, l: usize) -> RoutingResult<Self> {
        arc_set.check_size(&instance)?;
        if k == 0 && l == 0 {
            return Err(RoutingError::InvalidOperator(
                "SwapOperator needs at least one non-empty segment".to_string(),
            ));
        }
        let (k, l) = if l == 0 { (l, k) } else { (k, l) };
        Ok(Self {
            instance,
            arc_set,
            k,
            l,
            reversal: true,
            name: format!("SwapOperator({}, {})", k, l),
        })
    }

    /// Enables or disables inserting the `l`-segment reversed.
    pub fn with_reversal(mut self, reversal: bool) -> Self {
        self.reversal = reversal;
        self
    }

    /// Segment lengths `(k, l)` after normalization.
    pub fn segment_lengths(&self) -> (usize, usize) {
        (self.k, self.l)
    }
}

impl Operator for SwapOperator {
    fn name(&self) -> &str {
        &self.name
    }

    fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    fn find_best_move(&self, evaluation: &Evaluation, solution: &Solution) -> Option<ScoredMove> {
        let (k, l) = (self.k, self.l);
        let mut best = BestMove::default();

        for a in 0..self.instance.len() {
            for from in solution.departure_positions(a) {
                let route_len = solution.route(from.route).nodes().len();
                if from.position + k + 2 > route_len {
                    continue;
                }
                let first = Span::new(from.route, from.position + 1, k);

                for b in self.arc_set.successors(a) {
                    if b == a || !self.instance.is_customer(b) {
                        continue;
                    }
                    let Some(at) = solution.location(b) else {
                        continue;
                    };

                    // b first: forward from b, or reversed ending at b
                    let forward = Some((Span::new(at.route, at.position, l), false));
                    let backward = (self.reversal && l >= 2 && at.position >= l)
                        .then(|| (Span::new(at.route, at.position + 1 - l, l), true));

                    for (second, reversed) in [forward, backward].into_iter().flatten() {
                        if second.route == from.route && second.start <= from.position && from.position < second.end() {
                            continue;
                        }
                        let mv = Move::Exchange(ExchangeMove {
                            first,
                            second,
                            reverse_first: false,
                            reverse_second: reversed,
                        });
                        best.consider(evaluation, solution, &self.arc_set, mv);
                    }
                }
            }
        }

        let best = best.into_inner();
        if let Some(mv) = &best {
            log::trace!("{} best move {:?} delta {:.6}", self.name, mv.mv, mv.cost_delta);
        }
        best
    }
}
