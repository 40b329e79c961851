//! Local search driver.
//!
//! # Algorithm
//!
//! 1. Check that evaluation, solution, and operators share one instance
//! 2. Re-weight the solution's cached costs for the evaluation
//! 3. Scan the operators for an improving move (best or first improvement)
//! 4. Apply it and repeat; stop when no operator improves the solution or
//!    the iteration cap is reached
//!
//! Every applied move lowers the cost by more than the configured
//! tolerance, so the search terminates on any finite instance.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{RoutingError, RoutingResult};
use crate::evaluation::Evaluation;
use crate::models::{CostComponents, Solution};

use super::config::{AcceptancePolicy, LocalSearchConfig};
use super::moves::ScoredMove;
use super::operator::Operator;

/// Lifecycle of a [`LocalSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Not running; also the state after a search stopped at its
    /// iteration cap.
    Idle,
    /// Querying operators for an improving move.
    Scanning,
    /// Applying the selected move.
    Applying,
    /// The last scan found no improving move.
    Converged,
}

/// Result of a local search run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// Number of applied moves.
    pub iterations: usize,
    /// Number of scans, including the final unsuccessful one.
    pub scans: usize,
    /// Whether the search stopped at a local optimum.
    pub converged: bool,
    /// Cost before the first move.
    pub initial_cost: f64,
    /// Cost after the last move.
    pub final_cost: f64,
    /// Cost after each applied move.
    pub cost_history: Vec<f64>,
    /// Applied moves, per operator in the order supplied.
    pub moves_per_operator: Vec<usize>,
}

impl SearchReport {
    fn new(initial_cost: f64, num_operators: usize) -> Self {
        Self {
            iterations: 0,
            scans: 0,
            converged: false,
            initial_cost,
            final_cost: initial_cost,
            cost_history: Vec::new(),
            moves_per_operator: vec![0; num_operators],
        }
    }
}

/// Steepest-descent local search over a list of operators.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::arc_set::ArcSet;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::local_search::{LocalSearch, LocalSearchConfig, Operator, SwapOperator};
/// use u_localsearch::models::{Instance, Solution, Vertex};
///
/// let vertices = vec![
///     Vertex::depot(0),
///     Vertex::customer(1, 10.0),
///     Vertex::customer(2, 10.0),
///     Vertex::customer(3, 10.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 2).unwrap());
/// let evaluation = Evaluation::new(Arc::clone(&instance), 20.0);
/// let arc_set = Arc::new(ArcSet::for_instance(&instance));
///
/// let operators: Vec<Box<dyn Operator>> =
///     vec![Box::new(SwapOperator::new(Arc::clone(&instance), arc_set, 0, 1).unwrap())];
/// let mut sol = Solution::new(&evaluation, vec![vec![1, 2, 3], vec![]]).unwrap();
///
/// let mut search = LocalSearch::new(LocalSearchConfig::default());
/// let report = search.optimize(&evaluation, &mut sol, &operators).unwrap();
/// assert!(report.converged);
/// assert!(sol.is_feasible());
/// assert!(report.final_cost < report.initial_cost);
/// ```
#[derive(Debug, Clone)]
pub struct LocalSearch {
    config: LocalSearchConfig,
    state: SearchState,
}

impl LocalSearch {
    /// Creates an idle driver.
    pub fn new(config: LocalSearchConfig) -> Self {
        Self {
            config,
            state: SearchState::Idle,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &LocalSearchConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Improves `solution` in place until no operator finds an improving
    /// move or the iteration cap is reached.
    ///
    /// Fails before touching the solution if the evaluation, the solution,
    /// and the operators were not built for the same instance.
    pub fn optimize(
        &mut self,
        evaluation: &Evaluation,
        solution: &mut Solution,
        operators: &[Box<dyn Operator>],
    ) -> RoutingResult<SearchReport> {
        let instance = evaluation.instance();
        if !Arc::ptr_eq(instance, solution.instance())
            || operators.iter().any(|op| !Arc::ptr_eq(instance, op.instance()))
        {
            return Err(RoutingError::InstanceMismatch);
        }
        if operators.is_empty() && self.config.require_operators {
            return Err(RoutingError::EmptyOperatorList);
        }

        solution.refresh(evaluation);
        let mut report = SearchReport::new(solution.cost(), operators.len());
        if operators.is_empty() {
            self.state = SearchState::Converged;
            report.converged = true;
            return Ok(report);
        }

        log::debug!(
            "local search start: cost {:.6}, {} operators, {:?}",
            report.initial_cost,
            operators.len(),
            self.config.policy
        );

        loop {
            if let Some(max) = self.config.max_iterations {
                if report.iterations >= max {
                    log::warn!("local search stopped at the iteration cap ({}) before converging", max);
                    self.state = SearchState::Idle;
                    break;
                }
            }

            self.state = SearchState::Scanning;
            report.scans += 1;
            let Some((index, mv)) = self.scan(evaluation, solution, operators) else {
                self.state = SearchState::Converged;
                report.converged = true;
                break;
            };

            self.state = SearchState::Applying;
            let delta = operators[index].apply(evaluation, solution, &mv);
            report.iterations += 1;
            report.moves_per_operator[index] += 1;
            report.cost_history.push(solution.cost());
            log::debug!(
                "iteration {}: {} applied {:?}, delta {:.6} (distance {:.6}, overload {:.6}), cost {:.6}",
                report.iterations,
                operators[index].name(),
                mv.mv,
                evaluation.cost(&delta),
                delta.distance,
                delta.overload,
                solution.cost()
            );

            if self.config.verify {
                if let Err(e) = Self::verify(evaluation, solution) {
                    self.state = SearchState::Idle;
                    return Err(e);
                }
            }
        }

        report.final_cost = solution.cost();
        log::debug!(
            "local search done: cost {:.6} -> {:.6} in {} moves, converged: {}",
            report.initial_cost,
            report.final_cost,
            report.iterations,
            report.converged
        );
        Ok(report)
    }

    /// Selects the move to apply according to the acceptance policy.
    fn scan(
        &self,
        evaluation: &Evaluation,
        solution: &Solution,
        operators: &[Box<dyn Operator>],
    ) -> Option<(usize, ScoredMove)> {
        let threshold = -self.config.effective_tolerance();
        let mut best: Option<(usize, ScoredMove)> = None;
        for (index, op) in operators.iter().enumerate() {
            let Some(mv) = op.find_best_move(evaluation, solution) else {
                continue;
            };
            log::trace!("{} proposes delta {:.6}", op.name(), mv.cost_delta);
            if mv.cost_delta >= threshold {
                continue;
            }
            match self.config.policy {
                AcceptancePolicy::FirstImprovement => return Some((index, mv)),
                AcceptancePolicy::BestImprovement => {
                    if best.as_ref().map_or(true, |(_, b)| mv.cost_delta < b.cost_delta) {
                        best = Some((index, mv));
                    }
                }
            }
        }
        best
    }

    /// Recomputes every route from scratch and compares against the
    /// cached costs.
    fn verify(evaluation: &Evaluation, solution: &Solution) -> RoutingResult<()> {
        solution.validate()?;
        let mut total = CostComponents::zero();
        for (r, route) in solution.routes().iter().enumerate() {
            let fresh = evaluation.evaluate_route(route);
            if !fresh.approx_eq(&route.components(), 1e-6) {
                return Err(RoutingError::InvariantViolation(format!(
                    "route {} caches {:?} but evaluates to {:?}",
                    r,
                    route.components(),
                    fresh
                )));
            }
            total += fresh;
        }
        if !total.approx_eq(&solution.components(), 1e-6) {
            return Err(RoutingError::InvariantViolation(format!(
                "solution caches {:?} but routes sum to {:?}",
                solution.components(),
                total
            )));
        }
        Ok(())
    }
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self::new(LocalSearchConfig::default())
    }
}
