mod common;

use std::collections::HashSet;
use std::sync::Arc;

use common::{assert_consistent, default_operators, random_instance, recompute, tight_capacity};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_localsearch::arc_set::ArcSet;
use u_localsearch::constructive::random_solution;
use u_localsearch::evaluation::Evaluation;
use u_localsearch::local_search::{
    AcceptancePolicy, ExchangeMove, InterRouteTwoOptOperator, LocalSearch, LocalSearchConfig, Move, Operator,
    Span, SwapOperator, TwoOptStarMove,
};
use u_localsearch::models::{Instance, NodeLocation, Solution, VertexId};

fn random_move(solution: &Solution, rng: &mut StdRng) -> Move {
    let routes = solution.num_routes();
    let len_of = |r: usize| solution.route(r).nodes().len();
    if rng.random_bool(0.5) {
        let r1 = rng.random_range(0..routes);
        let r2 = rng.random_range(0..routes);
        Move::TwoOptStar(TwoOptStarMove {
            first: NodeLocation::new(r1, rng.random_range(0..len_of(r1) - 1)),
            second: NodeLocation::new(r2, rng.random_range(0..len_of(r2) - 1)),
            crossed: rng.random_bool(0.5),
        })
    } else {
        let span = |rng: &mut StdRng| {
            let r = rng.random_range(0..routes);
            let start = rng.random_range(1..len_of(r));
            let len = rng.random_range(0..=3usize).min(len_of(r) - 1 - start);
            Span::new(r, start, len)
        };
        let first = span(rng);
        let second = span(rng);
        Move::Exchange(ExchangeMove {
            first,
            second,
            reverse_first: rng.random_bool(0.5),
            reverse_second: rng.random_bool(0.5),
        })
    }
}

/// Arcs traversed by the non-empty routes of `solution`.
fn traversed_arcs(solution: &Solution) -> HashSet<(VertexId, VertexId)> {
    solution
        .routes()
        .iter()
        .filter(|r| !r.is_empty())
        .flat_map(|r| r.nodes().windows(2).map(|w| (w[0], w[1])))
        .collect()
}

/// Operators that check every arc they introduce against `arcs`.
fn strict_operators(instance: &Arc<Instance>, arcs: Arc<ArcSet>) -> Vec<Box<dyn Operator>> {
    let mut ops: Vec<Box<dyn Operator>> = [(0, 1), (1, 1), (0, 2), (1, 2)]
        .into_iter()
        .map(|(k, l)| {
            Box::new(SwapOperator::new(Arc::clone(instance), Arc::clone(&arcs), k, l).expect("valid"))
                as Box<dyn Operator>
        })
        .collect();
    ops.push(Box::new(
        InterRouteTwoOptOperator::new(Arc::clone(instance), arcs).expect("valid").with_crossed(false),
    ));
    ops
}

fn scenario() -> impl Strategy<Value = (usize, usize, u64)> {
    (2usize..14, 1usize..5, any::<u64>())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn delta_matches_full_recomputation((customers, fleet, seed) in scenario()) {
        let instance = random_instance(customers, fleet, seed);
        let evaluation = Evaluation::new(Arc::clone(&instance), tight_capacity(&instance))
            .with_overload_penalty_factor(Evaluation::suggested_penalty_factor(&instance));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut solution = random_solution(&evaluation, &mut rng).expect("valid");

        for _ in 0..40 {
            let mv = random_move(&solution, &mut rng);
            if !mv.is_well_formed(&solution) {
                continue;
            }
            let before = solution.components();
            let predicted = evaluation.evaluate_delta(&solution, &mv);
            let applied = solution.apply_move(&evaluation, &mv);
            prop_assert!(applied.approx_eq(&predicted, 1e-9));
            let fresh = recompute(&evaluation, &solution);
            prop_assert!(fresh.approx_eq(&(before + predicted), 1e-6));
            assert_consistent(&evaluation, &solution);
        }
    }

    #[test]
    fn search_preserves_invariants_and_improves((customers, fleet, seed) in scenario(), first in any::<bool>()) {
        let instance = random_instance(customers, fleet, seed);
        let evaluation = Evaluation::new(Arc::clone(&instance), tight_capacity(&instance))
            .with_overload_penalty_factor(Evaluation::suggested_penalty_factor(&instance));
        let mut solution = random_solution(&evaluation, &mut StdRng::seed_from_u64(seed)).expect("valid");
        let operators = default_operators(&instance, Arc::new(ArcSet::for_instance(&instance)));
        let policy = if first { AcceptancePolicy::FirstImprovement } else { AcceptancePolicy::BestImprovement };
        let config = LocalSearchConfig::default().with_policy(policy).with_verify(true);

        let initial_cost = solution.cost();
        let report = LocalSearch::new(config).optimize(&evaluation, &mut solution, &operators).expect("search runs");

        prop_assert!(report.converged);
        prop_assert!((report.initial_cost - initial_cost).abs() < 1e-9);
        prop_assert!(report.final_cost <= initial_cost + 1e-9);
        prop_assert!(report.cost_history.windows(2).all(|w| w[1] < w[0]));
        if let Some(&first_cost) = report.cost_history.first() {
            prop_assert!(first_cost < initial_cost);
        }
        assert_consistent(&evaluation, &solution);
    }

    #[test]
    fn converged_solution_is_a_fixed_point((customers, fleet, seed) in scenario()) {
        let instance = random_instance(customers, fleet, seed);
        let evaluation = Evaluation::new(Arc::clone(&instance), tight_capacity(&instance));
        let mut solution = random_solution(&evaluation, &mut StdRng::seed_from_u64(seed)).expect("valid");
        let operators = default_operators(&instance, Arc::new(ArcSet::granular(&instance, 5)));
        let mut search = LocalSearch::default();

        search.optimize(&evaluation, &mut solution, &operators).expect("search runs");
        let routes = solution.route_customers();
        let cost = solution.cost();

        let report = search.optimize(&evaluation, &mut solution, &operators).expect("search runs");
        prop_assert_eq!(report.iterations, 0);
        prop_assert_eq!(solution.route_customers(), routes);
        prop_assert!((solution.cost() - cost).abs() < 1e-9);
    }

    #[test]
    fn restricted_search_only_introduces_permitted_arcs(
        (customers, fleet, seed) in scenario(),
        k in 1usize..6,
        granular in any::<bool>(),
    ) {
        let instance = random_instance(customers, fleet, seed);
        let evaluation = Evaluation::new(Arc::clone(&instance), tight_capacity(&instance))
            .with_overload_penalty_factor(Evaluation::suggested_penalty_factor(&instance));
        let mut rng = StdRng::seed_from_u64(seed);
        let arcs = if granular {
            ArcSet::granular(&instance, k)
        } else {
            let mut arcs = ArcSet::for_instance(&instance);
            let n = instance.len();
            for _ in 0..n * k {
                arcs.forbid_arc(rng.random_range(0..n), rng.random_range(0..n));
            }
            arcs
        };
        let mut solution = random_solution(&evaluation, &mut rng).expect("valid");
        let initial = traversed_arcs(&solution);
        let operators = strict_operators(&instance, Arc::new(arcs.clone()));
        let config = LocalSearchConfig::default().with_verify(true);

        let report = LocalSearch::new(config).optimize(&evaluation, &mut solution, &operators).expect("search runs");

        prop_assert!(report.converged);
        for (u, v) in traversed_arcs(&solution) {
            prop_assert!(
                arcs.includes_arc(u, v) || initial.contains(&(u, v)),
                "arc {} -> {} is neither permitted nor initial",
                u,
                v
            );
        }
    }

    #[test]
    fn granular_set_covering_every_arc_matches_full_set((customers, fleet, seed) in scenario()) {
        let instance = random_instance(customers, fleet, seed);
        let evaluation = Evaluation::new(Arc::clone(&instance), tight_capacity(&instance))
            .with_overload_penalty_factor(Evaluation::suggested_penalty_factor(&instance));
        let start = random_solution(&evaluation, &mut StdRng::seed_from_u64(seed)).expect("valid");

        let run = |arcs: ArcSet| {
            let mut solution = start.clone();
            let operators = default_operators(&instance, Arc::new(arcs));
            LocalSearch::default().optimize(&evaluation, &mut solution, &operators).expect("search runs");
            solution
        };
        let full = run(ArcSet::for_instance(&instance));
        let covering = run(ArcSet::granular(&instance, instance.len()));

        prop_assert_eq!(covering.route_customers(), full.route_customers());
        prop_assert!((covering.cost() - full.cost()).abs() < 1e-9);
    }
}
