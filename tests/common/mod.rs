#![allow(dead_code)]

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use u_localsearch::arc_set::ArcSet;
use u_localsearch::distance::ArcMatrix;
use u_localsearch::evaluation::Evaluation;
use u_localsearch::local_search::{InterRouteTwoOptOperator, Operator, SwapOperator};
use u_localsearch::models::{CostComponents, Instance, Solution, Vertex};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Depot at the origin and customers 1..=3 on a line, demand 10 each.
pub fn line_instance(fleet_size: usize) -> Arc<Instance> {
    let vertices = vec![
        Vertex::new(0, "depot", true, 0.0),
        Vertex::new(1, "c1", false, 10.0),
        Vertex::new(2, "c2", false, 10.0),
        Vertex::new(3, "c3", false, 10.0),
    ];
    let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
    Arc::new(Instance::new(vertices, arcs, fleet_size).expect("valid instance"))
}

/// Random Euclidean instance with `customers` customers in a 100×100 square.
pub fn random_instance(customers: usize, fleet_size: usize, seed: u64) -> Arc<Instance> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vertices = vec![Vertex::depot(0)];
    let mut coords = vec![(50.0, 50.0)];
    for id in 1..=customers {
        vertices.push(Vertex::customer(id, rng.random_range(1..=20) as f64));
        coords.push((rng.random_range(0.0..100.0), rng.random_range(0.0..100.0)));
    }
    Arc::new(Instance::new(vertices, ArcMatrix::euclidean(&coords), fleet_size).expect("valid instance"))
}

/// Capacity such that the fleet can just carry the total demand.
pub fn tight_capacity(instance: &Instance) -> f64 {
    let total: f64 = instance.customers().iter().map(|&c| instance.demand(c)).sum();
    (total / instance.fleet_size() as f64).ceil().max(instance.max_demand())
}

/// The operator set of the reference usage: relocate, exchange, 2-opt*.
pub fn default_operators(instance: &Arc<Instance>, arcs: Arc<ArcSet>) -> Vec<Box<dyn Operator>> {
    vec![
        Box::new(SwapOperator::new(Arc::clone(instance), Arc::clone(&arcs), 0, 1).expect("valid")),
        Box::new(SwapOperator::new(Arc::clone(instance), Arc::clone(&arcs), 1, 1).expect("valid")),
        Box::new(InterRouteTwoOptOperator::new(Arc::clone(instance), arcs).expect("valid")),
    ]
}

/// Sum of full recomputations of every route.
pub fn recompute(evaluation: &Evaluation, solution: &Solution) -> CostComponents {
    solution.routes().iter().map(|r| evaluation.evaluate_route(r)).sum()
}

pub fn assert_consistent(evaluation: &Evaluation, solution: &Solution) {
    solution.validate().expect("exactly-once invariant");
    let fresh = recompute(evaluation, solution);
    assert!(
        fresh.approx_eq(&solution.components(), 1e-6),
        "cached {:?} vs recomputed {:?}",
        solution.components(),
        fresh
    );
    assert!((evaluation.cost(&fresh) - solution.cost()).abs() < 1e-6);
}
