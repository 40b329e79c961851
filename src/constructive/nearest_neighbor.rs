//! Nearest-neighbor constructive heuristic.
//!
//! Builds routes greedily: starting from the depot, always visit the nearest
//! unvisited customer that still fits the vehicle. When nothing fits, start a
//! new route.
//!
//! # Complexity
//!
//! O(n²) where n = number of customers.
//!
//! # Reference
//!
//! This is the simplest constructive heuristic for VRP. While solution
//! quality is typically 15-25% above optimal, it provides a fast baseline.

use crate::error::RoutingResult;
use crate::evaluation::Evaluation;
use crate::models::{Solution, VertexId};

/// Constructs a solution using the nearest-neighbor heuristic.
///
/// Opens a new route when adding the next customer would exceed the
/// evaluation's capacity. Once the fleet is used up, the remaining
/// customers are appended to the last route, where they are charged as
/// overload. The result always has `fleet_size` routes; unused ones are
/// empty.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_localsearch::constructive::nearest_neighbor;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::models::{Instance, Vertex};
///
/// let vertices = vec![
///     Vertex::depot(0),
///     Vertex::customer(1, 10.0),
///     Vertex::customer(2, 10.0),
///     Vertex::customer(3, 10.0),
/// ];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 2).unwrap());
/// let evaluation = Evaluation::new(instance, 30.0);
///
/// let solution = nearest_neighbor(&evaluation).unwrap();
/// assert_eq!(solution.route_customers(), vec![vec![1, 2, 3], vec![]]);
/// ```
pub fn nearest_neighbor(evaluation: &Evaluation) -> RoutingResult<Solution> {
    let instance = evaluation.instance();
    let depot = instance.depot();
    let capacity = evaluation.capacity();
    let fleet_size = instance.fleet_size();

    let mut unvisited: Vec<VertexId> = instance.customers().to_vec();
    let mut routes: Vec<Vec<VertexId>> = Vec::with_capacity(fleet_size);

    while !unvisited.is_empty() && routes.len() < fleet_size {
        let mut route = Vec::new();
        let mut current = depot;
        let mut load = 0.0;

        loop {
            // Nearest unvisited customer that fits; an empty route takes
            // the nearest one regardless so that oversized customers are
            // still served.
            let mut best: Option<(usize, f64)> = None;
            for (idx, &c) in unvisited.iter().enumerate() {
                if !route.is_empty() && load + instance.demand(c) > capacity {
                    continue;
                }
                let d = instance.distance(current, c);
                if best.map_or(true, |(_, bd)| d < bd) {
                    best = Some((idx, d));
                }
            }

            match best {
                Some((idx, _)) => {
                    let next = unvisited.remove(idx);
                    load += instance.demand(next);
                    route.push(next);
                    current = next;
                }
                None => break,
            }
        }

        routes.push(route);
    }

    if !unvisited.is_empty() {
        log::debug!(
            "nearest neighbor ran out of vehicles, {} customers appended to the last route",
            unvisited.len()
        );
        if let Some(last) = routes.last_mut() {
            last.append(&mut unvisited);
        }
    }
    routes.resize_with(fleet_size, Vec::new);

    Solution::new(evaluation, routes)
}
