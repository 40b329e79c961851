//! Random initial solutions.

use rand::Rng;

use crate::error::RoutingResult;
use crate::evaluation::Evaluation;
use crate::models::{Solution, VertexId};

/// Distributes the customers uniformly at random over `fleet_size` routes.
///
/// Each customer picks a route independently and is appended to it, so
/// route order follows ascending customer id. Capacity is ignored; overload
/// is left for the local search to repair.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
/// use u_localsearch::constructive::random_solution;
/// use u_localsearch::distance::ArcMatrix;
/// use u_localsearch::evaluation::Evaluation;
/// use u_localsearch::models::{Instance, Vertex};
///
/// let vertices = vec![Vertex::depot(0), Vertex::customer(1, 1.0), Vertex::customer(2, 1.0)];
/// let arcs = ArcMatrix::euclidean(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
/// let instance = Arc::new(Instance::new(vertices, arcs, 3).unwrap());
/// let evaluation = Evaluation::new(instance, 10.0);
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let solution = random_solution(&evaluation, &mut rng).unwrap();
/// assert_eq!(solution.num_routes(), 3);
/// assert!(solution.validate().is_ok());
/// ```
pub fn random_solution<R: Rng>(evaluation: &Evaluation, rng: &mut R) -> RoutingResult<Solution> {
    let instance = evaluation.instance();
    let fleet_size = instance.fleet_size();
    let mut routes: Vec<Vec<VertexId>> = vec![Vec::new(); fleet_size];
    for &c in instance.customers() {
        routes[rng.random_range(0..fleet_size)].push(c);
    }
    Solution::new(evaluation, routes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::ArcMatrix;
    use crate::models::{Instance, Vertex};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn evaluation(n: usize, fleet_size: usize) -> Evaluation {
        let vertices = (0..n)
            .map(|i| if i == 0 { Vertex::depot(0) } else { Vertex::customer(i, 1.0) })
            .collect();
        let coords: Vec<(f64, f64)> = (0..n).map(|i| (i as f64, (i * i % 7) as f64)).collect();
        let instance = Instance::new(vertices, ArcMatrix::euclidean(&coords), fleet_size).expect("valid");
        Evaluation::new(Arc::new(instance), 5.0)
    }

    #[test]
    fn test_assigns_every_customer() {
        let eval = evaluation(30, 4);
        let mut rng = StdRng::seed_from_u64(42);
        let sol = random_solution(&eval, &mut rng).expect("valid");
        assert_eq!(sol.num_routes(), 4);
        assert!(sol.validate().is_ok());
        let served: usize = sol.routes().iter().map(|r| r.len()).sum();
        assert_eq!(served, 29);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let eval = evaluation(20, 3);
        let a = random_solution(&eval, &mut StdRng::seed_from_u64(1)).expect("valid");
        let b = random_solution(&eval, &mut StdRng::seed_from_u64(1)).expect("valid");
        assert_eq!(a.route_customers(), b.route_customers());
    }

    #[test]
    fn test_routes_keep_id_order() {
        let eval = evaluation(25, 3);
        let sol = random_solution(&eval, &mut StdRng::seed_from_u64(9)).expect("valid");
        for route in sol.route_customers() {
            assert!(route.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
