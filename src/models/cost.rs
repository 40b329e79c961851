//! Cost component vector.

use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Unweighted cost contributions of a route, a solution, or a move delta.
///
/// The scalar cost is obtained by weighting these through an
/// [`Evaluation`](crate::evaluation::Evaluation), so penalty terms can be
/// inspected or re-weighted without touching the routes.
///
/// # Examples
///
/// ```
/// use u_localsearch::models::CostComponents;
///
/// let a = CostComponents::new(10.0, 2.0);
/// let b = CostComponents::new(4.0, 0.0);
/// assert_eq!(a - b, CostComponents::new(6.0, 2.0));
/// assert_eq!((a + b).as_array(), [14.0, 2.0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostComponents {
    /// Total traversed distance.
    pub distance: f64,
    /// Load in excess of vehicle capacity.
    pub overload: f64,
}

impl CostComponents {
    /// Index of the distance component in [`as_array`](Self::as_array).
    pub const DISTANCE: usize = 0;
    /// Index of the overload component in [`as_array`](Self::as_array).
    pub const OVERLOAD: usize = 1;

    /// Creates a component vector.
    pub fn new(distance: f64, overload: f64) -> Self {
        Self { distance, overload }
    }

    /// All-zero components.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Components as a fixed-size array `[distance, overload]`.
    pub fn as_array(&self) -> [f64; 2] {
        [self.distance, self.overload]
    }

    /// Returns `true` if both components are within `tol` of `other`.
    pub fn approx_eq(&self, other: &CostComponents, tol: f64) -> bool {
        (self.distance - other.distance).abs() <= tol && (self.overload - other.overload).abs() <= tol
    }
}

impl Add for CostComponents {
    type Output = CostComponents;

    fn add(self, rhs: CostComponents) -> CostComponents {
        CostComponents::new(self.distance + rhs.distance, self.overload + rhs.overload)
    }
}

impl Sub for CostComponents {
    type Output = CostComponents;

    fn sub(self, rhs: CostComponents) -> CostComponents {
        CostComponents::new(self.distance - rhs.distance, self.overload - rhs.overload)
    }
}

impl Neg for CostComponents {
    type Output = CostComponents;

    fn neg(self) -> CostComponents {
        CostComponents::new(-self.distance, -self.overload)
    }
}

impl AddAssign for CostComponents {
    fn add_assign(&mut self, rhs: CostComponents) {
        self.distance += rhs.distance;
        self.overload += rhs.overload;
    }
}

impl SubAssign for CostComponents {
    fn sub_assign(&mut self, rhs: CostComponents) {
        self.distance -= rhs.distance;
        self.overload -= rhs.overload;
    }
}

impl Sum for CostComponents {
    fn sum<I: Iterator<Item = CostComponents>>(iter: I) -> CostComponents {
        iter.fold(CostComponents::zero(), |acc, c| acc + c)
    }
}
