//! Dense arc matrix.

use serde::{Deserialize, Serialize};

/// Payload carried by a directed arc.
///
/// # Examples
///
/// ```
/// use u_localsearch::distance::ArcData;
///
/// let arc = ArcData::new(4.5);
/// assert_eq!(arc.distance(), 4.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcData {
    distance: f64,
}

impl ArcData {
    /// Creates an arc with the given traversal distance.
    pub fn new(distance: f64) -> Self {
        Self { distance }
    }

    /// Cost of traversing this arc.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

/// A dense n×n arc matrix stored in row-major order.
///
/// Supports both Euclidean construction from coordinates and explicit
/// per-arc payloads.
///
/// # Examples
///
/// ```
/// use u_localsearch::distance::ArcMatrix;
///
/// let am = ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((am.distance(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(am.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct ArcMatrix {
    data: Vec<ArcData>,
    size: usize,
}

impl ArcMatrix {
    /// Creates a matrix of the given size with all distances zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![ArcData::new(0.0); size * size],
            size,
        }
    }

    /// Computes a Euclidean matrix from planar coordinates.
    pub fn euclidean(coordinates: &[(f64, f64)]) -> Self {
        let n = coordinates.len();
        let mut am = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (
                    coordinates[i].0 - coordinates[j].0,
                    coordinates[i].1 - coordinates[j].1,
                );
                let d = (dx * dx + dy * dy).sqrt();
                am.set(i, j, ArcData::new(d));
                am.set(j, i, ArcData::new(d));
            }
        }
        am
    }

    /// Creates a matrix from explicit rows.
    ///
    /// Returns `None` unless every row has exactly `rows.len()` entries.
    pub fn from_rows(rows: Vec<Vec<ArcData>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Creates a matrix from a flat row-major list of distances.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_distances(size: usize, distances: Vec<f64>) -> Option<Self> {
        if distances.len() != size * size {
            return None;
        }
        Some(Self {
            data: distances.into_iter().map(ArcData::new).collect(),
            size,
        })
    }

    /// Returns the arc from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> &ArcData {
        &self.data[from * self.size + to]
    }

    /// Distance of the arc from `from` to `to`.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to].distance
    }

    /// Replaces the arc from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, arc: ArcData) {
        self.data[from * self.size + to] = arc;
    }

    /// Number of vertices covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Iterates over all arc payloads in row-major order.
    pub fn arcs(&self) -> impl Iterator<Item = &ArcData> {
        self.data.iter()
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.distance(i, j) - self.distance(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ArcMatrix {
        ArcMatrix::euclidean(&[(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)])
    }

    #[test]
    fn test_euclidean() {
        let am = sample();
        assert_eq!(am.size(), 3);
        assert!((am.distance(0, 1) - 5.0).abs() < 1e-10);
        assert!((am.distance(0, 2) - 8.0).abs() < 1e-10);
        assert!(am.distance(0, 0).abs() < 1e-10);
        assert!(am.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_distances() {
        let am = ArcMatrix::from_distances(2, vec![0.0, 5.0, 7.0, 0.0]).expect("valid");
        assert_eq!(am.distance(0, 1), 5.0);
        assert_eq!(am.distance(1, 0), 7.0);
        assert!(!am.is_symmetric(1e-10));
    }

    #[test]
    fn test_from_distances_invalid_size() {
        assert!(ArcMatrix::from_distances(2, vec![0.0, 1.0, 2.0]).is_none());
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![
            vec![ArcData::new(0.0), ArcData::new(2.0)],
            vec![ArcData::new(3.0), ArcData::new(0.0)],
        ];
        let am = ArcMatrix::from_rows(rows).expect("square");
        assert_eq!(am.get(1, 0).distance(), 3.0);
        assert_eq!(am.arcs().count(), 4);
    }

    #[test]
    fn test_from_rows_ragged() {
        let rows = vec![vec![ArcData::new(0.0)], vec![]];
        assert!(ArcMatrix::from_rows(rows).is_none());
    }

    #[test]
    fn test_set_get() {
        let mut am = ArcMatrix::new(3);
        am.set(0, 1, ArcData::new(42.0));
        assert_eq!(am.distance(0, 1), 42.0);
        assert_eq!(am.distance(1, 0), 0.0);
    }
}
