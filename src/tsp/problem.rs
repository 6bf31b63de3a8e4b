//! TSP instance data.

use crate::error::TabuError;

/// How point-to-point distances are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// |dx| + |dy|
    #[default]
    Manhattan,
    /// sqrt(dx² + dy²)
    Euclidean,
}

impl DistanceMetric {
    /// Distance between two points, rounded to the nearest integer.
    pub fn distance(self, a: (f64, f64), b: (f64, f64)) -> f64 {
        let (dx, dy) = ((a.0 - b.0).abs(), (a.1 - b.1).abs());
        let d = match self {
            Self::Manhattan => dx + dy,
            Self::Euclidean => (dx * dx + dy * dy).sqrt(),
        };
        d.round()
    }
}

/// A dense n×n distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use u_tabu::tsp::{DistanceMatrix, DistanceMetric};
///
/// let dm = DistanceMatrix::from_points(
///     &[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)],
///     DistanceMetric::Euclidean,
/// );
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes a distance matrix from point coordinates.
    pub fn from_points(points: &[(f64, f64)], metric: DistanceMetric) -> Self {
        let n = points.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = metric.distance(points[i], points[j]);
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Self { data, size: n }
    }

    /// Creates a distance matrix from explicit rows.
    ///
    /// Fails if the rows do not form a square matrix or hold a negative or
    /// non-finite value.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, TabuError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(TabuError::InvalidProblem(format!(
                    "row {i} has {} entries, expected {size}",
                    row.len()
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite() || **v < 0.0) {
                return Err(TabuError::InvalidProblem(format!(
                    "row {i} holds invalid distance {v}"
                )));
            }
            data.extend(row);
        }
        Ok(Self { data, size })
    }

    /// Number of locations.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from `from` to `to`.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Length of the closed tour visiting `path` in order.
    pub fn tour_length(&self, path: &[usize]) -> f64 {
        match path {
            [] | [_] => 0.0,
            [first, .., last] => {
                path.windows(2).map(|w| self.get(w[0], w[1])).sum::<f64>() + self.get(*last, *first)
            }
        }
    }
}

/// A symmetric or asymmetric TSP instance.
#[derive(Debug, Clone)]
pub struct TspProblem {
    distances: DistanceMatrix,
}

impl TspProblem {
    /// Creates an instance from a distance matrix.
    pub fn new(distances: DistanceMatrix) -> Self {
        Self { distances }
    }

    /// Creates an instance from point coordinates.
    pub fn from_points(points: &[(f64, f64)], metric: DistanceMetric) -> Self {
        Self::new(DistanceMatrix::from_points(points, metric))
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.distances.size()
    }

    /// The distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

/// A TSP instance with two distance matrices minimized simultaneously.
#[derive(Debug, Clone)]
pub struct BiObjectiveProblem {
    objectives: [DistanceMatrix; 2],
}

impl BiObjectiveProblem {
    /// Creates an instance; both matrices must cover the same cities.
    pub fn new(first: DistanceMatrix, second: DistanceMatrix) -> Result<Self, TabuError> {
        if first.size() != second.size() {
            return Err(TabuError::InvalidProblem(format!(
                "objective matrices differ in size: {} vs {}",
                first.size(),
                second.size()
            )));
        }
        Ok(Self {
            objectives: [first, second],
        })
    }

    /// Number of cities.
    pub fn size(&self) -> usize {
        self.objectives[0].size()
    }

    /// Both distance matrices.
    pub fn objectives(&self) -> &[DistanceMatrix; 2] {
        &self.objectives
    }
}

/// Greedy tour from city 0, always visiting the closest unvisited city next.
///
/// Ties go to the lowest city index.
pub(crate) fn nearest_neighbor_tour(n: usize, dist: impl Fn(usize, usize) -> f64) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let mut tour = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    tour.push(0);
    visited[0] = true;

    while tour.len() < n {
        let current = tour[tour.len() - 1];
        let mut best_next = 0;
        let mut best_dist = f64::INFINITY;
        for (j, &is_visited) in visited.iter().enumerate() {
            if !is_visited && dist(current, j) < best_dist {
                best_dist = dist(current, j);
                best_next = j;
            }
        }
        tour.push(best_next);
        visited[best_next] = true;
    }
    tour
}
