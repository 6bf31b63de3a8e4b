//! Tour solutions.

use std::fmt;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, trace};

use super::moves::PathNeighborhood;
use super::problem::{nearest_neighbor_tour, BiObjectiveProblem, DistanceMatrix, TspProblem};
use crate::error::TabuError;
use crate::pool::WorkerPool;
use crate::tabu::{Neighborhood, Solution};

/// Improvements smaller than this are treated as noise by 2-opt.
const IMPROVEMENT_EPS: f64 = 1e-9;

/// A solution represented as a closed tour starting at city 0.
pub trait PathSolution: Solution {
    /// The tour, `path[0] == 0`.
    fn path(&self) -> &[usize];

    /// A solution for the same problem with a different tour.
    fn with_path(&self, path: Vec<usize>) -> Result<Self, TabuError>;

    /// Cost and tour, detached from the problem instance.
    fn report(&self) -> PathReport<Self::Cost> {
        PathReport {
            cost: self.cost(),
            path: self.path().to_vec(),
        }
    }
}

/// Printable summary of a tour.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathReport<C> {
    /// Cost of the tour.
    pub cost: C,
    /// City order.
    pub path: Vec<usize>,
}

/// Checks that `path` is a permutation of `0..n` starting at city 0.
fn validate_path(path: &[usize], n: usize) -> Result<(), TabuError> {
    if path.len() != n {
        return Err(TabuError::InvalidProblem(format!(
            "path visits {} cities, problem has {n}",
            path.len()
        )));
    }
    if n > 0 && path[0] != 0 {
        return Err(TabuError::InvalidProblem(format!(
            "path must start at city 0, starts at {}",
            path[0]
        )));
    }
    let mut seen = vec![false; n];
    for &city in path {
        if city >= n || seen[city] {
            return Err(TabuError::InvalidProblem(format!(
                "path is not a permutation: city {city} out of range or repeated"
            )));
        }
        seen[city] = true;
    }
    Ok(())
}

/// Random reordering of every city after the first.
fn shuffled_path<R: Rng + ?Sized>(path: &[usize], rng: &mut R) -> Vec<usize> {
    let mut next = path.to_vec();
    if next.len() > 1 {
        next[1..].shuffle(rng);
    }
    next
}

/// A single-objective TSP tour with its cached length.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tabu::tabu::Solution;
/// use u_tabu::tsp::{DistanceMetric, PathSolution, TspPath, TspProblem};
///
/// let problem = Arc::new(TspProblem::from_points(
///     &[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)],
///     DistanceMetric::Manhattan,
/// ));
/// let tour = TspPath::new(&problem, vec![0, 2, 1, 3]).unwrap();
/// assert_eq!(tour.cost(), 6.0);
/// assert_eq!(TspPath::initial(&problem).unwrap().path(), &[0, 1, 2, 3]);
/// ```
#[derive(Clone)]
pub struct TspPath {
    problem: Arc<TspProblem>,
    path: Vec<usize>,
    cost: f64,
}

impl TspPath {
    /// Creates a tour, validating that `path` is a permutation starting at 0.
    pub fn new(problem: &Arc<TspProblem>, path: Vec<usize>) -> Result<Self, TabuError> {
        validate_path(&path, problem.size())?;
        Ok(Self::from_valid(Arc::clone(problem), path))
    }

    fn from_valid(problem: Arc<TspProblem>, path: Vec<usize>) -> Self {
        let cost = problem.distances().tour_length(&path);
        Self {
            problem,
            path,
            cost,
        }
    }
}

impl fmt::Debug for TspPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TspPath")
            .field("cost", &self.cost)
            .field("path", &self.path)
            .finish()
    }
}

impl Solution for TspPath {
    type Problem = TspProblem;
    type Cost = f64;

    fn initial(problem: &Arc<TspProblem>) -> Result<Self, TabuError> {
        if problem.size() == 0 {
            return Err(TabuError::InvalidProblem("problem has no cities".into()));
        }
        let dm = problem.distances();
        let path = nearest_neighbor_tour(problem.size(), |a, b| dm.get(a, b));
        Ok(Self::from_valid(Arc::clone(problem), path))
    }

    fn cost(&self) -> f64 {
        self.cost
    }

    fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
        PathNeighborhood::all(self)
    }

    fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::from_valid(Arc::clone(&self.problem), shuffled_path(&self.path, rng))
    }

    /// Best-improvement 2-opt until no segment reversal shortens the tour.
    fn post_optimization(self, pool: &WorkerPool, progress: bool) -> Result<Self, TabuError> {
        let dm = self.problem.distances();
        let mut path = self.path.clone();
        let starts: Vec<usize> = (1..path.len().saturating_sub(1)).collect();
        let mut passes = 0;

        loop {
            let best = pool
                .map(&starts, |&i| best_reversal_from(dm, &path, i))
                .into_iter()
                .flatten()
                .min_by(|a, b| a.0.total_cmp(&b.0));

            match best {
                Some((delta, i, j)) if delta < -IMPROVEMENT_EPS => {
                    path[i..=j].reverse();
                    passes += 1;
                    if progress {
                        info!(pass = passes, delta, "2-opt");
                    } else {
                        trace!(pass = passes, delta, "2-opt");
                    }
                }
                _ => break,
            }
        }

        if passes == 0 {
            return Ok(self);
        }
        Ok(Self::from_valid(self.problem, path))
    }
}

impl PathSolution for TspPath {
    fn path(&self) -> &[usize] {
        &self.path
    }

    fn with_path(&self, path: Vec<usize>) -> Result<Self, TabuError> {
        Self::new(&self.problem, path)
    }
}

/// Best reversal `path[i..=j]` over every `j > i`, as `(delta, i, j)`.
///
/// The delta accounts for direction, so it is exact for asymmetric
/// matrices too.
fn best_reversal_from(dm: &DistanceMatrix, path: &[usize], i: usize) -> Option<(f64, usize, usize)> {
    let n = path.len();
    let before = path[i - 1];
    let mut best: Option<(f64, usize, usize)> = None;
    // reversed-minus-forward length of the edges inside path[i..=j]
    let mut inner = 0.0;

    for j in (i + 1)..n {
        inner += dm.get(path[j], path[j - 1]) - dm.get(path[j - 1], path[j]);
        let after = path[(j + 1) % n];
        let delta = dm.get(before, path[j]) + dm.get(path[i], after)
            - dm.get(before, path[i])
            - dm.get(path[j], after)
            + inner;
        if best.map_or(true, |(d, _, _)| delta < d) {
            best = Some((delta, i, j));
        }
    }
    best
}

/// A tour scored on two distance matrices at once.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_tabu::tabu::Solution;
/// use u_tabu::tsp::{BiObjectivePath, BiObjectiveProblem, DistanceMatrix};
///
/// let time = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 2.0],
///     vec![1.0, 0.0, 1.0],
///     vec![2.0, 1.0, 0.0],
/// ]).unwrap();
/// let toll = DistanceMatrix::from_rows(vec![
///     vec![0.0, 5.0, 0.0],
///     vec![5.0, 0.0, 1.0],
///     vec![0.0, 1.0, 0.0],
/// ]).unwrap();
/// let problem = Arc::new(BiObjectiveProblem::new(time, toll).unwrap());
/// let tour = BiObjectivePath::new(&problem, vec![0, 1, 2]).unwrap();
/// assert_eq!(tour.cost(), vec![4.0, 6.0]);
/// ```
#[derive(Clone)]
pub struct BiObjectivePath {
    problem: Arc<BiObjectiveProblem>,
    path: Vec<usize>,
    cost: [f64; 2],
}

impl BiObjectivePath {
    /// Creates a tour, validating that `path` is a permutation starting at 0.
    pub fn new(problem: &Arc<BiObjectiveProblem>, path: Vec<usize>) -> Result<Self, TabuError> {
        validate_path(&path, problem.size())?;
        Ok(Self::from_valid(Arc::clone(problem), path))
    }

    fn from_valid(problem: Arc<BiObjectiveProblem>, path: Vec<usize>) -> Self {
        let [first, second] = problem.objectives();
        let cost = [first.tour_length(&path), second.tour_length(&path)];
        Self {
            problem,
            path,
            cost,
        }
    }
}

impl fmt::Debug for BiObjectivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiObjectivePath")
            .field("cost", &self.cost)
            .field("path", &self.path)
            .finish()
    }
}

impl Solution for BiObjectivePath {
    type Problem = BiObjectiveProblem;
    type Cost = Vec<f64>;

    /// Nearest-neighbour tour on the summed matrices.
    fn initial(problem: &Arc<BiObjectiveProblem>) -> Result<Self, TabuError> {
        if problem.size() == 0 {
            return Err(TabuError::InvalidProblem("problem has no cities".into()));
        }
        let [first, second] = problem.objectives();
        let path = nearest_neighbor_tour(problem.size(), |a, b| first.get(a, b) + second.get(a, b));
        Ok(Self::from_valid(Arc::clone(problem), path))
    }

    fn cost(&self) -> Vec<f64> {
        self.cost.to_vec()
    }

    fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
        PathNeighborhood::all(self)
    }

    fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::from_valid(Arc::clone(&self.problem), shuffled_path(&self.path, rng))
    }
}

impl PathSolution for BiObjectivePath {
    fn path(&self) -> &[usize] {
        &self.path
    }

    fn with_path(&self, path: Vec<usize>) -> Result<Self, TabuError> {
        Self::new(&self.problem, path)
    }
}
