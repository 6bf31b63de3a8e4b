//! Core traits for tabu search problems.

use std::sync::Arc;

use rand::Rng;

use super::memory::TabuList;
use crate::error::TabuError;
use crate::objective::Objective;
use crate::pool::WorkerPool;

/// A candidate produced by a neighborhood.
///
/// The `key` identifies the move in its neighborhood's tabu list. Moves
/// with the same key are considered equivalent (e.g. "swap(3,7)" and
/// "swap(7,3)").
#[derive(Debug, Clone)]
pub struct TabuMove<S> {
    /// The solution reached by applying the move.
    pub solution: S,
    /// A string key identifying this move for tabu tracking.
    pub key: String,
}

impl<S> TabuMove<S> {
    /// Creates a move record.
    pub fn new(solution: S, key: impl Into<String>) -> Self {
        Self {
            solution,
            key: key.into(),
        }
    }
}

/// A feasible assignment for an optimization problem.
///
/// Solutions are values: the engine never mutates one in place, every
/// step replaces the current solution(s) with newly produced ones. The
/// engine identifies solutions by [`cost`](Solution::cost) alone (see
/// [`ByCost`](crate::objective::ByCost)).
///
/// # Type Parameters
///
/// * `Problem`: instance data shared by all solutions of one run
/// * `Cost`: `f64` for single-objective problems, `Vec<f64>` for
///   multi-objective ones
pub trait Solution: Clone + Send + Sync + Sized + 'static {
    /// Instance data the solution is built from.
    type Problem: Send + Sync + 'static;

    /// Cost value; lower is better.
    type Cost: Objective;

    /// Builds the starting solution for a run.
    fn initial(problem: &Arc<Self::Problem>) -> Result<Self, TabuError>;

    /// Cost of this solution. Must be pure and deterministic.
    fn cost(&self) -> Self::Cost;

    /// One neighborhood of each move kind, bound to this solution.
    fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>>;

    /// A randomly perturbed feasible solution, used to escape stagnation.
    fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self;

    /// Cheap improvement pass applied to the final result(s).
    ///
    /// The default implementation returns the solution unchanged.
    fn post_optimization(self, _pool: &WorkerPool, _progress: bool) -> Result<Self, TabuError> {
        Ok(self)
    }
}

/// One move kind bound to one solution.
///
/// A neighborhood holds no recency state of its own: the run passes in the
/// tabu list of its [`kind`](Neighborhood::kind), and the neighborhood must
/// skip every move whose key that list contains. Recording accepted moves
/// is the search loop's job.
pub trait Neighborhood<S: Solution>: Send + Sync {
    /// Name of the move kind; selects the tabu list.
    fn kind(&self) -> &'static str;

    /// All feasible non-tabu solutions one move away from the bound solution.
    ///
    /// Must not yield the bound solution itself. An empty result is normal.
    fn generate(&self, tabu: &TabuList) -> Result<Vec<TabuMove<S>>, TabuError>;

    /// Best non-tabu candidates, evaluated on the worker pool.
    ///
    /// Results must come back in a fixed enumeration order regardless of
    /// worker scheduling. The default delegates to
    /// [`generate`](Neighborhood::generate).
    fn find_best_candidates(
        &self,
        _pool: &WorkerPool,
        tabu: &TabuList,
    ) -> Result<Vec<TabuMove<S>>, TabuError> {
        self.generate(tabu)
    }
}
