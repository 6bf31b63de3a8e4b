//! Tabu Search execution engine (single objective).
//!
//! # Algorithm
//!
//! 1. Build the initial solution; it is both incumbent and best
//! 2. At each iteration:
//!    a. Ask every neighborhood of the incumbent for its non-tabu candidates
//!    b. Keep the lowest-cost candidate across all neighborhoods
//!    c. Accept it only if it is strictly cheaper than the incumbent, and
//!    add its move key to that neighborhood's tabu list
//!    d. After `shuffle_after` non-improving iterations, replace the
//!    incumbent with a shuffled solution
//! 3. Terminate after `iterations`, when no neighborhood yields a
//!    candidate, or when the cancel flag is raised
//! 4. Post-optimize the best solution (skipped on interruption)
//!
//! # Reference
//!
//! Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace};

use super::config::TabuConfig;
use super::memory::TabuMemory;
use super::types::{Solution, TabuMove};
use crate::error::TabuError;
use crate::objective::Objective;
use crate::pool::WorkerPool;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// All configured iterations ran.
    Completed,
    /// The search ran out of candidates (local optimum, or nothing left to
    /// propagate) before the iteration budget was spent.
    Converged,
    /// The cancel flag was raised; the result holds the best found so far.
    Interrupted,
}

/// Result of a single-objective run.
#[derive(Debug, Clone)]
pub struct TabuResult<S: Solution> {
    /// Best solution found (post-optimized unless interrupted).
    pub best: S,
    /// Cost of `best`.
    pub best_cost: S::Cost,
    /// The incumbent when the search stopped. Differs from `best` after a shuffle.
    pub incumbent: S,
    /// Total iterations executed.
    pub iterations: usize,
    /// Iteration at which the best solution was found.
    pub best_iteration: usize,
    /// Number of stagnation shuffles applied.
    pub shuffles: usize,
    /// How the run ended.
    pub status: SearchStatus,
    /// Best cost at the end of each iteration.
    pub cost_history: Vec<S::Cost>,
}

/// A search session for one solution type.
///
/// The session owns the problem instance and the tabu capacities of each
/// neighborhood kind. Every run builds fresh tabu memory from those
/// capacities, so nothing carries over between runs.
///
/// # Examples
///
/// ```
/// use u_tabu::tabu::{TabuConfig, TabuSearch};
/// use u_tabu::tsp::{DistanceMatrix, PathMoveKind, TspPath, TspProblem};
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 4.0, 1.0],
///     vec![1.0, 0.0, 1.0, 4.0],
///     vec![4.0, 1.0, 0.0, 1.0],
///     vec![1.0, 4.0, 1.0, 0.0],
/// ]).unwrap();
///
/// let mut search = TabuSearch::<TspPath>::new();
/// search.load_problem(TspProblem::new(dm));
/// for kind in PathMoveKind::ALL {
///     search.reset_tabu(kind.name(), 3);
/// }
///
/// let config = TabuConfig::default().with_iterations(50).with_pool_size(1).with_seed(1);
/// let result = search.run(&config).unwrap();
/// assert_eq!(result.best_cost, 4.0);
/// ```
pub struct TabuSearch<S: Solution> {
    problem: Option<Arc<S::Problem>>,
    capacities: BTreeMap<&'static str, usize>,
}

impl<S: Solution> fmt::Debug for TabuSearch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabuSearch")
            .field("problem_loaded", &self.problem.is_some())
            .field("capacities", &self.capacities)
            .finish()
    }
}

impl<S: Solution> Default for TabuSearch<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> TabuSearch<S> {
    /// Creates a session with no problem loaded and no tabu configured.
    pub fn new() -> Self {
        Self {
            problem: None,
            capacities: BTreeMap::new(),
        }
    }

    /// Loads the problem instance every later run will search.
    pub fn load_problem(&mut self, problem: impl Into<Arc<S::Problem>>) {
        self.problem = Some(problem.into());
    }

    /// The loaded problem instance, if any.
    pub fn problem(&self) -> Option<&Arc<S::Problem>> {
        self.problem.as_ref()
    }

    /// Configures the tabu list of one neighborhood kind.
    ///
    /// The list starts empty with capacity `maxlen` at the beginning of
    /// every run.
    pub fn reset_tabu(&mut self, kind: &'static str, maxlen: usize) {
        self.capacities.insert(kind, maxlen);
    }

    /// Runs the single-objective search.
    pub fn run(&self, config: &TabuConfig) -> Result<TabuResult<S>, TabuError> {
        self.run_with_cancel(config, None)
    }

    /// Runs the single-objective search with an optional cancellation flag.
    ///
    /// When the flag is set, the search stops at the next iteration boundary
    /// and returns the best solution found so far with
    /// [`SearchStatus::Interrupted`].
    pub fn run_with_cancel(
        &self,
        config: &TabuConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TabuResult<S>, TabuError> {
        config.validate()?;
        let (initial, mut memory) = self.prepare()?;
        let pool = WorkerPool::new(config.pool_size)?;
        let mut rng = create_rng(config.seed);

        debug!(
            iterations = config.iterations,
            shuffle_after = config.shuffle_after,
            initial_cost = ?initial.cost(),
            "tabu search started"
        );

        let mut current = initial.clone();
        let mut best = initial;
        let mut best_cost = best.cost();
        let mut best_iteration = 0;
        let mut cost_history = Vec::with_capacity(config.iterations);
        let mut no_improve_count = 0;
        let mut shuffles = 0;
        let mut status = SearchStatus::Completed;

        for iteration in 0..config.iterations {
            if is_cancelled(&cancel) {
                status = SearchStatus::Interrupted;
                break;
            }

            // Lowest-cost candidate across all neighborhoods; earlier wins ties
            let mut best_candidate: Option<(&'static str, TabuMove<S>, S::Cost)> = None;
            for neighborhood in current.neighborhoods() {
                let kind = neighborhood.kind();
                for mv in neighborhood.generate(memory.list(kind)?)? {
                    let cost = mv.solution.cost();
                    let better = match &best_candidate {
                        Some((_, _, c)) => cost.total_cmp(c).is_lt(),
                        None => true,
                    };
                    if better {
                        best_candidate = Some((kind, mv, cost));
                    }
                }
            }

            let Some((kind, mv, cost)) = best_candidate else {
                debug!(iteration, "no candidates left, local optimum reached");
                status = SearchStatus::Converged;
                break;
            };

            if cost.total_cmp(&current.cost()).is_lt() {
                memory.record(kind, mv.key)?;
                current = mv.solution;
                no_improve_count = 0;
            } else {
                no_improve_count += 1;
            }

            if current.cost().total_cmp(&best_cost).is_lt() {
                best = current.clone();
                best_cost = best.cost();
                best_iteration = iteration;
            }

            if config.shuffle_after > 0 && no_improve_count >= config.shuffle_after {
                current = current.shuffle(&mut rng);
                no_improve_count = 0;
                shuffles += 1;
                trace!(iteration, cost = ?current.cost(), "incumbent shuffled");
            }

            cost_history.push(best_cost.clone());

            if config.progress {
                info!(iteration, best = ?best_cost, current = ?current.cost(), "Tabu search");
            } else {
                trace!(iteration, best = ?best_cost, current = ?current.cost(), "Tabu search");
            }
        }

        if status == SearchStatus::Interrupted {
            info!(iterations = cost_history.len(), "tabu search interrupted, returning best so far");
        } else {
            best = best.post_optimization(&pool, config.progress)?;
            best_cost = best.cost();
        }

        debug!(best_cost = ?best_cost, ?status, "tabu search finished");

        Ok(TabuResult {
            best,
            best_cost,
            incumbent: current,
            iterations: cost_history.len(),
            best_iteration,
            shuffles,
            status,
            cost_history,
        })
    }

    /// Checks the session and builds the initial solution and fresh tabu memory.
    ///
    /// Fails before any search work if the problem is missing or a
    /// neighborhood kind of the initial solution has no tabu configured.
    pub(crate) fn prepare(&self) -> Result<(S, TabuMemory), TabuError> {
        let problem = self.problem.as_ref().ok_or(TabuError::ProblemNotLoaded)?;
        let initial = S::initial(problem)?;
        let memory = TabuMemory::with_capacities(&self.capacities);
        for neighborhood in initial.neighborhoods() {
            let kind = neighborhood.kind();
            if !memory.is_configured(kind) {
                return Err(TabuError::TabuNotConfigured(kind));
            }
        }
        Ok((initial, memory))
    }
}

pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

pub(crate) fn is_cancelled(cancel: &Option<Arc<AtomicBool>>) -> bool {
    cancel
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabu::{Neighborhood, TabuList};
    use rand::Rng;

    // ---- Discretized quadratic: f(x) = (x - 5)^2, minimum at x = 5 ----

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i32,
        lo: i32,
    }

    struct Step {
        from: Point,
        delta: i32,
    }

    impl Neighborhood<Point> for Step {
        fn kind(&self) -> &'static str {
            if self.delta < 0 {
                "left"
            } else {
                "right"
            }
        }

        fn generate(&self, tabu: &TabuList) -> Result<Vec<TabuMove<Point>>, TabuError> {
            let x = self.from.x + self.delta;
            let key = format!("to_{x}");
            if x < self.from.lo || tabu.contains(&key) {
                return Ok(vec![]);
            }
            Ok(vec![TabuMove::new(Point { x, ..self.from.clone() }, key)])
        }
    }

    impl Solution for Point {
        type Problem = i32;
        type Cost = f64;

        fn initial(problem: &Arc<i32>) -> Result<Self, TabuError> {
            Ok(Point { x: **problem, lo: -100 })
        }

        fn cost(&self) -> f64 {
            let d = self.x as f64 - 5.0;
            d * d
        }

        fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
            vec![
                Box::new(Step { from: self.clone(), delta: -1 }),
                Box::new(Step { from: self.clone(), delta: 1 }),
            ]
        }

        fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
            Point { x: rng.random_range(-50..50), lo: self.lo }
        }
    }

    fn session(start: i32) -> TabuSearch<Point> {
        let mut search = TabuSearch::new();
        search.load_problem(start);
        search.reset_tabu("left", 3);
        search.reset_tabu("right", 3);
        search
    }

    fn config() -> TabuConfig {
        TabuConfig::default()
            .with_iterations(100)
            .with_pool_size(1)
            .with_shuffle_after(0)
            .with_seed(42)
    }

    #[test]
    fn test_quadratic_finds_optimum() {
        let result = session(-20).run(&config()).unwrap();
        assert_eq!(result.best.x, 5);
        assert!(result.best_cost < 1e-10);
    }

    #[test]
    fn test_cost_history_non_increasing() {
        let result = session(30)
            .run(&config().with_shuffle_after(2))
            .unwrap();
        for window in result.cost_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "best cost history should be non-increasing: {} > {}",
                window[1],
                window[0]
            );
        }
    }

    #[test]
    fn test_descent_stops_at_local_optimum_without_shuffle() {
        // Without shuffling the incumbent stays at the optimum once reached
        let result = session(0).run(&config()).unwrap();
        assert_eq!(result.best.x, 5);
        assert_eq!(result.incumbent.x, 5);
        assert_eq!(result.shuffles, 0);
        assert_eq!(result.status, SearchStatus::Completed);
        assert_eq!(result.iterations, 100);
    }

    #[test]
    fn test_empty_neighborhood_converges() {
        #[derive(Clone)]
        struct Stuck;

        impl Solution for Stuck {
            type Problem = ();
            type Cost = f64;

            fn initial(_: &Arc<()>) -> Result<Self, TabuError> {
                Ok(Stuck)
            }
            fn cost(&self) -> f64 {
                0.0
            }
            fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
                vec![]
            }
            fn shuffle<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self {
                Stuck
            }
        }

        let mut search = TabuSearch::<Stuck>::new();
        search.load_problem(());
        let result = search.run(&config()).unwrap();
        assert_eq!(result.status, SearchStatus::Converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_problem_not_loaded() {
        let mut search = TabuSearch::<Point>::new();
        search.reset_tabu("left", 3);
        search.reset_tabu("right", 3);
        assert!(matches!(
            search.run(&config()),
            Err(TabuError::ProblemNotLoaded)
        ));
    }

    #[test]
    fn test_tabu_not_configured() {
        let mut search = TabuSearch::<Point>::new();
        search.load_problem(0);
        search.reset_tabu("left", 3);
        assert!(matches!(
            search.run(&config()),
            Err(TabuError::TabuNotConfigured("right"))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_before_search() {
        let result = session(0).run(&config().with_pool_size(0));
        assert!(matches!(result, Err(TabuError::InvalidConfig(_))));
    }

    #[test]
    fn test_cancelled_before_start_returns_initial() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = session(-20).run_with_cancel(&config(), Some(flag)).unwrap();
        assert_eq!(result.status, SearchStatus::Interrupted);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.best.x, -20);
    }

    #[test]
    fn test_same_seed_same_result() {
        let cfg = config().with_shuffle_after(3).with_seed(9);
        let a = session(40).run(&cfg).unwrap();
        let b = session(40).run(&cfg).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.incumbent, b.incumbent);
        assert_eq!(a.cost_history, b.cost_history);
    }

    // ---- Stagnation shuffle on a flat landscape ----

    #[derive(Debug, Clone, PartialEq)]
    struct Flat {
        order: Vec<usize>,
    }

    struct Rotate {
        from: Flat,
    }

    impl Neighborhood<Flat> for Rotate {
        fn kind(&self) -> &'static str {
            "rotate"
        }

        fn generate(&self, _tabu: &TabuList) -> Result<Vec<TabuMove<Flat>>, TabuError> {
            let mut order = self.from.order.clone();
            order.rotate_left(1);
            Ok(vec![TabuMove::new(Flat { order }, "rotate")])
        }
    }

    impl Solution for Flat {
        type Problem = usize;
        type Cost = f64;

        fn initial(n: &Arc<usize>) -> Result<Self, TabuError> {
            Ok(Flat { order: (0..**n).collect() })
        }

        fn cost(&self) -> f64 {
            1.0
        }

        fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
            vec![Box::new(Rotate { from: self.clone() })]
        }

        fn shuffle<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
            use rand::seq::SliceRandom;
            let mut order = self.order.clone();
            while order == self.order {
                order.shuffle(rng);
            }
            Flat { order }
        }
    }

    #[test]
    fn test_stagnation_triggers_shuffle() {
        let run = |shuffle_after: usize| {
            let mut search = TabuSearch::<Flat>::new();
            search.load_problem(8usize);
            search.reset_tabu("rotate", 3);
            search
                .run(&config().with_iterations(4).with_shuffle_after(shuffle_after))
                .unwrap()
        };

        let plain = run(0);
        let shuffled = run(3);

        assert_eq!(plain.shuffles, 0);
        assert_eq!(shuffled.shuffles, 1);
        assert_eq!(plain.incumbent.order, (0..8).collect::<Vec<_>>());
        assert_ne!(shuffled.incumbent.order, plain.incumbent.order);
        assert_eq!(shuffled.incumbent.cost(), 1.0);
        // The best solution is never replaced by an equal-cost one
        assert_eq!(shuffled.best, plain.best);
    }

    // ---- Ladder: one move kind whose key never changes ----
    //
    // Every step down carries the key "down", so once recorded the move is
    // forbidden until the key falls out of the list.

    #[derive(Debug)]
    struct Rungs {
        start: i32,
        floor: i32,
        post_shift: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Ladder {
        x: i32,
        floor: i32,
        post_shift: i32,
    }

    struct Down {
        from: Ladder,
    }

    impl Neighborhood<Ladder> for Down {
        fn kind(&self) -> &'static str {
            "down"
        }

        fn generate(&self, tabu: &TabuList) -> Result<Vec<TabuMove<Ladder>>, TabuError> {
            if self.from.x <= self.from.floor || tabu.contains("down") {
                return Ok(vec![]);
            }
            let next = Ladder { x: self.from.x - 1, ..self.from.clone() };
            Ok(vec![TabuMove::new(next, "down")])
        }
    }

    impl Solution for Ladder {
        type Problem = Rungs;
        type Cost = f64;

        fn initial(rungs: &Arc<Rungs>) -> Result<Self, TabuError> {
            Ok(Ladder {
                x: rungs.start,
                floor: rungs.floor,
                post_shift: rungs.post_shift,
            })
        }

        fn cost(&self) -> f64 {
            self.x as f64
        }

        fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
            vec![Box::new(Down { from: self.clone() })]
        }

        fn shuffle<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self {
            self.clone()
        }

        fn post_optimization(self, _pool: &WorkerPool, _progress: bool) -> Result<Self, TabuError> {
            Ok(Ladder { x: self.x + self.post_shift, ..self })
        }
    }

    fn ladder(rungs: Rungs, tabu: usize) -> TabuSearch<Ladder> {
        let mut search = TabuSearch::new();
        search.load_problem(rungs);
        search.reset_tabu("down", tabu);
        search
    }

    #[test]
    fn test_accepted_key_blocks_later_iterations() {
        let rungs = || Rungs { start: 0, floor: -10, post_shift: 0 };

        let open = ladder(rungs(), 0).run(&config()).unwrap();
        assert_eq!(open.best.x, -10);
        assert_eq!(open.iterations, 10);
        assert_eq!(open.status, SearchStatus::Converged);

        // The first accepted step records "down"; the next iteration finds
        // no admissible move
        let blocked = ladder(rungs(), 1).run(&config()).unwrap();
        assert_eq!(blocked.best.x, -1);
        assert_eq!(blocked.iterations, 1);
        assert_eq!(blocked.status, SearchStatus::Converged);
    }

    #[test]
    fn test_best_cost_matches_post_optimized_best() {
        let rungs = Rungs { start: 5, floor: 1, post_shift: 10 };
        let result = ladder(rungs, 0).run(&config()).unwrap();

        assert_eq!(result.best.x, 11);
        assert_eq!(result.best_cost, result.best.cost());
        assert_eq!(result.cost_history.last(), Some(&1.0));
    }
}
