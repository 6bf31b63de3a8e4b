//! Pareto-front tabu search execution engine.
//!
//! # Algorithm
//!
//! 1. front ← {initial}, current ← [initial]
//! 2. At each iteration:
//!    a. For every solution in `current`, pick one of its neighborhoods
//!    uniformly at random and ask it for candidates on the worker pool
//!    b. Try to insert each candidate into the front; candidates that were
//!    inserted, or that satisfy the propagation predicate, propagate
//!    c. Sort the propagation list by priority, truncate it to the
//!    propagation cap; it becomes `current`
//!    d. After `shuffle_after` iterations without a front change, shuffle
//!    the propagating solutions
//! 3. Post-optimize every front member and re-filter the result
//!
//! Candidate computation is parallel, but insertion and propagation run on
//! the coordinating thread in enumeration order. With a fixed seed the
//! front evolves identically from run to run.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info, trace};

use super::config::ParetoConfig;
use super::front::ParetoFront;
use crate::error::TabuError;
use crate::objective::Objective;
use crate::pool::WorkerPool;
use crate::tabu::{create_rng, is_cancelled, SearchStatus, Solution, TabuSearch};

/// Result of a Pareto-front run.
#[derive(Debug, Clone)]
pub struct ParetoResult<S: Solution> {
    /// Mutually non-dominated solutions found.
    pub front: ParetoFront<S>,
    /// Total iterations executed.
    pub iterations: usize,
    /// Number of stagnation shuffles applied.
    pub shuffles: usize,
    /// How the run ended.
    pub status: SearchStatus,
    /// Cost vector of the initial solution and every candidate seen, in
    /// discovery order. Only collected when `plot_pareto_front` is set.
    pub explored: Option<Vec<Vec<f64>>>,
}

impl<S: Solution> TabuSearch<S> {
    /// Runs the Pareto-front search on a pool of `config.search.pool_size`
    /// workers, held for the whole run.
    pub fn run_pareto(&self, config: &ParetoConfig<S>) -> Result<ParetoResult<S>, TabuError> {
        self.run_pareto_with_cancel(config, None)
    }

    /// Runs the Pareto-front search with an optional cancellation flag.
    ///
    /// The pool is dropped on every exit path, including errors and
    /// interruption.
    pub fn run_pareto_with_cancel(
        &self,
        config: &ParetoConfig<S>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ParetoResult<S>, TabuError> {
        config.validate()?;
        let pool = WorkerPool::new(config.search.pool_size)?;
        self.run_pareto_in(&pool, config, cancel)
    }

    /// Runs the Pareto-front search on a caller-provided pool.
    ///
    /// `config.search.pool_size` is ignored in favour of the pool's own width.
    pub fn run_pareto_in(
        &self,
        pool: &WorkerPool,
        config: &ParetoConfig<S>,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ParetoResult<S>, TabuError> {
        let search = &config.search;
        let policy = &config.propagation;

        let (initial, mut memory) = self.prepare()?;
        let dimension = initial.cost().dimension();
        if config.plot_pareto_front && dimension != 2 {
            return Err(TabuError::ParetoPlotDimension(dimension));
        }

        let mut rng = create_rng(search.seed);
        let mut explored = config
            .plot_pareto_front
            .then(|| vec![initial.cost().components()]);

        debug!(
            iterations = search.iterations,
            pool_size = pool.size(),
            objectives = dimension,
            "Pareto tabu search started"
        );

        let mut front = ParetoFront::new();
        front.insert(initial.clone());
        let mut current = vec![initial];

        let mut iterations = 0;
        let mut no_change_count = 0;
        let mut shuffles = 0;
        let mut status = SearchStatus::Completed;

        for iteration in 0..search.iterations {
            if is_cancelled(&cancel) {
                status = SearchStatus::Interrupted;
                break;
            }
            if current.is_empty() {
                debug!(iteration, "nothing left to propagate");
                status = SearchStatus::Converged;
                break;
            }

            if search.progress {
                info!(
                    iteration,
                    "Tabu search ({}/{} solution(s))",
                    current.len(),
                    front.len()
                );
            } else {
                trace!(iteration, current = current.len(), front = front.len(), "Tabu search");
            }

            let mut propagate = Vec::new();
            let mut changed = false;

            for solution in &current {
                let neighborhoods = solution.neighborhoods();
                if neighborhoods.is_empty() {
                    continue;
                }
                let neighborhood = &neighborhoods[rng.random_range(0..neighborhoods.len())];
                let kind = neighborhood.kind();
                let candidates = neighborhood.find_best_candidates(pool, memory.list(kind)?)?;

                for mv in candidates {
                    if let Some(costs) = explored.as_mut() {
                        costs.push(mv.solution.cost().components());
                    }

                    let inserted = front.insert(mv.solution.clone());
                    changed |= inserted;
                    if inserted || (policy.predicate)(&front, &mv.solution) {
                        memory.record(kind, mv.key)?;
                        propagate.push(mv.solution);
                    }
                }
            }

            let mut keyed: Vec<(f64, S)> = propagate
                .into_iter()
                .map(|s| ((policy.priority)(&front, &s), s))
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
            current = keyed.into_iter().map(|(_, s)| s).collect();
            if let Some(max) = &policy.max_propagation {
                current.truncate(max.resolve(&front));
            }

            if changed {
                no_change_count = 0;
            } else {
                no_change_count += 1;
            }
            if search.shuffle_after > 0 && no_change_count >= search.shuffle_after {
                let seeds = if current.is_empty() {
                    front.members()
                } else {
                    current.as_slice()
                };
                current = seeds.iter().map(|s| s.shuffle(&mut rng)).collect();
                no_change_count = 0;
                shuffles += 1;
                trace!(iteration, seeds = current.len(), "propagation set shuffled");
            }

            iterations += 1;
        }

        let front = if status == SearchStatus::Interrupted {
            info!(iterations, front = front.len(), "Pareto tabu search interrupted, returning front so far");
            front
        } else {
            let mut optimized = ParetoFront::new();
            for member in front {
                optimized.insert(member.post_optimization(pool, search.progress)?);
            }
            optimized
        };

        debug!(iterations, front = front.len(), ?status, "Pareto tabu search finished");

        Ok(ParetoResult {
            front,
            iterations,
            shuffles,
            status,
            explored,
        })
    }
}
