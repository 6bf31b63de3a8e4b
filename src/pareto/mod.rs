//! Multi-objective (Pareto-front) tabu search.
//!
//! Instead of a single incumbent, the search maintains a front of mutually
//! non-dominated solutions and a working set of solutions that propagate,
//! i.e. generate neighbors in the next iteration. Each propagating solution
//! expands one randomly chosen neighborhood per iteration, with candidate
//! evaluation spread over a [`WorkerPool`](crate::pool::WorkerPool).
//!
//! # Key Types
//!
//! - [`ParetoFront`]: non-dominated set with dominance-based insertion
//! - [`ParetoConfig`] / [`PropagationPolicy`]: which candidates seed the next iteration
//! - [`ParetoResult`]: final front with run statistics
//!
//! The loop itself is [`TabuSearch::run_pareto`](crate::tabu::TabuSearch::run_pareto).
//!
//! # References
//!
//! - Hansen, M.P. (1997). "Tabu search for multiobjective optimization: MOTS",
//!   *Proceedings of the 13th International Conference on MCDM*.
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"

mod config;
mod front;
mod runner;

pub use config::{
    MaxPropagation, ParetoConfig, PropagationPolicy, PropagationPredicate, PropagationPriority,
};
pub use front::{dominance, dominates, Dominance, ParetoFront};
pub use runner::ParetoResult;
