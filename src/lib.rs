//! Problem-agnostic tabu search engine.
//!
//! The engine drives a user-supplied [`Solution`](tabu::Solution) type
//! through two search loops:
//!
//! - **Cost descent** ([`TabuSearch::run`](tabu::TabuSearch::run)): a single
//!   incumbent moves to the best non-tabu neighbor while that lowers its
//!   cost, with a random shuffle after a stretch of stagnation.
//! - **Pareto front** ([`TabuSearch::run_pareto`](tabu::TabuSearch::run_pareto)):
//!   a set of propagating solutions explores neighborhoods in parallel and
//!   feeds a front of mutually non-dominated solutions.
//!
//! Each neighborhood kind owns a bounded tabu list of recently applied move
//! keys. Tabu memory lives for one run only.
//!
//! # Modules
//!
//! - [`tabu`]: solution/neighborhood traits, tabu memory, single-objective loop
//! - [`pareto`]: dominance, front maintenance, propagation policy, multi-objective loop
//! - [`pool`]: worker pool for candidate evaluation
//! - [`objective`]: scalar and vector costs, cost-keyed identity
//! - [`tsp`]: traveling salesman models built on the engine
//! - [`error`]: error type shared by all modules

pub mod error;
pub mod objective;
pub mod pareto;
pub mod pool;
pub mod tabu;
pub mod tsp;
