//! Tabu Search (TS).
//!
//! A trajectory metaheuristic that uses memory structures (the tabu list)
//! to forbid recently applied moves, preventing cycling and encouraging
//! exploration of new regions of the search space.
//!
//! # Core Traits
//!
//! - [`Solution`]: a value with a cost, its neighborhoods, an initial
//!   constructor, a shuffle and a post-optimization hook
//! - [`Neighborhood`]: one move kind bound to one solution; filters moves
//!   through the tabu list of its kind
//!
//! # Key Types
//!
//! - [`TabuSearch`]: session holding the problem and tabu capacities; runs
//!   the single-objective loop here and the Pareto loop in [`crate::pareto`]
//! - [`TabuList`] / [`TabuMemory`]: bounded FIFO move memory, one list per kind
//!
//! # References
//!
//! - Glover, F. (1989). "Tabu Search—Part I", *ORSA Journal on Computing* 1(3), 190-206.
//! - Glover, F. (1990). "Tabu Search—Part II", *ORSA Journal on Computing* 2(1), 4-32.

mod config;
mod memory;
mod runner;
mod types;

pub use config::TabuConfig;
pub use memory::{TabuList, TabuMemory};
pub use runner::{SearchStatus, TabuResult, TabuSearch};
pub use types::{Neighborhood, Solution, TabuMove};

pub(crate) use runner::{create_rng, is_cancelled};
