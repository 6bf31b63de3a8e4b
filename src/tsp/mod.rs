//! Traveling salesman models for the search engine.
//!
//! A ready-made problem family that exercises both search loops:
//!
//! - [`TspPath`]: single-objective tour, nearest-neighbour start, 2-opt
//!   post-optimization
//! - [`BiObjectivePath`]: tour scored on two distance matrices, for the
//!   Pareto-front search
//!
//! Both expose the three [`PathMoveKind`]s through [`PathNeighborhood`];
//! configure one tabu list per [`PathMoveKind::name`] before running.
//!
//! Distances built from coordinates are rounded to integers.
//!
//! # References
//!
//! - Croes, G.A. (1958). "A Method for Solving Traveling-Salesman Problems",
//!   *Operations Research* 6(6).
//! - Or, I. (1976). *Traveling Salesman-Type Combinatorial Problems and Their
//!   Relation to the Logistics of Regional Blood Banking*. PhD thesis.

mod moves;
mod path;
mod problem;

pub use moves::{PathMoveKind, PathNeighborhood};
pub use path::{BiObjectivePath, PathReport, PathSolution, TspPath};
pub use problem::{BiObjectiveProblem, DistanceMatrix, DistanceMetric, TspProblem};
