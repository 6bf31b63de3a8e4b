//! Cost values and cost-keyed solution identity.
//!
//! The engine handles two cost shapes through one trait:
//!
//! - `f64`: a single scalar cost, compared by value.
//! - `Vec<f64>`: a fixed-length cost vector, compared by Pareto dominance.
//!
//! Solutions are identified by their cost, never by their representation.
//! [`ByCost`] makes that explicit: two structurally different solutions
//! with equal cost are the same entity for ordering, equality and hashing.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::pareto::dominates;
use crate::tabu::Solution;

/// A cost value the search loops can compare.
///
/// All objectives are minimized.
pub trait Objective: Clone + fmt::Debug + Send + Sync + 'static {
    /// Number of cost components (1 for a scalar cost).
    fn dimension(&self) -> usize;

    /// Cost components as a flat vector, for reporting and plotting.
    fn components(&self) -> Vec<f64>;

    /// Whether `self` is strictly better than `other`.
    ///
    /// For scalars this is `<`. For vectors it is Pareto dominance: no
    /// component worse and at least one strictly better.
    fn dominates(&self, other: &Self) -> bool;

    /// Total order used for tie-breaking, `min` and equality.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Feeds the cost into a hasher, consistent with [`total_cmp`](Objective::total_cmp).
    fn hash_into<H: Hasher>(&self, state: &mut H);
}

impl Objective for f64 {
    fn dimension(&self) -> usize {
        1
    }

    fn components(&self) -> Vec<f64> {
        vec![*self]
    }

    fn dominates(&self, other: &Self) -> bool {
        self < other
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        f64::total_cmp(self, other)
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl Objective for Vec<f64> {
    fn dimension(&self) -> usize {
        self.len()
    }

    fn components(&self) -> Vec<f64> {
        self.clone()
    }

    fn dominates(&self, other: &Self) -> bool {
        dominates(self, other)
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.total_cmp(b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.len().cmp(&other.len())
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for v in self {
            v.to_bits().hash(state);
        }
    }
}

/// A solution whose identity is its cost.
///
/// `Eq`, `Ord` and `Hash` all go through [`Solution::cost`], so set
/// membership, `min` and sorting treat cost-equal solutions as one.
///
/// The search loops compare costs through [`Objective`] directly; this
/// wrapper is for caller code that wants the same identity in std
/// collections, e.g. deduplicating the solutions of several runs or
/// sorting a front.
///
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use u_tabu::objective::ByCost;
/// use u_tabu::tsp::{DistanceMatrix, TspPath, TspProblem};
/// use std::sync::Arc;
///
/// let dm = DistanceMatrix::from_rows(vec![
///     vec![0.0, 1.0, 1.0],
///     vec![1.0, 0.0, 1.0],
///     vec![1.0, 1.0, 0.0],
/// ]).unwrap();
/// let problem = Arc::new(TspProblem::new(dm));
/// let a = TspPath::new(&problem, vec![0, 1, 2]).unwrap();
/// let b = TspPath::new(&problem, vec![0, 2, 1]).unwrap();
///
/// let mut set = HashSet::new();
/// set.insert(ByCost(a));
/// assert!(!set.insert(ByCost(b))); // same cost, same entity
/// ```
#[derive(Clone)]
pub struct ByCost<S>(pub S);

impl<S: Solution> ByCost<S> {
    /// Unwraps the solution.
    pub fn into_inner(self) -> S {
        self.0
    }
}

impl<S: Solution> fmt::Debug for ByCost<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ByCost").field(&self.0.cost()).finish()
    }
}

impl<S: Solution> PartialEq for ByCost<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S: Solution> Eq for ByCost<S> {}

impl<S: Solution> PartialOrd for ByCost<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Solution> Ord for ByCost<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cost().total_cmp(&other.0.cost())
    }
}

impl<S: Solution> Hash for ByCost<S> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.cost().hash_into(state);
    }
}
