//! Pareto dominance and non-dominated set maintenance.
//!
//! All objectives are **minimized**: lower values are better.

use std::fmt;

use crate::objective::Objective;
use crate::tabu::Solution;

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other (incomparable or equal).
    Neither,
}

/// Compares two cost vectors for Pareto dominance.
///
/// # Example
///
/// ```
/// use u_tabu::pareto::{dominance, Dominance};
///
/// assert_eq!(dominance(&[1.0, 2.0], &[2.0, 2.0]), Dominance::Left);
/// assert_eq!(dominance(&[1.0, 5.0], &[5.0, 1.0]), Dominance::Neither);
/// assert_eq!(dominance(&[3.0, 3.0], &[3.0, 3.0]), Dominance::Neither);
/// ```
pub fn dominance(a: &[f64], b: &[f64]) -> Dominance {
    debug_assert_eq!(a.len(), b.len(), "cost vectors must have the same length");
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// `true` iff every component of `a` is ≤ the one of `b` and at least one is <.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance(a, b) == Dominance::Left
}

/// A set of mutually non-dominated solutions.
///
/// Members keep their insertion order, which makes front evolution
/// deterministic for a fixed sequence of insertions. Two members never
/// share a cost: a candidate whose cost equals a member's is the same
/// entity and is rejected.
///
/// # Example
///
/// ```
/// use u_tabu::pareto::ParetoFront;
/// # use std::sync::Arc;
/// # use rand::Rng;
/// # use u_tabu::error::TabuError;
/// # use u_tabu::tabu::{Neighborhood, Solution};
/// # #[derive(Clone, Debug)]
/// # struct P(Vec<f64>);
/// # impl Solution for P {
/// #     type Problem = ();
/// #     type Cost = Vec<f64>;
/// #     fn initial(_: &Arc<()>) -> Result<Self, TabuError> { Ok(P(vec![0.0, 0.0])) }
/// #     fn cost(&self) -> Vec<f64> { self.0.clone() }
/// #     fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> { vec![] }
/// #     fn shuffle<R: Rng + ?Sized>(&self, _: &mut R) -> Self { self.clone() }
/// # }
///
/// let mut front = ParetoFront::new();
/// assert!(front.insert(P(vec![1.0, 5.0])));
/// assert!(front.insert(P(vec![5.0, 1.0])));
/// assert!(front.insert(P(vec![3.0, 3.0])));
/// assert!(front.insert(P(vec![2.0, 2.0]))); // removes (3, 3)
/// assert!(!front.insert(P(vec![4.0, 4.0])));
/// assert_eq!(front.len(), 3);
/// ```
#[derive(Clone)]
pub struct ParetoFront<S> {
    members: Vec<S>,
}

impl<S: Solution> fmt::Debug for ParetoFront<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.members.iter().map(|m| m.cost()))
            .finish()
    }
}

impl<S: Solution> Default for ParetoFront<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Solution> ParetoFront<S> {
    /// Creates an empty front.
    pub fn new() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    /// Attempts to add `candidate`.
    ///
    /// Returns `false` (front unchanged) if a member dominates the candidate
    /// or has the same cost. Otherwise removes every member the candidate
    /// dominates, adds it and returns `true`.
    pub fn insert(&mut self, candidate: S) -> bool {
        let cost = candidate.cost();
        for member in &self.members {
            let member_cost = member.cost();
            if member_cost.dominates(&cost) || member_cost.total_cmp(&cost).is_eq() {
                return false;
            }
        }
        self.members.retain(|member| !cost.dominates(&member.cost()));
        self.members.push(candidate);
        true
    }

    /// Whether some member dominates `cost`.
    pub fn is_dominated(&self, cost: &S::Cost) -> bool {
        self.members.iter().any(|m| m.cost().dominates(cost))
    }

    /// Whether some member has exactly this cost.
    pub fn contains_cost(&self, cost: &S::Cost) -> bool {
        self.members.iter().any(|m| m.cost().total_cmp(cost).is_eq())
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the front has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.members.iter()
    }

    /// Members as a slice.
    pub fn members(&self) -> &[S] {
        &self.members
    }

    /// Cost of every member, in insertion order.
    pub fn costs(&self) -> Vec<S::Cost> {
        self.members.iter().map(Solution::cost).collect()
    }

    /// Consumes the front, returning its members.
    pub fn into_vec(self) -> Vec<S> {
        self.members
    }
}

impl<S: Solution> FromIterator<S> for ParetoFront<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut front = Self::new();
        for s in iter {
            front.insert(s);
        }
        front
    }
}

impl<S: Solution> IntoIterator for ParetoFront<S> {
    type Item = S;
    type IntoIter = std::vec::IntoIter<S>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a, S: Solution> IntoIterator for &'a ParetoFront<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabuError;
    use crate::tabu::Neighborhood;
    use proptest::prelude::*;
    use rand::Rng;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    struct Costed(Vec<f64>);

    impl Solution for Costed {
        type Problem = ();
        type Cost = Vec<f64>;

        fn initial(_: &Arc<()>) -> Result<Self, TabuError> {
            Ok(Costed(vec![0.0, 0.0]))
        }
        fn cost(&self) -> Vec<f64> {
            self.0.clone()
        }
        fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
            vec![]
        }
        fn shuffle<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self {
            self.clone()
        }
    }

    fn c(a: f64, b: f64) -> Costed {
        Costed(vec![a, b])
    }

    // ---- Dominance ----

    #[test]
    fn test_dominance_cases() {
        assert_eq!(dominance(&[1.0, 1.0], &[2.0, 2.0]), Dominance::Left);
        assert_eq!(dominance(&[2.0, 2.0], &[1.0, 1.0]), Dominance::Right);
        assert_eq!(dominance(&[1.0, 3.0], &[3.0, 1.0]), Dominance::Neither);
        assert_eq!(dominance(&[1.0, 2.0], &[1.0, 2.0]), Dominance::Neither);
        assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
        assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
    }

    #[test]
    fn test_three_objectives() {
        assert_eq!(
            dominance(&[1.0, 5.0, 3.0], &[4.0, 4.0, 4.0]),
            Dominance::Neither
        );
        assert!(dominates(&[1.0, 1.0, 1.0], &[1.0, 1.0, 2.0]));
    }

    // ---- Front maintenance ----

    #[test]
    fn test_insertion_scenario() {
        let mut front = ParetoFront::new();
        assert!(front.insert(c(1.0, 5.0)));
        assert!(front.insert(c(5.0, 1.0)));
        assert!(front.insert(c(3.0, 3.0)));
        assert!(front.insert(c(2.0, 2.0)));

        assert_eq!(
            front.costs(),
            vec![vec![1.0, 5.0], vec![5.0, 1.0], vec![2.0, 2.0]]
        );
    }

    #[test]
    fn test_dominated_candidate_rejected() {
        let mut front = ParetoFront::new();
        front.insert(c(1.0, 1.0));
        assert!(!front.insert(c(2.0, 1.0)));
        assert!(front.is_dominated(&vec![2.0, 1.0]));
        assert_eq!(front.len(), 1);
    }

    #[test]
    fn test_equal_cost_rejected() {
        let mut front = ParetoFront::new();
        front.insert(c(1.0, 2.0));
        assert!(!front.insert(c(1.0, 2.0)));
        assert!(front.contains_cost(&vec![1.0, 2.0]));
        assert_eq!(front.len(), 1);
    }

    #[test]
    fn test_candidate_removes_all_dominated() {
        let mut front: ParetoFront<Costed> =
            vec![c(1.0, 9.0), c(4.0, 4.0), c(5.0, 3.0), c(9.0, 1.0)]
                .into_iter()
                .collect();
        assert_eq!(front.len(), 4);

        assert!(front.insert(c(3.0, 3.0)));
        assert_eq!(
            front.costs(),
            vec![vec![1.0, 9.0], vec![9.0, 1.0], vec![3.0, 3.0]]
        );
    }

    #[test]
    fn test_scalar_front_keeps_single_minimum() {
        #[derive(Debug, Clone)]
        struct Scalar(f64);

        impl Solution for Scalar {
            type Problem = ();
            type Cost = f64;

            fn initial(_: &Arc<()>) -> Result<Self, TabuError> {
                Ok(Scalar(0.0))
            }
            fn cost(&self) -> f64 {
                self.0
            }
            fn neighborhoods(&self) -> Vec<Box<dyn Neighborhood<Self>>> {
                vec![]
            }
            fn shuffle<R: Rng + ?Sized>(&self, _rng: &mut R) -> Self {
                self.clone()
            }
        }

        let front: ParetoFront<Scalar> =
            [5.0, 3.0, 4.0, 1.0, 2.0].map(Scalar).into_iter().collect();
        assert_eq!(front.costs(), vec![1.0]);
    }

    proptest! {
        #[test]
        fn prop_front_is_antichain(
            points in prop::collection::vec((0u8..12, 0u8..12, 0u8..12), 0..60),
        ) {
            let mut front = ParetoFront::new();
            let mut inserted = Vec::new();
            for &(a, b, d) in &points {
                let candidate = Costed(vec![a as f64, b as f64, d as f64]);
                inserted.push(candidate.0.clone());
                front.insert(candidate);
            }

            let costs = front.costs();
            for (i, x) in costs.iter().enumerate() {
                for (j, y) in costs.iter().enumerate() {
                    if i != j {
                        prop_assert!(!dominates(x, y));
                        prop_assert!(x != y);
                    }
                }
            }

            // Every inserted point is either on the front or dominated by it
            for p in &inserted {
                prop_assert!(front.contains_cost(p) || front.is_dominated(p));
            }
        }
    }
}
