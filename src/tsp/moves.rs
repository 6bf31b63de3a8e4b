//! Permutation moves on closed tours.
//!
//! City 0 stays at position 0, so every move acts on positions `1..n`.
//! Move keys name cities rather than positions, and undoing a move
//! produces the same key. A shift is keyed by the segment it moves alone,
//! so a recently shifted segment stays put until its key expires.

use std::fmt;

use super::path::PathSolution;
use crate::error::TabuError;
use crate::objective::Objective;
use crate::pool::WorkerPool;
use crate::tabu::{Neighborhood, TabuList, TabuMove};

/// Longest segment moved by [`PathMoveKind::SegmentShift`].
const MAX_SHIFT_LEN: usize = 3;

/// The three tour move kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathMoveKind {
    /// Exchange two cities.
    Swap,
    /// Cut a segment of up to three cities and reinsert it elsewhere.
    SegmentShift,
    /// Reverse the order of a segment (a 2-opt step).
    SegmentReverse,
}

impl PathMoveKind {
    /// Every kind, in enumeration order.
    pub const ALL: [PathMoveKind; 3] = [Self::Swap, Self::SegmentShift, Self::SegmentReverse];

    /// Tabu list name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::SegmentShift => "segment_shift",
            Self::SegmentReverse => "segment_reverse",
        }
    }
}

impl fmt::Display for PathMoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single move, described by tour positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathMove {
    /// Swap positions `i < j`.
    Swap { i: usize, j: usize },
    /// Move `path[start..start + len]` so that it begins at `to` in the result.
    Shift { start: usize, len: usize, to: usize },
    /// Reverse `path[i..=j]`.
    Reverse { i: usize, j: usize },
}

impl PathMove {
    /// Every move of `kind` on a tour of `n` cities, in a fixed order.
    pub(crate) fn enumerate(kind: PathMoveKind, n: usize) -> Vec<PathMove> {
        let mut moves = Vec::new();
        match kind {
            PathMoveKind::Swap => {
                for i in 1..n {
                    for j in (i + 1)..n {
                        moves.push(PathMove::Swap { i, j });
                    }
                }
            }
            PathMoveKind::SegmentShift => {
                for len in 1..=MAX_SHIFT_LEN.min(n.saturating_sub(2)) {
                    for start in 1..=(n - len) {
                        for to in 1..=(n - len) {
                            if to != start {
                                moves.push(PathMove::Shift { start, len, to });
                            }
                        }
                    }
                }
            }
            PathMoveKind::SegmentReverse => {
                for i in 1..n {
                    for j in (i + 1)..n {
                        moves.push(PathMove::Reverse { i, j });
                    }
                }
            }
        }
        moves
    }

    /// Tabu key of this move on `path`.
    pub(crate) fn key(&self, path: &[usize]) -> String {
        match *self {
            PathMove::Swap { i, j } => {
                let (a, b) = ordered(path[i], path[j]);
                format!("swap({a},{b})")
            }
            PathMove::Shift { start, len, .. } => {
                format!("shift({},{len})", path[start])
            }
            PathMove::Reverse { i, j } => {
                let (a, b) = ordered(path[i], path[j]);
                format!("reverse({a},{b})")
            }
        }
    }

    /// The tour reached by applying this move to `path`.
    pub(crate) fn apply(&self, path: &[usize]) -> Vec<usize> {
        let mut next = path.to_vec();
        match *self {
            PathMove::Swap { i, j } => next.swap(i, j),
            PathMove::Shift { start, len, to } => {
                let segment: Vec<usize> = next.drain(start..start + len).collect();
                next.splice(to..to, segment);
            }
            PathMove::Reverse { i, j } => next[i..=j].reverse(),
        }
        next
    }
}

fn ordered(a: usize, b: usize) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// One move kind bound to one tour.
///
/// [`generate`](Neighborhood::generate) builds every non-tabu candidate on
/// the calling thread. [`find_best_candidates`](Neighborhood::find_best_candidates)
/// builds and costs them on the worker pool and keeps only the candidates
/// no other candidate dominates, in enumeration order.
pub struct PathNeighborhood<S> {
    solution: S,
    kind: PathMoveKind,
}

impl<S: PathSolution> PathNeighborhood<S> {
    /// Binds `kind` to `solution`.
    pub fn new(solution: S, kind: PathMoveKind) -> Self {
        Self { solution, kind }
    }

    /// One neighborhood of every kind, bound to `solution`.
    pub fn all(solution: &S) -> Vec<Box<dyn Neighborhood<S>>> {
        PathMoveKind::ALL
            .into_iter()
            .map(|kind| Box::new(Self::new(solution.clone(), kind)) as Box<dyn Neighborhood<S>>)
            .collect()
    }

    /// Non-tabu moves paired with their keys.
    fn open_moves(&self, tabu: &TabuList) -> Vec<(PathMove, String)> {
        let path = self.solution.path();
        PathMove::enumerate(self.kind, path.len())
            .into_iter()
            .map(|mv| {
                let key = mv.key(path);
                (mv, key)
            })
            .filter(|(_, key)| !tabu.contains(key))
            .collect()
    }

    fn build(&self, mv: &PathMove, key: &str) -> Result<TabuMove<S>, TabuError> {
        let next = self.solution.with_path(mv.apply(self.solution.path()))?;
        Ok(TabuMove::new(next, key))
    }
}

impl<S: PathSolution> fmt::Debug for PathNeighborhood<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathNeighborhood")
            .field("kind", &self.kind)
            .field("path", &self.solution.path())
            .finish()
    }
}

impl<S: PathSolution> Neighborhood<S> for PathNeighborhood<S> {
    fn kind(&self) -> &'static str {
        self.kind.name()
    }

    fn generate(&self, tabu: &TabuList) -> Result<Vec<TabuMove<S>>, TabuError> {
        self.open_moves(tabu)
            .iter()
            .map(|(mv, key)| self.build(mv, key))
            .collect()
    }

    fn find_best_candidates(
        &self,
        pool: &WorkerPool,
        tabu: &TabuList,
    ) -> Result<Vec<TabuMove<S>>, TabuError> {
        let moves = self.open_moves(tabu);
        let evaluated = pool.try_map(&moves, |(mv, key)| {
            let candidate = self.build(mv, key)?;
            let cost = candidate.solution.cost();
            Ok::<_, TabuError>((candidate, cost))
        })?;
        Ok(non_dominated(evaluated))
    }
}

/// Candidates no other candidate dominates, in their original order.
///
/// Of several candidates with the same cost only the first is kept.
fn non_dominated<S, C: Objective>(evaluated: Vec<(TabuMove<S>, C)>) -> Vec<TabuMove<S>> {
    let mut kept: Vec<(TabuMove<S>, C)> = Vec::new();
    for (candidate, cost) in evaluated {
        if kept
            .iter()
            .any(|(_, c)| c.dominates(&cost) || c.total_cmp(&cost).is_eq())
        {
            continue;
        }
        kept.retain(|(_, c)| !cost.dominates(c));
        kept.push((candidate, cost));
    }
    kept.into_iter().map(|(candidate, _)| candidate).collect()
}
