//! Fixed-width worker pool for candidate evaluation.
//!
//! Units of work are independent and side-effect free: each receives a
//! shared reference to its input and returns a fully built result. The
//! coordinating thread blocks until a whole batch has completed, and
//! results come back in input order no matter how workers were scheduled.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::TabuError;

/// A pool of `size` worker threads held for the duration of a run.
///
/// Dropping the pool signals its threads to terminate once they run out of
/// work; it does not wait for them to exit.
///
/// # Examples
///
/// ```
/// use u_tabu::pool::WorkerPool;
///
/// let pool = WorkerPool::new(2).unwrap();
/// let squares = pool.map(&[1, 2, 3], |x| x * x);
/// assert_eq!(squares, vec![1, 4, 9]);
/// assert_eq!(pool.in_flight(), 0);
/// ```
pub struct WorkerPool {
    pool: ThreadPool,
    size: usize,
    in_flight: AtomicUsize,
}

impl fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

/// Decrements the in-flight counter when a unit finishes, even by panic.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl WorkerPool {
    /// Builds a pool with `size` worker threads.
    pub fn new(size: usize) -> Result<Self, TabuError> {
        if size == 0 {
            return Err(TabuError::InvalidConfig(
                "pool_size must be at least 1".into(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(size)
            .thread_name(|i| format!("u-tabu-worker-{i}"))
            .build()?;
        tracing::debug!(size, "worker pool started");
        Ok(Self {
            pool,
            size,
            in_flight: AtomicUsize::new(0),
        })
    }

    /// Number of worker threads.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Units of work currently executing. Zero whenever no batch is running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Applies `f` to every item in parallel, preserving input order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Send + Sync,
    {
        let counter = &self.in_flight;
        self.pool.install(|| {
            items
                .par_iter()
                .map(|item| {
                    let _unit = InFlight::enter(counter);
                    f(item)
                })
                .collect()
        })
    }

    /// Like [`map`](Self::map) for fallible work; the first error (in input
    /// order) is returned.
    pub fn try_map<T, R, E, F>(&self, items: &[T], f: F) -> Result<Vec<R>, E>
    where
        T: Sync,
        R: Send,
        E: Send,
        F: Fn(&T) -> Result<R, E> + Send + Sync,
    {
        self.map(items, f).into_iter().collect()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        tracing::debug!(size = self.size, "worker pool dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            WorkerPool::new(0),
            Err(TabuError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_map_preserves_order() {
        let pool = WorkerPool::new(4).unwrap();
        let items: Vec<usize> = (0..200).collect();
        let doubled = pool.map(&items, |&x| x * 2);
        assert_eq!(doubled, items.iter().map(|x| x * 2).collect::<Vec<_>>());
        assert_eq!(pool.size(), 4);
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_try_map_returns_first_error() {
        let pool = WorkerPool::new(2).unwrap();
        let result: Result<Vec<i32>, String> = pool.try_map(&[1, -2, 3, -4], |&x| {
            if x < 0 {
                Err(format!("negative {x}"))
            } else {
                Ok(x)
            }
        });
        assert_eq!(result, Err("negative -2".to_string()));
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_in_flight_counts_running_units() {
        let pool = WorkerPool::new(2).unwrap();
        let seen = pool.map(&[(); 8], |_| pool.in_flight());
        assert!(seen.iter().all(|&n| (1..=8).contains(&n)));
        assert_eq!(pool.in_flight(), 0);
    }
}
