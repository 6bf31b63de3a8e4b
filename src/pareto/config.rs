//! Multi-objective search configuration.

use std::fmt;

use super::front::ParetoFront;
use crate::error::TabuError;
use crate::tabu::{Solution, TabuConfig};

/// Predicate deciding whether a candidate that was not added to the front
/// still propagates. Must not mutate the front.
pub type PropagationPredicate<S> = Box<dyn Fn(&ParetoFront<S>, &S) -> bool + Send + Sync>;

/// Priority of a propagating candidate; lower propagates first.
pub type PropagationPriority<S> = Box<dyn Fn(&ParetoFront<S>, &S) -> f64 + Send + Sync>;

/// Cap on the number of candidates propagating per iteration.
pub enum MaxPropagation<S> {
    /// A fixed count.
    Fixed(usize),
    /// A count computed from the current front, once per iteration.
    Dynamic(Box<dyn Fn(&ParetoFront<S>) -> usize + Send + Sync>),
}

impl<S: Solution> MaxPropagation<S> {
    /// Resolves the cap against the current front.
    pub fn resolve(&self, front: &ParetoFront<S>) -> usize {
        match self {
            Self::Fixed(n) => *n,
            Self::Dynamic(f) => f(front),
        }
    }
}

impl<S> fmt::Debug for MaxPropagation<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => f.debug_tuple("Fixed").field(n).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Which candidates seed the next iteration.
///
/// Candidates added to the front always propagate. Others propagate when
/// `predicate` holds. The list is then sorted by `priority` (stable,
/// ascending) and truncated to `max_propagation`.
pub struct PropagationPolicy<S> {
    /// Extra propagation test for candidates not added to the front.
    pub predicate: PropagationPredicate<S>,
    /// Sort key for the propagation list.
    pub priority: PropagationPriority<S>,
    /// Optional cap on the propagation list.
    pub max_propagation: Option<MaxPropagation<S>>,
}

impl<S: Solution> Default for PropagationPolicy<S> {
    fn default() -> Self {
        Self {
            predicate: Box::new(|_: &ParetoFront<S>, _: &S| true),
            priority: Box::new(|_: &ParetoFront<S>, _: &S| 0.0),
            max_propagation: None,
        }
    }
}

impl<S> fmt::Debug for PropagationPolicy<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropagationPolicy")
            .field("max_propagation", &self.max_propagation)
            .finish_non_exhaustive()
    }
}

/// Configuration for the Pareto-front tabu search.
///
/// # Examples
///
/// ```
/// use u_tabu::pareto::ParetoConfig;
/// use u_tabu::tabu::{Solution, TabuConfig};
/// use u_tabu::tsp::BiObjectivePath;
///
/// let config = ParetoConfig::<BiObjectivePath>::new(
///     TabuConfig::default().with_iterations(100).with_pool_size(2),
/// )
/// .with_predicate(|front, candidate| !front.is_dominated(&candidate.cost()))
/// .with_max_propagation(5)
/// .with_plot_pareto_front(true);
/// assert!(config.plot_pareto_front);
/// ```
#[derive(Debug)]
pub struct ParetoConfig<S> {
    /// Iterations, pool width, stagnation shuffle, progress and seed.
    pub search: TabuConfig,
    /// Propagation control.
    pub propagation: PropagationPolicy<S>,
    /// Collect every candidate cost for a 2-objective scatter plot.
    ///
    /// Requires exactly two cost components.
    pub plot_pareto_front: bool,
}

impl<S: Solution> Default for ParetoConfig<S> {
    fn default() -> Self {
        Self::new(TabuConfig::default())
    }
}

impl<S: Solution> ParetoConfig<S> {
    /// Creates a configuration with the default propagation policy.
    pub fn new(search: TabuConfig) -> Self {
        Self {
            search,
            propagation: PropagationPolicy::default(),
            plot_pareto_front: false,
        }
    }

    /// Sets the propagation predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&ParetoFront<S>, &S) -> bool + Send + Sync + 'static,
    {
        self.propagation.predicate = Box::new(predicate);
        self
    }

    /// Sets the propagation priority key.
    pub fn with_priority<F>(mut self, priority: F) -> Self
    where
        F: Fn(&ParetoFront<S>, &S) -> f64 + Send + Sync + 'static,
    {
        self.propagation.priority = Box::new(priority);
        self
    }

    /// Caps propagation at a fixed count per iteration.
    pub fn with_max_propagation(mut self, n: usize) -> Self {
        self.propagation.max_propagation = Some(MaxPropagation::Fixed(n));
        self
    }

    /// Caps propagation at a count computed from the front each iteration.
    pub fn with_max_propagation_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ParetoFront<S>) -> usize + Send + Sync + 'static,
    {
        self.propagation.max_propagation = Some(MaxPropagation::Dynamic(Box::new(f)));
        self
    }

    /// Enables or disables candidate cost collection for plotting.
    pub fn with_plot_pareto_front(mut self, plot: bool) -> Self {
        self.plot_pareto_front = plot;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TabuError> {
        self.search.validate()
    }
}
