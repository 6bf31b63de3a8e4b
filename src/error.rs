//! Error type shared by the search loops and the problem models.

use thiserror::Error;

/// Errors reported by the tabu search engine.
///
/// Configuration problems are detected before the first iteration runs.
/// Errors raised by problem code (initial construction, candidate
/// generation) are carried through unchanged in [`TabuError::Problem`].
#[derive(Debug, Error)]
pub enum TabuError {
    /// A search was started before any problem instance was loaded.
    #[error("no problem instance has been loaded")]
    ProblemNotLoaded,

    /// A neighborhood kind was used without `reset_tabu` having been called for it.
    #[error("tabu memory for neighborhood `{0}` has not been configured")]
    TabuNotConfigured(&'static str),

    /// Pareto front plotting was requested for a problem without exactly two objectives.
    #[error("cannot plot the Pareto front when the number of objectives is {0}, expected 2")]
    ParetoPlotDimension(usize),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The problem instance data is malformed.
    #[error("invalid problem instance: {0}")]
    InvalidProblem(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// An error raised by problem-specific code.
    #[error(transparent)]
    Problem(Box<dyn std::error::Error + Send + Sync>),
}

impl TabuError {
    /// Wraps an error raised by problem-specific code.
    pub fn problem<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Problem(err.into())
    }
}
