//! Tabu Search configuration.

use crate::error::TabuError;

/// Configuration parameters shared by both search loops.
///
/// # Examples
///
/// ```
/// use u_tabu::tabu::TabuConfig;
///
/// let config = TabuConfig::default()
///     .with_iterations(1000)
///     .with_shuffle_after(20)
///     .with_pool_size(4)
///     .with_seed(7);
/// assert_eq!(config.iterations, 1000);
/// assert_eq!(config.shuffle_after, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TabuConfig {
    /// Maximum number of iterations.
    pub iterations: usize,
    /// Consecutive non-improving iterations before the incumbent is
    /// shuffled. `0` disables shuffling.
    pub shuffle_after: usize,
    /// Width of the worker pool.
    pub pool_size: usize,
    /// Whether to report per-iteration progress at `info` level.
    pub progress: bool,
    /// Random seed (None for random).
    pub seed: Option<u64>,
}

impl Default for TabuConfig {
    fn default() -> Self {
        Self {
            iterations: 500,
            shuffle_after: 10,
            pool_size: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            progress: false,
            seed: None,
        }
    }
}

impl TabuConfig {
    /// Sets the maximum number of iterations.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Sets the stagnation length that triggers a shuffle (0 to disable).
    pub fn with_shuffle_after(mut self, n: usize) -> Self {
        self.shuffle_after = n;
        self
    }

    /// Sets the worker pool width.
    pub fn with_pool_size(mut self, n: usize) -> Self {
        self.pool_size = n;
        self
    }

    /// Enables or disables progress reporting.
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), TabuError> {
        if self.pool_size == 0 {
            return Err(TabuError::InvalidConfig(
                "pool_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = TabuConfig::default();
        assert_eq!(config.iterations, 500);
        assert_eq!(config.shuffle_after, 10);
        assert!(config.pool_size >= 1);
        assert!(!config.progress);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = TabuConfig::default()
            .with_iterations(50)
            .with_shuffle_after(0)
            .with_pool_size(2)
            .with_progress(true)
            .with_seed(123);

        assert_eq!(config.iterations, 50);
        assert_eq!(config.shuffle_after, 0);
        assert_eq!(config.pool_size, 2);
        assert!(config.progress);
        assert_eq!(config.seed, Some(123));
    }

    #[test]
    fn test_validate_zero_pool() {
        let config = TabuConfig::default().with_pool_size(0);
        assert!(matches!(config.validate(), Err(TabuError::InvalidConfig(_))));
    }
}
