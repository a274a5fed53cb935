//! MCTS configuration parameters.

/// Configuration for an incremental Monte Carlo Tree Search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MctsConfig {
    /// Iterations run between two suspension points.
    /// Smaller batches react to position changes sooner but yield more often.
    pub batch_size: u32,

    /// Upper bound on iterations for one evaluation. The search stops once
    /// this many iterations have been run against the same root.
    pub max_iterations: u64,

    /// Seed for the playout RNG. `None` seeds from OS entropy, so results
    /// are not reproducible.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_iterations: 1_000_000,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Create a fast, deterministic config for testing.
    pub fn for_testing() -> Self {
        Self {
            batch_size: 50,
            max_iterations: 500,
            seed: Some(42),
        }
    }

    /// Builder pattern: set iterations per batch.
    pub fn with_batch_size(mut self, n: u32) -> Self {
        self.batch_size = n;
        self
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = n;
        self
    }

    /// Builder pattern: set (or clear) the RNG seed.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.max_iterations, 1_000_000);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = MctsConfig::default()
            .with_batch_size(100)
            .with_max_iterations(2_000)
            .with_seed(Some(7));

        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_iterations, 2_000);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_testing_config_is_seeded() {
        let config = MctsConfig::for_testing();
        assert!(config.seed.is_some());
        assert!(config.batch_size as u64 <= config.max_iterations);
    }
}
