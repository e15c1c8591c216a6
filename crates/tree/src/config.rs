//! Tree index configuration.

use crate::error::{TreeError, TreeResult};
use serde::{Deserialize, Serialize};

/// Construction parameters shared by the KD-tree and the RP-tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Maximum number of points a leaf bucket may hold.
    /// Recursion stops once a slice fits in one leaf. Default: 100
    pub leaf_cap: usize,

    /// Seed for the split-direction generator (used by the RP-tree).
    /// Default: 42
    pub seed: u64,
}

impl TreeConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            leaf_cap: 100,
            seed: 42,
        }
    }

    /// Set the leaf bucket capacity.
    pub fn with_leaf_cap(mut self, leaf_cap: usize) -> Self {
        self.leaf_cap = leaf_cap;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration.
    pub fn validate(&self) -> TreeResult<()> {
        if self.leaf_cap == 0 {
            return Err(TreeError::InvalidParams("leaf_cap must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.leaf_cap, 100);
        assert_eq!(config.seed, 42);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let config = TreeConfig::new().with_leaf_cap(0);
        assert!(config.validate().is_err());
    }
}
