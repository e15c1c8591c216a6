//! HNSW configuration.

use crate::error::{HnswError, HnswResult};
use serde::{Deserialize, Serialize};

/// Configuration for HNSW index construction and search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Soft neighbor cap used by the descent search.
    /// Typical range: 12-48, default: 16
    pub m: usize,

    /// Hard neighbor cap per node at layers > 0. Usually M.
    pub max_m: usize,

    /// Hard neighbor cap per node at layer 0. Usually 2 * M.
    pub max_m0: usize,

    /// Size of the candidate set during construction.
    /// Higher values = better graph quality but slower builds. Default: 200
    pub ef_construction: usize,

    /// Normalization factor for the exponential layer draw.
    /// Default: 1 / ln(2)
    pub ml: f64,

    /// Seed for the layer-assignment generator. Default: 42
    pub seed: u64,
}

impl HnswConfig {
    /// Create a config with default values for the given M.
    pub fn new(m: usize) -> Self {
        Self {
            m,
            max_m: m,
            max_m0: m * 2,
            ef_construction: 200,
            ml: 1.0 / std::f64::consts::LN_2,
            seed: 42,
        }
    }

    /// Set ef_construction.
    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Hard neighbor cap for a given layer.
    pub fn max_connections(&self, layer: usize) -> usize {
        if layer == 0 {
            self.max_m0
        } else {
            self.max_m
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> HnswResult<()> {
        if self.m == 0 {
            return Err(HnswError::InvalidParams("M must be > 0".into()));
        }
        if self.ef_construction == 0 {
            return Err(HnswError::InvalidParams(
                "ef_construction must be > 0".into(),
            ));
        }
        if !self.ml.is_finite() || self.ml <= 0.0 {
            return Err(HnswError::InvalidParams("ml must be positive".into()));
        }
        Ok(())
    }
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self::new(16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HnswConfig::default();
        assert_eq!(config.m, 16);
        assert_eq!(config.max_m, 16);
        assert_eq!(config.max_m0, 32);
        assert_eq!(config.ef_construction, 200);
        assert!((config.ml - 1.442695).abs() < 1e-5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layer_caps() {
        let config = HnswConfig::new(8);
        assert_eq!(config.max_connections(0), 16);
        assert_eq!(config.max_connections(1), 8);
        assert_eq!(config.max_connections(5), 8);
    }

    #[test]
    fn test_validation() {
        assert!(HnswConfig::new(0).validate().is_err());
        assert!(HnswConfig::new(16)
            .with_ef_construction(0)
            .validate()
            .is_err());
    }
}
