//! Validator configuration.

use crate::combinators::{DEFAULT_BATCH_SIZE, DEFAULT_CACHE_CAPACITY, sequence_batched};
use crate::error::{Error, Result};
use crate::node::{Node, Output};
use serde::{Deserialize, Serialize};

/// Tunables shared by the nodes an application builds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Items a sequence evaluates concurrently
    pub batch_size: usize,
    /// Outcomes a cached node keeps
    pub cache_capacity: u64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl ValidatorConfig {
    /// Reads `FORMGUARD_BATCH_SIZE` and `FORMGUARD_CACHE_CAPACITY`, keeping
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var("FORMGUARD_BATCH_SIZE") {
            config.batch_size = parse_var("FORMGUARD_BATCH_SIZE", &raw)?;
        }
        if let Ok(raw) = std::env::var("FORMGUARD_CACHE_CAPACITY") {
            config.cache_capacity = parse_var("FORMGUARD_CACHE_CAPACITY", &raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Configuration(
                "batch_size must be at least 1".to_owned(),
            ));
        }
        if self.cache_capacity == 0 {
            return Err(Error::Configuration(
                "cache_capacity must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// A sequence node using the configured batch size.
    pub fn sequence<T: Output>(&self, item: Node<T>) -> Result<Node<Vec<T>>> {
        sequence_batched(item, self.batch_size)
    }

    /// `node` with a cache of the configured capacity.
    pub fn cache<T: Output>(&self, node: &Node<T>) -> Node<T> {
        node.cached_with_capacity(self.cache_capacity)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{name} must be a positive integer, got '{raw}'")))
}
