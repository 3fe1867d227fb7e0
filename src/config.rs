// =====================================================================
// File: config.rs
//
// Description:
//   Construction-time settings for both index trees. A tree is built
//   from a `TreeConfig`, which carries the minimum degree `t` and the
//   per-node Bloom filter sizing used by the filtered B-tree.
//
// Notes:
//   * Configs are plain data and derive serde so the demo driver can
//     read them from a JSON file.
//   * Bad settings are reported as `ConfigError` by `validate`.
// =====================================================================
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit length used for each node's filter when nothing else is given.
pub const DEFAULT_FILTER_BITS: usize = 1000;
/// Probe count used for each node's filter when nothing else is given.
pub const DEFAULT_FILTER_PROBES: u32 = 3;
/// Smallest legal minimum degree.
pub const MIN_DEGREE_FLOOR: usize = 2;


/// Reasons a configuration is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `t` was below 2.
    MinDegreeTooSmall(usize),
    /// `2t` does not fit in a `usize`, so node capacity cannot be computed.
    MinDegreeTooLarge(usize),
    /// Filter bit array length was zero.
    EmptyFilter,
    /// Filter probe count was zero.
    NoProbes,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MinDegreeTooSmall(t) => {
                write!(f, "B-tree minimum degree t must be >= {} (got {})", MIN_DEGREE_FLOOR, t)
            }
            ConfigError::MinDegreeTooLarge(t) => {
                write!(f, "B-tree minimum degree t is too large (got {}, 2t overflows)", t)
            }
            ConfigError::EmptyFilter => write!(f, "filter bit length m must be > 0"),
            ConfigError::NoProbes => write!(f, "filter probe count k must be > 0"),
        }
    }
}

impl std::error::Error for ConfigError {}


/// Sizing of a membership filter: `bits` is `m`, `probes` is `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub bits: usize,
    pub probes: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bits: DEFAULT_FILTER_BITS,
            probes: DEFAULT_FILTER_PROBES,
        }
    }
}

impl FilterConfig {
    pub fn new(bits: usize, probes: u32) -> Self {
        Self { bits, probes }
    }

    /// Checks that the filter can hold at least one bit and probes it at least once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bits == 0 {
            return Err(ConfigError::EmptyFilter);
        }
        if self.probes == 0 {
            return Err(ConfigError::NoProbes);
        }
        Ok(())
    }
}


/// Settings shared by both trees.
///
/// `filter` is only read by [`FilteredBTree`](crate::FilteredBTree); the
/// [`BPlusTree`](crate::BPlusTree) ignores it but still validates it so one
/// config value can drive either tree.
///
/// # Example
/// ```
/// use btree_index::TreeConfig;
/// let cfg = TreeConfig::with_degree(3);
/// assert!(cfg.validate().is_ok());
/// assert!(TreeConfig::with_degree(1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeConfig {
    pub min_degree: usize,
    #[serde(default)]
    pub filter: FilterConfig,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            min_degree: MIN_DEGREE_FLOOR,
            filter: FilterConfig::default(),
        }
    }
}

impl TreeConfig {
    /// Config with the given `t` and the default filter sizing.
    pub fn with_degree(min_degree: usize) -> Self {
        Self {
            min_degree,
            ..Self::default()
        }
    }

    /// Replace the filter sizing.
    pub fn filter(mut self, bits: usize, probes: u32) -> Self {
        self.filter = FilterConfig::new(bits, probes);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_degree < MIN_DEGREE_FLOOR {
            return Err(ConfigError::MinDegreeTooSmall(self.min_degree));
        }
        if self.min_degree.checked_mul(2).is_none() {
            return Err(ConfigError::MinDegreeTooLarge(self.min_degree));
        }
        self.filter.validate()
    }

    /// Most keys a node may hold: `2t - 1`.
    pub fn max_keys(&self) -> usize {
        2 * self.min_degree - 1
    }

    /// Fewest keys a non-root node may hold: `t - 1`.
    pub fn min_keys(&self) -> usize {
        self.min_degree - 1
    }
}
