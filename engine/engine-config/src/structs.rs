//! Configuration struct definitions.

use crate::defaults;
use serde::Deserialize;

fn d_log_level() -> String {
    defaults::log_level().into()
}
fn d_batch_size() -> u32 {
    defaults::batch_size()
}
fn d_max_iterations() -> u64 {
    defaults::max_iterations()
}
fn d_seed() -> Option<u64> {
    defaults::seed()
}

/// Root configuration structure matching config.toml
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
pub struct CentralConfig {
    #[serde(default)]
    pub common: CommonConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Settings shared by every component
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CommonConfig {
    /// Fallback tracing filter when RUST_LOG is unset
    #[serde(default = "d_log_level")]
    pub log_level: String,
}

impl Default for CommonConfig {
    fn default() -> Self {
        Self {
            log_level: d_log_level(),
        }
    }
}

/// Evaluation scheduling
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    #[serde(default = "d_batch_size")]
    pub batch_size: u32,
    #[serde(default = "d_max_iterations")]
    pub max_iterations: u64,
    #[serde(default = "d_seed")]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            batch_size: d_batch_size(),
            max_iterations: d_max_iterations(),
            seed: d_seed(),
        }
    }
}
