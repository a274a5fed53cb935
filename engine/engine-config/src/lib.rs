//! Centralized configuration loading from config.toml.
//!
//! This crate provides the configuration structs and loading logic used by
//! the `analyzer` binary.
//!
//! # Configuration Priority
//!
//! Settings are loaded with the following priority (highest to lowest):
//! 1. Environment variables (`FOURSIGHT_<SECTION>_<KEY>`)
//! 2. config.toml file
//! 3. Built-in defaults (config.defaults.toml, embedded at compile time)
//!
//! Command-line flags sit above all of these but are applied by the binary.
//!
//! # Environment Variable Override Pattern
//!
//! ```text
//! FOURSIGHT_<SECTION>_<KEY>=value
//!
//! Examples:
//!     FOURSIGHT_COMMON_LOG_LEVEL=debug
//!     FOURSIGHT_SEARCH_BATCH_SIZE=250
//!     FOURSIGHT_SEARCH_MAX_ITERATIONS=20000
//!     FOURSIGHT_SEARCH_SEED=7
//! ```

mod defaults;
mod loader;
mod structs;

pub use defaults::*;
pub use loader::{apply_env_overrides, load_config, load_from_path, CONFIG_SEARCH_PATHS};
pub use structs::*;
