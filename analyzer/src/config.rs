//! Configuration for the analyzer binary
//!
//! Defaults come from engine-config (config.toml plus FOURSIGHT_* overrides).
//! CLI arguments take highest priority.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use engine_config::{load_config, CentralConfig};
use games_connect4::Board;
use mcts::MctsConfig;
use once_cell::sync::Lazy;
use tracing::level_filters::LevelFilter;

// Load central config once at startup
static CENTRAL_CONFIG: Lazy<CentralConfig> = Lazy::new(load_config);

fn default_batch_size() -> u32 {
    CENTRAL_CONFIG.search.batch_size
}

fn default_max_iterations() -> u64 {
    CENTRAL_CONFIG.search.max_iterations
}

fn default_log_level() -> String {
    CENTRAL_CONFIG.common.log_level.clone()
}

#[derive(Parser, Debug, Clone)]
#[command(name = "analyzer")]
#[command(about = "Estimate win probabilities for every column of a Connect Four position")]
#[command(
    long_about = "Runs Monte Carlo Tree Search on a Connect Four position and prints
per-column win probabilities after every batch. Press Ctrl-C to abandon the
evaluation at the next batch boundary.

Configuration is loaded from config.toml with FOURSIGHT_* environment variable
overrides. CLI arguments take highest priority."
)]
pub struct Config {
    /// Moves played so far, one column digit (0-6) per disc, e.g. 3342
    #[arg(long, default_value = "")]
    pub moves: String,

    /// Iterations per batch (between staleness checks)
    #[arg(long, default_value_t = default_batch_size())]
    pub batch_size: u32,

    /// Iteration budget for the whole evaluation
    #[arg(long, default_value_t = default_max_iterations())]
    pub max_iterations: u64,

    /// Playout seed for reproducible output (unset: OS entropy)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value_t = default_log_level())]
    pub log_level: String,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(anyhow!("batch_size must be greater than 0"));
        }

        if self.max_iterations == 0 {
            return Err(anyhow!("max_iterations must be greater than 0"));
        }

        if self.log_level.parse::<LevelFilter>().is_err() {
            return Err(anyhow!(
                "invalid log level '{}', expected one of trace, debug, info, warn, error",
                self.log_level
            ));
        }

        self.board()?;
        Ok(())
    }

    /// Position reached by playing `moves` from the empty board.
    pub fn board(&self) -> Result<Board> {
        self.moves
            .parse::<Board>()
            .with_context(|| format!("invalid move sequence '{}'", self.moves))
    }

    /// Search settings. A seed given on the command line wins over the configured one.
    pub fn mcts_config(&self) -> MctsConfig {
        MctsConfig::default()
            .with_batch_size(self.batch_size)
            .with_max_iterations(self.max_iterations)
            .with_seed(self.seed.or(CENTRAL_CONFIG.search.seed))
    }
}
