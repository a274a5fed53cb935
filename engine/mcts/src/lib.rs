//! Monte Carlo Tree Search (MCTS) for Connect Four.
//!
//! This crate evaluates a [`Board`](games_connect4::Board) with plain UCB1
//! search and uniform random playouts, and schedules that search in batches
//! that stop as soon as the position they were started for goes stale.
//!
//! # Overview
//!
//! Each iteration runs four phases:
//!
//! 1. **Selection**: Descend fully expanded nodes by UCB1 score
//! 2. **Expansion**: Add one child for an untried column
//! 3. **Simulation**: Play uniformly random moves to the end of the game
//! 4. **Backpropagation**: Update visits and wins along the path to the root
//!
//! # Usage
//!
//! ```rust,ignore
//! use games_connect4::Board;
//! use mcts::{LivePosition, MctsConfig};
//!
//! let live = LivePosition::new("3342".parse()?);
//! let config = MctsConfig::default().with_seed(Some(7));
//!
//! let summary = live
//!     .evaluate(&config)
//!     .run(|estimates| {
//!         for e in estimates {
//!             println!("column {}: {:.3}", e.column, e.win_probability);
//!         }
//!     })
//!     .await?;
//! println!("stopped: {:?}", summary.termination);
//! ```
//!
//! # Configuration
//!
//! [`MctsConfig`] controls scheduling:
//!
//! - `batch_size`: Iterations between staleness checks (default: 1000)
//! - `max_iterations`: Budget for one evaluation (default: 1,000,000)
//! - `seed`: Fixed playout seed, or None for OS entropy
//!
//! # Architecture
//!
//! ```text
//! LivePosition ──(snapshot, version)──► Evaluation
//!                                          │ batch, yield, check version
//!                                          ▼
//!                                      MctsSearch ──► SearchTree (arena)
//!                                          │
//!                                          ▼
//!                                   run_random_playout
//! ```

pub mod config;
pub mod node;
pub mod playout;
pub mod scheduler;
pub mod search;
pub mod tree;

// Re-export main types
pub use config::MctsConfig;
pub use node::{NodeId, SearchNode, EXPLORATION_CONSTANT};
pub use playout::{run_random_playout, Playout};
pub use scheduler::{Evaluation, EvaluationSummary, LivePosition, PositionVersion, Termination};
pub use search::{run_mcts, MctsSearch, SearchError, SearchResult, SearchStats};
pub use tree::{MoveEstimate, SearchTree, TreeStats};
