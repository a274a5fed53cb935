//! MCTS search implementation.
//!
//! Implements the core MCTS algorithm:
//! 1. Selection: Descend fully expanded nodes using UCB1
//! 2. Expansion: Add one child for an untried move
//! 3. Simulation: Resolve cached terminals, otherwise play a random game
//! 4. Backpropagation: Update visits and wins along the path to the root
//!
//! The search is incremental: every call to [`MctsSearch::run_batch`] keeps
//! refining the same tree, so statistics accumulate across calls.

use std::time::Instant;

use games_connect4::{Board, MoveError, Outcome};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use tracing::{debug, trace};

use crate::config::MctsConfig;
use crate::node::NodeId;
use crate::playout::run_random_playout;
use crate::tree::{MoveEstimate, SearchTree};

/// Errors that can occur during MCTS search.
///
/// None of these are expected in a correct program; a stale position is a
/// normal outcome and is not reported through this type.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Move error: {0}")]
    Move(#[from] MoveError),

    #[error("Playout reached a position with no legal moves and no result")]
    EmptyPlayoutState,

    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Cumulative counters and timings for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Completed select/expand/simulate/backpropagate cycles
    pub iterations: u64,
    /// Nodes added to the tree
    pub expansions: u64,
    /// Random playouts run
    pub playouts: u64,
    /// Iterations resolved by a cached win or draw instead of a playout
    pub terminal_hits: u64,
    /// Total discs dropped across all playouts
    pub playout_plies: u64,
    /// Total wall-clock time (microseconds)
    pub total_time_us: u64,
    pub selection_time_us: u64,
    pub expansion_time_us: u64,
    pub simulation_time_us: u64,
    pub backprop_time_us: u64,
}

impl SearchStats {
    /// Mean playout length in plies.
    pub fn avg_playout_len(&self) -> f64 {
        if self.playouts == 0 {
            0.0
        } else {
            self.playout_plies as f64 / self.playouts as f64
        }
    }

    /// Iterations per second over the time spent searching.
    pub fn iterations_per_sec(&self) -> f64 {
        if self.total_time_us == 0 {
            0.0
        } else {
            self.iterations as f64 * 1_000_000.0 / self.total_time_us as f64
        }
    }
}

/// Result of a complete (non-incremental) search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Most visited root column, None if the root had no moves
    pub best_move: Option<u8>,

    /// Per-column statistics at the root
    pub estimates: Vec<MoveEstimate>,

    /// Number of iterations performed
    pub iterations: u64,
}

/// MCTS search state: the tree, the playout RNG, and running statistics.
pub struct MctsSearch<R: Rng = ChaCha20Rng> {
    tree: SearchTree,
    rng: R,
    stats: SearchStats,
}

impl MctsSearch<ChaCha20Rng> {
    /// Create a new search rooted at `board`.
    ///
    /// Uses `config.seed` when set, otherwise seeds from OS entropy.
    pub fn new(board: Board, config: &MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };
        Self::with_rng(board, rng)
    }
}

impl<R: Rng> MctsSearch<R> {
    /// Create a new search with a caller-supplied random source.
    pub fn with_rng(board: Board, rng: R) -> Self {
        Self {
            tree: SearchTree::new(board),
            rng,
            stats: SearchStats::default(),
        }
    }

    /// Run `iterations` iterations against the existing tree.
    ///
    /// Returns the number of iterations completed.
    pub fn run_batch(&mut self, iterations: u32) -> Result<u32, SearchError> {
        let start = Instant::now();
        for _ in 0..iterations {
            self.run_iteration()?;
        }

        debug!(
            iterations,
            root_visits = self.tree.get(self.tree.root()).visits,
            nodes = self.tree.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "MCTS batch complete"
        );

        Ok(iterations)
    }

    /// Run a single iteration (select -> expand -> simulate -> backpropagate).
    ///
    /// Returns the outcome that was backpropagated.
    pub fn run_iteration(&mut self) -> Result<Outcome, SearchError> {
        let start = Instant::now();

        // Selection
        let mut current = self.select();
        let selected = Instant::now();

        // Expansion
        let node = self.tree.get(current);
        if !node.is_terminal() && !node.untried.is_empty() {
            current = self.tree.expand_one_child(current)?;
            self.stats.expansions += 1;
        }
        let expanded = Instant::now();

        // Simulation
        let node = self.tree.get(current);
        let outcome = if node.is_win {
            // The player who moved into this node won
            self.stats.terminal_hits += 1;
            Outcome::Winner(node.board.current_player().other())
        } else if node.is_draw {
            self.stats.terminal_hits += 1;
            Outcome::Draw
        } else {
            let playout = run_random_playout(&node.board, &mut self.rng)?;
            self.stats.playouts += 1;
            self.stats.playout_plies += playout.plies as u64;
            playout.outcome
        };
        let simulated = Instant::now();

        // Backpropagation
        self.tree.propagate_result(current, outcome);
        let done = Instant::now();

        self.stats.iterations += 1;
        self.stats.selection_time_us += (selected - start).as_micros() as u64;
        self.stats.expansion_time_us += (expanded - selected).as_micros() as u64;
        self.stats.simulation_time_us += (simulated - expanded).as_micros() as u64;
        self.stats.backprop_time_us += (done - simulated).as_micros() as u64;
        self.stats.total_time_us += (done - start).as_micros() as u64;

        trace!(leaf = current.0, ?outcome, "MCTS iteration complete");

        Ok(outcome)
    }

    /// Descend while the current node is fully expanded and has children.
    fn select(&self) -> NodeId {
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);
            if !node.untried.is_empty() || node.children.is_empty() {
                break;
            }
            match self.tree.select_best_child(current) {
                Some(child_id) => current = child_id,
                None => break,
            }
        }

        current
    }

    /// Get the search tree (for inspection/debugging).
    pub fn tree(&self) -> &SearchTree {
        &self.tree
    }

    /// Consume the search and keep the tree.
    pub fn into_tree(self) -> SearchTree {
        self.tree
    }

    /// Cumulative statistics since the search was created.
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Visits recorded at the root, which equals the iterations run so far.
    pub fn root_visits(&self) -> u64 {
        self.tree.get(self.tree.root()).visits
    }
}

/// Convenience function to run a complete search in one call.
pub fn run_mcts(board: Board, config: &MctsConfig) -> Result<SearchResult, SearchError> {
    let mut search = MctsSearch::new(board, config);

    let root = search.tree().get(search.tree().root());
    if !root.is_terminal() && !root.legal_moves().is_empty() {
        let mut remaining = config.max_iterations;
        while remaining > 0 {
            let batch = remaining.min(u32::MAX as u64) as u32;
            remaining -= search.run_batch(batch)? as u64;
        }
    }

    Ok(SearchResult {
        best_move: search.tree().best_move(),
        estimates: search.tree().root_estimates(),
        iterations: search.root_visits(),
    })
}
