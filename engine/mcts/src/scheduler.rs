//! Batched, cancellable evaluation of a live position.
//!
//! The host owns a [`LivePosition`] and advances its [`PositionVersion`] on
//! every change. An [`Evaluation`] freezes a copy of the board together with
//! the version it was started at, then runs the search in fixed-size batches.
//! Before each batch it yields to the runtime and compares versions; once the
//! live position has moved on, the tree is dropped and the evaluation ends
//! quietly.
//!
//! Suspension happens only between batches, so an iteration is never
//! interrupted halfway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use games_connect4::Board;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use tracing::{debug, error, info};

use crate::config::MctsConfig;
use crate::search::{MctsSearch, SearchError};
use crate::tree::{MoveEstimate, SearchTree};

/// Monotonically increasing version token for the live position.
///
/// Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct PositionVersion(Arc<AtomicU64>);

impl PositionVersion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version.
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    /// Bump the version and return the new value.
    pub fn advance(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// The position the host is currently showing.
#[derive(Debug, Clone)]
pub struct LivePosition {
    board: Board,
    version: PositionVersion,
}

impl LivePosition {
    pub fn new(board: Board) -> Self {
        Self {
            board,
            version: PositionVersion::new(),
        }
    }

    /// Current board.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Shared version token.
    pub fn version(&self) -> &PositionVersion {
        &self.version
    }

    /// Replace the live board. Any running evaluation becomes stale.
    pub fn set(&mut self, board: Board) {
        self.board = board;
        let version = self.version.advance();
        debug!(version, moves = board.move_count(), "live position updated");
    }

    /// Start evaluating a frozen copy of the current board.
    pub fn evaluate(&self, config: &MctsConfig) -> Evaluation {
        Evaluation::start(self.board, self.version.clone(), config)
    }
}

/// Why an evaluation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The live position changed; the tree was discarded.
    Stale,
    /// The iteration budget was used up. The tree is kept for inspection.
    BudgetExhausted,
    /// The snapshot has no playable move (full board or decided game).
    NoLegalMoves,
    /// The search hit an internal error.
    Failed,
}

/// Totals reported when an evaluation ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSummary {
    pub iterations: u64,
    pub batches: u32,
    /// None while the evaluation is still running
    pub termination: Option<Termination>,
}

/// Handle to one running evaluation. Owns its search tree exclusively.
pub struct Evaluation<R: Rng = ChaCha20Rng> {
    search: Option<MctsSearch<R>>,
    snapshot: Board,
    version: PositionVersion,
    started_at: u64,
    batch_size: u32,
    max_iterations: u64,
    iterations: u64,
    batches: u32,
    termination: Option<Termination>,
}

impl Evaluation<ChaCha20Rng> {
    /// Start evaluating `snapshot`, which is current as of `version`.
    pub fn start(snapshot: Board, version: PositionVersion, config: &MctsConfig) -> Self {
        Self::with_search(MctsSearch::new(snapshot, config), version, config)
    }
}

impl<R: Rng> Evaluation<R> {
    /// Start an evaluation around an existing (usually fresh) search.
    pub fn with_search(search: MctsSearch<R>, version: PositionVersion, config: &MctsConfig) -> Self {
        let tree = search.tree();
        let snapshot = tree.get(tree.root()).board;
        let started_at = version.current();

        info!(
            version = started_at,
            moves = snapshot.move_count(),
            batch_size = config.batch_size,
            max_iterations = config.max_iterations,
            "evaluation started"
        );

        Self {
            search: Some(search),
            snapshot,
            version,
            started_at,
            batch_size: config.batch_size.max(1),
            max_iterations: config.max_iterations,
            iterations: 0,
            batches: 0,
            termination: None,
        }
    }

    /// Run the next batch and return per-column estimates for the snapshot.
    ///
    /// Every legal column is listed, including columns the search has not
    /// expanded yet (reported with zero visits and a 0.0 win probability).
    ///
    /// Yields to the runtime first, then checks for staleness. Returns
    /// `Ok(None)` once the evaluation has stopped, whatever the reason.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<MoveEstimate>>, SearchError> {
        if self.termination.is_some() {
            return Ok(None);
        }

        tokio::task::yield_now().await;

        if self.is_stale() {
            self.finish(Termination::Stale);
            return Ok(None);
        }

        let Some(search) = self.search.as_mut() else {
            return Ok(None);
        };

        let root = search.tree().get(search.tree().root());
        if root.is_terminal() || root.legal_moves().is_empty() {
            self.finish(Termination::NoLegalMoves);
            return Ok(None);
        }

        let remaining = self.max_iterations.saturating_sub(self.iterations);
        if remaining == 0 {
            self.finish(Termination::BudgetExhausted);
            return Ok(None);
        }

        let batch = remaining.min(self.batch_size as u64) as u32;
        match search.run_batch(batch) {
            Ok(done) => {
                self.iterations += done as u64;
                self.batches += 1;
                Ok(Some(search.tree().legal_move_estimates()))
            }
            Err(e) => {
                error!(error = %e, "evaluation aborted");
                self.finish(Termination::Failed);
                Err(e)
            }
        }
    }

    /// Drive the evaluation to completion, publishing estimates after each batch.
    pub async fn run<F>(mut self, mut publish: F) -> Result<EvaluationSummary, SearchError>
    where
        F: FnMut(&[MoveEstimate]),
    {
        while let Some(estimates) = self.next_batch().await? {
            publish(&estimates);
        }
        Ok(self.summary())
    }

    /// The live position has moved past the snapshot.
    pub fn is_stale(&self) -> bool {
        self.version.current() != self.started_at
    }

    fn finish(&mut self, termination: Termination) {
        // A stale or finished position has no further use for its tree.
        if termination != Termination::BudgetExhausted {
            self.search = None;
        }
        self.termination = Some(termination);

        match termination {
            Termination::Stale => debug!(
                iterations = self.iterations,
                batches = self.batches,
                "evaluation is stale, discarding tree"
            ),
            _ => info!(
                iterations = self.iterations,
                batches = self.batches,
                ?termination,
                "evaluation finished"
            ),
        }
    }

    /// Frozen board being evaluated.
    pub fn snapshot(&self) -> &Board {
        &self.snapshot
    }

    /// Iterations run so far.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    /// Search tree, if it has not been discarded.
    pub fn tree(&self) -> Option<&SearchTree> {
        self.search.as_ref().map(MctsSearch::tree)
    }

    /// Search statistics, if the tree has not been discarded.
    pub fn search(&self) -> Option<&MctsSearch<R>> {
        self.search.as_ref()
    }

    pub fn summary(&self) -> EvaluationSummary {
        EvaluationSummary {
            iterations: self.iterations,
            batches: self.batches,
            termination: self.termination,
        }
    }
}
