//! Uniform random playouts.
//!
//! A playout drops discs into uniformly random legal columns until the game
//! ends. The game is over after at most 42 plies, so the loop needs no guard.

use games_connect4::{Board, Outcome};
use rand::Rng;
use tracing::{error, trace};

use crate::search::SearchError;

/// Result of one playout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Playout {
    pub outcome: Outcome,
    /// Discs dropped during the playout
    pub plies: u32,
}

/// Play random legal moves on a private copy of `board` until a win or draw.
///
/// The random source is injected so callers choose between a seeded
/// (reproducible) and an entropy-seeded generator.
pub fn run_random_playout<R: Rng + ?Sized>(
    board: &Board,
    rng: &mut R,
) -> Result<Playout, SearchError> {
    let mut board = *board;
    let mut plies = 0;

    loop {
        if let Some(outcome) = board.winner() {
            trace!(plies, ?outcome, "playout finished");
            return Ok(Playout { outcome, plies });
        }

        let mask = board.legal_moves_mask();
        if mask == 0 {
            // Unreachable for boards built through `play`: a full board is a draw.
            error!(moves = board.move_count(), "playout reached a position with no legal moves");
            return Err(SearchError::EmptyPlayoutState);
        }

        let pick = rng.gen_range(0..mask.count_ones());
        board.play(nth_set_bit(mask, pick))?;
        plies += 1;
    }
}

/// Index of the `n`-th (0-based) set bit of `mask`.
#[inline]
fn nth_set_bit(mut mask: u8, n: u32) -> u8 {
    for _ in 0..n {
        mask &= mask - 1;
    }
    mask.trailing_zeros() as u8
}
