//! Rendering of per-column estimates.

use games_connect4::COLS;
use mcts::MoveEstimate;

/// One line with a win percentage per column, `-` for columns with no estimate.
///
/// ```text
/// 0: 41.2%  1: 47.9%  2: 52.3%  3: 58.0%  4: 51.1%  5:  -     6: 40.6%
/// ```
pub fn format_estimates(estimates: &[MoveEstimate]) -> String {
    let mut by_column = [None; COLS];
    for estimate in estimates {
        if let Some(slot) = by_column.get_mut(estimate.column as usize) {
            *slot = Some(estimate.win_probability);
        }
    }

    by_column
        .iter()
        .enumerate()
        .map(|(column, p)| match p {
            Some(p) => format!("{}: {:>5.1}%", column, p * 100.0),
            None => format!("{}:  -    ", column),
        })
        .collect::<Vec<_>>()
        .join("  ")
}

/// Most visited column. Ties keep the earliest estimate.
pub fn best_column(estimates: &[MoveEstimate]) -> Option<&MoveEstimate> {
    let mut best: Option<&MoveEstimate> = None;
    for estimate in estimates {
        if best.map_or(true, |b| estimate.visits > b.visits) {
            best = Some(estimate);
        }
    }
    best
}
