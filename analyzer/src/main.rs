//! Analyzer - Connect Four position evaluator
//!
//! Parses a move sequence, then runs a batched Monte Carlo Tree Search on
//! the resulting position:
//! 1. Prints per-column win probabilities after every batch
//! 2. Stops when the iteration budget is used up
//! 3. Abandons the search on Ctrl-C, which moves the live position on

use anyhow::Result;
use clap::Parser;
use games_connect4::Outcome;
use indicatif::{ProgressBar, ProgressStyle};
use mcts::{LivePosition, MoveEstimate, Termination};
use tokio::signal;
use tracing::{info, warn};

mod config;
mod report;

use crate::config::Config;
use crate::report::{best_column, format_estimates};

fn init_tracing(level: &str) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    Ok(())
}

/// Progress bar over the iteration budget (only when stderr is a TTY).
fn progress_bar(max_iterations: u64) -> Result<Option<ProgressBar>> {
    if !std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        return Ok(None);
    }
    let pb = ProgressBar::new(max_iterations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} iterations ({per_sec}, {eta})")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    config.validate()?;

    init_tracing(&config.log_level)?;
    info!(log_level = %config.log_level, "Tracing initialized");

    let board = config.board()?;
    println!("{}", board);

    let live = LivePosition::new(board);
    let mcts_config = config.mcts_config();
    let evaluation = live.evaluate(&mcts_config);

    // Ctrl-C advances the live version, so the running evaluation goes stale
    let version = live.version().clone();
    let interrupt_handle = tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                let current = version.advance();
                info!(version = current, "Interrupt received, abandoning evaluation");
            }
            Err(e) => warn!("Failed to listen for ctrl+c: {}", e),
        }
    });

    let progress = progress_bar(mcts_config.max_iterations)?;
    let mut latest: Vec<MoveEstimate> = Vec::new();
    let summary = evaluation
        .run(|estimates| {
            let line = format_estimates(estimates);
            let visits: u64 = estimates.iter().map(|e| e.visits).sum();
            match progress {
                Some(ref pb) => {
                    pb.set_position(visits);
                    pb.println(line);
                }
                None => println!("{}", line),
            }
            latest = estimates.to_vec();
        })
        .await;

    interrupt_handle.abort();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    let summary = summary?;

    info!(
        iterations = summary.iterations,
        batches = summary.batches,
        termination = ?summary.termination,
        "Evaluation finished"
    );

    match summary.termination {
        Some(Termination::NoLegalMoves) => match board.winner() {
            Some(Outcome::Winner(player)) => println!("Game over: {} has won", player),
            Some(Outcome::Draw) => println!("Game over: draw"),
            None => println!("No legal moves"),
        },
        Some(Termination::Stale) => {
            println!("Evaluation abandoned after {} iterations", summary.iterations);
        }
        _ => {
            if let Some(best) = best_column(&latest) {
                println!(
                    "Best move for {}: column {} ({:.1}% over {} visits)",
                    board.current_player(),
                    best.column,
                    best.win_probability * 100.0,
                    best.visits
                );
            }
        }
    }

    Ok(())
}
