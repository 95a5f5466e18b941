//! Parallel fan-out of independent searches.
//!
//! The search core is single-threaded and pure; concurrency lives here, in
//! the scheduler that spreads many (board, piece) queries across workers.

use crate::dispatch::fit_maps;
use crate::gravity::Level;
use crate::search::{MoveSearch, PossibleMoves};
use crate::taps::TapTable;
use maxout_core::{Board, Piece};
use rayon::prelude::*;

/// Run every query under one timing configuration, results in input order.
/// The three engines (one per rotation count) are built once and shared
/// read-only across the worker threads.
pub fn search_batch(
    level: Level,
    adj_frame: u32,
    taps: &TapTable,
    queries: &[(Board, Piece)],
) -> Vec<PossibleMoves> {
    let engines = [
        MoveSearch::new(level, 1, adj_frame, *taps),
        MoveSearch::new(level, 2, adj_frame, *taps),
        MoveSearch::new(level, 4, adj_frame, *taps),
    ];
    queries
        .par_iter()
        .map(|(board, piece)| {
            let engine = match piece.rotations() {
                1 => &engines[0],
                2 => &engines[1],
                _ => &engines[2],
            };
            engine.run(&fit_maps(board, *piece))
        })
        .collect()
}
