//! maxout-engine - hardware-accurate legal-move search for NES Tetris.
//!
//! Given a board, a piece, a gravity level, a tap cadence and an adjustment
//! frame, enumerates every cell the piece can lock on, split into the
//! commit-up-front set and the per-state redirect sets.

pub mod batch;
pub mod dispatch;
pub mod frames;
pub mod gravity;
pub mod search;
pub mod table;
pub mod taps;
pub mod tuck;

pub use batch::search_batch;
pub use dispatch::{fit_maps, move_search};
pub use gravity::Level;
pub use search::{MoveSearch, PositionList, PossibleMoves, MAX_POSITIONS};
pub use taps::{TapTable, TAP_12HZ, TAP_15HZ, TAP_20HZ, TAP_30HZ};
