//! Piece dispatch - fit-map construction and the one-call search surface.

use crate::gravity::Level;
use crate::search::{MoveSearch, PossibleMoves};
use crate::taps::TapTable;
use maxout_core::{Board, Piece};

/// Free bits of a column as read by a piece cell `dr` rows below the piece
/// position. Rows pushed past the bottom read occupied; rows above the
/// field read free (the NES lets pieces poke out of the top).
#[inline]
fn shift_rows(free: u32, dr: i8) -> u32 {
    if dr >= 0 {
        free >> dr as u32
    } else {
        (free << (-dr) as u32 | (1 << (-dr) as u32) - 1) & Board::COLUMN_MASK
    }
}

/// Build one fit map per orientation: bit (row, col) is set iff every cell
/// of the piece positioned there lands on an empty in-bounds cell. Columns
/// are eroded by shifted copies of their free bits, one shift per piece
/// cell.
pub fn fit_maps(board: &Board, piece: Piece) -> Vec<Board> {
    let mut free = [0u32; Board::WIDTH];
    for (col, out) in free.iter_mut().enumerate() {
        *out = !board.column(col) & Board::COLUMN_MASK;
    }
    let rotations = piece.rotations();
    let mut maps = vec![Board::EMPTY; rotations];
    for (rot, map) in maps.iter_mut().enumerate() {
        for col in 0..Board::WIDTH as i32 {
            let mut fit = Board::COLUMN_MASK;
            for (dc, dr) in piece.cells(rot) {
                let cell_col = col + dc as i32;
                if !(0..Board::WIDTH as i32).contains(&cell_col) {
                    fit = 0;
                    break;
                }
                fit &= shift_rows(free[cell_col as usize], dr);
            }
            map.set_column(col as usize, fit);
        }
    }
    maps
}

/// Search one (board, piece) query, building the engine on the fly. Callers
/// issuing many queries under one timing configuration should construct a
/// [`MoveSearch`] per rotation count once and reuse it; the tables do not
/// depend on the board.
pub fn move_search(
    board: &Board,
    piece: Piece,
    level: Level,
    adj_frame: u32,
    taps: &TapTable,
) -> PossibleMoves {
    let layers = fit_maps(board, piece);
    MoveSearch::new(level, piece.rotations(), adj_frame, *taps).run(&layers)
}
