//! Column/frame codec - collision columns reshaped onto the time axis.
//!
//! A `Column` is one board column, each bit a cell, LSB the top row. A
//! `Frames` value is the same column reshaped so each bit is a frame, LSB
//! the first frame: bit f answers "does the cell occupied at frame f hold
//! this bit". Two flavors exist: the normal mask samples the row the piece
//! rests on during the frame, the drop mask is the AND over every row the
//! piece passes through in the end-of-frame fall. For levels 18/19/29 the
//! drop mask is just `normal & normal >> 1`; it is a separate notion only
//! because level 39 falls two rows at once.

use crate::gravity::Level;
use maxout_core::bits::{pdep64, pext64};

pub type Column = u32;
pub type Frames = u64;

/// Frame positions of rows at level 18: every third bit, 20 groups.
const SPREAD_X3: u64 = 0x0249_2492_4924_9249;
/// Frame positions of rows at level 19: every second bit, 20 groups.
const SPREAD_X2: u64 = 0x55_5555_5555;
/// Rows a piece can rest on at level 39: the even rows.
const EVEN_ROWS: u64 = 0x55555;

/// Per-(orientation, column) frame masks of one fit-map set.
#[derive(Clone, Default)]
pub struct FrameMasks {
    pub frame: [[Frames; 10]; 4],
    pub drop: [[Frames; 10]; 4],
}

/// Replicate each cell bit across the frames spent on its row.
#[inline]
pub fn column_to_frames(level: Level, col: Column) -> Frames {
    match level {
        Level::Level18 => {
            let expanded = pdep64(col as u64, SPREAD_X3);
            expanded | expanded << 1 | expanded << 2
        }
        Level::Level19 => {
            let expanded = pdep64(col as u64, SPREAD_X2);
            expanded | expanded << 1
        }
        Level::Level29 => col as u64,
        Level::Level39 => pext64(col as u64, EVEN_ROWS),
    }
}

/// Frames on which the piece both rests and survives the end-of-frame fall.
#[inline]
pub fn column_to_drop_frames(level: Level, col: Column) -> Frames {
    match level {
        Level::Level18 | Level::Level19 | Level::Level29 => {
            let mask = column_to_frames(level, col);
            mask & mask >> 1
        }
        // two rows per fall: the frame survives only if three consecutive
        // rows hold
        Level::Level39 => pext64((col & col >> 1 & col >> 2) as u64, EVEN_ROWS),
    }
}

/// Inverse of [`column_to_frames`]: OR each row's frame group back into its
/// cell bit.
#[inline]
pub fn frames_to_column(level: Level, frames: Frames) -> Column {
    match level {
        Level::Level18 => pext64(frames | frames >> 1 | frames >> 2, SPREAD_X3) as Column,
        Level::Level19 => pext64(frames | frames >> 1, SPREAD_X2) as Column,
        Level::Level29 => frames as Column,
        Level::Level39 => pdep64(frames, EVEN_ROWS) as Column,
    }
}

/// Lowest row a piece starting at `start_row` can fall to in this column.
///
/// `col` is a fit-map column (bit = the piece fits), and bit `start_row`
/// must be set. Adding `1 << start_row` carries through the run of fit rows
/// below; XOR exposes the run plus the stopping bit:
///
/// ```text
/// col                 = 00111100011101
/// 1 << start_row      = 00000000001000
/// col + (1<<start_row)= 00111100100101
/// col ^ (col + ...)   = 00000000111000
///            high bit of the XOR ^ , minus one
/// ```
#[inline(always)]
pub fn find_lock_row(col: Column, start_row: u32) -> u32 {
    debug_assert!(col >> start_row & 1 == 1);
    let run = col ^ (col + (1 << start_row));
    31 - run.leading_zeros() - 1
}
