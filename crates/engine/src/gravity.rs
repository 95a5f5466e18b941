//! Frame/row arithmetic for the four NES gravity tiers.
//!
//! The level fixes the row(frame) slope: /3 on 18, /2 on 19, x1 on 29,
//! x2 on 39. All functions are total and monotone in the frame.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Level {
    Level18,
    Level19,
    Level29,
    Level39,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Level18,
        Level::Level19,
        Level::Level29,
        Level::Level39,
    ];

    /// Row the piece occupies at the start of `frame`.
    #[inline(always)]
    pub const fn row_at(self, frame: u32) -> u32 {
        match self {
            Level::Level18 => frame / 3,
            Level::Level19 => frame / 2,
            Level::Level29 => frame,
            Level::Level39 => frame * 2,
        }
    }

    /// Whether the piece falls at the end of this frame.
    #[inline(always)]
    pub const fn is_drop_frame(self, frame: u32) -> bool {
        match self {
            Level::Level18 => frame % 3 == 2,
            Level::Level19 => frame % 2 == 1,
            Level::Level29 | Level::Level39 => true,
        }
    }

    /// Rows fallen at the end of this frame: 0 or 1, except level 39 which
    /// drops two rows at once.
    #[inline(always)]
    pub const fn num_drops(self, frame: u32) -> u32 {
        if !self.is_drop_frame(frame) {
            return 0;
        }
        match self {
            Level::Level39 => 2,
            _ => 1,
        }
    }

    /// First frame whose row is `row`.
    #[inline(always)]
    pub const fn first_frame_on_row(self, row: u32) -> u32 {
        match self {
            Level::Level18 => row * 3,
            Level::Level19 => row * 2,
            Level::Level29 => row,
            Level::Level39 => (row + 1) / 2,
        }
    }

    /// Last frame whose row is `row`.
    #[inline(always)]
    pub const fn last_frame_on_row(self, row: u32) -> u32 {
        match self {
            Level::Level18 => row * 3 + 2,
            Level::Level19 => row * 2 + 1,
            Level::Level29 => row,
            Level::Level39 => row / 2,
        }
    }

    /// One past the last frame a piece can still be on the board.
    #[inline(always)]
    pub const fn total_frames(self) -> u32 {
        self.last_frame_on_row(19) + 1
    }
}
