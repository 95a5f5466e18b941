//! The move search driver - two-pass enumeration of lock positions.
//!
//! Pass one walks the tap-sequence table against the fit maps and settles
//! every surviving vertex to its lock row; vertices whose lock falls beyond
//! the redirect deadline become committable adjustment states instead. Pass
//! two projects the tuck masks through each vertex's live frame window to
//! find the late single-input locks. The same machinery then reruns once
//! per committable state to produce the adjustment sets.
//!
//! Input sequence sketch:
//!
//! ```text
//! initial pass 1            adj pass 1
//! vvvvvvvvvvv                vvvvvvv
//! L - L - L - - - - - - - -  R - R - - - - - - -<lock>
//!               \            ^ adj_frame   \
//!                \A R - - -<lock>           \B R - - -<lock>
//!                 ^^^^                       ^^^^
//!                initial pass 2 (tuck)      adj pass 2
//! ```

use crate::frames::{column_to_drop_frames, column_to_frames, find_lock_row, frames_to_column};
use crate::frames::{Column, FrameMasks, Frames};
use crate::gravity::Level;
use crate::table::{SearchTable, TableEntry};
use crate::taps::TapTable;
use crate::tuck::{build_tuck_masks, tuck_types, TuckMaskSet};
use maxout_core::{Board, Position};
use serde::{Deserialize, Serialize};

/// Upper bound on positions one search can emit.
pub const MAX_POSITIONS: usize = 256;

/// Largest possible spawn table: 10 columns x 4 orientations.
const MAX_ENTRIES: usize = 40;

/// Fixed-capacity scratch list - no heap allocation during the search.
#[derive(Clone)]
pub struct PositionList {
    positions: [Position; MAX_POSITIONS],
    len: usize,
}

impl PositionList {
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            positions: [Position::ZERO; MAX_POSITIONS],
            len: 0,
        }
    }

    #[inline(always)]
    pub fn push(&mut self, position: Position) {
        debug_assert!(self.len < MAX_POSITIONS, "PositionList overflow");
        self.positions[self.len] = position;
        self.len += 1;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[inline(always)]
    pub fn as_slice(&self) -> &[Position] {
        &self.positions[..self.len]
    }
}

impl Default for PositionList {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a piece can do on one board under one timing configuration.
///
/// `non_adj` holds the locks reachable committing to the input sequence up
/// front. `adj` holds, per intermediate state still live at the adjustment
/// frame, the locks reachable after redirecting from that state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PossibleMoves {
    pub non_adj: Vec<Position>,
    pub adj: Vec<(Position, Vec<Position>)>,
}

impl PossibleMoves {
    /// Sort both layers; with `unique`, also deduplicate the position lists.
    /// Idempotent.
    pub fn normalize(&mut self, unique: bool) {
        sort_positions(&mut self.non_adj, unique);
        for (_, positions) in &mut self.adj {
            sort_positions(positions, unique);
        }
        self.adj.sort();
    }
}

fn sort_positions(positions: &mut Vec<Position>, unique: bool) {
    positions.sort();
    if unique {
        positions.dedup();
    }
}

/// Every set bit of every mask layer is present in the fit maps.
#[inline(always)]
fn fits(layers: &[Board], masks: &[Board; 4], rotations: usize) -> bool {
    let mut ok = true;
    for i in 0..rotations {
        ok &= layers[i].contains(&masks[i]);
    }
    ok
}

/// The search engine for one (level, rotation count, adjustment frame, tap
/// schedule) combination. Construction materializes the reachability
/// tables; [`MoveSearch::run`] is then a pure function of the fit maps,
/// allocation-free apart from the returned lists, and safe to share across
/// threads.
pub struct MoveSearch {
    level: Level,
    rotations: usize,
    adj_frame: u32,
    taps: TapTable,
    table: SearchTable,
}

impl MoveSearch {
    pub fn new(level: Level, rotations: usize, adj_frame: u32, taps: TapTable) -> Self {
        assert!(
            rotations == 1 || rotations == 2 || rotations == 4,
            "unexpected rotation count {}",
            rotations
        );
        let table = SearchTable::new(level, rotations, adj_frame, &taps);
        Self {
            level,
            rotations,
            adj_frame,
            taps,
            table,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn rotations(&self) -> usize {
        self.rotations
    }

    /// Search one board, given as fit maps (one per orientation, bit set
    /// where the piece rests entirely on empty cells).
    pub fn run(&self, layers: &[Board]) -> PossibleMoves {
        assert!(layers.len() >= self.rotations, "missing fit-map layers");
        let mut cols: [[Column; 10]; 4] = [[0; 10]; 4];
        let mut frame_masks = FrameMasks::default();
        for rot in 0..self.rotations {
            for col in 0..10 {
                let column = layers[rot].column(col);
                cols[rot][col] = column;
                frame_masks.frame[rot][col] = column_to_frames(self.level, column);
                frame_masks.drop[rot][col] = column_to_drop_frames(self.level, column);
            }
        }
        let tuck_masks = build_tuck_masks(&frame_masks, self.rotations);
        let mut can_adj = [false; MAX_ENTRIES];

        let mut ret = PossibleMoves::default();
        let mut buf = PositionList::new();
        self.run_one(layers, &cols, &tuck_masks, None, &mut can_adj, &mut buf);
        ret.non_adj.extend_from_slice(buf.as_slice());

        for id in 0..self.table.initial.len() {
            buf.clear();
            self.run_one(layers, &cols, &tuck_masks, Some(id), &mut can_adj, &mut buf);
            if !buf.is_empty() {
                let entry = &self.table.initial[id];
                let frame = self.adj_frame.max(self.taps.frame(entry.num_taps as usize));
                let state = Position::new(entry.rot, self.level.row_at(frame) as u8, entry.col);
                ret.adj.push((state, buf.as_slice().to_vec()));
            }
        }
        ret
    }

    /// One pass-1 + pass-2 execution: from spawn when `adj_of` is `None`,
    /// otherwise the redirect search for the given spawn-table entry.
    fn run_one(
        &self,
        layers: &[Board],
        cols: &[[Column; 10]; 4],
        tuck_masks: &TuckMaskSet,
        adj_of: Option<usize>,
        can_adj: &mut [bool; MAX_ENTRIES],
        out: &mut PositionList,
    ) {
        let level = self.level;
        let total_frames = level.total_frames();
        let (entries, initial_frame): (&[TableEntry], u32) = match adj_of {
            None => (self.table.initial.as_slice(), 0),
            Some(id) => {
                if !can_adj[id] {
                    return;
                }
                let frame = self
                    .adj_frame
                    .max(self.taps.frame(self.table.initial[id].num_taps as usize));
                if frame >= total_frames {
                    return;
                }
                (self.table.adj[id].as_slice(), frame)
            }
        };
        let is_adj = adj_of.is_some();

        // pass 1: settle reachability in table order
        let mut can_continue = [false; MAX_ENTRIES];
        let mut can_reach = [false; MAX_ENTRIES];
        for (i, entry) in entries.iter().enumerate() {
            if i != 0 && !can_continue[entry.prev as usize] {
                continue;
            }
            if !entry.cannot_finish && fits(layers, &entry.masks, self.rotations) {
                can_continue[i] = true;
            } else if !fits(layers, &entry.masks_nodrop, self.rotations) {
                continue;
            }
            can_reach[i] = true;
        }

        let mut can_tuck_frames: [[Frames; 10]; 4] = [[0; 10]; 4];
        let mut locks_without_tuck: [[Column; 10]; 4] = [[0; 10]; 4];
        let mut pass_2_possible = false;
        for (i, entry) in entries.iter().enumerate() {
            if !can_reach[i] {
                continue;
            }
            let (rot, col) = (entry.rot as usize, entry.col as usize);
            let tap_frame = if entry.num_taps == 0 {
                0
            } else {
                self.taps.frame(entry.num_taps as usize - 1)
            };
            let start_frame = tap_frame + initial_frame;
            let start_row = level.row_at(start_frame);
            let end_frame = if is_adj {
                total_frames
            } else {
                self.adj_frame.max(self.taps.frame(entry.num_taps as usize))
            };
            // masks_nodrop passed, so the piece exists at start_row here
            let lock_row = find_lock_row(cols[rot][col], start_row);
            let lock_frame = level.last_frame_on_row(lock_row) + 1;
            if !is_adj && lock_frame > end_frame {
                can_adj[i] = true;
            } else {
                out.push(Position::new(entry.rot, lock_row as u8, entry.col));
            }
            let first_tuck_frame = initial_frame + self.taps.frame(entry.num_taps as usize);
            let last_tuck_frame = lock_frame.min(end_frame);
            locks_without_tuck[rot][col] |= 1 << lock_row;
            if last_tuck_frame > first_tuck_frame {
                can_tuck_frames[rot][col] |= (1 << last_tuck_frame) - (1 << first_tuck_frame);
                pass_2_possible = true;
            }
        }
        if pass_2_possible {
            self.run_tucks(cols, tuck_masks, &locks_without_tuck, &can_tuck_frames, out);
        }
    }

    /// Pass 2: project every tuck through the live windows and read the
    /// resulting lock rows back out of column space.
    fn run_tucks(
        &self,
        cols: &[[Column; 10]; 4],
        tuck_masks: &TuckMaskSet,
        locks_without_tuck: &[[Column; 10]; 4],
        can_tuck_frames: &[[Frames; 10]; 4],
        out: &mut PositionList,
    ) {
        let rotations = self.rotations;
        let mut tuck_result: [[Frames; 10]; 4] = [[0; 10]; 4];
        for (i, tuck) in tuck_types(rotations).iter().enumerate() {
            let start_col = 0.max(-(tuck.delta_col as i32)) as usize;
            let end_col = 10.min(10 - tuck.delta_col as i32) as usize;
            for rot in 0..rotations {
                let nrot = (rot + tuck.delta_rot as usize) % rotations;
                for col in start_col..end_col {
                    let target = (col as i32 + tuck.delta_col as i32) as usize;
                    tuck_result[nrot][target] |=
                        (tuck_masks[i][rot][col] & can_tuck_frames[rot][col]) << tuck.delta_frame;
                }
            }
        }
        for rot in 0..rotations {
            for col in 0..10 {
                let after_tuck = frames_to_column(self.level, tuck_result[rot][col]);
                let cur = cols[rot][col];
                // carry each post-tuck row down its run of fit rows, keep
                // the ones that land on a resting row, drop those already
                // reachable without a tuck
                let mut locks =
                    (after_tuck + cur) >> 1 & (cur & !(cur >> 1)) & !locks_without_tuck[rot][col];
                while locks != 0 {
                    let row = locks.trailing_zeros();
                    out.push(Position::new(rot as u8, row as u8, col as u8));
                    locks &= locks - 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taps::TAP_30HZ;

    #[test]
    fn test_position_list_push() {
        let mut list = PositionList::new();
        assert!(list.is_empty());
        list.push(Position::new(0, 19, 5));
        list.push(Position::new(1, 3, 2));
        assert_eq!(list.len(), 2);
        assert_eq!(list.as_slice()[1], Position::new(1, 3, 2));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut moves = PossibleMoves {
            non_adj: vec![
                Position::new(1, 2, 3),
                Position::new(0, 19, 5),
                Position::new(1, 2, 3),
            ],
            adj: vec![(
                Position::new(0, 0, 5),
                vec![Position::new(2, 9, 9), Position::new(0, 1, 1)],
            )],
        };
        moves.normalize(true);
        let once = moves.clone();
        moves.normalize(true);
        assert_eq!(moves, once);
        assert_eq!(moves.non_adj.len(), 2);
    }

    #[test]
    #[should_panic(expected = "unexpected rotation count")]
    fn test_rejects_bad_rotation_count() {
        MoveSearch::new(Level::Level18, 3, 0, TAP_30HZ);
    }

    #[test]
    fn test_empty_fit_maps_find_nothing() {
        // a fully blocked board: the spawn cell test fails immediately
        let search = MoveSearch::new(Level::Level18, 4, 0, TAP_30HZ);
        let layers = [Board::EMPTY; 4];
        let moves = search.run(&layers);
        assert!(moves.non_adj.is_empty());
        assert!(moves.adj.is_empty());
    }
}
