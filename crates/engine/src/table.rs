//! Tap-sequence reachability tables.
//!
//! Board-independent precomputation: which (orientation, column) pairs a
//! disciplined tap sequence can reach, in minimum taps, and which cells the
//! piece sweeps on the way. The discipline never reverses a chosen shift
//! direction and never reuses a rotation button outside its chain, so the
//! graph stays within 10 entries per orientation.

use crate::gravity::Level;
use crate::taps::TapTable;
use maxout_core::Board;

const TAP_A: u8 = 0x1;
const TAP_B: u8 = 0x2;
const TAP_L: u8 = 0x4;
const TAP_R: u8 = 0x8;

/// One reachable (rot, col) vertex.
///
/// `num_taps` is the minimum tap count to get there, so `taps[num_taps - 1]`
/// is the frame the piece arrives. The vertex is reachable iff the `masks`
/// of every transitive predecessor and this vertex's own `masks_nodrop` all
/// test clear against the fit maps; `masks_nodrop` is a subset of `masks`.
/// `cannot_finish` marks vertices that arrive but lock before another input
/// fires; their `masks` are meaningless and must not be tested.
#[derive(Clone, Debug)]
pub struct TableEntry {
    pub rot: u8,
    pub col: u8,
    pub prev: u8,
    pub num_taps: u8,
    pub cannot_finish: bool,
    pub masks: [Board; 4],
    pub masks_nodrop: [Board; 4],
}

/// Generate the vertex list for one start state, in BFS order by tap count.
pub(crate) fn gen_entries(
    level: Level,
    rotations: usize,
    taps: &TapTable,
    initial_frame: u32,
    initial_rot: usize,
    initial_col: usize,
) -> Vec<TableEntry> {
    assert!(
        rotations == 1 || rotations == 2 || rotations == 4,
        "unexpected rotation count {}",
        rotations
    );
    let mut masks = [[[Board::EMPTY; 4]; 10]; 4];
    let mut masks_nodrop = [[[Board::EMPTY; 4]; 10]; 4];
    let mut last_tap = [[0u8; 10]; 4];
    let mut cannot_reach = [[false; 10]; 4];
    let mut cannot_finish = [[false; 10]; 4];

    for col in 0..10usize {
        for delta_rot in 0..4usize {
            if rotations == 1 && delta_rot != 0 {
                continue;
            }
            if rotations == 2 && delta_rot >= 2 {
                continue;
            }
            let rot = (initial_rot + delta_rot) % rotations;
            let num_lr_tap = col.abs_diff(initial_col) as u32;
            // rotation taps per delta: 0, 1, 2, 1 (B covers the last step)
            let num_ab_tap = if delta_rot == 3 { 1 } else { delta_rot as u32 };
            let num_tap = num_lr_tap.max(num_ab_tap);
            // frame this tap fires; initial_frame if no input at all
            let tap_frame = if num_tap == 0 {
                0
            } else {
                taps.frame(num_tap as usize - 1)
            };
            let start_frame = tap_frame + initial_frame;
            // frame the next input is allowed
            let end_frame = taps.frame(num_tap as usize) + initial_frame;
            if num_tap > 0 {
                if num_tap == num_lr_tap {
                    last_tap[rot][col] |= if col > initial_col { TAP_R } else { TAP_L };
                }
                if num_tap == num_ab_tap {
                    last_tap[rot][col] |= if delta_rot == 3 { TAP_B } else { TAP_A };
                }
            }
            let start_row = level.row_at(start_frame);
            if start_row >= Board::HEIGHT as u32 {
                cannot_reach[rot][col] = true;
                continue;
            }
            // undo just the final merged tap to get the pre-tap state
            let start_col = if num_tap == num_lr_tap {
                (col as i32 - (col as i32 - initial_col as i32).signum()) as usize
            } else {
                col
            };
            let start_rot = if num_tap == num_ab_tap {
                // a two-step chain rotates once before the final tap
                let pre_rot = if delta_rot == 2 { 1 } else { 0 };
                (initial_rot + pre_rot) % rotations
            } else {
                rot
            };
            let cur = &mut masks[rot][col];
            cur[start_rot].set(start_row as usize, start_col, true);
            cur[start_rot].set(start_row as usize, col, true); // first shift
            cur[rot].set(start_row as usize, col, true); // then rotate
            masks_nodrop[rot][col] = *cur;
            if level.row_at(end_frame) >= Board::HEIGHT as u32 {
                cannot_finish[rot][col] = true;
                continue;
            }
            for frame in start_frame..end_frame {
                let row = level.row_at(frame) as usize;
                cur[rot].set(row, col, true);
                if level.is_drop_frame(frame) {
                    cur[rot].set(row + 1, col, true);
                    if level == Level::Level39 {
                        cur[rot].set(row + 2, col, true);
                    }
                }
            }
        }
    }

    let mut entries: Vec<TableEntry> = Vec::with_capacity(10 * rotations);
    let push = |entries: &mut Vec<TableEntry>, rot: usize, col: usize, prev: u8, num_taps: u8| {
        if !cannot_reach[rot][col] {
            entries.push(TableEntry {
                rot: rot as u8,
                col: col as u8,
                prev,
                num_taps,
                cannot_finish: cannot_finish[rot][col],
                masks: masks[rot][col],
                masks_nodrop: masks_nodrop[rot][col],
            });
        }
    };

    push(&mut entries, initial_rot, initial_col, 0, 0);
    let mut cur = 0;
    while cur < entries.len() {
        let rot = entries[cur].rot as usize;
        let col = entries[cur].col as usize;
        let taps_used = entries[cur].num_taps;
        let last = last_tap[rot][col];
        let should_l = col > 0 && (taps_used == 0 || last & TAP_L != 0);
        let should_r = col < 9 && (taps_used == 0 || last & TAP_R != 0);
        let should_a = (rotations > 1 && taps_used == 0)
            || (rotations == 4 && taps_used == 1 && last & TAP_A != 0);
        let should_b = rotations == 4 && taps_used == 0;
        let prev = cur as u8;
        let next = taps_used + 1;
        if should_l {
            push(&mut entries, rot, col - 1, prev, next);
        }
        if should_r {
            push(&mut entries, rot, col + 1, prev, next);
        }
        if should_a {
            let nrot = (rot + 1) % rotations;
            push(&mut entries, nrot, col, prev, next);
            if should_l {
                push(&mut entries, nrot, col - 1, prev, next);
            }
            if should_r {
                push(&mut entries, nrot, col + 1, prev, next);
            }
        }
        if should_b {
            let nrot = (rot + 3) % rotations;
            push(&mut entries, nrot, col, prev, next);
            if should_l {
                push(&mut entries, nrot, col - 1, prev, next);
            }
            if should_r {
                push(&mut entries, nrot, col + 1, prev, next);
            }
        }
        cur += 1;
    }
    entries
}

/// The full table set for one timing configuration: the list generated from
/// spawn, plus one list per spawn-table entry for a redirect committed at
/// `max(adj_frame, taps[entry.num_taps])` from that entry's state.
pub struct SearchTable {
    pub initial: Vec<TableEntry>,
    pub adj: Vec<Vec<TableEntry>>,
}

impl SearchTable {
    pub fn new(level: Level, rotations: usize, adj_frame: u32, taps: &TapTable) -> Self {
        let spawn = maxout_core::Position::SPAWN;
        let initial = gen_entries(
            level,
            rotations,
            taps,
            0,
            spawn.rot as usize,
            spawn.col as usize,
        );
        let adj = initial
            .iter()
            .map(|entry| {
                let frame_start = adj_frame.max(taps.frame(entry.num_taps as usize));
                gen_entries(
                    level,
                    rotations,
                    taps,
                    frame_start,
                    entry.rot as usize,
                    entry.col as usize,
                )
            })
            .collect();
        Self { initial, adj }
    }
}
