//! Tuck catalogue and per-board tuck legality masks.
//!
//! "Tuck" covers tucks, spins and spin-tucks: a single late input (or one
//! input plus a one-frame follow-up) executed after the initial tap
//! sequence has ended but before the piece locks.

use crate::frames::{FrameMasks, Frames};

/// One tuck shape: the orientation step, the column step, and how many
/// frames after the trigger frame the piece reaches the target state.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TuckType {
    pub delta_rot: u8,
    pub delta_col: i8,
    pub delta_frame: u8,
}

const fn tuck(delta_rot: u8, delta_col: i8, delta_frame: u8) -> TuckType {
    TuckType {
        delta_rot,
        delta_col,
        delta_frame,
    }
}

/// Catalogue slots: index i of [`tuck_types`] owns `masks[i]` of
/// [`build_tuck_masks`]. Single-orientation pieces use the leading shift
/// entries, two-orientation pieces stop before the B group.
#[cfg(not(feature = "double-tuck"))]
const TYPES: [TuckType; 12] = [
    tuck(0, -1, 0), // L
    tuck(0, 1, 0),  // R
    tuck(1, 0, 0),  // A
    tuck(1, -1, 0), // LA
    tuck(1, 1, 0),  // RA
    tuck(1, -1, 1), // A-L / L-A
    tuck(1, 1, 1),  // A-R / R-A
    tuck(3, 0, 0),  // B
    tuck(3, -1, 0), // LB
    tuck(3, 1, 0),  // RB
    tuck(3, -1, 1), // B-L / L-B
    tuck(3, 1, 1),  // B-R / R-B
];

#[cfg(feature = "double-tuck")]
const TYPES: [TuckType; 14] = [
    tuck(0, -1, 0), // L
    tuck(0, 1, 0),  // R
    tuck(0, -2, 2), // L-/-L
    tuck(0, 2, 2),  // R-/-R
    tuck(1, 0, 0),  // A
    tuck(1, -1, 0), // LA
    tuck(1, 1, 0),  // RA
    tuck(1, -1, 1), // A-L / L-A
    tuck(1, 1, 1),  // A-R / R-A
    tuck(3, 0, 0),  // B
    tuck(3, -1, 0), // LB
    tuck(3, 1, 0),  // RB
    tuck(3, -1, 1), // B-L / L-B
    tuck(3, 1, 1),  // B-R / R-B
];

pub const MAX_TUCK_TYPES: usize = TYPES.len();

/// Offset of the rotation groups when the double-shift entries are present.
const X: usize = if cfg!(feature = "double-tuck") { 2 } else { 0 };

pub fn tuck_types(rotations: usize) -> &'static [TuckType] {
    match rotations {
        1 => &TYPES[..2 + X],
        2 => &TYPES[..7 + X],
        _ => &TYPES[..],
    }
}

pub type TuckMaskSet = [[[Frames; 10]; 4]; MAX_TUCK_TYPES];

/// For each tuck type and (rot, col), the frames on which the tuck is
/// executable: the piece fits where it is and fits (through every
/// intermediate state) where the tuck puts it.
pub fn build_tuck_masks(m: &FrameMasks, rotations: usize) -> TuckMaskSet {
    let mut ret: TuckMaskSet = [[[0; 10]; 4]; MAX_TUCK_TYPES];
    for rot in 0..rotations {
        for col in 0..10 {
            if col > 0 {
                ret[0][rot][col] = m.frame[rot][col] & m.frame[rot][col - 1];
            }
            if col < 9 {
                ret[1][rot][col] = m.frame[rot][col] & m.frame[rot][col + 1];
            }
            #[cfg(feature = "double-tuck")]
            {
                if col > 1 {
                    ret[2][rot][col] = m.frame[rot][col]
                        & m.drop[rot][col - 1]
                        & m.drop[rot][col - 1] >> 1
                        & m.frame[rot][col - 2] >> 2;
                }
                if col < 8 {
                    ret[3][rot][col] = m.frame[rot][col]
                        & m.drop[rot][col + 1]
                        & m.drop[rot][col + 1] >> 1
                        & m.frame[rot][col + 2] >> 2;
                }
            }
        }
    }
    if rotations == 1 {
        return ret;
    }
    for rot in 0..rotations {
        let nrot = (rot + 1) % rotations;
        for col in 0..10 {
            ret[X + 2][rot][col] = m.frame[rot][col] & m.frame[nrot][col];
            if col > 0 {
                ret[X + 3][rot][col] = ret[0][rot][col] & m.frame[nrot][col - 1];
                // staggered: survive the drop rotated in place or shifted
                // unrotated, then fit rotated-and-shifted one frame later
                ret[X + 5][rot][col] = m.frame[rot][col]
                    & (m.drop[nrot][col] | m.drop[rot][col - 1])
                    & m.frame[nrot][col - 1] >> 1;
            }
            if col < 9 {
                ret[X + 4][rot][col] = ret[1][rot][col] & m.frame[nrot][col + 1];
                ret[X + 6][rot][col] = m.frame[rot][col]
                    & (m.drop[nrot][col] | m.drop[rot][col + 1])
                    & m.frame[nrot][col + 1] >> 1;
            }
        }
    }
    if rotations == 2 {
        return ret;
    }
    for rot in 0..rotations {
        let nrot = (rot + 3) % rotations;
        for col in 0..10 {
            ret[X + 7][rot][col] = m.frame[rot][col] & m.frame[nrot][col];
            if col > 0 {
                ret[X + 8][rot][col] = ret[0][rot][col] & m.frame[nrot][col - 1];
                ret[X + 10][rot][col] = m.frame[rot][col]
                    & (m.drop[nrot][col] | m.drop[rot][col - 1])
                    & m.frame[nrot][col - 1] >> 1;
            }
            if col < 9 {
                ret[X + 9][rot][col] = ret[1][rot][col] & m.frame[nrot][col + 1];
                ret[X + 11][rot][col] = m.frame[rot][col]
                    & (m.drop[nrot][col] | m.drop[rot][col + 1])
                    & m.frame[nrot][col + 1] >> 1;
            }
        }
    }
    ret
}
