//! Piece kinds and NES orientation tables.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Piece {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl Piece {
    pub const ALL: [Piece; 7] = [
        Piece::I,
        Piece::O,
        Piece::T,
        Piece::S,
        Piece::Z,
        Piece::J,
        Piece::L,
    ];

    /// Distinct orientations under the NES rotation system.
    /// A advances the orientation index by 1, B by -1, both mod this count.
    pub const fn rotations(self) -> usize {
        match self {
            Piece::O => 1,
            Piece::I | Piece::S | Piece::Z => 2,
            Piece::T | Piece::J | Piece::L => 4,
        }
    }

    /// Cell offsets (column, row) at the given orientation, relative to the
    /// piece position. Row offsets grow downward; orientation 0 is the spawn
    /// shape. Cells with a negative row offset poke above the visible field
    /// when the piece sits on its top rows, which the NES allows.
    pub fn cells(self, rot: usize) -> [(i8, i8); 4] {
        debug_assert!(rot < self.rotations());
        match self {
            Piece::I => [
                [(-2, 0), (-1, 0), (0, 0), (1, 0)],
                [(0, -2), (0, -1), (0, 0), (0, 1)],
            ][rot],
            Piece::O => [(-1, 0), (0, 0), (-1, 1), (0, 1)],
            Piece::T => [
                [(-1, 0), (0, 0), (1, 0), (0, 1)],
                [(0, -1), (-1, 0), (0, 0), (0, 1)],
                [(0, -1), (-1, 0), (0, 0), (1, 0)],
                [(0, -1), (0, 0), (1, 0), (0, 1)],
            ][rot],
            Piece::S => [
                [(0, 0), (1, 0), (-1, 1), (0, 1)],
                [(-1, -1), (-1, 0), (0, 0), (0, 1)],
            ][rot],
            Piece::Z => [
                [(-1, 0), (0, 0), (0, 1), (1, 1)],
                [(0, -1), (-1, 0), (0, 0), (-1, 1)],
            ][rot],
            Piece::J => [
                [(-1, 0), (0, 0), (1, 0), (1, 1)],
                [(0, -1), (0, 0), (-1, 1), (0, 1)],
                [(-1, -1), (-1, 0), (0, 0), (1, 0)],
                [(0, -1), (1, -1), (0, 0), (0, 1)],
            ][rot],
            Piece::L => [
                [(-1, 0), (0, 0), (1, 0), (-1, 1)],
                [(-1, -1), (0, -1), (0, 0), (0, 1)],
                [(1, -1), (-1, 0), (0, 0), (1, 0)],
                [(0, -1), (0, 0), (0, 1), (1, 1)],
            ][rot],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_counts() {
        assert_eq!(Piece::O.rotations(), 1);
        assert_eq!(Piece::I.rotations(), 2);
        assert_eq!(Piece::S.rotations(), 2);
        assert_eq!(Piece::Z.rotations(), 2);
        assert_eq!(Piece::T.rotations(), 4);
        assert_eq!(Piece::J.rotations(), 4);
        assert_eq!(Piece::L.rotations(), 4);
    }

    #[test]
    fn test_cells_are_distinct() {
        for piece in Piece::ALL {
            for rot in 0..piece.rotations() {
                let cells = piece.cells(rot);
                for i in 0..4 {
                    for j in i + 1..4 {
                        assert_ne!(cells[i], cells[j], "{:?} rot {}", piece, rot);
                    }
                }
            }
        }
    }

    #[test]
    fn test_spawn_shapes_fit_at_top() {
        // orientation 0 never reaches above its own row
        for piece in Piece::ALL {
            for (_, dr) in piece.cells(0) {
                assert!(dr >= 0, "{:?}", piece);
            }
        }
    }

    #[test]
    fn test_clockwise_step_rotates_cells() {
        // A-step shapes are the clockwise image of their predecessor:
        // (dc, dr) -> (-dr, dc). Holds for every step of the four-state
        // pieces; two-state pieces snap back to a shifted spawn shape.
        for piece in [Piece::T, Piece::J, Piece::L] {
            for rot in 0..4 {
                let mut turned: Vec<(i8, i8)> = piece
                    .cells(rot)
                    .iter()
                    .map(|&(dc, dr)| (-dr, dc))
                    .collect();
                turned.sort_unstable();
                let mut next: Vec<(i8, i8)> = piece.cells((rot + 1) % 4).to_vec();
                next.sort_unstable();
                assert_eq!(turned, next, "{:?} rot {}", piece, rot);
            }
        }
        for piece in [Piece::I, Piece::S, Piece::Z] {
            let mut turned: Vec<(i8, i8)> = piece
                .cells(0)
                .iter()
                .map(|&(dc, dr)| (-dr, dc))
                .collect();
            turned.sort_unstable();
            let mut next: Vec<(i8, i8)> = piece.cells(1).to_vec();
            next.sort_unstable();
            assert_eq!(turned, next, "{:?}", piece);
        }
    }

    #[test]
    fn test_t_nub_directions() {
        assert!(Piece::T.cells(0).contains(&(0, 1))); // spawn points down
        assert!(Piece::T.cells(2).contains(&(0, -1))); // two A-steps point up
    }
}
