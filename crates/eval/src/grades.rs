//! Fragmentation histograms.
//!
//! Every cell gets an edge-difference count 0..=4: how many of its four
//! neighbours differ from it in occupancy, with off-board neighbours read
//! as occupied. Free cells are bucketed into `free`, used cells into `used`.

use blockfit_core::Board;
use blockfit_engine::{BitBoard, BitContext};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Grades {
    pub free: [u32; 5],
    pub used: [u32; 5],
}

const NEIGHBOURS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

impl Grades {
    /// Cell-by-cell reference computation.
    pub fn of_board(board: &Board) -> Self {
        let mut grades = Grades::default();
        for y in 0..board.height() as i32 {
            for x in 0..board.width() as i32 {
                let own = board.is_blocked(x, y);
                let diff = NEIGHBOURS
                    .iter()
                    .filter(|(dx, dy)| board.is_blocked(x + dx, y + dy) != own)
                    .count();
                if own {
                    grades.used[diff] += 1;
                } else {
                    grades.free[diff] += 1;
                }
            }
        }
        grades
    }

    /// Word-parallel computation: four neighbour-difference masks summed
    /// with a bitwise adder, then split into exact-count buckets.
    pub fn of_bits(ctx: &BitContext, board: BitBoard) -> Self {
        let full = ctx.full_mask();
        let b = board.bits() & full;
        let w = ctx.width() as u32;
        let first_col = ctx.column_mask(0);
        let last_col = ctx.column_mask(ctx.width() - 1);
        let first_row = ctx.row_mask(0);
        let last_row = ctx.row_mask(ctx.height() - 1);

        // neighbour occupancy seen from each cell; board edges read as occupied
        let left = ((b << 1) & !first_col) | first_col;
        let right = ((b >> 1) & !last_col) | last_col;
        let up = b.checked_shl(w).unwrap_or(0) | first_row;
        let down = b.checked_shr(w).unwrap_or(0) | last_row;

        let d1 = (left ^ b) & full;
        let d2 = (right ^ b) & full;
        let d3 = (up ^ b) & full;
        let d4 = (down ^ b) & full;

        // sum of four 1-bit lanes -> (bit2, bit1, bit0)
        let (s1, c1) = (d1 ^ d2, d1 & d2);
        let (s2, c2) = (d3 ^ d4, d3 & d4);
        let bit0 = s1 ^ s2;
        let carry = s1 & s2;
        let bit1 = c1 ^ c2 ^ carry;
        let bit2 = (c1 & c2) | (c1 & carry) | (c2 & carry);

        let buckets = [
            !bit2 & !bit1 & !bit0,
            !bit2 & !bit1 & bit0,
            !bit2 & bit1 & !bit0,
            !bit2 & bit1 & bit0,
            bit2,
        ];

        let free_cells = full & !b;
        let mut grades = Grades::default();
        for (k, mask) in buckets.iter().enumerate() {
            grades.free[k] = (mask & free_cells).count_ones();
            grades.used[k] = (mask & b).count_ones();
        }
        grades
    }

    pub fn free_cells(&self) -> u32 {
        self.free.iter().sum()
    }

    pub fn used_cells(&self) -> u32 {
        self.used.iter().sum()
    }

    /// Sum of every cell's edge-difference count.
    pub fn border_length(&self) -> u32 {
        (0..5)
            .map(|k| k as u32 * (self.free[k] + self.used[k]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        // interior 0, edges 1, corners 2
        let g = Grades::of_board(&Board::new(4, 3));
        assert_eq!(g.free, [2, 6, 4, 0, 0]);
        assert_eq!(g.used, [0; 5]);
        assert_eq!(g.border_length(), 14);
    }

    #[test]
    fn test_isolated_hole() {
        let board = Board::from_rows(&["###", "#.#", "###"]).unwrap();
        let g = Grades::of_board(&board);
        assert_eq!(g.free, [0, 0, 0, 0, 1]);
        // corners touch only used/off-board; edge midpoints touch the hole
        assert_eq!(g.used, [4, 4, 0, 0, 0]);
    }

    #[test]
    fn test_bits_match_cells() {
        let board = Board::from_rows(&["#..#.", ".##..", "....#", "#.#.#"]).unwrap();
        let ctx = BitContext::for_board(&board).unwrap();
        assert_eq!(Grades::of_bits(&ctx, ctx.encode(&board)), Grades::of_board(&board));
    }

    #[test]
    fn test_bits_single_row_board() {
        let mut board = Board::new(64, 1);
        for x in [0, 2, 3, 6, 31, 32, 54, 63] {
            board.set(x, 0, Some(1));
        }
        let ctx = BitContext::for_board(&board).unwrap();
        assert_eq!(Grades::of_bits(&ctx, ctx.encode(&board)), Grades::of_board(&board));
    }

    #[test]
    fn test_bits_single_column_board() {
        let board = Board::from_rows(&["#", ".", ".", "#", "."]).unwrap();
        let ctx = BitContext::for_board(&board).unwrap();
        assert_eq!(Grades::of_bits(&ctx, ctx.encode(&board)), Grades::of_board(&board));
    }
}
