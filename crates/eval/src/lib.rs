//! blockfit eval crate - board-quality heuristic.
//!
//! Higher is better: lots of free space, few ragged edges, no isolated
//! holes, and room left for the large reference shapes.

mod bounds;
mod grades;

pub use bounds::{greedy_gap, normalize, EvalBounds};
pub use grades::Grades;

use blockfit_core::Board;
use blockfit_engine::{BitBoard, BitContext, ReferenceShape};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Per free cell, indexed by edge-difference count.
    pub free: [i32; 5],
    /// Per used cell, indexed by edge-difference count.
    pub used: [i32; 5],
    pub square3: i32,
    /// Applied once per direction (horizontal and vertical).
    pub line5: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            free: [3, 2, 1, -2, -21],
            used: [0, -1, -2, -4, -6],
            square3: 10,
            line5: 5,
        }
    }
}

impl EvalWeights {
    pub fn shape_bonus(&self, shape: ReferenceShape) -> i32 {
        match shape {
            ReferenceShape::Square3 => self.square3,
            ReferenceShape::Line5Horizontal | ReferenceShape::Line5Vertical => self.line5,
        }
    }

    /// Histogram part of the score.
    pub fn grade_score(&self, grades: &Grades) -> i32 {
        (0..5)
            .map(|k| self.free[k] * grades.free[k] as i32 + self.used[k] * grades.used[k] as i32)
            .sum()
    }
}

/// Does a solid `w` x `h` rectangle fit on any free area of the board?
pub fn rect_fits(board: &Board, w: usize, h: usize) -> bool {
    if w > board.width() || h > board.height() {
        return false;
    }
    (0..=board.height() - h).any(|y| {
        (0..=board.width() - w)
            .any(|x| (y..y + h).all(|cy| (x..x + w).all(|cx| !board.get(cx, cy))))
    })
}

/// Score a generic board cell by cell.
pub fn evaluate(board: &Board, weights: &EvalWeights) -> f32 {
    let mut score = weights.grade_score(&Grades::of_board(board));
    for shape in ReferenceShape::ALL {
        let (w, h) = shape.dims();
        if rect_fits(board, w, h) {
            score += weights.shape_bonus(shape);
        }
    }
    score as f32
}

/// Score a bit-packed board. Identical to `evaluate` on the decoded board.
pub fn evaluate_bits(ctx: &BitContext, board: BitBoard, weights: &EvalWeights) -> f32 {
    let mut score = weights.grade_score(&Grades::of_bits(ctx, board));
    for shape in ReferenceShape::ALL {
        if ctx.fits_anywhere(board, shape) {
            score += weights.shape_bonus(shape);
        }
    }
    score as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_beats_fragmented() {
        let weights = EvalWeights::default();
        let empty = Board::new(8, 8);
        let fragmented = Board::from_rows(&[
            "#.#.#.#.", "........", "#.#.#.#.", "........", "........", "........",
            "........", "........",
        ])
        .unwrap();
        assert!(evaluate(&empty, &weights) > evaluate(&fragmented, &weights));
    }

    #[test]
    fn test_empty_board_score() {
        // 8x8: 36 interior, 24 edge, 4 corner free cells, all three bonuses
        let score = evaluate(&Board::new(8, 8), &EvalWeights::default());
        assert_eq!(score, (36 * 3 + 24 * 2 + 4 + 10 + 5 + 5) as f32);
    }

    #[test]
    fn test_bonuses_follow_free_space() {
        let weights = EvalWeights::default();
        let small = Board::new(4, 4);
        // no 5-long line and no bonus for it
        let expected = weights.grade_score(&Grades::of_board(&small)) + weights.square3;
        assert_eq!(evaluate(&small, &weights), expected as f32);
        assert!(rect_fits(&small, 3, 3));
        assert!(!rect_fits(&small, 5, 1));
    }

    #[test]
    fn test_centre_block_removes_square_bonus() {
        let board = Board::from_rows(&[".....", ".....", "..#..", ".....", "....."]).unwrap();
        assert!(!rect_fits(&board, 3, 3));
        assert!(rect_fits(&board, 5, 1));
        assert!(rect_fits(&board, 1, 5));
    }

    #[test]
    fn test_bits_agree() {
        let weights = EvalWeights::default();
        let board = Board::from_rows(&["##.....", "#......", "...##..", "...##..", "......#"]).unwrap();
        let ctx = BitContext::for_board(&board).unwrap();
        assert_eq!(
            evaluate(&board, &weights),
            evaluate_bits(&ctx, ctx.encode(&board), &weights)
        );
    }
}
