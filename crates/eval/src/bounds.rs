//! Raw-score normalisation to a 0..=100 quality reading.

use blockfit_core::Board;
use serde::{Deserialize, Serialize};

use crate::{evaluate, EvalWeights};

/// Worst and best achievable raw scores for one board size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvalBounds {
    pub min: f32,
    pub max: f32,
}

fn checkerboard(width: usize, height: usize, phase: usize) -> Board {
    let mut board = Board::new(width, height);
    for y in 0..height {
        for x in 0..width {
            if (x + y + phase) % 2 == 0 {
                board.set(x, y, Some(0));
            }
        }
    }
    board
}

impl EvalBounds {
    /// Worst case is a checkerboard (either phase), best case the empty board.
    /// Degenerate sizes where those disagree still give `min <= max`.
    pub fn for_size(width: usize, height: usize, weights: &EvalWeights) -> Self {
        let scores = [
            evaluate(&Board::new(width, height), weights),
            evaluate(&checkerboard(width, height, 0), weights),
            evaluate(&checkerboard(width, height, 1), weights),
        ];
        Self {
            min: scores.iter().copied().fold(f32::INFINITY, f32::min),
            max: scores.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        }
    }

    /// `clamp((score - min) / (max - min), 0, 1)^10 * 100`.
    /// The steep curve keeps all but near-best boards low.
    pub fn normalize(&self, score: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return if score >= self.max { 100.0 } else { 0.0 };
        }
        let t = ((score - self.min) / span).clamp(0.0, 1.0);
        t.powi(10) * 100.0
    }
}

/// Normalise with default weights for a `width` x `height` board.
pub fn normalize(score: f32, width: usize, height: usize) -> f32 {
    EvalBounds::for_size(width, height, &EvalWeights::default()).normalize(score)
}

/// How far the real search beats greedy play, in normalised points.
pub fn greedy_gap(search_eval: f32, greedy_eval: f32, width: usize, height: usize) -> f32 {
    let bounds = EvalBounds::for_size(width, height, &EvalWeights::default());
    bounds.normalize(search_eval) - bounds.normalize(greedy_eval)
}
