//! Ordered placements and the ranking used to pick between them.

use std::cmp::Ordering;

use blockfit_core::OffsetBrick;
use serde::{Deserialize, Serialize};

/// Placements in play order with the evaluation after each step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MoveSequence {
    pub placements: Vec<OffsetBrick>,
    /// `evaluations[i]` scores the board after `placements[i]`.
    pub evaluations: Vec<f32>,
}

/// Sort key of a sequence: final evaluation, then the best evaluation seen
/// on the way, then the sum of all step evaluations.
#[derive(Clone, Copy, Debug)]
pub struct SequenceRank {
    pub final_eval: f32,
    pub max_intermediate: f32,
    pub sum: f32,
}

impl SequenceRank {
    pub const WORST: Self = Self {
        final_eval: f32::NEG_INFINITY,
        max_intermediate: f32::NEG_INFINITY,
        sum: f32::NEG_INFINITY,
    };
}

impl Ord for SequenceRank {
    fn cmp(&self, other: &Self) -> Ordering {
        self.final_eval
            .total_cmp(&other.final_eval)
            .then(self.max_intermediate.total_cmp(&other.max_intermediate))
            .then(self.sum.total_cmp(&other.sum))
    }
}

impl PartialOrd for SequenceRank {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SequenceRank {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SequenceRank {}

impl MoveSequence {
    pub fn new(placements: Vec<OffsetBrick>, evaluations: Vec<f32>) -> Self {
        debug_assert_eq!(placements.len(), evaluations.len());
        Self {
            placements,
            evaluations,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Evaluation of the board after the last placement.
    pub fn final_eval(&self) -> f32 {
        self.evaluations.last().copied().unwrap_or(f32::NEG_INFINITY)
    }

    /// Highest evaluation over every step, the last one included.
    pub fn max_intermediate(&self) -> f32 {
        self.evaluations
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn eval_sum(&self) -> f32 {
        self.evaluations.iter().sum()
    }

    pub fn rank(&self) -> SequenceRank {
        SequenceRank {
            final_eval: self.final_eval(),
            max_intermediate: self.max_intermediate(),
            sum: self.eval_sum(),
        }
    }

    /// Strictly better by rank.
    #[inline]
    pub fn outranks(&self, other: &MoveSequence) -> bool {
        self.rank() > other.rank()
    }
}

/// Every ordering of `items`, in lexicographic order of positions.
/// An empty slice has exactly one (empty) ordering.
pub fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.is_empty() {
        return vec![Vec::new()];
    }
    let mut out = Vec::new();
    for (i, head) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfit_core::Brick;

    fn seq(evals: &[f32]) -> MoveSequence {
        let dot = Brick::rect(1, 1).unwrap();
        let placements = (0..evals.len())
            .map(|i| OffsetBrick::new(dot.clone(), i as i32, 0))
            .collect();
        MoveSequence::new(placements, evals.to_vec())
    }

    #[test]
    fn test_permutations_of_three() {
        let perms = permutations(&['a', 'b', 'c']);
        assert_eq!(perms.len(), 6);
        for (i, p) in perms.iter().enumerate() {
            assert_eq!(p.len(), 3);
            assert!(perms[i + 1..].iter().all(|q| q != p));
        }
        assert_eq!(perms[0], vec!['a', 'b', 'c']);
        assert_eq!(perms[5], vec!['c', 'b', 'a']);
    }

    #[test]
    fn test_permutations_of_nothing() {
        let perms = permutations::<u8>(&[]);
        assert_eq!(perms, vec![Vec::<u8>::new()]);
    }

    #[test]
    fn test_final_eval_dominates() {
        assert!(seq(&[0.0, 0.0, 11.0]).outranks(&seq(&[90.0, 90.0, 10.0])));
    }

    #[test]
    fn test_tie_break_on_max_then_sum() {
        // same final, higher peak wins
        assert!(seq(&[50.0, 10.0]).outranks(&seq(&[20.0, 10.0])));
        // same final and peak, higher sum wins
        assert!(seq(&[5.0, 40.0, 30.0, 40.0]).outranks(&seq(&[1.0, 40.0, 30.0, 40.0])));
        let a = seq(&[3.0, 4.0]);
        assert!(!a.outranks(&a.clone()));
        assert_eq!(a.rank(), a.clone().rank());
    }

    #[test]
    fn test_rank_accessors() {
        let s = seq(&[4.0, 9.0, 6.0]);
        assert_eq!(s.final_eval(), 6.0);
        assert_eq!(s.max_intermediate(), 9.0);
        assert_eq!(s.eval_sum(), 19.0);
        assert!(SequenceRank::WORST < s.rank());
    }
}
