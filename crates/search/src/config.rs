use blockfit_eval::EvalWeights;
use serde::{Deserialize, Serialize};

/// Knobs for `find_best_sequence` and the controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// With two bricks left, skip placing a non-first brick next unless it
    /// clears a line. Lossy: whenever a line clear depends on the skipped
    /// ordering the best sequence can be missed, and the result may then
    /// score below `greedy_baseline`. Turn off for a true optimum.
    pub force_clear_before_last: bool,
    /// Reorder each accepted candidate's placements by the sequence ranking.
    pub rerank_permutations: bool,
    /// Fan the generic path out over rayon, one unit per first placement.
    pub parallel: bool,
    /// Use the single-word board whenever the size allows it.
    pub bit_board: bool,
    pub weights: EvalWeights,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            force_clear_before_last: true,
            rerank_permutations: true,
            parallel: true,
            bit_board: true,
            weights: EvalWeights::default(),
        }
    }
}

impl SearchConfig {
    /// No pruning: every ordering of every placement is visited.
    pub fn exhaustive() -> Self {
        Self {
            force_clear_before_last: false,
            ..Self::default()
        }
    }

    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }
}
