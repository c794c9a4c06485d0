//! blockfit search crate - best placement order for the pending bricks.
//!
//! `find_best_sequence` runs a blocking search; `SearchController` runs it
//! in the background and streams improvements. `greedy_baseline` is the
//! myopic reference the real search is measured against.

mod config;
mod controller;
mod exhaustive;
mod greedy;
pub mod playfield;
mod sequence;
mod tracker;

pub use config::SearchConfig;
pub use controller::{RequestOutcome, SearchController, SearchState, SearchStatus, SearchUpdate};
pub use exhaustive::{any_full_sequence, find_best_sequence, search_with, SearchOutcome, SearchStats};
pub use greedy::{greedy_baseline, greedy_sequence};
pub use playfield::Playfield;
pub use sequence::{permutations, MoveSequence, SequenceRank};
pub use tracker::{BestTracker, LocalBest};
