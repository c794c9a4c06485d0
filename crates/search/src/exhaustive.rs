//! Permutation-aware exhaustive search over the pending bricks.
//!
//! Every brick is placed exactly once, in any order, at every legal
//! position; each full placement is scored on the final board. Accepted
//! candidates are re-ranked over the orderings of their own placements.

use std::sync::atomic::{AtomicUsize, Ordering};

use blockfit_core::{Board, Brick, OffsetBrick};
use blockfit_engine::BitContext;
use blockfit_eval::EvalWeights;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::playfield::{BitField, GenericField, Playfield};
use crate::tracker::{BestTracker, LocalBest};
use crate::{permutations, MoveSequence, SearchConfig};

/// Brick indices still to place.
type Remaining = SmallVec<[usize; 4]>;
/// (brick index, placement) in play order.
type Path<P> = SmallVec<[(usize, P); 4]>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// First-level placements explored.
    pub units: usize,
    /// Full placements scored.
    pub evaluated: u64,
    /// Candidates that replaced the best.
    pub accepted: u64,
}

impl SearchStats {
    fn merge(self, other: Self) -> Self {
        Self {
            units: self.units + other.units,
            evaluated: self.evaluated + other.evaluated,
            accepted: self.accepted + other.accepted,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SearchOutcome {
    pub best: Option<MoveSequence>,
    pub stats: SearchStats,
}

/// Best sequence placing every brick, or `None` when no order fits them all.
pub fn find_best_sequence(board: &Board, bricks: &[Brick], config: &SearchConfig) -> SearchOutcome {
    let tracker = LocalBest::new();
    let stats = search_with(board, bricks, config, &tracker);
    SearchOutcome {
        best: tracker.into_inner(),
        stats,
    }
}

/// Run the search, reporting candidates and progress into `tracker`.
pub fn search_with<T: BestTracker>(
    board: &Board,
    bricks: &[Brick],
    config: &SearchConfig,
    tracker: &T,
) -> SearchStats {
    if bricks.is_empty() {
        return SearchStats::default();
    }

    if config.bit_board && BitContext::supports(board.width(), board.height()) {
        if let Ok(ctx) = BitContext::for_board(board) {
            let root = BitField::new(&ctx, board, &config.weights);
            let explorer = Explorer::new(&root, bricks, config, tracker);
            debug!(
                "search {}x{} bricks={} path=bit units={}",
                board.width(),
                board.height(),
                bricks.len(),
                explorer.units.len()
            );
            return explorer.run_sequential();
        }
    }

    let root = GenericField::new(board.clone(), &config.weights);
    let explorer = Explorer::new(&root, bricks, config, tracker);
    debug!(
        "search {}x{} bricks={} path=generic parallel={} units={}",
        board.width(),
        board.height(),
        bricks.len(),
        config.parallel,
        explorer.units.len()
    );
    if config.parallel {
        explorer.run_parallel()
    } else {
        explorer.run_sequential()
    }
}

struct Explorer<'a, F: Playfield, T> {
    root: &'a F,
    bricks: &'a [Brick],
    config: &'a SearchConfig,
    tracker: &'a T,
    /// Legal placements of each brick on the initial board.
    units: Vec<(usize, F::Placement)>,
    done: AtomicUsize,
}

impl<'a, F: Playfield, T: BestTracker> Explorer<'a, F, T> {
    fn new(root: &'a F, bricks: &'a [Brick], config: &'a SearchConfig, tracker: &'a T) -> Self {
        let units = bricks
            .iter()
            .enumerate()
            .flat_map(|(i, brick)| {
                root.legal_placements(brick)
                    .into_iter()
                    .map(move |p| (i, p))
            })
            .collect();
        Self {
            root,
            bricks,
            config,
            tracker,
            units,
            done: AtomicUsize::new(0),
        }
    }

    fn run_sequential(&self) -> SearchStats {
        self.units
            .iter()
            .map(|unit| self.run_unit(unit))
            .fold(SearchStats::default(), SearchStats::merge)
    }

    fn run_parallel(&self) -> SearchStats {
        self.units
            .par_iter()
            .map(|unit| self.run_unit(unit))
            .reduce(SearchStats::default, SearchStats::merge)
    }

    fn run_unit(&self, (first, placement): &(usize, F::Placement)) -> SearchStats {
        let mut stats = SearchStats {
            units: 1,
            ..SearchStats::default()
        };
        if !self.tracker.is_stale() {
            let all: Remaining = (0..self.bricks.len()).collect();
            self.step(self.root, &all, *first, placement, &mut Path::new(), &mut stats);
        }
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.tracker.unit_done(done, self.units.len());
        stats
    }

    /// Place `remaining[pos]` at `placement` and recurse on what is left.
    fn step(
        &self,
        field: &F,
        remaining: &Remaining,
        pos: usize,
        placement: &F::Placement,
        path: &mut Path<F::Placement>,
        stats: &mut SearchStats,
    ) {
        let Some((next, lines)) = field.place(placement) else {
            return;
        };
        let mut rest = remaining.clone();
        let brick = rest.remove(pos);

        // a clear-free non-first brick is not deferred to second-last
        if self.config.force_clear_before_last && rest.len() == 1 && pos != 0 && lines == 0 {
            return;
        }

        path.push((brick, placement.clone()));
        if rest.is_empty() {
            self.leaf(&next, path, stats);
        } else if !self.tracker.is_stale() {
            for (pos, &index) in rest.iter().enumerate() {
                for p in next.legal_placements(&self.bricks[index]) {
                    self.step(&next, &rest, pos, &p, path, stats);
                }
            }
        }
        path.pop();
    }

    fn leaf(&self, field: &F, path: &Path<F::Placement>, stats: &mut SearchStats) {
        stats.evaluated += 1;
        if !self.tracker.improves(field.evaluate()) {
            return;
        }
        let placed: Vec<OffsetBrick> = path
            .iter()
            .map(|(i, p)| self.root.offset_brick(&self.bricks[*i], p))
            .collect();
        let Some(candidate) = self.rank_orderings(&placed) else {
            return;
        };
        let final_eval = candidate.final_eval();
        if self.tracker.offer(candidate) {
            stats.accepted += 1;
            trace!("new best final={final_eval}");
        }
    }

    /// Best legal ordering of the chosen placements. Ties keep the
    /// earlier ordering, so the order found by the search wins them.
    fn rank_orderings(&self, placed: &[OffsetBrick]) -> Option<MoveSequence> {
        if !self.config.rerank_permutations {
            return replay(self.root, placed);
        }
        permutations(placed)
            .iter()
            .filter_map(|order| replay(self.root, order))
            .fold(None, |best: Option<MoveSequence>, seq| match best {
                Some(b) if !seq.outranks(&b) => Some(b),
                _ => Some(seq),
            })
    }
}

/// Play `order` from `root`, scoring every step; `None` if any step is illegal.
pub(crate) fn replay<F: Playfield>(root: &F, order: &[OffsetBrick]) -> Option<MoveSequence> {
    let (first, rest) = order.split_first()?;
    let (mut field, _) = root.place(&root.placement_of(first)?)?;
    let mut evaluations = Vec::with_capacity(order.len());
    evaluations.push(field.evaluate());
    for placed in rest {
        let (next, _) = field.place(&field.placement_of(placed)?)?;
        field = next;
        evaluations.push(field.evaluate());
    }
    Some(MoveSequence::new(order.to_vec(), evaluations))
}

/// Can every brick be placed in some order? `false` means the game is lost.
pub fn any_full_sequence(board: &Board, bricks: &[Brick]) -> bool {
    let weights = EvalWeights::default();
    let all: Remaining = (0..bricks.len()).collect();
    match BitContext::for_board(board) {
        Ok(ctx) => fits_all(&BitField::new(&ctx, board, &weights), bricks, &all),
        Err(_) => fits_all(&GenericField::new(board.clone(), &weights), bricks, &all),
    }
}

fn fits_all<F: Playfield>(field: &F, bricks: &[Brick], remaining: &Remaining) -> bool {
    if remaining.is_empty() {
        return true;
    }
    remaining.iter().enumerate().any(|(pos, &index)| {
        let mut rest = remaining.clone();
        rest.remove(pos);
        field
            .legal_placements(&bricks[index])
            .iter()
            .filter_map(|p| field.place(p))
            .any(|(next, _)| fits_all(&next, bricks, &rest))
    })
}
