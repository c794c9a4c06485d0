//! Shared "best so far" state the search reports into.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::MoveSequence;

/// Where candidates go. Implementations serialise check-then-replace
/// behind one lock so concurrent units cannot interleave; `improves` is a
/// lock-free pre-check and may be stale, `offer` decides.
pub trait BestTracker: Sync {
    /// The request this search serves has been superseded.
    fn is_stale(&self) -> bool {
        false
    }

    /// Would a sequence ending at `final_eval` be accepted right now?
    fn improves(&self, final_eval: f32) -> bool;

    /// Replace the best if `candidate` still improves on it.
    fn offer(&self, candidate: MoveSequence) -> bool;

    /// `done` of `total` first-level units have been explored.
    fn unit_done(&self, _done: usize, _total: usize) {}
}

/// Acceptance rule: the final evaluation must strictly improve.
#[inline]
pub(crate) fn replaces(current: Option<&MoveSequence>, final_eval: f32) -> bool {
    current.map_or(true, |best| final_eval > best.final_eval())
}

/// Final evaluation of the current best as raw `f32` bits, read by every
/// leaf without taking the lock. Written only while the lock is held.
#[derive(Debug)]
pub(crate) struct BestFinal(AtomicU32);

impl Default for BestFinal {
    fn default() -> Self {
        Self(AtomicU32::new(f32::NEG_INFINITY.to_bits()))
    }
}

impl BestFinal {
    #[inline]
    pub(crate) fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn improves(&self, final_eval: f32) -> bool {
        final_eval > self.get()
    }

    #[inline]
    pub(crate) fn set(&self, final_eval: f32) {
        self.0.store(final_eval.to_bits(), Ordering::Relaxed);
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Tracker for a plain blocking search.
#[derive(Debug, Default)]
pub struct LocalBest {
    best: Mutex<Option<MoveSequence>>,
    best_final: BestFinal,
}

impl LocalBest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn best(&self) -> Option<MoveSequence> {
        lock(&self.best).clone()
    }

    pub fn into_inner(self) -> Option<MoveSequence> {
        self.best
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl BestTracker for LocalBest {
    fn improves(&self, final_eval: f32) -> bool {
        self.best_final.improves(final_eval)
    }

    fn offer(&self, candidate: MoveSequence) -> bool {
        let mut best = lock(&self.best);
        let final_eval = candidate.final_eval();
        if replaces(best.as_ref(), final_eval) {
            *best = Some(candidate);
            self.best_final.set(final_eval);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfit_core::{Brick, OffsetBrick};

    fn seq(evals: &[f32]) -> MoveSequence {
        let dot = Brick::rect(1, 1).unwrap();
        let placements = (0..evals.len())
            .map(|i| OffsetBrick::new(dot.clone(), 0, i as i32))
            .collect();
        MoveSequence::new(placements, evals.to_vec())
    }

    #[test]
    fn test_strict_improvement_only() {
        let tracker = LocalBest::new();
        assert!(tracker.improves(f32::MIN));
        assert!(tracker.offer(seq(&[1.0, 5.0])));
        assert!(!tracker.improves(5.0));
        // equal final is rejected even with a better peak
        assert!(!tracker.offer(seq(&[9.0, 5.0])));
        assert!(tracker.offer(seq(&[5.5])));
        assert_eq!(tracker.into_inner().map(|s| s.final_eval()), Some(5.5));
    }

    #[test]
    fn test_best_final_bits() {
        let best = BestFinal::default();
        assert!(best.improves(f32::MIN));
        best.set(-123.0);
        assert_eq!(best.get(), -123.0);
        assert!(!best.improves(-123.0));
        assert!(best.improves(-122.5));
    }

    #[test]
    fn test_concurrent_offers_keep_maximum() {
        let tracker = LocalBest::new();
        std::thread::scope(|scope| {
            for t in 0..4 {
                let tracker = &tracker;
                scope.spawn(move || {
                    for i in 0..200 {
                        let eval = ((i * 7 + t * 13) % 500) as f32;
                        if tracker.improves(eval) {
                            tracker.offer(seq(&[eval]));
                        }
                    }
                });
            }
        });
        assert!(!tracker.improves(499.0));
        assert!(tracker.improves(499.5));
        assert_eq!(tracker.best().map(|s| s.final_eval()), Some(499.0));
    }
}
