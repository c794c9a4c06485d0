//! Background search with cooperative cancellation.
//!
//! The controller owns one request token (board + pending bricks). A new,
//! different request bumps the generation, wipes the published best and
//! progress and installs the new token, all under the lock that also guards
//! best tracking. Workers compare their generation under that same lock
//! before publishing anything, so a superseded search can never reach the
//! caller again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use blockfit_core::{Board, Brick};
use log::{debug, error, info};

use crate::tracker::{lock, replaces, BestFinal, BestTracker};
use crate::{search_with, MoveSequence, SearchConfig, SearchStats};

/// Published on every improvement, every finished unit and at completion.
#[derive(Clone, Debug)]
pub struct SearchUpdate {
    /// 0.0..=1.0, share of first-level placements explored.
    pub progress: f32,
    pub best: Option<MoveSequence>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Running,
    /// Done, result not yet taken.
    Finished,
}

#[derive(Clone, Debug)]
pub struct SearchStatus {
    pub state: SearchState,
    pub progress: f32,
    pub best: Option<MoveSequence>,
}

#[derive(Debug)]
pub enum RequestOutcome {
    /// A search for this request started; updates arrive on the receiver.
    Started(Receiver<SearchUpdate>),
    /// The same board and bricks are already being searched.
    Duplicate,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SearchToken {
    board: Board,
    bricks: Vec<Brick>,
}

#[derive(Debug)]
struct Shared {
    token: Option<SearchToken>,
    generation: u64,
    running: bool,
    progress: f32,
    best: Option<MoveSequence>,
    listener: Option<Sender<SearchUpdate>>,
    stop: Arc<AtomicBool>,
}

impl Shared {
    fn publish(&self) {
        if let Some(tx) = &self.listener {
            // a dropped receiver just means nobody is listening
            let _ = tx.send(SearchUpdate {
                progress: self.progress,
                best: self.best.clone(),
            });
        }
    }

    /// Invalidate whatever is in flight and return to a blank state.
    fn reset(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        self.generation += 1;
        self.token = None;
        self.running = false;
        self.progress = 0.0;
        self.best = None;
        self.listener = None;
    }
}

pub struct SearchController {
    config: SearchConfig,
    shared: Arc<Mutex<Shared>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl SearchController {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            shared: Arc::new(Mutex::new(Shared {
                token: None,
                generation: 0,
                running: false,
                progress: 0.0,
                best: None,
                listener: None,
                stop: Arc::new(AtomicBool::new(false)),
            })),
            worker: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Start searching `board` with `bricks`, superseding any other request.
    pub fn request(&self, board: &Board, bricks: &[Brick]) -> RequestOutcome {
        let token = SearchToken {
            board: board.clone(),
            bricks: bricks.to_vec(),
        };
        let (tx, rx) = mpsc::channel();

        let tracker = {
            let mut shared = lock(&self.shared);
            if shared.token.as_ref() == Some(&token) {
                debug!("duplicate search request ignored");
                return RequestOutcome::Duplicate;
            }
            shared.reset();
            shared.token = Some(token);
            shared.running = true;
            shared.listener = Some(tx);
            shared.stop = Arc::new(AtomicBool::new(false));
            RequestTracker {
                shared: Arc::clone(&self.shared),
                generation: shared.generation,
                stop: Arc::clone(&shared.stop),
                best_final: BestFinal::default(),
            }
        };

        let config = self.config.clone();
        let board = board.clone();
        let bricks = bricks.to_vec();
        let spawned = thread::Builder::new()
            .name("blockfit-search".into())
            .spawn(move || {
                let started = Instant::now();
                let stats = search_with(&board, &bricks, &config, &tracker);
                tracker.finish(stats, started.elapsed());
            });

        match spawned {
            Ok(handle) => *lock(&self.worker) = Some(handle),
            Err(e) => {
                error!("failed to spawn search worker: {e}");
                lock(&self.shared).reset();
            }
        }
        RequestOutcome::Started(rx)
    }

    pub fn snapshot(&self) -> SearchStatus {
        let shared = lock(&self.shared);
        let state = match (&shared.token, shared.running) {
            (None, _) => SearchState::Idle,
            (Some(_), true) => SearchState::Running,
            (Some(_), false) => SearchState::Finished,
        };
        SearchStatus {
            state,
            progress: shared.progress,
            best: shared.best.clone(),
        }
    }

    /// Block until the latest search finishes; returns its best.
    pub fn wait(&self) -> Option<MoveSequence> {
        let handle = lock(&self.worker).take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("search worker panicked");
            }
        }
        self.snapshot().best
    }

    /// Consume a finished result and go idle. `None` while still running.
    pub fn take_result(&self) -> Option<MoveSequence> {
        let mut shared = lock(&self.shared);
        if shared.running || shared.token.is_none() {
            return None;
        }
        let best = shared.best.take();
        shared.reset();
        best
    }

    /// Abandon the current request, if any.
    pub fn cancel(&self) {
        let mut shared = lock(&self.shared);
        if shared.token.is_some() {
            debug!("search cancelled");
        }
        shared.reset();
    }
}

impl Default for SearchController {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        lock(&self.shared).reset();
    }
}

/// One request's view of the shared state.
struct RequestTracker {
    shared: Arc<Mutex<Shared>>,
    generation: u64,
    stop: Arc<AtomicBool>,
    /// Mirrors `Shared::best` for this request only.
    best_final: BestFinal,
}

impl RequestTracker {
    fn finish(&self, stats: SearchStats, elapsed: Duration) {
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation {
            debug!("stale search finished after {elapsed:?}, result dropped");
            return;
        }
        shared.running = false;
        shared.progress = 1.0;
        shared.publish();
        // closes the stream
        shared.listener = None;
        info!(
            "search finished in {elapsed:?}: {} units, {} boards evaluated, {} improvements, best={:?}",
            stats.units,
            stats.evaluated,
            stats.accepted,
            shared.best.as_ref().map(|s| s.final_eval())
        );
    }
}

impl BestTracker for RequestTracker {
    fn is_stale(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn improves(&self, final_eval: f32) -> bool {
        !self.is_stale() && self.best_final.improves(final_eval)
    }

    fn offer(&self, candidate: MoveSequence) -> bool {
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation {
            debug!("dropping candidate from a superseded search");
            return false;
        }
        let final_eval = candidate.final_eval();
        if !replaces(shared.best.as_ref(), final_eval) {
            return false;
        }
        shared.best = Some(candidate);
        self.best_final.set(final_eval);
        shared.publish();
        true
    }

    fn unit_done(&self, done: usize, total: usize) {
        let mut shared = lock(&self.shared);
        if shared.generation != self.generation || total == 0 {
            return;
        }
        let progress = done as f32 / total as f32;
        if progress > shared.progress {
            shared.progress = progress;
            shared.publish();
        }
    }
}
