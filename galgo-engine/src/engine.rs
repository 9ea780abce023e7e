use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use galgo_core::{Clock, HostNotify, Move, PlayResult, Position};

use crate::search::Search;
use crate::time::TimeManager;
use crate::transposition::{EvalCache, TranspositionTable};

// How long the ponder thread may keep cache entries around, in full
// moves, before its housekeeping pass drops them
const TT_MAX_AGE: u32 = 2;
const EVAL_MAX_AGE: u32 = 3;

// Nap length while waiting for a pondering thread to finish re-keying
// the caches
const CLEANSE_POLL: Duration = Duration::from_millis(100);

// State shared between the foreground search, the timer thread and the
// ponder thread. The flags are plain relaxed atomics: the only
// cross-thread requirement is that a store becomes visible eventually.
pub struct EngineShared {
    pub tt: TranspositionTable,
    pub eval_cache: EvalCache,
    // Raised by the timer, polled by the foreground search
    pub abort: AtomicBool,
    // Raised by the next search call, polled by the ponder search
    pub abort_ponder: AtomicBool,
    // Lowered when a search finishes on its own, so that a timer still
    // sleeping for it cannot abort a later search
    pub should_abort: AtomicBool,
    // Raised while the ponder thread re-keys the caches; a new search
    // spins until it clears
    pub cleanse: AtomicBool,
}

impl EngineShared {
    pub fn new() -> Self {
        Self {
            tt: TranspositionTable::new(),
            eval_cache: EvalCache::new(),
            abort: AtomicBool::new(false),
            abort_ponder: AtomicBool::new(true),
            should_abort: AtomicBool::new(false),
            cleanse: AtomicBool::new(false),
        }
    }
}

pub struct EngineConfig {
    // Deepest iteration of the foreground search
    pub max_depth: u16,
    // Deepest iteration of the background ponder search
    pub ponder_depth: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { max_depth: 9, ponder_depth: 5 }
    }
}

// Node and cutoff counters of the last search call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

// The engine owns the caches that persist across search calls and
// orchestrates the three flows of a move decision: the deepening
// search on the caller's thread, the timer that cancels it, and the
// optional ponder search that keeps thinking on the expected reply
// until the next call comes in.
pub struct GalgoEngine {
    config: EngineConfig,
    shared: Arc<EngineShared>,
    stats: SearchStats,
}

impl GalgoEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            shared: Arc::new(EngineShared::new()),
            stats: SearchStats::default(),
        }
    }

    // Picks a move for the current position within the clock's budget.
    // `ponder` keeps a background search running on the expected reply
    // after this call returns; it is cancelled by the next call.
    pub fn search<P>(&mut self, pos: &mut P, clock: &Clock, ponder: bool) -> PlayResult
    where
        P: Position + Clone + Send + 'static,
    {
        // Cancel a previous ponder search, and wait until it is done
        // re-keying the caches before probing them
        self.shared.abort_ponder.store(true, Ordering::Relaxed);
        while self.shared.cleanse.load(Ordering::Relaxed) {
            thread::sleep(CLEANSE_POLL);
        }

        self.shared.abort.store(false, Ordering::Relaxed);
        self.shared.should_abort.store(true, Ordering::Relaxed);

        let move_number = pos.fullmove_number();
        TimeManager::new(clock, pos.turn(), move_number).spawn(Arc::clone(&self.shared));

        let mut search = Search::new(&self.shared, move_number, self.config.max_depth);
        search.run(pos);

        // The search returned on its own terms or was aborted; either
        // way the still-sleeping timer has nothing left to cancel
        self.shared.should_abort.store(false, Ordering::Relaxed);

        self.stats = SearchStats { nodes: search.nodes, cutoffs: search.cutoffs };
        println!("nodes: {}, beta cutoffs: {}", search.nodes, search.cutoffs);

        let best_move = search.best_move;
        let resigned = search.resigned;

        if best_move.is_null() {
            // Aborted before the first iteration finished, or no legal
            // moves at all: any legal move is better than none
            let fallback = pos.legal_moves().first().copied().unwrap_or(Move::NULL);
            return PlayResult::new(fallback);
        }

        if ponder && !resigned {
            self.spawn_ponder(pos, best_move, move_number);
        }

        if resigned {
            PlayResult::resigning(best_move)
        } else {
            PlayResult::new(best_move)
        }
    }

    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    pub fn transposition_entries(&self) -> usize {
        self.shared.tt.len()
    }

    // Starts the background search on the position after our chosen
    // move. It also performs the periodic cache housekeeping, guarded
    // by the `cleanse` flag so the next search call cannot race it.
    fn spawn_ponder<P>(&self, pos: &P, chosen: Move, move_number: u32)
    where
        P: Position + Clone + Send + 'static,
    {
        self.shared.abort_ponder.store(false, Ordering::Relaxed);

        let shared = Arc::clone(&self.shared);
        let ponder_depth = self.config.ponder_depth;
        let mut board = pos.clone();

        thread::spawn(move || {
            shared.cleanse.store(true, Ordering::Relaxed);
            if move_number % 2 == 0 {
                shared.tt.evict_older_than(move_number, TT_MAX_AGE);
                shared.eval_cache.evict_older_than(move_number, EVAL_MAX_AGE);
            }
            shared.cleanse.store(false, Ordering::Relaxed);

            board.push(chosen);
            let mut search = Search::ponder(&shared, move_number, ponder_depth);
            search.run_ponder(&mut board);
        });
    }
}

impl Default for GalgoEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// Host events carry nothing the engine needs; the default no-op is the
// whole implementation
impl HostNotify for GalgoEngine {}

///////////////////////////////////////////////////////////////////////////////
