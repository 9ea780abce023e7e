use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use galgo_core::{Clock, Color};

use crate::engine::EngineShared;

// Fractions of the remaining clock to spend on a single move: a
// smaller slice during the opening moves, a larger one afterwards
const OPENING_DIVISOR: u32 = 20;
const LATE_DIVISOR: u32 = 13;
const OPENING_MOVES: u32 = 15;

// Computes the time budget for one move and raises the abort flag from
// a detached thread once it elapses. The searcher polls the flag
// between nodes; nothing is interrupted forcibly.
pub struct TimeManager {
    budget: Duration,
}

impl TimeManager {
    pub fn new(clock: &Clock, turn: Color, move_number: u32) -> Self {
        let budget = match clock.time_for_move {
            // A fixed per-move time overrides the side clocks
            Some(fixed) => fixed,
            None => {
                let remaining = clock.remaining(turn);
                if move_number < OPENING_MOVES {
                    remaining / OPENING_DIVISOR
                } else {
                    remaining / LATE_DIVISOR
                }
            }
        };

        Self { budget }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    // Sleeps out the budget, then aborts the search unless it already
    // finished on its own terms and lowered `should_abort`
    pub fn spawn(&self, shared: Arc<EngineShared>) {
        let budget = self.budget;
        thread::spawn(move || {
            thread::sleep(budget);
            if shared.should_abort.load(Ordering::Relaxed) {
                shared.abort.store(true, Ordering::Relaxed);
            }
        });
    }
}

///////////////////////////////////////////////////////////////////////////////
