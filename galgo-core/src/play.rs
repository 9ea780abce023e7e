use serde::Serialize;

use crate::Move;

// What a search hands back to the host: the move the engine wants to
// play, and whether it would rather resign than play it. A null
// `best_move` means the position had no legal moves at all; the host
// detects the terminal state itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayResult {
    pub best_move: Move,
    pub resigned: bool,
}

impl PlayResult {
    pub const fn new(best_move: Move) -> Self {
        Self { best_move, resigned: false }
    }

    pub const fn resigning(best_move: Move) -> Self {
        Self { best_move, resigned: true }
    }
}
