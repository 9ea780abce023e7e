use std::time::Duration;
use serde::Serialize;

use crate::Color;

// The time situation handed to the engine together with a position.
// When `time_for_move` is set it overrides the side clocks entirely;
// `increment` is carried for completeness but the engine ignores it.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Clock {
    pub time_for_move: Option<Duration>,
    pub white: Duration,
    pub black: Duration,
    pub increment: Duration,
}

impl Clock {
    // A clock with a fixed time for the next move
    pub const fn fixed(time_for_move: Duration) -> Self {
        Self {
            time_for_move: Some(time_for_move),
            white: Duration::ZERO,
            black: Duration::ZERO,
            increment: Duration::ZERO,
        }
    }

    // A clock with per-side remaining times
    pub const fn with_remaining(white: Duration, black: Duration) -> Self {
        Self { time_for_move: None, white, black, increment: Duration::ZERO }
    }

    pub const fn remaining(&self, color: Color) -> Duration {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
}
