//! Simple autopilot for headless runs
//!
//! Serves the ball, keeps the paddle under it and cycles the paddle color to
//! match the ball. It plays through the same input latch as a human would.

use crate::platform::{InputLatch, Key};
use crate::sim::GameState;

/// Dead zone around the ball before the paddle moves
const TRACK_TOLERANCE: f32 = 4.0;

#[derive(Debug, Default)]
pub struct Autopilot {
    /// Alternates so every color cycle is a fresh key press
    cycle_held: bool,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the latch for the coming frame
    pub fn drive(&mut self, state: &GameState, input: &mut InputLatch) {
        if state.phase.is_terminal() {
            input.release_all();
            return;
        }

        if !state.ball.launched {
            input.press(Key::Launch, false);
        } else {
            input.release(Key::Launch);
        }

        let target = state.ball.pos.x;
        let center = state.paddle.center_x();
        input.release(Key::Left);
        input.release(Key::Right);
        if center < target - TRACK_TOLERANCE {
            input.press(Key::Right, true);
        } else if center > target + TRACK_TOLERANCE {
            input.press(Key::Left, true);
        }

        let matched = state
            .palette
            .same_color(state.paddle.color(), state.ball.color);
        if !matched && !state.paddle.rainbow() && !self.cycle_held {
            input.press(Key::CycleColor, false);
            self.cycle_held = true;
        } else {
            self.cycle_held = false;
        }
    }
}
