//! Keyboard latch

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Space: launch while playing, restart in a terminal state
    Launch,
    CycleColor,
    Pause,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "a" | "A" | "ArrowLeft" => Some(Key::Left),
            "d" | "D" | "ArrowRight" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Launch),
            "k" | "K" => Some(Key::CycleColor),
            "Escape" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// Held keys plus press edges accumulated since the last frame
#[derive(Debug, Clone, Default)]
pub struct InputLatch {
    left: bool,
    right: bool,
    launch: bool,
    /// Launch stays ignored until the key is released and pressed again
    launch_suppressed: bool,
    cycle_pressed: bool,
    pause_pressed: bool,
    launch_pressed: bool,
}

impl InputLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down. Returns whether the key is one the game uses, so
    /// the caller can suppress the browser default (page scroll on Space).
    pub fn key_down(&mut self, name: &str, repeat: bool) -> bool {
        let Some(key) = Key::from_key_name(name) else {
            return false;
        };
        self.press(key, repeat);
        true
    }

    pub fn key_up(&mut self, name: &str) -> bool {
        let Some(key) = Key::from_key_name(name) else {
            return false;
        };
        self.release(key);
        true
    }

    pub fn press(&mut self, key: Key, repeat: bool) {
        match key {
            Key::Left => self.left = true,
            Key::Right => self.right = true,
            Key::Launch => {
                self.launch = true;
                if !repeat {
                    self.launch_pressed = true;
                }
            }
            // Auto-repeat must not re-fire one-shot actions
            Key::CycleColor if !repeat => self.cycle_pressed = true,
            Key::Pause if !repeat => self.pause_pressed = true,
            Key::CycleColor | Key::Pause => {}
        }
    }

    pub fn release(&mut self, key: Key) {
        match key {
            Key::Left => self.left = false,
            Key::Right => self.right = false,
            Key::Launch => {
                self.launch = false;
                self.launch_suppressed = false;
            }
            Key::CycleColor | Key::Pause => {}
        }
    }

    /// Queue a pause toggle (window blur, hidden tab)
    pub fn request_pause(&mut self) {
        self.pause_pressed = true;
    }

    /// Drop held keys; key-ups are lost when the window loses focus
    pub fn release_all(&mut self) {
        self.left = false;
        self.right = false;
        self.launch = false;
        self.launch_suppressed = false;
    }

    /// Ignore the held launch key until it is pressed again. Used after a
    /// restart so the same Space press does not also serve the new ball.
    pub fn suppress_launch(&mut self) {
        self.launch_suppressed = true;
    }

    /// Build this frame's input and clear the press edges
    pub fn take_input(&mut self) -> TickInput {
        let input = TickInput {
            move_left: self.left,
            move_right: self.right,
            launch: self.launch && !self.launch_suppressed,
            cycle_color: self.cycle_pressed,
            pause: self.pause_pressed,
            restart: self.launch_pressed,
        };
        self.cycle_pressed = false;
        self.pause_pressed = false;
        self.launch_pressed = false;
        input
    }
}
