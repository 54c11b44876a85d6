//! Chroma Breakout - a color-matching block breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, effects, collisions, tick)
//! - `game`: Frame controller tying input, settings and sound to the sim
//! - `platform`: Keyboard latching and browser glue
//! - `renderer`: Scene building (draw commands) and the canvas backend
//! - `audio`: Sound cue sink and the WebAudio implementation
//! - `settings`: Runtime tunables
//! - `autopilot`: Input driver for headless runs

pub mod audio;
pub mod autopilot;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{SoundCue, SoundSink};
pub use game::Game;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 450.0;
    /// Ceiling line; the ball cannot rise above it and the block grid starts here
    pub const TOP_MARGIN: f32 = 50.0;

    /// Block grid
    pub const BLOCK_ROWS: usize = 5;
    pub const BLOCK_COLS: usize = 8;
    pub const BLOCK_HEIGHT: f32 = 30.0;
    pub const BLOCK_WIDTH: f32 = CANVAS_WIDTH / BLOCK_COLS as f32;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    pub const BALL_SPEED: f32 = 7.0;

    /// Paddle defaults
    pub const PADDLE_HEIGHT: f32 = 15.0;
    pub const PADDLE_WIDTH: f32 = 100.0;
    /// Gap between the paddle and the bottom edge
    pub const PADDLE_BOTTOM_GAP: f32 = 5.0;
    /// Horizontal distance per frame while a direction key is held
    pub const PADDLE_STEP: f32 = 8.0;

    /// Falling items
    pub const ITEM_SIZE: f32 = 20.0;
    pub const ITEM_SPEED: f32 = 3.0;
    pub const ITEM_DROP_CHANCE: f32 = 0.3;

    /// Effect lifetime in milliseconds
    pub const EFFECT_DURATION_MS: f64 = 15_000.0;
    /// Ball speed factor while slow motion is active near the paddle
    pub const SLOW_MOTION_FACTOR: f32 = 0.7;
    /// How far above the paddle slow motion starts to apply
    pub const SLOW_MOTION_ZONE: f32 = 50.0;

    /// Paddle y position (fixed)
    pub const PADDLE_Y: f32 = CANVAS_HEIGHT - PADDLE_HEIGHT - PADDLE_BOTTOM_GAP;
}
