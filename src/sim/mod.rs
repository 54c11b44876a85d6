//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, driven by the caller
//! - Seeded RNG only
//! - Stable iteration order (blocks in row-major order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod effects;
pub mod palette;
pub mod state;
pub mod tick;

pub use collision::{
    BlockHit, PaddleContact, WallContact, ball_lost, check_ball_block, check_ball_paddle,
    check_ball_wall, paddle_deflection, resolve_block_hit,
};
pub use effects::{EffectKind, EffectManager, EffectSlot};
pub use palette::{BASE_COLORS, Palette, Rgb};
pub use state::{Ball, Block, GameEvent, GamePhase, GameState, Item, Paddle};
pub use tick::{TickInput, generate_stage, tick};
