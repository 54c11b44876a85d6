//! Rendering module
//!
//! `scene` turns game state into draw commands on every target; `canvas`
//! replays them in the browser.

pub mod scene;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;
pub use scene::{DrawCmd, Fill, TextAlign, build_scene};
