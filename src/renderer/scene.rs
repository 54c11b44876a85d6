//! Scene building
//!
//! Flattens a `GameState` into an ordered list of 2D draw commands. The list
//! is backend-agnostic so it can be inspected in tests; the browser replays it
//! on a canvas.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{EffectKind, GamePhase, GameState, Rgb};

/// Gap left between neighbouring blocks
pub const BLOCK_INSET: f32 = 2.0;

const BACKGROUND: Rgb = Rgb::new(0, 0, 0);
const WHITE: Rgb = Rgb::new(255, 255, 255);
const GOLD: Rgb = Rgb::new(255, 215, 0);
/// Opacity of the terminal-state overlay
const SHADE_ALPHA: f32 = 0.7;

/// Left-to-right gradient stops for the rainbow paddle
pub const RAINBOW_STOPS: [(f32, Rgb); 7] = [
    (0.0, Rgb::new(255, 0, 0)),
    (0.17, Rgb::new(255, 165, 0)),
    (0.33, Rgb::new(255, 255, 0)),
    (0.5, Rgb::new(0, 128, 0)),
    (0.67, Rgb::new(0, 0, 255)),
    (0.83, Rgb::new(75, 0, 130)),
    (1.0, Rgb::new(238, 130, 238)),
];

/// How a rectangle is filled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fill {
    Solid(Rgb),
    /// Horizontal `RAINBOW_STOPS` gradient across the rectangle
    Rainbow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        pos: Vec2,
        size: Vec2,
        fill: Fill,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
    },
    Text {
        text: String,
        /// Baseline anchor
        pos: Vec2,
        /// Font size in pixels
        size: f32,
        color: Rgb,
        align: TextAlign,
    },
    /// Translucent black over the whole playfield
    Shade { alpha: f32 },
}

/// Build the draw list for one frame, back to front
pub fn build_scene(state: &GameState) -> Vec<DrawCmd> {
    let mut cmds = Vec::with_capacity(state.blocks.len() + state.items.len() + 12);

    cmds.push(DrawCmd::Rect {
        pos: Vec2::ZERO,
        size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
        fill: Fill::Solid(BACKGROUND),
    });

    for block in state.blocks.iter().filter(|b| b.active) {
        cmds.push(DrawCmd::Rect {
            pos: block.pos,
            size: block.size - Vec2::splat(BLOCK_INSET),
            fill: Fill::Solid(state.palette.color(block.color)),
        });
    }

    for item in &state.items {
        cmds.push(DrawCmd::Rect {
            pos: item.pos,
            size: Vec2::splat(ITEM_SIZE),
            fill: Fill::Solid(item.kind.color()),
        });
    }

    let paddle = &state.paddle;
    cmds.push(DrawCmd::Rect {
        pos: Vec2::new(paddle.x, paddle.y),
        size: Vec2::new(paddle.width(), paddle.height),
        fill: if paddle.rainbow() {
            Fill::Rainbow
        } else {
            Fill::Solid(state.palette.color(paddle.color()))
        },
    });

    cmds.push(DrawCmd::Circle {
        center: state.ball.pos,
        radius: state.ball.radius,
        color: state.palette.color(state.ball.color),
    });

    push_legend(&mut cmds);
    push_active_effects(state, &mut cmds);
    push_overlay(state.phase, &mut cmds);

    cmds
}

/// Item catalogue, one line per kind in its own color
fn push_legend(cmds: &mut Vec<DrawCmd>) {
    for (i, kind) in EffectKind::ALL.iter().enumerate() {
        cmds.push(DrawCmd::Text {
            text: format!("\u{25a0} {}: {}", kind.display_name(), kind.description()),
            pos: Vec2::new(10.0, 20.0 + 20.0 * i as f32),
            size: 14.0,
            color: kind.color(),
            align: TextAlign::Left,
        });
    }
}

fn push_active_effects(state: &GameState, cmds: &mut Vec<DrawCmd>) {
    let names = state.effects.active_names();
    if names.is_empty() {
        return;
    }
    cmds.push(DrawCmd::Text {
        text: format!("Active effects: {}", names.join(", ")),
        pos: Vec2::new(10.0, 80.0),
        size: 16.0,
        color: WHITE,
        align: TextAlign::Left,
    });
}

fn push_overlay(phase: GamePhase, cmds: &mut Vec<DrawCmd>) {
    let (title, color) = match phase {
        GamePhase::GameOver => ("GAME OVER", WHITE),
        GamePhase::StageClear => ("STAGE CLEAR!", GOLD),
        GamePhase::Paused => ("PAUSED", WHITE),
        GamePhase::Playing => return,
    };
    let center = Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0);

    cmds.push(DrawCmd::Shade { alpha: SHADE_ALPHA });
    cmds.push(DrawCmd::Text {
        text: title.to_string(),
        pos: center,
        size: 48.0,
        color,
        align: TextAlign::Center,
    });

    let hint = if phase.is_terminal() {
        "Press SPACE to restart"
    } else {
        "Press ESC to resume"
    };
    cmds.push(DrawCmd::Text {
        text: hint.to_string(),
        pos: center + Vec2::new(0.0, 40.0),
        size: 24.0,
        color,
        align: TextAlign::Center,
    });
}
