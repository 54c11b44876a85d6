//! Per-frame simulation tick
//!
//! One call advances the game by one display frame. Order within a frame:
//! pause/restart → tunables → effect expiry → paddle → ball → items →
//! collisions (ball lost, walls, paddle, blocks) → stage clear. Paused and
//! terminal frames leave the state untouched, tunables included.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    PaddleContact, ball_lost, check_ball_paddle, check_ball_wall, resolve_block_hit,
};
use super::effects::EffectKind;
use super::state::{Block, GameEvent, GamePhase, GameState, Item};
use crate::Settings;
use crate::consts::*;

/// Intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held: move paddle left
    pub move_left: bool,
    /// Held: move paddle right
    pub move_right: bool,
    /// Held: launch the ball if it is resting on the paddle
    pub launch: bool,
    /// Pressed this frame: cycle paddle color
    pub cycle_color: bool,
    /// Pressed this frame: toggle pause
    pub pause: bool,
    /// Pressed this frame: restart from a terminal state
    pub restart: bool,
}

/// Advance the game by one frame. `now` is the game clock in milliseconds and
/// only drives effect expiry.
pub fn tick(state: &mut GameState, input: &TickInput, settings: &Settings, now: f64) {
    state.events.clear();

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    match state.phase {
        GamePhase::GameOver | GamePhase::StageClear => {
            if input.restart {
                apply_settings(state, settings);
                state.restart();
            }
            return;
        }
        GamePhase::Paused => return,
        GamePhase::Playing => {}
    }

    state.frame += 1;
    apply_settings(state, settings);

    // Expire effects before anything asks whether they are active
    for kind in state.effects.update(now, &mut state.paddle) {
        state.events.push(GameEvent::EffectExpired { kind });
    }
    debug_assert_eq!(
        state.paddle.rainbow(),
        state.effects.is_active(EffectKind::Rainbow)
    );

    update_paddle(state, input);
    update_ball(state, input);
    update_items(state, now);
    resolve_collisions(state);
}

/// Pull the current tunables into the state. Palette shrinkage clamps stored
/// colors; paddle width changes re-clamp the paddle position.
fn apply_settings(state: &mut GameState, settings: &Settings) {
    let settings = settings.sanitized();

    if state.palette.len() != settings.color_count {
        state.palette.resize(settings.color_count);
        state.clamp_colors();
        log::debug!("Palette resized to {} colors", state.palette.len());
    }

    if state.paddle.width() != settings.paddle_width {
        state.paddle.set_width(settings.paddle_width);
    }

    state.ball.speed = settings.ball_speed;
}

fn update_paddle(state: &mut GameState, input: &TickInput) {
    if input.move_left {
        state.paddle.move_by(-1.0, PADDLE_STEP);
    }
    if input.move_right {
        state.paddle.move_by(1.0, PADDLE_STEP);
    }
    if input.cycle_color {
        state.paddle.next_color(&state.palette);
    }
}

fn update_ball(state: &mut GameState, input: &TickInput) {
    let ball = &mut state.ball;

    if input.launch && !ball.launched {
        ball.launch();
        state.events.push(GameEvent::BallLaunched);
    }

    if !ball.launched {
        ball.follow(&state.paddle);
        return;
    }

    let near_paddle = ball.bottom() > state.paddle.y - SLOW_MOTION_ZONE;
    let multiplier = if state.effects.is_active(EffectKind::SlowMotion) && near_paddle {
        SLOW_MOTION_FACTOR
    } else {
        1.0
    };
    ball.advance(multiplier);
}

/// Move falling items; collect the ones touching the paddle and drop the ones
/// that left the playfield.
fn update_items(state: &mut GameState, now: f64) {
    let GameState {
        items,
        effects,
        paddle,
        events,
        ..
    } = state;

    items.retain_mut(|item| {
        item.fall();

        if item.collides_with(paddle) {
            effects.apply(item.kind, now, paddle);
            events.push(GameEvent::ItemCollected { kind: item.kind });
            return false;
        }

        !item.is_out_of_bounds()
    });
}

fn resolve_collisions(state: &mut GameState) {
    if ball_lost(&state.ball, CANVAS_HEIGHT) {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::BallLost);
        log::info!("Game over after {} frames", state.frame);
        return;
    }

    let wall = check_ball_wall(&mut state.ball, CANVAS_WIDTH, TOP_MARGIN);
    if wall.side {
        state.events.push(GameEvent::WallBounce);
    }
    if wall.ceiling {
        state.events.push(GameEvent::CeilingBounce);
    }

    let rainbow = state.effects.is_active(EffectKind::Rainbow);
    match check_ball_paddle(&mut state.ball, &state.paddle, &state.palette, rainbow) {
        PaddleContact::Bounce => state.events.push(GameEvent::PaddleBounce),
        PaddleContact::ColorMismatch => {
            log::trace!(
                "Paddle miss: ball color {} != paddle color {}",
                state.ball.color,
                state.paddle.color()
            );
        }
        PaddleContact::Miss => {}
    }

    let penetrating = state.effects.is_active(EffectKind::Penetration);
    if let Some(hit) = resolve_block_hit(&mut state.ball, &mut state.blocks, penetrating) {
        state.events.push(GameEvent::BlockDestroyed {
            index: hit.index,
            color: hit.color,
        });
        if let Some(item) = Item::create_random(hit.drop_point, ITEM_DROP_CHANCE, &mut state.rng) {
            log::debug!("Item {:?} dropped at {:?}", item.kind, item.pos);
            state.events.push(GameEvent::ItemSpawned { kind: item.kind });
            state.items.push(item);
        }
    }

    if state.phase == GamePhase::Playing && state.active_block_count() == 0 {
        state.phase = GamePhase::StageClear;
        state.events.push(GameEvent::StageCleared);
        log::info!("Stage {} cleared after {} frames", state.stage, state.frame);
    }
}

/// Build a fresh ROWS x COLS block grid with random palette colors
pub fn generate_stage(state: &mut GameState) {
    let colors = state.palette.len();
    let rng = &mut state.rng;

    state.blocks = (0..BLOCK_ROWS)
        .flat_map(|row| (0..BLOCK_COLS).map(move |col| (row, col)))
        .map(|(row, col)| {
            let pos = Vec2::new(
                col as f32 * BLOCK_WIDTH,
                row as f32 * BLOCK_HEIGHT + TOP_MARGIN,
            );
            Block::new(pos, rng.random_range(0..colors))
        })
        .collect();
    state.stage += 1;

    log::info!(
        "Stage {}: {} blocks, {} colors",
        state.stage,
        state.blocks.len(),
        colors
    );
}
