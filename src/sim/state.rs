//! Game state and core simulation types
//!
//! Entities are plain data plus motion primitives. Collision and effect rules
//! live in `collision` and `effects` and act on these types from outside.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectKind, EffectManager};
use super::palette::Palette;
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay (ball may still be resting on the paddle)
    Playing,
    /// Game is paused
    Paused,
    /// Ball fell past the bottom edge
    GameOver,
    /// Every block destroyed
    StageClear,
}

impl GamePhase {
    /// Game over and stage clear freeze the simulation until restart
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::StageClear)
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    /// Direction of travel; only its direction matters once launched
    pub vel: Vec2,
    /// Distance covered per frame at multiplier 1
    pub speed: f32,
    pub radius: f32,
    /// Palette index
    pub color: usize,
    pub launched: bool,
}

impl Ball {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            speed,
            radius: BALL_RADIUS,
            color: 0,
            launched: false,
        }
    }

    /// Launch up and to the right at 45 degrees. No-op once launched.
    pub fn launch(&mut self) {
        if self.launched {
            return;
        }
        self.launched = true;
        self.vel = Vec2::new(self.speed, -self.speed);
    }

    /// Velocity applied by the next `advance` call
    pub fn step_velocity(&self, speed_multiplier: f32) -> Vec2 {
        if !self.launched {
            return Vec2::ZERO;
        }
        self.vel.normalize_or_zero() * self.speed * speed_multiplier
    }

    /// Move one frame. The step length is always `speed * multiplier`,
    /// whatever magnitude `vel` carries after a paddle deflection.
    pub fn advance(&mut self, speed_multiplier: f32) {
        self.pos += self.step_velocity(speed_multiplier);
    }

    pub fn bounce_horizontal(&mut self) {
        self.vel.x = -self.vel.x;
    }

    pub fn bounce_vertical(&mut self) {
        self.vel.y = -self.vel.y;
    }

    /// Rest on top of the paddle (used every frame before launch)
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.y - self.radius);
    }

    /// Put the ball back over the paddle, unlaunched, in the default color
    pub fn reset(&mut self, paddle_x: f32, paddle_width: f32) {
        self.pos = Vec2::new(
            paddle_x + paddle_width / 2.0,
            CANVAS_HEIGHT - PADDLE_HEIGHT - self.radius,
        );
        self.vel = Vec2::ZERO;
        self.launched = false;
        self.color = 0;
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.radius
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge, kept in `[0, CANVAS_WIDTH - width]`
    pub x: f32,
    /// Top edge (fixed)
    pub y: f32,
    width: f32,
    pub height: f32,
    /// Palette index
    color: usize,
    /// Mirror of the rainbow effect, written only by `EffectManager`
    rainbow: bool,
}

impl Paddle {
    /// Centered paddle of the given width
    pub fn new(width: f32) -> Self {
        let width = width.clamp(1.0, CANVAS_WIDTH);
        Self {
            x: CANVAS_WIDTH / 2.0 - width / 2.0,
            y: PADDLE_Y,
            width,
            height: PADDLE_HEIGHT,
            color: 0,
            rainbow: false,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn color(&self) -> usize {
        self.color
    }

    pub fn rainbow(&self) -> bool {
        self.rainbow
    }

    pub(crate) fn set_rainbow(&mut self, rainbow: bool) {
        self.rainbow = rainbow;
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Largest allowed left edge
    #[inline]
    pub fn max_x(&self) -> f32 {
        (CANVAS_WIDTH - self.width).max(0.0)
    }

    /// Shift by `direction * amount`. A move that would cross either edge is
    /// rejected outright; the paddle never snaps to the wall.
    pub fn move_by(&mut self, direction: f32, amount: f32) {
        let new_x = self.x + direction * amount;
        if new_x >= 0.0 && new_x <= self.max_x() {
            self.x = new_x;
        }
    }

    /// Change width (runtime tunable) and pull `x` back into bounds
    pub fn set_width(&mut self, width: f32) {
        self.width = width.clamp(1.0, CANVAS_WIDTH);
        self.x = self.x.clamp(0.0, self.max_x());
    }

    /// Cycle to the next palette color. Disabled in rainbow mode.
    pub fn next_color(&mut self, palette: &Palette) {
        if self.rainbow {
            return;
        }
        self.color = palette.next(self.color);
    }

    /// Clamp the stored color after a palette resize
    pub fn clamp_color(&mut self, palette: &Palette) {
        self.color = palette.clamp(self.color);
    }
}

/// A block in the stage grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub pos: Vec2,
    pub size: Vec2,
    /// Palette index
    pub color: usize,
    pub active: bool,
}

impl Block {
    pub fn new(pos: Vec2, color: usize) -> Self {
        Self {
            pos,
            size: Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT),
            color,
            active: true,
        }
    }

    /// Closed-rectangle point test
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.pos + self.size;
        point.x >= self.pos.x && point.x <= max.x && point.y >= self.pos.y && point.y <= max.y
    }

    /// Where a dropped item appears: bottom center
    pub fn drop_point(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y + self.size.y)
    }
}

/// A falling power-up item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Top-left corner
    pub pos: Vec2,
    pub kind: EffectKind,
}

impl Item {
    pub fn new(pos: Vec2, kind: EffectKind) -> Self {
        Self { pos, kind }
    }

    /// Roll for a drop at `pos`. `drop_chance` of the time an item spawns,
    /// with the three kinds split evenly.
    pub fn create_random<R: Rng>(pos: Vec2, drop_chance: f32, rng: &mut R) -> Option<Self> {
        if rng.random::<f32>() >= drop_chance {
            return None;
        }
        Some(Self::new(pos, Self::kind_for_roll(rng.random::<f32>())))
    }

    /// Map a uniform roll in `[0, 1)` to an item kind
    pub fn kind_for_roll(roll: f32) -> EffectKind {
        if roll < 1.0 / 3.0 {
            EffectKind::Penetration
        } else if roll < 2.0 / 3.0 {
            EffectKind::SlowMotion
        } else {
            EffectKind::Rainbow
        }
    }

    pub fn fall(&mut self) {
        self.pos.y += ITEM_SPEED;
    }

    pub fn is_out_of_bounds(&self) -> bool {
        self.pos.y > CANVAS_HEIGHT
    }

    /// Overlap with the paddle. Only the paddle's top edge and horizontal span
    /// are tested.
    pub fn collides_with(&self, paddle: &Paddle) -> bool {
        self.pos.y + ITEM_SIZE > paddle.y
            && self.pos.x + ITEM_SIZE > paddle.x
            && self.pos.x < paddle.right()
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BallLaunched,
    /// Ball reflected off a side wall
    WallBounce,
    /// Ball pushed back down at the top margin
    CeilingBounce,
    PaddleBounce,
    BlockDestroyed { index: usize, color: usize },
    ItemSpawned { kind: EffectKind },
    ItemCollected { kind: EffectKind },
    EffectExpired { kind: EffectKind },
    BallLost,
    StageCleared,
}

/// Complete game state
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip)]
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    /// Frames simulated since the last restart
    pub frame: u64,
    pub palette: Palette,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Row-major, fixed order for the whole stage
    pub blocks: Vec<Block>,
    pub items: Vec<Item>,
    pub effects: EffectManager,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Number of stages built (initial build counts as 1)
    pub stage: u32,
}

impl GameState {
    /// Create a new game with the given seed and initial tunables
    pub fn new(seed: u64, settings: &crate::Settings) -> Self {
        let paddle = Paddle::new(settings.paddle_width);
        let mut ball = Ball::new(Vec2::ZERO, settings.ball_speed);
        ball.follow(&paddle);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame: 0,
            palette: Palette::new(settings.color_count),
            paddle,
            ball,
            blocks: Vec::new(),
            items: Vec::new(),
            effects: EffectManager::default(),
            events: Vec::new(),
            stage: 0,
        };
        super::tick::generate_stage(&mut state);
        state
    }

    pub fn active_block_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.active).count()
    }

    /// Rebuild every piece of mutable state in one step: new block grid, no
    /// items, all effects off, ball back on the paddle.
    pub fn restart(&mut self) {
        super::tick::generate_stage(self);
        self.items.clear();
        self.effects.reset(&mut self.paddle);
        self.ball.reset(self.paddle.x, self.paddle.width());
        self.events.clear();
        self.frame = 0;
        self.phase = GamePhase::Playing;
        log::info!("Restarted (stage {})", self.stage);
    }

    /// Clamp every stored color index into the current palette
    pub fn clamp_colors(&mut self) {
        let palette = self.palette;
        self.paddle.clamp_color(&palette);
        self.ball.color = palette.clamp(self.ball.color);
        for block in &mut self.blocks {
            block.color = palette.clamp(block.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_launch_once_at_45_degrees() {
        let mut ball = Ball::new(Vec2::new(100.0, 400.0), 7.0);
        ball.launch();
        assert!(ball.launched);
        assert_eq!(ball.vel, Vec2::new(7.0, -7.0));

        ball.bounce_horizontal();
        ball.launch();
        assert_eq!(ball.vel, Vec2::new(-7.0, -7.0), "second launch is ignored");
    }

    #[test]
    fn test_unlaunched_ball_does_not_move() {
        let mut ball = Ball::new(Vec2::new(100.0, 400.0), 7.0);
        ball.advance(1.0);
        assert_eq!(ball.pos, Vec2::new(100.0, 400.0));
        assert_eq!(ball.step_velocity(1.0), Vec2::ZERO);
    }

    #[test]
    fn test_step_length_equals_speed() {
        let mut ball = Ball::new(Vec2::new(100.0, 400.0), 7.0);
        ball.launch();
        let start = ball.pos;
        ball.advance(1.0);
        assert!(((ball.pos - start).length() - 7.0).abs() < 1e-4);

        // A deflection that changes |vel| does not change the step length
        ball.vel = Vec2::new(7.0 * 0.4, -7.0);
        let start = ball.pos;
        ball.advance(0.7);
        assert!(((ball.pos - start).length() - 4.9).abs() < 1e-4);
    }

    #[test]
    fn test_reset() {
        let mut ball = Ball::new(Vec2::new(10.0, 10.0), 7.0);
        ball.launch();
        ball.color = 2;
        ball.reset(200.0, 100.0);
        assert_eq!(ball.pos, Vec2::new(250.0, CANVAS_HEIGHT - PADDLE_HEIGHT - BALL_RADIUS));
        assert_eq!(ball.vel, Vec2::ZERO);
        assert!(!ball.launched);
        assert_eq!(ball.color, 0);
    }

    #[test]
    fn test_paddle_move_rejected_at_edges() {
        let mut paddle = Paddle::new(100.0);
        paddle.x = 4.0;
        paddle.move_by(-1.0, 8.0);
        assert_eq!(paddle.x, 4.0, "move past the left wall is rejected, not clamped");

        paddle.x = CANVAS_WIDTH - 100.0 - 3.0;
        paddle.move_by(1.0, 8.0);
        assert_eq!(paddle.x, CANVAS_WIDTH - 103.0);

        paddle.move_by(1.0, 3.0);
        assert_eq!(paddle.x, CANVAS_WIDTH - 100.0, "landing exactly on the edge is allowed");
    }

    #[test]
    fn test_paddle_next_color_disabled_in_rainbow() {
        let palette = Palette::new(4);
        let mut paddle = Paddle::new(100.0);
        paddle.next_color(&palette);
        assert_eq!(paddle.color(), 1);

        paddle.set_rainbow(true);
        paddle.next_color(&palette);
        assert_eq!(paddle.color(), 1);

        paddle.set_rainbow(false);
        for _ in 0..3 {
            paddle.next_color(&palette);
        }
        assert_eq!(paddle.color(), 0);
    }

    #[test]
    fn test_paddle_width_change_reclamps() {
        let mut paddle = Paddle::new(100.0);
        paddle.x = CANVAS_WIDTH - 100.0;
        paddle.set_width(200.0);
        assert_eq!(paddle.x, CANVAS_WIDTH - 200.0);
    }

    #[test]
    fn test_block_contains_corners() {
        let block = Block::new(Vec2::new(75.0, 50.0), 0);
        assert!(block.contains(Vec2::new(75.0, 50.0)));
        assert!(block.contains(Vec2::new(150.0, 80.0)));
        assert!(!block.contains(Vec2::new(74.9, 60.0)));
        assert!(!block.contains(Vec2::new(100.0, 80.1)));
        assert_eq!(block.drop_point(), Vec2::new(112.5, 80.0));
    }

    #[test]
    fn test_item_kind_thresholds() {
        assert_eq!(Item::kind_for_roll(0.0), EffectKind::Penetration);
        assert_eq!(Item::kind_for_roll(0.333), EffectKind::Penetration);
        assert_eq!(Item::kind_for_roll(0.334), EffectKind::SlowMotion);
        assert_eq!(Item::kind_for_roll(0.666), EffectKind::SlowMotion);
        assert_eq!(Item::kind_for_roll(0.667), EffectKind::Rainbow);
        assert_eq!(Item::kind_for_roll(0.999), EffectKind::Rainbow);
    }

    #[test]
    fn test_item_drop_chance_extremes() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            assert!(Item::create_random(Vec2::ZERO, 1.0, &mut rng).is_some());
            assert!(Item::create_random(Vec2::ZERO, 0.0, &mut rng).is_none());
        }
    }

    #[test]
    fn test_item_kind_distribution() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0usize; 3];
        let samples = 30_000;
        for _ in 0..samples {
            let item = Item::create_random(Vec2::ZERO, 1.0, &mut rng).unwrap();
            let slot = EffectKind::ALL.iter().position(|k| *k == item.kind).unwrap();
            counts[slot] += 1;
        }
        for count in counts {
            let share = count as f64 / samples as f64;
            assert!((share - 1.0 / 3.0).abs() < 0.02, "share {share} too far from 1/3");
        }
    }

    #[test]
    fn test_item_falls_and_leaves() {
        let mut item = Item::new(Vec2::new(10.0, CANVAS_HEIGHT - 1.0), EffectKind::Rainbow);
        assert!(!item.is_out_of_bounds());
        item.fall();
        assert!(item.is_out_of_bounds());
    }

    #[test]
    fn test_item_paddle_overlap() {
        let paddle = Paddle::new(100.0);
        let above = Item::new(Vec2::new(paddle.x, paddle.y - ITEM_SIZE), EffectKind::Rainbow);
        assert!(!above.collides_with(&paddle), "touching the top edge is not overlap");

        let touching = Item::new(Vec2::new(paddle.x, paddle.y - ITEM_SIZE + 1.0), EffectKind::Rainbow);
        assert!(touching.collides_with(&paddle));

        let left = Item::new(Vec2::new(paddle.x - ITEM_SIZE, paddle.y), EffectKind::Rainbow);
        assert!(!left.collides_with(&paddle));

        let right = Item::new(Vec2::new(paddle.right(), paddle.y), EffectKind::Rainbow);
        assert!(!right.collides_with(&paddle));
    }

    #[test]
    fn test_new_state_builds_grid() {
        let state = GameState::new(1, &crate::Settings::default());
        assert_eq!(state.blocks.len(), BLOCK_ROWS * BLOCK_COLS);
        assert_eq!(state.active_block_count(), BLOCK_ROWS * BLOCK_COLS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(!state.ball.launched);
        assert_eq!(state.stage, 1);
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_bounds(
            width in 40.0f32..300.0,
            moves in proptest::collection::vec((any::<bool>(), 0.0f32..50.0), 0..200),
        ) {
            let mut paddle = Paddle::new(width);
            for (right, amount) in moves {
                let before = paddle.x;
                paddle.move_by(if right { 1.0 } else { -1.0 }, amount);
                prop_assert!(paddle.x >= 0.0 && paddle.x <= CANVAS_WIDTH - width);
                // Either the full move happened or nothing did
                let delta = (paddle.x - before).abs();
                prop_assert!(delta == 0.0 || (delta - amount).abs() < 1e-3);
            }
        }
    }
}
