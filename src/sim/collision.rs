//! Collision detection and response
//!
//! Stateless resolution functions. Each takes the entities it inspects, mutates
//! the ball (and block) on a hit and reports what happened. The tick calls them
//! once per frame in a fixed order: ball lost, walls, paddle, blocks.
//!
//! Walls and the paddle test the ball's extent (center plus radius). Blocks
//! test the ball's center point only.

use super::palette::Palette;
use super::state::{Ball, Block, Paddle};

/// Result of the wall check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallContact {
    /// A side wall flipped the horizontal direction
    pub side: bool,
    /// The top margin forced the ball downward
    pub ceiling: bool,
}

/// Result of the paddle check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleContact {
    /// Ball is not over the paddle
    Miss,
    /// Ball reached the paddle but its color does not match
    ColorMismatch,
    /// Ball was sent back upward
    Bounce,
}

/// A block struck this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    /// Index into the block list
    pub index: usize,
    /// Color the ball took on
    pub color: usize,
    /// Where a dropped item should appear
    pub drop_point: glam::Vec2,
}

/// Check if the ball fell past the bottom edge
#[inline]
pub fn ball_lost(ball: &Ball, canvas_height: f32) -> bool {
    ball.bottom() > canvas_height
}

/// Reflect off the side walls and the top margin.
///
/// Side walls flip `vel.x` with no position correction. The top margin sets
/// `vel.y` to point downward rather than flipping it, so a ball lingering in
/// the margin cannot oscillate.
pub fn check_ball_wall(ball: &mut Ball, canvas_width: f32, top_margin: f32) -> WallContact {
    let mut contact = WallContact::default();

    if ball.pos.x + ball.radius > canvas_width || ball.pos.x - ball.radius < 0.0 {
        ball.bounce_horizontal();
        contact.side = true;
    }

    if ball.top() < top_margin {
        ball.vel.y = ball.vel.y.abs();
        contact.ceiling = true;
    }

    contact
}

/// Horizontal velocity after a paddle hit at `hit_fraction` of its width:
/// `-speed` at the left edge, 0 at the center, `+speed` at the right edge.
#[inline]
pub fn paddle_deflection(hit_fraction: f32, speed: f32) -> f32 {
    speed * (hit_fraction - 0.5) * 2.0
}

/// Bounce off the paddle when the colors match or rainbow mode is on.
///
/// Triggers when the ball's bottom is below the paddle's top edge and its
/// center lies within the paddle span (edges included). On a bounce `vel.y`
/// points upward and `vel.x` is redirected by hit position. A mismatched ball
/// is left alone and keeps falling.
pub fn check_ball_paddle(
    ball: &mut Ball,
    paddle: &Paddle,
    palette: &Palette,
    rainbow: bool,
) -> PaddleContact {
    let over_paddle =
        ball.bottom() > paddle.y && ball.pos.x >= paddle.x && ball.pos.x <= paddle.right();
    if !over_paddle {
        return PaddleContact::Miss;
    }

    if !(rainbow || palette.same_color(ball.color, paddle.color())) {
        return PaddleContact::ColorMismatch;
    }

    ball.vel.y = -ball.vel.y.abs();
    let hit_fraction = (ball.pos.x - paddle.x) / paddle.width();
    ball.vel.x = paddle_deflection(hit_fraction, ball.speed);
    PaddleContact::Bounce
}

/// Resolve the ball against one block.
///
/// Inactive blocks never hit. On a hit the block is deactivated and the ball
/// takes its color; the ball reflects vertically unless `penetrating`.
pub fn check_ball_block(ball: &mut Ball, block: &mut Block, penetrating: bool) -> bool {
    if !block.active || !block.contains(ball.pos) {
        return false;
    }

    if !penetrating {
        ball.bounce_vertical();
    }
    ball.color = block.color;
    block.active = false;
    true
}

/// Resolve the ball against the block list. The first active block in list
/// order that contains the ball consumes the hit; at most one block is
/// destroyed per frame.
pub fn resolve_block_hit(
    ball: &mut Ball,
    blocks: &mut [Block],
    penetrating: bool,
) -> Option<BlockHit> {
    blocks.iter_mut().enumerate().find_map(|(index, block)| {
        check_ball_block(ball, block, penetrating).then(|| BlockHit {
            index,
            color: block.color,
            drop_point: block.drop_point(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn launched_ball(pos: Vec2) -> Ball {
        let mut ball = Ball::new(pos, BALL_SPEED);
        ball.launch();
        ball
    }

    #[test]
    fn test_side_wall_reflects() {
        let mut ball = launched_ball(Vec2::new(CANVAS_WIDTH - 4.0, 200.0));
        let contact = check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
        assert!(contact.side);
        assert!(!contact.ceiling);
        assert_eq!(ball.vel, Vec2::new(-BALL_SPEED, -BALL_SPEED));

        let mut ball = launched_ball(Vec2::new(3.0, 200.0));
        ball.vel.x = -BALL_SPEED;
        check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
        assert_eq!(ball.vel.x, BALL_SPEED);
    }

    #[test]
    fn test_ceiling_forces_downward_idempotently() {
        let mut ball = launched_ball(Vec2::new(300.0, TOP_MARGIN + 2.0));
        let contact = check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
        assert!(contact.ceiling);
        assert!(ball.vel.y > 0.0);

        // Still in the margin next frame: direction stays downward
        check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
        assert!(ball.vel.y > 0.0);
    }

    #[test]
    fn test_no_wall_contact_in_open_field() {
        let mut ball = launched_ball(Vec2::new(300.0, 200.0));
        let contact = check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
        assert_eq!(contact, WallContact::default());
        assert_eq!(ball.vel, Vec2::new(BALL_SPEED, -BALL_SPEED));
    }

    #[test]
    fn test_ball_lost() {
        let ball = launched_ball(Vec2::new(300.0, CANVAS_HEIGHT - BALL_RADIUS));
        assert!(!ball_lost(&ball, CANVAS_HEIGHT));
        let ball = launched_ball(Vec2::new(300.0, CANVAS_HEIGHT - BALL_RADIUS + 0.5));
        assert!(ball_lost(&ball, CANVAS_HEIGHT));
    }

    #[test]
    fn test_paddle_left_edge_hit() {
        let palette = Palette::default();
        let paddle = Paddle::new(PADDLE_WIDTH);
        let mut ball = launched_ball(Vec2::new(paddle.x, paddle.y));
        ball.vel = Vec2::new(2.0, BALL_SPEED);

        let contact = check_ball_paddle(&mut ball, &paddle, &palette, false);
        assert_eq!(contact, PaddleContact::Bounce);
        assert_eq!(ball.vel.x, -BALL_SPEED);
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_center_and_right_edge() {
        let palette = Palette::default();
        let paddle = Paddle::new(PADDLE_WIDTH);

        let mut ball = launched_ball(Vec2::new(paddle.center_x(), paddle.y));
        check_ball_paddle(&mut ball, &paddle, &palette, false);
        assert_eq!(ball.vel.x, 0.0);

        let mut ball = launched_ball(Vec2::new(paddle.right(), paddle.y));
        check_ball_paddle(&mut ball, &paddle, &palette, false);
        assert_eq!(ball.vel.x, BALL_SPEED);
    }

    #[test]
    fn test_paddle_color_gate() {
        let palette = Palette::default();
        let paddle = Paddle::new(PADDLE_WIDTH);
        let mut ball = launched_ball(Vec2::new(paddle.center_x(), paddle.y));
        ball.color = 2;
        ball.vel = Vec2::new(1.0, BALL_SPEED);

        let contact = check_ball_paddle(&mut ball, &paddle, &palette, false);
        assert_eq!(contact, PaddleContact::ColorMismatch);
        assert_eq!(ball.vel, Vec2::new(1.0, BALL_SPEED), "mismatch leaves the ball untouched");

        let contact = check_ball_paddle(&mut ball, &paddle, &palette, true);
        assert_eq!(contact, PaddleContact::Bounce, "rainbow bypasses color matching");
        assert!(ball.vel.y < 0.0);
    }

    #[test]
    fn test_paddle_miss_outside_span() {
        let palette = Palette::default();
        let paddle = Paddle::new(PADDLE_WIDTH);
        let mut ball = launched_ball(Vec2::new(paddle.x - 0.5, paddle.y));
        assert_eq!(
            check_ball_paddle(&mut ball, &paddle, &palette, true),
            PaddleContact::Miss
        );

        // Above the paddle top
        let mut ball = launched_ball(Vec2::new(paddle.center_x(), paddle.y - BALL_RADIUS));
        assert_eq!(
            check_ball_paddle(&mut ball, &paddle, &palette, true),
            PaddleContact::Miss
        );
    }

    #[test]
    fn test_block_corner_hit() {
        let mut block = Block::new(Vec2::new(75.0, 50.0), 3);
        let mut ball = launched_ball(block.pos);
        let vy = ball.vel.y;

        assert!(check_ball_block(&mut ball, &mut block, false));
        assert_eq!(ball.vel.y, -vy);
        assert!(!block.active);
        assert_eq!(ball.color, 3);
    }

    #[test]
    fn test_block_penetration_keeps_velocity() {
        let mut block = Block::new(Vec2::new(75.0, 50.0), 1);
        let mut ball = launched_ball(Vec2::new(100.0, 60.0));
        let vel = ball.vel;

        assert!(check_ball_block(&mut ball, &mut block, true));
        assert_eq!(ball.vel, vel);
        assert!(!block.active);
        assert_eq!(ball.color, 1);
    }

    #[test]
    fn test_inactive_block_is_noop() {
        let mut block = Block::new(Vec2::new(75.0, 50.0), 1);
        block.active = false;
        let mut ball = launched_ball(Vec2::new(100.0, 60.0));
        let before = ball.clone();

        assert!(!check_ball_block(&mut ball, &mut block, false));
        assert_eq!(ball.vel, before.vel);
        assert_eq!(ball.color, before.color);
    }

    #[test]
    fn test_shared_edge_consumes_one_block() {
        let mut blocks = vec![
            Block::new(Vec2::new(0.0, 50.0), 1),
            Block::new(Vec2::new(BLOCK_WIDTH, 50.0), 2),
        ];
        let mut ball = launched_ball(Vec2::new(BLOCK_WIDTH, 60.0));

        let hit = resolve_block_hit(&mut ball, &mut blocks, false).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.color, 1);
        assert_eq!(hit.drop_point, Vec2::new(BLOCK_WIDTH / 2.0, 80.0));
        assert!(!blocks[0].active);
        assert!(blocks[1].active, "second block survives this frame");
        assert_eq!(ball.vel.y, BALL_SPEED, "reflected exactly once");

        // Next frame the other block takes the hit
        let hit = resolve_block_hit(&mut ball, &mut blocks, false).unwrap();
        assert_eq!(hit.index, 1);
        assert!(resolve_block_hit(&mut ball, &mut blocks, false).is_none());
    }

    proptest! {
        #[test]
        fn prop_wall_bounce_preserves_step_length(
            x in 0.0f32..CANVAS_WIDTH,
            y in 0.0f32..CANVAS_HEIGHT,
            speed in 1.0f32..20.0,
            flip_x in any::<bool>(),
            flip_y in any::<bool>(),
        ) {
            let mut ball = Ball::new(Vec2::new(x, y), speed);
            ball.launch();
            if flip_x { ball.bounce_horizontal(); }
            if flip_y { ball.bounce_vertical(); }
            check_ball_wall(&mut ball, CANVAS_WIDTH, TOP_MARGIN);
            prop_assert!((ball.vel.length() - speed * 2f32.sqrt()).abs() < 1e-3);
            prop_assert!((ball.step_velocity(1.0).length() - speed).abs() < 1e-3);
        }
    }
}
