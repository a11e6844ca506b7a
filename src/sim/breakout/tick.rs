//! Breakout frame stepper
//!
//! One call advances the world by exactly one display frame.

use super::state::{BreakoutEvent, BreakoutPhase, BreakoutWorld};
use crate::input::Intents;
use crate::sim::collision::{ball_rect_collision, bounce};

/// Advance the world by one frame
pub fn tick(world: &mut BreakoutWorld, intents: Intents) -> Vec<BreakoutEvent> {
    let mut events = Vec::new();

    // Frozen until restart
    if world.phase == BreakoutPhase::GameOver {
        return events;
    }

    world.time_ticks += 1;

    // Paddle
    let arena_width = world.config.arena_width;
    world.paddle.x += intents.axis() * world.paddle.speed;
    world.paddle.clamp(arena_width);

    if world.phase == BreakoutPhase::Waiting {
        let paddle_y = world.paddle_y();
        world.ball.attach_to(&world.paddle, paddle_y);
        return events;
    }

    if !world.ball.is_finite() {
        log::error!("Non-finite ball state {:?}; re-attaching", world.ball);
        world.attach_ball();
        events.push(BreakoutEvent::BallRecovered);
        return events;
    }

    let ball = &mut world.ball;
    let r = ball.radius;

    ball.pos += ball.vel;

    // Walls: force velocity away from the wall and keep the center inside
    let mut wall_hit = false;
    if ball.pos.y - r <= 0.0 {
        ball.vel.y = ball.vel.y.abs();
        ball.pos.y = ball.pos.y.max(r);
        wall_hit = true;
    }
    if ball.pos.x - r <= 0.0 {
        ball.vel.x = ball.vel.x.abs();
        ball.pos.x = ball.pos.x.max(r);
        wall_hit = true;
    } else if ball.pos.x + r >= arena_width {
        ball.vel.x = -ball.vel.x.abs();
        ball.pos.x = ball.pos.x.min(arena_width - r);
        wall_hit = true;
    }
    if wall_hit {
        events.push(BreakoutEvent::WallHit);
    }

    // Bricks: first overlap in row-major order only
    let hit = world
        .bricks
        .iter()
        .enumerate()
        .filter(|(_, brick)| brick.visible)
        .find_map(|(index, brick)| {
            ball_rect_collision(ball.pos, r, &brick.rect).map(|hit| (index, hit))
        });
    if let Some((index, hit)) = hit {
        world.bricks[index].visible = false;
        world.score += world.config.brick_score;
        log::debug!(
            "Brick {} hit on {:?} ({:.1}px deep)",
            index,
            hit.axis,
            hit.penetration
        );
        ball.vel = bounce(ball.vel, hit.axis);
        events.push(BreakoutEvent::BrickDestroyed { index });
        if world.bricks.iter().all(|b| !b.visible) {
            log::info!("Board cleared with score {}", world.score);
        }
    }

    // Paddle
    let paddle_y = world.config.paddle_y();
    let paddle = world.paddle;
    if ball.pos.y + r >= paddle_y
        && ball.pos.y - r <= paddle_y + paddle.height
        && ball.pos.x >= paddle.x
        && ball.pos.x <= paddle.x + paddle.width
    {
        ball.vel.y = -ball.vel.y.abs();
        ball.pos.y = paddle_y - r;
        events.push(BreakoutEvent::PaddleHit);
    }

    // Out the bottom
    if ball.pos.y + r >= world.config.arena_height {
        world.lives = world.lives.saturating_sub(1);
        if world.lives == 0 {
            world.ball.vel = glam::Vec2::ZERO;
            world.phase = BreakoutPhase::GameOver;
            log::info!("Game over - final score {}", world.score);
            events.push(BreakoutEvent::LifeLost { lives_left: 0 });
            events.push(BreakoutEvent::GameOver {
                final_score: world.score,
            });
        } else {
            world.attach_ball();
            log::info!("Life lost ({} left)", world.lives);
            events.push(BreakoutEvent::LifeLost {
                lives_left: world.lives,
            });
        }
    }

    events
}

/// Autopilot for demo mode: steer the paddle under the ball
pub fn demo_intents(world: &BreakoutWorld) -> Intents {
    let target = match world.phase {
        // Drift back to the middle before serving
        BreakoutPhase::Waiting => world.config.arena_width / 2.0,
        BreakoutPhase::Active => world.ball.pos.x,
        BreakoutPhase::GameOver => return Intents::default(),
    };
    let offset = target - world.paddle.center_x();
    let dead_zone = world.paddle.speed / 2.0;
    Intents {
        left: offset < -dead_zone,
        right: offset > dead_zone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BreakoutConfig;
    use glam::Vec2;
    use proptest::prelude::*;

    const LEFT: Intents = Intents {
        left: true,
        right: false,
    };
    const RIGHT: Intents = Intents {
        left: false,
        right: true,
    };
    const NONE: Intents = Intents {
        left: false,
        right: false,
    };

    fn world() -> BreakoutWorld {
        BreakoutWorld::new(BreakoutConfig::default(), 12345)
    }

    /// Put the ball in flight at an exact spot, away from bricks and paddle
    fn fly(world: &mut BreakoutWorld, pos: Vec2, vel: Vec2) {
        world.phase = BreakoutPhase::Active;
        world.ball.pos = pos;
        world.ball.vel = vel;
    }

    #[test]
    fn test_tick_waiting_to_active() {
        let mut world = world();
        tick(&mut world, NONE);
        assert_eq!(world.phase, BreakoutPhase::Waiting);

        world.launch();
        let before = world.ball.pos;
        tick(&mut world, NONE);
        assert_eq!(world.phase, BreakoutPhase::Active);
        assert_ne!(world.ball.pos, before);
    }

    #[test]
    fn test_waiting_ball_follows_paddle() {
        let mut world = world();
        for _ in 0..5 {
            tick(&mut world, RIGHT);
        }
        assert_eq!(world.paddle.x, 365.0);
        assert_eq!(world.ball.pos.x, world.paddle.center_x());
        assert_eq!(world.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_paddle_stops_at_walls() {
        let mut world = world();
        for _ in 0..200 {
            tick(&mut world, LEFT);
        }
        assert_eq!(world.paddle.x, 0.0);
        for _ in 0..200 {
            tick(&mut world, RIGHT);
        }
        assert_eq!(world.paddle.x, 650.0);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut world = world();
        fly(&mut world, Vec2::new(375.0, 12.0), Vec2::new(0.0, -5.0));
        // Keep the path clear of bricks
        world.bricks.iter_mut().for_each(|b| b.visible = false);
        tick(&mut world, NONE);
        assert!(world.ball.vel.y > 0.0);
        assert!(world.ball.pos.y >= world.ball.radius);
    }

    #[test]
    fn test_side_wall_bounce() {
        let mut world = world();
        fly(&mut world, Vec2::new(738.0, 300.0), Vec2::new(5.0, 1.0));
        let events = tick(&mut world, NONE);
        assert!(events.contains(&BreakoutEvent::WallHit));
        assert!(world.ball.vel.x < 0.0);
        assert!(world.ball.pos.x <= 740.0);

        fly(&mut world, Vec2::new(12.0, 300.0), Vec2::new(-5.0, 1.0));
        tick(&mut world, NONE);
        assert!(world.ball.vel.x > 0.0);
        assert!(world.ball.pos.x >= 10.0);
    }

    #[test]
    fn test_brick_hit_scores_once() {
        let mut world = world();
        // Just under the bottom row's 5th brick, heading up
        let target = world.bricks[34].rect;
        let start = Vec2::new(target.x + target.width / 2.0, target.bottom() + 12.0);
        fly(&mut world, start, Vec2::new(0.0, -5.0));

        let events = tick(&mut world, NONE);
        assert!(events.contains(&BreakoutEvent::BrickDestroyed { index: 34 }));
        assert!(!world.bricks[34].visible);
        assert_eq!(world.score, 10);
        assert!(world.ball.vel.y > 0.0);

        // Drive the ball back through the same spot: the hidden brick is inert
        fly(&mut world, start, Vec2::new(0.0, -5.0));
        world.ball.pos.y = target.y + target.height / 2.0;
        world.ball.vel = Vec2::new(0.0, 0.5);
        let events = tick(&mut world, NONE);
        assert!(!events.contains(&BreakoutEvent::BrickDestroyed { index: 34 }));
        assert!(!world.bricks[34].visible);
        assert_eq!(world.score, 10);
    }

    #[test]
    fn test_one_brick_per_tick() {
        let mut world = world();
        // Straddle the gap between bricks 30 and 31
        let left = world.bricks[30].rect;
        let start = Vec2::new(left.right() + 2.0, left.bottom() + 11.0);
        fly(&mut world, start, Vec2::new(0.0, -5.0));

        tick(&mut world, NONE);
        assert_eq!(world.score, 10);
        assert!(!world.bricks[30].visible);
        assert!(world.bricks[31].visible);
    }

    #[test]
    fn test_side_hit_inverts_horizontal() {
        let mut world = world();
        let brick = world.bricks[15].rect;
        // Ball approaching the brick's left face at mid-height
        let start = Vec2::new(brick.x - 13.0, brick.y + brick.height / 2.0);
        fly(&mut world, start, Vec2::new(4.0, 0.0));
        // Neighbor to the left would be hit first otherwise
        world.bricks[14].visible = false;

        tick(&mut world, NONE);
        assert!(!world.bricks[15].visible);
        assert!(world.ball.vel.x < 0.0);
        assert_eq!(world.ball.vel.y, 0.0);
    }

    #[test]
    fn test_clearing_all_bricks_scores_400() {
        let mut world = world();
        let count = world.bricks.len();
        for index in 0..count {
            let rect = world.bricks[index].rect;
            let center = Vec2::new(rect.x + rect.width / 2.0, rect.bottom() + 12.0);
            fly(&mut world, center, Vec2::new(0.0, -5.0));
            let before = world.score;
            tick(&mut world, NONE);
            assert!(world.score >= before);
        }
        // Rows above may have shielded some bricks; finish them off directly
        while !world.is_cleared() {
            let index = world.bricks.iter().position(|b| b.visible).unwrap();
            let rect = world.bricks[index].rect;
            let center = Vec2::new(rect.x + rect.width / 2.0, rect.y + rect.height / 2.0);
            fly(&mut world, center, Vec2::new(0.0, 0.0));
            tick(&mut world, NONE);
        }
        assert_eq!(world.score, 400);
        assert_eq!(world.bricks_remaining(), 0);
    }

    #[test]
    fn test_paddle_reflects_upward() {
        let mut world = world();
        let paddle_y = world.paddle_y();
        let x = world.paddle.center_x();
        fly(&mut world, Vec2::new(x, paddle_y - 12.0), Vec2::new(1.0, 5.0));
        let events = tick(&mut world, NONE);
        assert!(events.contains(&BreakoutEvent::PaddleHit));
        assert!(world.ball.vel.y < 0.0);
        assert_eq!(world.ball.pos.y, paddle_y - world.ball.radius);
    }

    #[test]
    fn test_three_misses_end_the_game() {
        let mut world = world();
        for expected in [2u8, 1, 0] {
            world.launch();
            // Off to the side of the paddle, about to leave the arena
            fly(&mut world, Vec2::new(50.0, 485.0), Vec2::new(0.0, 5.0));
            world.paddle.x = 600.0;
            let events = tick(&mut world, NONE);
            assert!(events.contains(&BreakoutEvent::LifeLost {
                lives_left: expected
            }));
            assert_eq!(world.lives, expected);
        }
        assert!(world.is_game_over());
        assert_eq!(world.ball.vel, Vec2::ZERO);

        let ball = world.ball;
        let paddle = world.paddle;
        for _ in 0..10 {
            assert!(tick(&mut world, LEFT).is_empty());
        }
        assert_eq!(world.ball, ball);
        assert_eq!(world.paddle, paddle);

        world.primary_action();
        assert!(world.is_waiting());
        assert_eq!(world.lives, 3);
    }

    #[test]
    fn test_life_lost_reattaches() {
        let mut world = world();
        fly(&mut world, Vec2::new(50.0, 489.0), Vec2::new(0.0, 5.0));
        world.paddle.x = 600.0;
        tick(&mut world, NONE);
        assert!(world.is_waiting());
        assert_eq!(world.lives, 2);
        assert_eq!(world.ball.pos.x, world.paddle.center_x());
        assert_eq!(world.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_non_finite_ball_recovers() {
        let mut world = world();
        fly(&mut world, Vec2::new(f32::NAN, 300.0), Vec2::new(1.0, 1.0));
        let events = tick(&mut world, NONE);
        assert_eq!(events, vec![BreakoutEvent::BallRecovered]);
        assert!(world.is_waiting());
        assert!(world.ball.is_finite());
        assert_eq!(world.lives, 3);
    }

    #[test]
    fn test_demo_intents_track_ball() {
        let mut world = world();
        fly(&mut world, Vec2::new(100.0, 300.0), Vec2::new(0.0, 5.0));
        assert!(demo_intents(&world).left);
        fly(&mut world, Vec2::new(700.0, 300.0), Vec2::new(0.0, 5.0));
        assert!(demo_intents(&world).right);
        let x = world.paddle.center_x();
        fly(&mut world, Vec2::new(x, 300.0), Vec2::ZERO);
        assert_eq!(demo_intents(&world), NONE);
    }

    fn intents_strategy() -> impl Strategy<Value = Intents> {
        (any::<bool>(), any::<bool>()).prop_map(|(left, right)| Intents { left, right })
    }

    proptest! {
        #[test]
        fn prop_paddle_stays_in_bounds(
            seed in any::<u64>(),
            inputs in proptest::collection::vec((intents_strategy(), any::<bool>()), 1..400),
        ) {
            let mut world = BreakoutWorld::new(BreakoutConfig::default(), seed);
            let max_x = world.config.arena_width - world.paddle.width;
            for (intents, launch) in inputs {
                if launch {
                    world.primary_action();
                }
                tick(&mut world, intents);
                prop_assert!(world.paddle.x >= 0.0 && world.paddle.x <= max_x);
            }
        }

        #[test]
        fn prop_ball_bounces_off_side_walls(
            speed in 0.5f32..60.0,
            vy in -3.0f32..3.0,
            gap in 0.0f32..5.0,
            right_wall in any::<bool>(),
        ) {
            let mut world = BreakoutWorld::new(BreakoutConfig::default(), 9);
            let r = world.ball.radius;
            let width = world.config.arena_width;
            let (x, vx) = if right_wall {
                (width - r - gap, speed)
            } else {
                (r + gap, -speed)
            };
            fly(&mut world, Vec2::new(x, 300.0), Vec2::new(vx, vy));
            tick(&mut world, NONE);

            if speed > gap {
                if right_wall {
                    prop_assert!(world.ball.vel.x < 0.0);
                } else {
                    prop_assert!(world.ball.vel.x > 0.0);
                }
            }
            prop_assert!(world.ball.pos.x >= r && world.ball.pos.x <= width - r);
        }
    }
}
