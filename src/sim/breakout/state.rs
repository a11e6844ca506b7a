//! Breakout world state
//!
//! Everything the stepper mutates lives in [`BreakoutWorld`]; the host owns
//! one instance per mounted game and replaces it on restart.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::settings::BreakoutConfig;
use crate::sim::collision::Rect;
use crate::velocity_from_vertical;

/// Row colors, top row first
pub const BRICK_COLORS: [u32; 4] = [0xe74c3c, 0xe67e22, 0xf1c40f, 0x2ecc71];

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakoutPhase {
    /// Ball rides on the paddle until launched
    Waiting,
    /// Ball in flight
    Active,
    /// Out of lives; only restart is accepted
    GameOver,
}

/// Events produced by a single tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakoutEvent {
    Launched { vel: Vec2 },
    WallHit,
    BrickDestroyed { index: usize },
    PaddleHit,
    LifeLost { lives_left: u8 },
    GameOver { final_score: u32 },
    /// Ball state went non-finite and was re-attached
    BallRecovered,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius,
        }
    }

    /// Rest the ball on top of the paddle, centered, without velocity
    pub fn attach_to(&mut self, paddle: &Paddle, paddle_y: f32) {
        self.pos = Vec2::new(paddle.center_x(), paddle_y - self.radius);
        self.vel = Vec2::ZERO;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per frame while a direction is held
    pub speed: f32,
}

impl Paddle {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Keep the paddle inside `[0, arena_width - width]`
    pub fn clamp(&mut self, arena_width: f32) {
        self.x = self.x.clamp(0.0, (arena_width - self.width).max(0.0));
    }

    pub fn rect(&self, paddle_y: f32) -> Rect {
        Rect::new(self.x, paddle_y, self.width, self.height)
    }
}

/// A brick; hidden exactly once per game
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub rect: Rect,
    pub visible: bool,
    /// 0xRRGGBB
    pub color: u32,
}

/// Build the brick grid in row-major order
pub fn build_bricks(config: &BreakoutConfig) -> Vec<Brick> {
    let width = config.brick_width();
    let mut bricks = Vec::with_capacity(config.brick_rows * config.brick_cols);
    for row in 0..config.brick_rows {
        for col in 0..config.brick_cols {
            bricks.push(Brick {
                rect: Rect::new(
                    config.brick_padding + col as f32 * (width + config.brick_padding),
                    config.brick_top_offset + row as f32 * (config.brick_height + config.brick_padding),
                    width,
                    config.brick_height,
                ),
                visible: true,
                color: BRICK_COLORS[row % BRICK_COLORS.len()],
            });
        }
    }
    bricks
}

/// Sample a launch velocity: uniform angle within the cone around straight
/// up, fixed speed
pub fn sample_launch_velocity<R: Rng>(rng: &mut R, speed: f32, cone_degrees: f32) -> Vec2 {
    let degrees = if cone_degrees > 0.0 {
        rng.random_range(-cone_degrees..=cone_degrees)
    } else {
        0.0
    };
    velocity_from_vertical(degrees.to_radians(), speed)
}

/// Complete Breakout state
#[derive(Debug, Clone)]
pub struct BreakoutWorld {
    pub config: BreakoutConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: BreakoutPhase,
    pub lives: u8,
    pub score: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    /// Row-major; collision order follows this order
    pub bricks: Vec<Brick>,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl BreakoutWorld {
    /// Create a fresh game: paddle centered, ball waiting on it
    pub fn new(config: BreakoutConfig, seed: u64) -> Self {
        let paddle = Paddle {
            x: (config.arena_width - config.paddle_width) / 2.0,
            width: config.paddle_width,
            height: config.paddle_height,
            speed: config.paddle_speed,
        };
        let mut ball = Ball::new(config.ball_radius);
        ball.attach_to(&paddle, config.paddle_y());

        Self {
            bricks: build_bricks(&config),
            lives: config.starting_lives,
            score: 0,
            phase: BreakoutPhase::Waiting,
            ball,
            paddle,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            config,
            time_ticks: 0,
        }
    }

    /// Start over with the same config; the RNG stream carries on
    pub fn restart(&mut self) {
        let rng = self.rng.clone();
        *self = Self::new(self.config.clone(), self.seed);
        self.rng = rng;
        log::info!("Breakout restarted");
    }

    /// Y coordinate of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.config.paddle_y()
    }

    pub fn is_waiting(&self) -> bool {
        self.phase == BreakoutPhase::Waiting
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == BreakoutPhase::GameOver
    }

    pub fn bricks_remaining(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }

    /// Every brick is gone
    pub fn is_cleared(&self) -> bool {
        self.bricks_remaining() == 0
    }

    /// Re-seat the ball on the paddle and wait for launch
    pub fn attach_ball(&mut self) {
        let paddle_y = self.paddle_y();
        self.ball.attach_to(&self.paddle, paddle_y);
        self.phase = BreakoutPhase::Waiting;
    }

    /// Launch from the paddle; returns the launch velocity if the ball was
    /// waiting
    pub fn launch(&mut self) -> Option<Vec2> {
        if self.phase != BreakoutPhase::Waiting {
            return None;
        }
        let vel = sample_launch_velocity(
            &mut self.rng,
            self.config.launch_speed,
            self.config.launch_cone_degrees,
        );
        self.ball.vel = vel;
        self.phase = BreakoutPhase::Active;
        log::debug!("Ball launched with velocity {:?}", vel);
        Some(vel)
    }

    /// Space bar: restart after game over, otherwise launch
    pub fn primary_action(&mut self) -> Option<BreakoutEvent> {
        match self.phase {
            BreakoutPhase::GameOver => {
                self.restart();
                None
            }
            BreakoutPhase::Waiting => self.launch().map(|vel| BreakoutEvent::Launched { vel }),
            BreakoutPhase::Active => None,
        }
    }
}
