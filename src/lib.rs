//! Mini Arcade - frame-stepped canvas mini-games
//!
//! Core modules:
//! - `sim`: World state and per-frame steppers (Breakout, Blitzball)
//! - `input`: Key events to held intents and one-shot actions
//! - `renderer`: Immediate-mode 2D draw commands
//! - `platform`: Frame driver, cancellation, browser host
//! - `settings`: Data-driven geometry and tuning

pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::{ArcadeSettings, ConfigError, StepMode};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Canvas dimensions shared by both games
    pub const ARENA_WIDTH: f32 = 750.0;
    pub const ARENA_HEIGHT: f32 = 500.0;

    /// Breakout ball
    pub const BALL_RADIUS: f32 = 10.0;
    /// Launch speed (pixels per frame)
    pub const BALL_LAUNCH_SPEED: f32 = 5.0;
    /// Launch cone half-angle from straight up (degrees)
    pub const LAUNCH_CONE_DEGREES: f32 = 60.0;

    /// Breakout paddle
    pub const PADDLE_WIDTH: f32 = 100.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Gap between paddle bottom and arena bottom
    pub const PADDLE_BOTTOM_MARGIN: f32 = 25.0;

    /// Brick grid
    pub const BRICK_ROWS: usize = 4;
    pub const BRICK_COLS: usize = 10;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 4.0;
    pub const BRICK_TOP_OFFSET: f32 = 50.0;
    pub const BRICK_SCORE: u32 = 10;
    pub const STARTING_LIVES: u8 = 3;

    /// Blitzball field (circle centered in the arena)
    pub const FIELD_RADIUS: f32 = 220.0;
    /// Player marker size; tackles trigger at twice this distance
    pub const MARKER_SIZE: f32 = 12.0;
    /// Per-frame player step (pixels)
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Players closer than this to their target hold still
    pub const ARRIVE_RADIUS: f32 = 5.0;
    /// Attack target inset from the arena edge
    pub const GOAL_TARGET_INSET: f32 = 50.0;
    /// Goal line inset from the arena edge
    pub const GOAL_LINE_INSET: f32 = 60.0;
    /// Seconds per half
    pub const HALF_LENGTH_SECS: u32 = 300;

    /// Fixed-step mode: substep cap per frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame deltas above this are clamped (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
}

/// Velocity for a heading measured from straight up (screen space, y grows down)
#[inline]
pub fn velocity_from_vertical(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(speed * angle.sin(), -speed * angle.cos())
}

/// Heading of a velocity measured from straight up, in radians
#[inline]
pub fn angle_from_vertical(vel: Vec2) -> f32 {
    vel.x.atan2(-vel.y)
}

/// Pull a point back onto a circle if it lies outside it
#[inline]
pub fn clamp_to_circle(point: Vec2, center: Vec2, radius: f32) -> Vec2 {
    let offset = point - center;
    let distance = offset.length();
    if distance <= radius || distance == 0.0 {
        return point;
    }
    center + offset * (radius / distance)
}
