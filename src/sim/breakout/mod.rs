//! Breakout: paddle, ball and a 4×10 brick wall

pub mod state;
pub mod tick;

pub use state::{
    BRICK_COLORS, Ball, Brick, BreakoutEvent, BreakoutPhase, BreakoutWorld, Paddle, build_bricks,
    sample_launch_velocity,
};
pub use tick::{demo_intents, tick};
