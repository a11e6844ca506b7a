//! Breakout frame drawing

use glam::Vec2;

use super::{Color, Surface, TextAlign, TextStyle};
use crate::sim::breakout::{BreakoutPhase, BreakoutWorld};
use crate::sim::collision::Rect;

const BALL_COLOR: Color = Color(0x4caf50);
const GAME_OVER_COLOR: Color = Color(0xff4444);
const CLEARED_COLOR: Color = Color(0xf1c40f);
const DEMO_COLOR: Color = Color(0x9e9e9e);

/// Draw one frame of Breakout
pub fn draw(world: &BreakoutWorld, demo: bool, surface: &mut dyn Surface) {
    let width = world.config.arena_width;
    let height = world.config.arena_height;
    let center_x = width / 2.0;
    let middle_y = height / 2.0;

    surface.clear(Rect::new(0.0, 0.0, width, height));

    let hud = TextStyle::new(24.0, TextAlign::Left, Color::WHITE);
    surface.text(&format!("Score: {}", world.score), Vec2::new(10.0, 30.0), hud);
    surface.text(
        &format!("Lives: {}", world.lives),
        Vec2::new(width - 10.0, 30.0),
        TextStyle {
            align: TextAlign::Right,
            ..hud
        },
    );
    if demo {
        surface.text(
            "DEMO",
            Vec2::new(center_x, 30.0),
            TextStyle::new(16.0, TextAlign::Center, DEMO_COLOR),
        );
    }

    surface.fill_circle(world.ball.pos, world.ball.radius, BALL_COLOR);
    surface.fill_rect(world.paddle.rect(world.paddle_y()), Color::WHITE);

    for brick in world.bricks.iter().filter(|b| b.visible) {
        surface.fill_rect(brick.rect, Color::from_hex(brick.color));
    }

    let message = TextStyle::new(20.0, TextAlign::Center, Color::WHITE);
    match world.phase {
        BreakoutPhase::GameOver => {
            surface.text(
                "GAME OVER",
                Vec2::new(center_x, middle_y - 20.0),
                TextStyle::new(32.0, TextAlign::Center, GAME_OVER_COLOR),
            );
            surface.text(
                "Press SPACE to restart",
                Vec2::new(center_x, middle_y + 20.0),
                message,
            );
            surface.text(
                &format!("Final Score: {}", world.score),
                Vec2::new(center_x, middle_y + 50.0),
                message,
            );
        }
        BreakoutPhase::Waiting => {
            surface.text("Press SPACE to launch", Vec2::new(center_x, middle_y), message);
        }
        BreakoutPhase::Active => {}
    }

    if world.is_cleared() && !world.is_game_over() {
        surface.text(
            "BOARD CLEARED",
            Vec2::new(center_x, middle_y - 50.0),
            TextStyle::new(32.0, TextAlign::Center, CLEARED_COLOR),
        );
    }
}
