//! Blitzball frame drawing

use glam::Vec2;

use super::{Color, Surface, TextAlign, TextStyle};
use crate::sim::blitzball::{BlitzballWorld, MatchPhase, Slot, SlotState, Team, TeamSide};
use crate::sim::collision::Rect;

const FIELD_COLOR: Color = Color(0x4e818e);
const GRID_COLOR: Color = Color(0xcccccc);
/// Gap between a marker and its possession ring
const RING_GAP: f32 = 8.0;

/// Draw one frame of Blitzball
pub fn draw(world: &BlitzballWorld, surface: &mut dyn Surface) {
    let config = &world.config;
    let width = config.arena_width;
    let height = config.arena_height;
    let center = config.field_center();
    let radius = config.field_radius;

    surface.clear(Rect::new(0.0, 0.0, width, height));

    surface.fill_circle(center, radius, FIELD_COLOR);
    let goal_top = center.y - config.goal_height / 2.0;
    surface.fill_rect(
        Rect::new(
            center.x - radius - config.goal_gap - config.goal_width,
            goal_top,
            config.goal_width,
            config.goal_height,
        ),
        FIELD_COLOR,
    );
    surface.fill_rect(
        Rect::new(
            center.x + radius + config.goal_gap,
            goal_top,
            config.goal_width,
            config.goal_height,
        ),
        FIELD_COLOR,
    );

    draw_grid(surface, width, height, config.grid_cell);

    // Interleaved by position so neither team is always on top
    for slot in Slot::FIELD {
        for side in TeamSide::BOTH {
            let team = world.team(side);
            draw_marker(surface, team, team.slot(slot), config.marker_size);
        }
    }

    draw_hud(world, surface);
}

fn draw_grid(surface: &mut dyn Surface, width: f32, height: f32, cell: f32) {
    if cell <= 0.0 {
        return;
    }
    let mut x = (width % cell) / 2.0;
    while x <= width {
        surface.line(Vec2::new(x, 0.0), Vec2::new(x, height), GRID_COLOR, 1.0);
        x += cell;
    }
    let mut y = (height % cell) / 2.0;
    while y <= height {
        surface.line(Vec2::new(0.0, y), Vec2::new(width, y), GRID_COLOR, 1.0);
        y += cell;
    }
}

/// Triangle vertices for a marker pointing along `rotation`
pub fn marker_points(pos: Vec2, rotation: f32, size: f32) -> [Vec2; 3] {
    let facing = Vec2::from_angle(rotation);
    [
        Vec2::new(size, 0.0),
        Vec2::new(-size / 2.0, -size / 2.0),
        Vec2::new(-size / 2.0, size / 2.0),
    ]
    .map(|local| pos + facing.rotate(local))
}

fn draw_marker(surface: &mut dyn Surface, team: &Team, state: &SlotState, size: f32) {
    surface.fill_triangle(
        marker_points(state.pos, state.rotation, size),
        Color::from_hex(team.color_primary),
        Some((Color::from_hex(team.color_secondary), 2.0)),
    );
    if state.has_ball {
        surface.stroke_circle(state.pos, size + RING_GAP, Color::WHITE, 3.0);
    }
}

fn draw_hud(world: &BlitzballWorld, surface: &mut dyn Surface) {
    let width = world.config.arena_width;
    let height = world.config.arena_height;
    let state = &world.state;
    let (team_a, team_b) = (world.team(TeamSide::A), world.team(TeamSide::B));

    surface.text(
        &format!("{} {}", team_a.name, state.score(TeamSide::A)),
        Vec2::new(10.0, 24.0),
        TextStyle::new(18.0, TextAlign::Left, Color::from_hex(team_a.color_primary)),
    );
    surface.text(
        &format!("{} {}", state.score(TeamSide::B), team_b.name),
        Vec2::new(width - 10.0, 24.0),
        TextStyle::new(18.0, TextAlign::Right, Color::from_hex(team_b.color_primary)),
    );
    surface.text(
        &format!("Half {} - {}", state.half, state.clock_label()),
        Vec2::new(width / 2.0, 24.0),
        TextStyle::new(18.0, TextAlign::Center, Color::WHITE),
    );

    let message = TextStyle::new(20.0, TextAlign::Center, Color::WHITE);
    match state.phase {
        MatchPhase::Tackling => {
            surface.text("TACKLE!", Vec2::new(width / 2.0, height - 20.0), message);
        }
        MatchPhase::GameOver => {
            surface.text(
                "FULL TIME",
                Vec2::new(width / 2.0, height / 2.0 - 20.0),
                TextStyle::new(32.0, TextAlign::Center, Color::WHITE),
            );
            surface.text(
                &format!("{} - {}", state.score_a, state.score_b),
                Vec2::new(width / 2.0, height / 2.0 + 20.0),
                message,
            );
            surface.text(
                "Press SPACE to play again",
                Vec2::new(width / 2.0, height / 2.0 + 50.0),
                message,
            );
        }
        MatchPhase::Normal => {}
    }
}
