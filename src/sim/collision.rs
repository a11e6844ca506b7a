//! Collision detection and pursuit movement
//!
//! Breakout resolves a round ball against axis-aligned bricks and the
//! paddle; Blitzball moves markers toward targets inside a circular field.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_circle;

/// Axis-aligned rectangle (top-left origin, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Which velocity component a hit inverts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BounceAxis {
    /// Side hit: invert horizontal velocity
    Horizontal,
    /// Top/bottom hit: invert vertical velocity
    Vertical,
}

/// Result of a ball-vs-rectangle check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectHit {
    pub axis: BounceAxis,
    /// Smallest penetration depth along the chosen axis
    pub penetration: f32,
}

/// Check the ball's bounding box against a rectangle
///
/// Overlap is strict: touching edges do not count.
#[inline]
pub fn ball_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.x + radius > rect.x
        && center.x - radius < rect.right()
        && center.y + radius > rect.y
        && center.y - radius < rect.bottom()
}

/// Check collision between a ball and a rectangle
///
/// The bounce axis comes from the four penetration depths: when the
/// shallower horizontal overlap is smaller than the shallower vertical one
/// the ball came in from a side, otherwise from the top or bottom.
pub fn ball_rect_collision(center: Vec2, radius: f32, rect: &Rect) -> Option<RectHit> {
    if !ball_overlaps_rect(center, radius, rect) {
        return None;
    }

    let overlap_left = center.x + radius - rect.x;
    let overlap_right = rect.right() - (center.x - radius);
    let overlap_top = center.y + radius - rect.y;
    let overlap_bottom = rect.bottom() - (center.y - radius);

    let min_x = overlap_left.min(overlap_right);
    let min_y = overlap_top.min(overlap_bottom);

    let hit = if min_x < min_y {
        RectHit {
            axis: BounceAxis::Horizontal,
            penetration: min_x,
        }
    } else {
        RectHit {
            axis: BounceAxis::Vertical,
            penetration: min_y,
        }
    };
    Some(hit)
}

/// Invert the velocity component named by `axis`
#[inline]
pub fn bounce(vel: Vec2, axis: BounceAxis) -> Vec2 {
    match axis {
        BounceAxis::Horizontal => Vec2::new(-vel.x, vel.y),
        BounceAxis::Vertical => Vec2::new(vel.x, -vel.y),
    }
}

/// A single pursuit step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Where the step lands before the field clamp
    pub reached: Vec2,
    /// Final position, inside the field circle
    pub clamped: Vec2,
    /// Unit direction of travel
    pub heading: Vec2,
}

/// Move `pos` a fixed distance toward `target`, then clamp into the field
///
/// Returns `None` when the mover is already within `arrive_radius` of the
/// target or the direction is degenerate; the mover then holds still.
pub fn step_toward(
    pos: Vec2,
    target: Vec2,
    speed: f32,
    arrive_radius: f32,
    field_center: Vec2,
    field_radius: f32,
) -> Option<Step> {
    let delta = target - pos;
    let distance = delta.length();
    if !distance.is_finite() || distance <= arrive_radius || distance == 0.0 {
        return None;
    }

    let heading = delta / distance;
    let reached = pos + heading * speed;
    Some(Step {
        reached,
        clamped: clamp_to_circle(reached, field_center, field_radius),
        heading,
    })
}
