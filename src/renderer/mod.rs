//! 2D rendering
//!
//! Games draw through the [`Surface`] trait with immediate-mode calls. The
//! browser host backs it with a canvas 2D context; [`CommandList`] records
//! the calls for headless runs and tests.

pub mod blitzball;
pub mod breakout;

use glam::Vec2;

use crate::sim::collision::Rect;

/// An opaque 0xRRGGBB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);
    pub const BLACK: Color = Color(0x000000);

    pub fn from_hex(rgb: u32) -> Self {
        Self(rgb & 0xff_ffff)
    }

    /// CSS `#rrggbb` form
    pub fn to_css(&self) -> String {
        format!("#{:06x}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_px: f32,
    pub align: TextAlign,
    pub color: Color,
}

impl TextStyle {
    pub fn new(size_px: f32, align: TextAlign, color: Color) -> Self {
        Self {
            size_px,
            align,
            color,
        }
    }

    /// CSS font shorthand
    pub fn font(&self) -> String {
        format!("{}px sans-serif", self.size_px)
    }
}

/// A 2D drawing target
///
/// Coordinates are canvas pixels: origin top-left, y grows down.
pub trait Surface {
    /// Erase a region to transparent
    fn clear(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32);
    /// Filled triangle with an optional outline
    fn fill_triangle(&mut self, points: [Vec2; 3], fill: Color, outline: Option<(Color, f32)>);
    fn text(&mut self, text: &str, pos: Vec2, style: TextStyle);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Rect),
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        line_width: f32,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        line_width: f32,
    },
    FillTriangle {
        points: [Vec2; 3],
        fill: Color,
        outline: Option<(Color, f32)>,
    },
    Text {
        text: String,
        pos: Vec2,
        style: TextStyle,
    },
}

/// Records draw calls for the current frame
///
/// A clear covering the whole surface starts a new frame and drops what was
/// recorded before it.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    pub width: f32,
    pub height: f32,
    commands: Vec<DrawCommand>,
}

impl CommandList {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Every text string drawn this frame, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }

    fn covers_surface(&self, rect: &Rect) -> bool {
        rect.x <= 0.0 && rect.y <= 0.0 && rect.right() >= self.width && rect.bottom() >= self.height
    }
}

impl Surface for CommandList {
    fn clear(&mut self, rect: Rect) {
        if self.covers_surface(&rect) {
            self.commands.clear();
        }
        self.commands.push(DrawCommand::Clear(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            color,
            line_width,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            line_width,
        });
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], fill: Color, outline: Option<(Color, f32)>) {
        self.commands.push(DrawCommand::FillTriangle {
            points,
            fill,
            outline,
        });
    }

    fn text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            pos,
            style,
        });
    }
}
