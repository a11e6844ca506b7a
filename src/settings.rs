//! Arcade settings
//!
//! Arena geometry and tuning for both games, persisted as JSON
//! (LocalStorage on web, a file on native). Defaults reproduce the shipped
//! games exactly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// How simulation steps map onto display frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StepMode {
    /// One simulation step per display refresh (speed follows refresh rate)
    #[default]
    PerFrame,
    /// Fixed-rate steps accumulated from wall-clock frame deltas
    Fixed { hz: u32 },
}

/// Breakout geometry and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakoutConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub ball_radius: f32,
    pub launch_speed: f32,
    /// Half-angle of the launch cone, degrees from straight up
    pub launch_cone_degrees: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_speed: f32,
    pub paddle_bottom_margin: f32,
    pub brick_rows: usize,
    pub brick_cols: usize,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_top_offset: f32,
    pub brick_score: u32,
    pub starting_lives: u8,
}

impl Default for BreakoutConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ball_radius: BALL_RADIUS,
            launch_speed: BALL_LAUNCH_SPEED,
            launch_cone_degrees: LAUNCH_CONE_DEGREES,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,
            brick_rows: BRICK_ROWS,
            brick_cols: BRICK_COLS,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_top_offset: BRICK_TOP_OFFSET,
            brick_score: BRICK_SCORE,
            starting_lives: STARTING_LIVES,
        }
    }
}

impl BreakoutConfig {
    /// Y coordinate of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.arena_height - self.paddle_bottom_margin - self.paddle_height
    }

    /// Width of one brick so that the grid spans the arena
    pub fn brick_width(&self) -> f32 {
        let cols = self.brick_cols as f32;
        (self.arena_width - self.brick_padding * (cols + 1.0)) / cols
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::invalid(
                "breakout.arena",
                "dimensions must be positive",
            ));
        }
        if self.ball_radius <= 0.0 || self.launch_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "breakout.ball",
                "radius and launch speed must be positive",
            ));
        }
        if !(0.0..90.0).contains(&self.launch_cone_degrees) {
            return Err(ConfigError::invalid(
                "breakout.launch_cone_degrees",
                format!("{} is outside [0, 90)", self.launch_cone_degrees),
            ));
        }
        if self.paddle_width <= 0.0 || self.paddle_width > self.arena_width {
            return Err(ConfigError::invalid(
                "breakout.paddle_width",
                format!(
                    "{} must be positive and fit the arena width {}",
                    self.paddle_width, self.arena_width
                ),
            ));
        }
        if self.paddle_speed <= 0.0 {
            return Err(ConfigError::invalid(
                "breakout.paddle_speed",
                format!("{} must be positive", self.paddle_speed),
            ));
        }
        if self.paddle_y() <= self.ball_radius * 2.0 {
            return Err(ConfigError::invalid(
                "breakout.paddle_bottom_margin",
                "paddle sits above the playfield",
            ));
        }
        if self.brick_height <= 0.0 || self.brick_padding <= 0.0 {
            return Err(ConfigError::invalid(
                "breakout.brick_height",
                "brick height and padding must be positive",
            ));
        }
        if self.brick_cols == 0 || self.brick_width() <= 0.0 {
            return Err(ConfigError::invalid(
                "breakout.brick_cols",
                "brick grid does not fit the arena width",
            ));
        }
        let grid_bottom = self.brick_top_offset
            + self.brick_rows as f32 * (self.brick_height + self.brick_padding);
        if grid_bottom >= self.paddle_y() {
            return Err(ConfigError::invalid(
                "breakout.brick_rows",
                format!("grid reaches y={grid_bottom}, below the paddle"),
            ));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::invalid(
                "breakout.starting_lives",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Blitzball geometry and tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlitzballConfig {
    pub arena_width: f32,
    pub arena_height: f32,
    pub field_radius: f32,
    pub marker_size: f32,
    pub player_speed: f32,
    pub arrive_radius: f32,
    pub goal_target_inset: f32,
    /// Goal lines sit this far in from the left/right arena edges
    pub goal_line_inset: f32,
    pub half_length_secs: u32,
    /// Field grid spacing (cosmetic)
    pub grid_cell: f32,
    /// Goal rectangles beside the field circle (cosmetic)
    pub goal_gap: f32,
    pub goal_width: f32,
    pub goal_height: f32,
}

impl Default for BlitzballConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            field_radius: FIELD_RADIUS,
            marker_size: MARKER_SIZE,
            player_speed: PLAYER_SPEED,
            arrive_radius: ARRIVE_RADIUS,
            goal_target_inset: GOAL_TARGET_INSET,
            goal_line_inset: GOAL_LINE_INSET,
            half_length_secs: HALF_LENGTH_SECS,
            grid_cell: 175.0,
            goal_gap: 5.0,
            goal_width: 10.0,
            goal_height: 50.0,
        }
    }
}

impl BlitzballConfig {
    /// Center of the field circle
    pub fn field_center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Carriers closer than this to another player are tackled
    pub fn tackle_distance(&self) -> f32 {
        self.marker_size * 2.0
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::invalid(
                "blitzball.arena",
                "dimensions must be positive",
            ));
        }
        let max_radius = self.arena_width.min(self.arena_height) / 2.0;
        if self.field_radius <= 0.0 || self.field_radius > max_radius {
            return Err(ConfigError::invalid(
                "blitzball.field_radius",
                format!("{} must be in (0, {max_radius}]", self.field_radius),
            ));
        }
        if self.player_speed <= 0.0 || self.marker_size <= 0.0 {
            return Err(ConfigError::invalid(
                "blitzball.player_speed",
                "speed and marker size must be positive",
            ));
        }
        if self.goal_line_inset * 2.0 >= self.arena_width {
            return Err(ConfigError::invalid(
                "blitzball.goal_line_inset",
                "goal lines overlap",
            ));
        }
        if self.half_length_secs == 0 {
            return Err(ConfigError::invalid(
                "blitzball.half_length_secs",
                "must be at least one second",
            ));
        }
        Ok(())
    }
}

/// All settings for the arcade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArcadeSettings {
    pub breakout: BreakoutConfig,
    pub blitzball: BlitzballConfig,
    pub step_mode: StepMode,
}

impl ArcadeSettings {
    /// Environment variable naming a settings file (native only)
    pub const CONFIG_ENV: &'static str = "MINI_ARCADE_CONFIG";

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize settings to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section for geometry that would break the simulations
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.breakout.validate()?;
        self.blitzball.validate()?;
        if let StepMode::Fixed { hz } = self.step_mode {
            if hz == 0 {
                return Err(ConfigError::invalid("step_mode.hz", "must be positive"));
            }
        }
        Ok(())
    }

    /// Read settings from a file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Settings saved"),
                    Err(e) => log::warn!("Failed to save settings: {:?}", e),
                }
            }
        }
    }

    /// Load settings from the file named by `MINI_ARCADE_CONFIG`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Write settings to the file named by `MINI_ARCADE_CONFIG`, if any
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        let Ok(path) = std::env::var(Self::CONFIG_ENV) else {
            return;
        };
        match self.save_to_file(&path) {
            Ok(()) => log::info!("Settings saved to {}", path),
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Write settings as pretty JSON
    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ArcadeSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.step_mode, StepMode::PerFrame);
        assert_eq!(settings.breakout.paddle_y(), 463.0);
        assert!((settings.breakout.brick_width() - 70.6).abs() < 1e-3);
        assert_eq!(settings.blitzball.tackle_distance(), 24.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings =
            ArcadeSettings::from_json(r#"{ "breakout": { "starting_lives": 5 } }"#).unwrap();
        assert_eq!(settings.breakout.starting_lives, 5);
        assert_eq!(settings.breakout.brick_cols, BRICK_COLS);
        assert_eq!(settings.blitzball, BlitzballConfig::default());
    }

    #[test]
    fn test_step_mode_json() {
        let settings =
            ArcadeSettings::from_json(r#"{ "step_mode": { "fixed": { "hz": 120 } } }"#).unwrap();
        assert_eq!(settings.step_mode, StepMode::Fixed { hz: 120 });

        let err = ArcadeSettings::from_json(r#"{ "step_mode": { "fixed": { "hz": 0 } } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "step_mode.hz", .. }));
    }

    #[test]
    fn test_rejects_wide_paddle() {
        let err = ArcadeSettings::from_json(r#"{ "breakout": { "paddle_width": 900 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "breakout.paddle_width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_degenerate_paddle_and_bricks() {
        let err = ArcadeSettings::from_json(r#"{ "breakout": { "paddle_speed": -8 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "breakout.paddle_speed",
                ..
            }
        ));
        for json in [
            r#"{ "breakout": { "brick_height": 0 } }"#,
            r#"{ "breakout": { "brick_padding": 0 } }"#,
        ] {
            let err = ArcadeSettings::from_json(json).unwrap_err();
            assert!(err.to_string().contains("breakout.brick_height"));
        }
    }

    #[test]
    fn test_rejects_oversized_field() {
        let err = ArcadeSettings::from_json(r#"{ "blitzball": { "field_radius": 300 } }"#)
            .unwrap_err();
        assert!(err.to_string().contains("blitzball.field_radius"));
    }

    #[test]
    fn test_parse_error() {
        let err = ArcadeSettings::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ArcadeSettings::from_file("/nonexistent/mini-arcade.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = ArcadeSettings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(ArcadeSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("mini-arcade-{}.json", std::process::id()));
        let path = path.to_string_lossy().into_owned();
        let mut settings = ArcadeSettings::default();
        settings.blitzball.half_length_secs = 120;
        settings.step_mode = StepMode::Fixed { hz: 60 };

        settings.save_to_file(&path).unwrap();
        let loaded = ArcadeSettings::from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
