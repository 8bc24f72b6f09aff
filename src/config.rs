//! Game configuration
//!
//! Fixed when a session is created. Overridable from LocalStorage on the web
//! or from a JSON file on native, and always validated before a round starts.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Dimensions, speeds and timings for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Bricks ===
    pub brick_columns: u32,
    pub brick_rows: u32,
    pub brick_width: f32,
    pub brick_height: f32,
    pub brick_padding: f32,
    pub brick_offset_x: f32,
    pub brick_offset_y: f32,

    // === Paddle ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per tick while a direction key is held
    pub paddle_speed: f32,
    /// Gap between the paddle's top edge and the bottom of the field
    pub paddle_bottom_margin: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Pixels per tick on each axis
    pub ball_speed: f32,

    // === Round ===
    /// Delay between clearing the grid and the next round
    pub settle_delay_ms: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,

            brick_columns: BRICK_COLUMNS,
            brick_rows: BRICK_ROWS,
            brick_width: BRICK_WIDTH,
            brick_height: BRICK_HEIGHT,
            brick_padding: BRICK_PADDING,
            brick_offset_x: BRICK_OFFSET_X,
            brick_offset_y: BRICK_OFFSET_Y,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            paddle_bottom_margin: PADDLE_BOTTOM_MARGIN,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,

            settle_delay_ms: SETTLE_DELAY_MS,
        }
    }
}

impl GameConfig {
    /// Total number of bricks in a full grid
    pub fn brick_count(&self) -> u32 {
        self.brick_columns.saturating_mul(self.brick_rows)
    }

    /// Fixed y of the paddle's top edge
    pub fn paddle_y(&self) -> f32 {
        self.field_height - self.paddle_bottom_margin
    }

    /// Settle delay expressed in simulation ticks
    pub fn settle_delay_ticks(&self) -> u32 {
        crate::ms_to_ticks(self.settle_delay_ms)
    }

    /// Reject configurations that cannot produce a playable round
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::EmptyField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.brick_columns == 0 || self.brick_rows == 0 {
            return Err(ConfigError::EmptyGrid {
                columns: self.brick_columns,
                rows: self.brick_rows,
            });
        }
        match self.brick_columns.checked_mul(self.brick_rows) {
            Some(total) if total <= MAX_BRICKS => {}
            _ => {
                return Err(ConfigError::GridTooLarge {
                    columns: self.brick_columns,
                    rows: self.brick_rows,
                    max: MAX_BRICKS,
                });
            }
        }

        let positive = [
            ("brick width", self.brick_width),
            ("brick height", self.brick_height),
            ("paddle width", self.paddle_width),
            ("paddle height", self.paddle_height),
            ("paddle speed", self.paddle_speed),
            ("ball radius", self.ball_radius),
            ("ball speed", self.ball_speed),
        ];
        for (what, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { what, value });
            }
        }

        if self.paddle_width > self.field_width {
            return Err(ConfigError::PaddleTooWide {
                paddle: self.paddle_width,
                field: self.field_width,
            });
        }

        let y = self.paddle_y();
        if y - self.ball_radius * 2.0 < 0.0 || y + self.paddle_height > self.field_height {
            return Err(ConfigError::PaddleOutOfField {
                y,
                height: self.paddle_height,
                field: self.field_height,
            });
        }

        let diameter = self.ball_radius * 2.0;
        if diameter >= self.field_width || diameter >= self.field_height {
            return Err(ConfigError::BallTooLarge { diameter });
        }

        Ok(())
    }

    /// Parse a (possibly partial) JSON config and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key for config overrides
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_breaker_config";

    /// Load config overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config overrides from LocalStorage");
                        return config;
                    }
                    Err(e) => log::error!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Load config from a JSON file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
