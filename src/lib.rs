//! Brick Breaker - A classic paddle-and-ball arcade game
//!
//! Core modules:
//! - `sim`: Simulation (paddle/ball kinematics, collisions, round state machine)
//! - `session`: Host-facing loop driver (fixed timestep, input, persistence hook)
//! - `highscores`: Local leaderboard keyed by player name
//! - `config`: Validated game configuration
//! - `platform`: Browser/native platform abstraction

pub mod config;
pub mod error;
pub mod highscores;
pub mod platform;
pub mod session;
pub mod sim;

pub use config::GameConfig;
pub use error::{ConfigError, StoreError};
pub use highscores::{HighScoreEntry, HighScores, Leaderboard, LocalLeaderboard};
pub use session::Session;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one 60 Hz display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Brick grid defaults
    pub const BRICK_COLUMNS: u32 = 9;
    pub const BRICK_ROWS: u32 = 5;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_X: f32 = 45.0;
    pub const BRICK_OFFSET_Y: f32 = 50.0;
    /// Largest grid a config may ask for
    pub const MAX_BRICKS: u32 = 10_000;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 150.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Horizontal speed in pixels per tick
    pub const PADDLE_SPEED: f32 = 8.0;
    /// Distance from the paddle's top edge to the bottom of the field
    pub const PADDLE_BOTTOM_MARGIN: f32 = 20.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Speed per axis in pixels per tick
    pub const BALL_SPEED: f32 = 4.0;

    /// Pause between clearing the grid and the next round
    pub const SETTLE_DELAY_MS: u32 = 500;
}

/// Convert a duration in milliseconds to whole simulation ticks (at least one)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as f32 / 1000.0 / consts::SIM_DT).round() as u32;
    ticks.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(1000), 60);
        // Zero delay still needs one tick to fire
        assert_eq!(ms_to_ticks(0), 1);
    }
}
