//! Error types

use thiserror::Error;

/// A configuration that cannot produce a playable round
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("play field must have positive dimensions (got {width}x{height})")]
    EmptyField { width: f32, height: f32 },
    #[error("brick grid needs at least one column and one row (got {columns}x{rows})")]
    EmptyGrid { columns: u32, rows: u32 },
    #[error("{what} must be positive (got {value})")]
    NonPositive { what: &'static str, value: f32 },
    #[error("paddle width {paddle} exceeds field width {field}")]
    PaddleTooWide { paddle: f32, field: f32 },
    #[error("paddle at y={y} with height {height} does not fit inside field height {field}")]
    PaddleOutOfField { y: f32, height: f32, field: f32 },
    #[error("brick grid of {columns}x{rows} exceeds the {max} brick limit")]
    GridTooLarge { columns: u32, rows: u32, max: u32 },
    #[error("ball diameter {diameter} does not fit inside the field")]
    BallTooLarge { diameter: f32 },
    #[error("invalid config JSON: {0}")]
    Parse(String),
}

/// Failure of the key-value store backing the leaderboard
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid stored JSON: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize value for storage: {0}")]
    Serialize(#[from] serde_json::Error),
}
