//! Game state and core simulation types
//!
//! `GameState` is owned solely by the simulation loop. Hosts only ever see a
//! `Snapshot`, an owned copy taken after a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::timer::DeferredReset;
use crate::config::GameConfig;
use crate::error::ConfigError;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Ball glued to paddle, grid full, waiting for the start input
    Waiting,
    /// Ball in free flight
    InPlay,
    /// Every brick destroyed; ball and paddle hidden until the settle delay elapses
    Cleared,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The whole grid was destroyed
    Cleared,
    /// The ball fell past the bottom edge
    Missed,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Top-left corner (y never changes)
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Horizontal velocity in pixels per tick
    pub vel: f32,
    pub visible: bool,
}

impl Paddle {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::new(
                (config.field_width - config.paddle_width) / 2.0,
                config.paddle_y(),
            ),
            width: config.paddle_width,
            height: config.paddle_height,
            vel: 0.0,
            visible: true,
        }
    }

    /// Move by the current velocity, then clamp fully inside `[0, field_width]`
    pub fn advance(&mut self, field_width: f32) {
        let max_x = (field_width - self.width).max(0.0);
        self.pos.x = (self.pos.x + self.vel).clamp(0.0, max_x);
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }
}

/// The ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    /// Center
    pub pos: Vec2,
    /// Velocity in pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    /// Configured per-axis speed (paddle bounces reset |dy| to this)
    pub speed: f32,
    pub visible: bool,
}

impl Ball {
    pub fn new(config: &GameConfig, paddle: &Paddle) -> Self {
        let mut ball = Self {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: config.ball_radius,
            speed: config.ball_speed,
            visible: true,
        };
        ball.glue_to(paddle);
        ball
    }

    /// Center the ball above the paddle, touching its top edge
    pub fn glue_to(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(paddle.center_x(), paddle.pos.y - self.radius);
    }

    /// Launch up and to the right at the configured speed
    pub fn launch(&mut self) {
        self.vel = Vec2::new(self.speed, -self.speed);
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_circle(self.pos, self.radius)
    }
}

/// A single brick, addressed by its grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub column: u32,
    pub row: u32,
    /// Destroyed bricks are invisible for the rest of the round
    pub visible: bool,
}

impl Brick {
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Fixed columns x rows grid of bricks, stored column-major
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrickGrid {
    pub columns: u32,
    pub rows: u32,
    pub bricks: Vec<Brick>,
}

impl BrickGrid {
    /// Generate a full grid with every brick visible
    pub fn new(config: &GameConfig) -> Self {
        let size = Vec2::new(config.brick_width, config.brick_height);
        let step = size + Vec2::splat(config.brick_padding);
        let offset = Vec2::new(config.brick_offset_x, config.brick_offset_y);

        let mut bricks = Vec::with_capacity(config.brick_count() as usize);
        for column in 0..config.brick_columns {
            for row in 0..config.brick_rows {
                bricks.push(Brick {
                    pos: offset + Vec2::new(column as f32, row as f32) * step,
                    size,
                    column,
                    row,
                    visible: true,
                });
            }
        }

        Self {
            columns: config.brick_columns,
            rows: config.brick_rows,
            bricks,
        }
    }

    /// Total cells in the grid
    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Number of bricks still standing
    pub fn visible_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.visible).count()
    }

    pub fn get(&self, column: u32, row: u32) -> Option<&Brick> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        self.bricks.get((column * self.rows + row) as usize)
    }

    /// Make every brick visible again
    pub fn restore(&mut self) {
        for brick in &mut self.bricks {
            brick.visible = true;
        }
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub phase: RoundPhase,
    /// Bricks destroyed this round
    pub score: u32,
    pub paddle: Paddle,
    pub ball: Ball,
    pub grid: BrickGrid,
    /// Armed when the grid is cleared; fires the next round's reset
    pub pending_reset: Option<DeferredReset>,
    /// Rounds completed so far
    pub rounds_played: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl GameState {
    /// Create a state in the waiting phase; rejects degenerate configs
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let paddle = Paddle::new(&config);
        let ball = Ball::new(&config, &paddle);
        let grid = BrickGrid::new(&config);

        Ok(Self {
            config,
            phase: RoundPhase::Waiting,
            score: 0,
            paddle,
            ball,
            grid,
            pending_reset: None,
            rounds_played: 0,
            time_ticks: 0,
        })
    }

    /// Total bricks that must fall to clear the round
    pub fn brick_total(&self) -> u32 {
        self.grid.len() as u32
    }

    /// Start a fresh round: zero score, full grid, re-centered paddle and ball
    pub fn reset_round(&mut self) {
        self.score = 0;
        self.grid.restore();
        self.paddle = Paddle::new(&self.config);
        self.ball = Ball::new(&self.config, &self.paddle);
        self.pending_reset = None;
        self.phase = RoundPhase::Waiting;
        self.rounds_played += 1;
    }

    /// Cancel a pending deferred reset (loop teardown)
    pub fn cancel_pending_reset(&mut self) {
        if let Some(timer) = self.pending_reset.as_mut() {
            timer.cancel();
        }
    }

    /// Read-only copy for rendering
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            brick_total: self.brick_total(),
            field: Vec2::new(self.config.field_width, self.config.field_height),
            paddle: self.paddle.clone(),
            ball: self.ball.clone(),
            bricks: self.grid.bricks.clone(),
            best_name: String::new(),
            best_score: 0,
        }
    }
}

/// Immutable view of the game after a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: RoundPhase,
    pub score: u32,
    pub brick_total: u32,
    /// Field width and height
    pub field: Vec2,
    pub paddle: Paddle,
    pub ball: Ball,
    pub bricks: Vec<Brick>,
    /// Leaderboard leader, filled in by the session
    pub best_name: String,
    pub best_score: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waiting() {
        let state = GameState::new(GameConfig::default()).unwrap();
        assert_eq!(state.phase, RoundPhase::Waiting);
        assert_eq!(state.score, 0);
        assert_eq!(state.grid.len(), 45);
        assert_eq!(state.grid.visible_count(), 45);
        assert_eq!(state.paddle.pos, Vec2::new(325.0, 580.0));
        assert_eq!(state.ball.pos, Vec2::new(400.0, 570.0));
    }

    #[test]
    fn test_grid_layout() {
        let grid = BrickGrid::new(&GameConfig::default());
        let first = grid.get(0, 0).unwrap();
        assert_eq!(first.pos, Vec2::new(45.0, 50.0));

        let last = grid.get(8, 4).unwrap();
        assert_eq!(last.pos, Vec2::new(45.0 + 8.0 * 80.0, 50.0 + 4.0 * 30.0));
        assert_eq!((last.column, last.row), (8, 4));

        assert!(grid.get(9, 0).is_none());
        assert!(grid.get(0, 5).is_none());
    }

    #[test]
    fn test_paddle_clamps() {
        let config = GameConfig::default();
        let mut paddle = Paddle::new(&config);

        paddle.vel = -1000.0;
        paddle.advance(config.field_width);
        assert_eq!(paddle.pos.x, 0.0);

        paddle.vel = 1000.0;
        paddle.advance(config.field_width);
        assert_eq!(paddle.pos.x, config.field_width - paddle.width);
    }

    #[test]
    fn test_reset_round_restores_everything() {
        let mut state = GameState::new(GameConfig::default()).unwrap();
        state.score = 12;
        state.phase = RoundPhase::Cleared;
        state.grid.bricks[3].visible = false;
        state.paddle.pos.x = 0.0;
        state.paddle.visible = false;
        state.ball.visible = false;
        state.pending_reset = Some(DeferredReset::new(10));

        state.reset_round();

        assert_eq!(state.phase, RoundPhase::Waiting);
        assert_eq!(state.score, 0);
        assert_eq!(state.grid.visible_count(), 45);
        assert!(state.paddle.visible && state.ball.visible);
        assert_eq!(state.paddle.pos.x, 325.0);
        assert!(state.pending_reset.is_none());
        assert_eq!(state.rounds_played, 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = GameConfig {
            brick_columns: 0,
            ..Default::default()
        };
        assert!(GameState::new(config).is_err());
    }
}
