//! Simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Fixed timestep only (velocities are pixels per tick)
//! - Stable brick iteration order (column-major)
//! - No rendering, storage or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;
pub mod timer;

pub use collision::{Aabb, Axis, Overlap};
pub use input::{Direction, InputMapper, Key};
pub use state::{Ball, Brick, BrickGrid, GameState, Paddle, RoundOutcome, RoundPhase, Snapshot};
pub use tick::{GameEvent, TickInput, tick};
pub use timer::DeferredReset;
