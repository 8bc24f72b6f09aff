//! Keyboard edge events to per-tick paddle velocity

use serde::{Deserialize, Serialize};

use super::tick::TickInput;

/// Horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Sign applied to paddle speed
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

/// Gameplay keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Move(Direction),
    /// Launch the ball from the waiting state
    Start,
}

/// Maps key edges to a signed paddle velocity and a one-shot start request
///
/// The most recent key-down wins. A key-up only stops the paddle when it
/// releases the direction currently driving it.
#[derive(Debug, Clone)]
pub struct InputMapper {
    speed: f32,
    active: Option<Direction>,
    start_pending: bool,
    overlay: bool,
}

impl InputMapper {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            active: None,
            start_pending: false,
            overlay: false,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.overlay {
            return;
        }
        match key {
            Key::Move(direction) => self.active = Some(direction),
            Key::Start => self.start_pending = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.overlay {
            return;
        }
        if let Key::Move(direction) = key {
            if self.active == Some(direction) {
                self.active = None;
            }
        }
    }

    /// Show or hide a non-gameplay overlay. While shown every input is dropped.
    pub fn set_overlay(&mut self, active: bool) {
        self.overlay = active;
        if active {
            self.active = None;
            self.start_pending = false;
        }
    }

    pub fn overlay_active(&self) -> bool {
        self.overlay
    }

    /// Current signed paddle velocity
    pub fn velocity(&self) -> f32 {
        self.active.map_or(0.0, |d| d.sign() * self.speed)
    }

    /// Input for the next tick; consumes the start request
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            paddle_velocity: self.velocity(),
            start: std::mem::take(&mut self.start_pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEFT: Key = Key::Move(Direction::Left);
    const RIGHT: Key = Key::Move(Direction::Right);

    #[test]
    fn test_press_and_release() {
        let mut input = InputMapper::new(8.0);
        assert_eq!(input.velocity(), 0.0);

        input.key_down(RIGHT);
        assert_eq!(input.velocity(), 8.0);
        input.key_up(RIGHT);
        assert_eq!(input.velocity(), 0.0);

        input.key_down(LEFT);
        assert_eq!(input.velocity(), -8.0);
    }

    #[test]
    fn test_last_key_down_wins() {
        let mut input = InputMapper::new(8.0);
        input.key_down(RIGHT);
        input.key_down(LEFT);
        assert_eq!(input.velocity(), -8.0);

        // Releasing the stale direction must not stop the active one
        input.key_up(RIGHT);
        assert_eq!(input.velocity(), -8.0);

        input.key_up(LEFT);
        assert_eq!(input.velocity(), 0.0);
    }

    #[test]
    fn test_start_is_one_shot() {
        let mut input = InputMapper::new(8.0);
        input.key_down(Key::Start);
        assert!(input.take_tick_input().start);
        assert!(!input.take_tick_input().start);

        // Key-up of start does nothing
        input.key_up(Key::Start);
        assert!(!input.take_tick_input().start);
    }

    #[test]
    fn test_overlay_suppresses_input() {
        let mut input = InputMapper::new(8.0);
        input.key_down(RIGHT);
        input.key_down(Key::Start);

        input.set_overlay(true);
        assert!(input.overlay_active());
        assert_eq!(input.velocity(), 0.0);
        assert!(!input.take_tick_input().start);

        input.key_down(LEFT);
        input.key_down(Key::Start);
        let tick = input.take_tick_input();
        assert_eq!(tick.paddle_velocity, 0.0);
        assert!(!tick.start);

        input.set_overlay(false);
        input.key_down(LEFT);
        assert_eq!(input.velocity(), -8.0);
    }
}
