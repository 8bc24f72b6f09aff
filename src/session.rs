//! Host-facing game loop driver
//!
//! Owns the simulation state, the input mapper and the leaderboard. The host
//! forwards key edges, calls `frame` once per display refresh and renders
//! the `Snapshot`. Round ends are persisted here before the next tick runs.

use crate::config::GameConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::ConfigError;
use crate::highscores::{HighScoreEntry, Leaderboard};
use crate::sim::{GameEvent, GameState, InputMapper, Key, Snapshot, tick};

/// A running game bound to a leaderboard
pub struct Session<L: Leaderboard> {
    state: GameState,
    input: InputMapper,
    leaderboard: L,
    /// Cached leaderboard leader for the HUD
    best: HighScoreEntry,
    accumulator: f32,
    torn_down: bool,
}

impl<L: Leaderboard> Session<L> {
    pub fn new(config: GameConfig, leaderboard: L) -> Result<Self, ConfigError> {
        let input = InputMapper::new(config.paddle_speed);
        let state = GameState::new(config)?;
        let best = leaderboard.highest_score();
        log::info!("Session ready, best so far: {} by '{}'", best.score, best.name);

        Ok(Self {
            state,
            input,
            leaderboard,
            best,
            accumulator: 0.0,
            torn_down: false,
        })
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    /// Toggle a non-gameplay overlay (name entry, rules); suppresses input
    pub fn set_overlay(&mut self, active: bool) {
        self.input.set_overlay(active);
    }

    /// Advance by `dt` seconds of wall time in fixed ticks
    pub fn frame(&mut self, dt: f32) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.torn_down {
            return events;
        }

        self.accumulator += dt.clamp(0.0, 0.25);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than fast-forwarding later
            self.accumulator = 0.0;
        }

        events
    }

    /// Run exactly one tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        if self.torn_down {
            return Vec::new();
        }

        let input = self.input.take_tick_input();
        let events = tick(&mut self.state, &input);

        for event in &events {
            if let GameEvent::RoundEnded { score, .. } = event {
                self.record_score(*score);
            }
        }

        events
    }

    /// Persist a finished round's score if it beats the recorded best
    ///
    /// Best effort: a failing store is logged and play continues.
    fn record_score(&mut self, score: u32) {
        if score <= self.best.score {
            return;
        }
        match self.leaderboard.save_high_score(score) {
            Ok(()) => {
                self.best = self.leaderboard.highest_score();
                log::info!("New best score {} by '{}'", self.best.score, self.best.name);
            }
            Err(e) => log::warn!("Failed to save high score {}: {}", score, e),
        }
    }

    /// Stop the loop: cancel any pending reset and ignore further frames
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.state.cancel_pending_reset();
        self.torn_down = true;
        log::info!("Session torn down after {} ticks", self.state.time_ticks);
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Read-only copy of the current frame for rendering
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = self.state.snapshot();
        snapshot.best_name = self.best.name.clone();
        snapshot.best_score = self.best.score;
        snapshot
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn best(&self) -> &HighScoreEntry {
        &self.best
    }

    pub fn leaderboard(&self) -> &L {
        &self.leaderboard
    }

    /// Mutable leaderboard access (e.g. renaming the player); refreshes the cached best
    pub fn with_leaderboard<R>(&mut self, f: impl FnOnce(&mut L) -> R) -> R {
        let result = f(&mut self.leaderboard);
        self.best = self.leaderboard.highest_score();
        result
    }
}
