//! Fixed timestep simulation tick
//!
//! One tick: apply input, move the paddle, move the ball and resolve every
//! collision, then run the round state machine.

use super::collision::{find_brick_hit, reflect, resolve_paddle, resolve_walls};
use super::state::{GameState, RoundOutcome, RoundPhase};
use super::timer::DeferredReset;

/// Input commands for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Signed paddle velocity in pixels per tick
    pub paddle_velocity: f32,
    /// Launch the ball (ignored unless waiting)
    pub start: bool,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted,
    WallBounce,
    PaddleHit,
    BrickDestroyed { column: u32, row: u32 },
    /// Last brick fell; the deferred reset is armed
    GridCleared,
    /// The round is over and the state has already been reset to waiting
    RoundEnded { outcome: RoundOutcome, score: u32 },
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    match state.phase {
        RoundPhase::Waiting => {
            state.paddle.vel = input.paddle_velocity;
            if input.start {
                state.phase = RoundPhase::InPlay;
                state.ball.launch();
                events.push(GameEvent::RoundStarted);
                log::debug!("Round {} started", state.rounds_played + 1);
            }

            state.paddle.advance(state.config.field_width);

            if state.phase == RoundPhase::Waiting {
                state.ball.glue_to(&state.paddle);
            } else {
                step_ball(state, &mut events);
            }
        }

        RoundPhase::InPlay => {
            state.paddle.vel = input.paddle_velocity;
            state.paddle.advance(state.config.field_width);
            step_ball(state, &mut events);
        }

        RoundPhase::Cleared => {
            let fired = state
                .pending_reset
                .as_mut()
                .is_some_and(DeferredReset::advance);
            if fired {
                end_round(state, RoundOutcome::Cleared, &mut events);
            }
        }
    }

    events
}

/// Integrate the ball and resolve walls, paddle, bricks, clear and miss
fn step_ball(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let ball = &mut state.ball;
    ball.pos += ball.vel;

    if resolve_walls(ball, state.config.field_width).any() {
        events.push(GameEvent::WallBounce);
    }

    if resolve_paddle(ball, &state.paddle) {
        events.push(GameEvent::PaddleHit);
    }

    // At most one brick per tick; simultaneous hits are not arbitrated
    if let Some((index, axis)) = find_brick_hit(ball, &state.grid.bricks) {
        reflect(ball, axis);
        let brick = &mut state.grid.bricks[index];
        brick.visible = false;
        state.score += 1;
        log::trace!(
            "Brick ({}, {}) destroyed on {:?} axis, score {}",
            brick.column,
            brick.row,
            axis,
            state.score
        );
        events.push(GameEvent::BrickDestroyed {
            column: brick.column,
            row: brick.row,
        });

        if state.score == state.brick_total() {
            clear_grid(state, events);
            return;
        }
    }

    if state.ball.bottom() > state.config.field_height {
        end_round(state, RoundOutcome::Missed, events);
    }
}

/// Hide ball and paddle and arm the deferred reset
fn clear_grid(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = RoundPhase::Cleared;
    state.ball.visible = false;
    state.paddle.visible = false;
    state.pending_reset = Some(DeferredReset::new(state.config.settle_delay_ticks()));
    events.push(GameEvent::GridCleared);
    log::info!("Grid cleared with score {}", state.score);
}

fn end_round(state: &mut GameState, outcome: RoundOutcome, events: &mut Vec<GameEvent>) {
    let score = state.score;
    log::info!("Round ended ({:?}) with score {}", outcome, score);
    state.reset_round();
    events.push(GameEvent::RoundEnded { outcome, score });
}
