//! Cancellable one-shot timer for the post-clear reset

use serde::{Deserialize, Serialize};

/// Counts down in simulation ticks and fires exactly once unless cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredReset {
    Armed { remaining_ticks: u32 },
    Fired,
    Cancelled,
}

impl DeferredReset {
    pub fn new(delay_ticks: u32) -> Self {
        Self::Armed {
            remaining_ticks: delay_ticks.max(1),
        }
    }

    /// Advance one tick. Returns true on the tick the timer fires.
    pub fn advance(&mut self) -> bool {
        let Self::Armed { remaining_ticks } = self else {
            return false;
        };
        *remaining_ticks = remaining_ticks.saturating_sub(1);
        if *remaining_ticks > 0 {
            return false;
        }
        *self = Self::Fired;
        true
    }

    /// Cancel before firing; no-op once fired
    pub fn cancel(&mut self) {
        if matches!(self, Self::Armed { .. }) {
            *self = Self::Cancelled;
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self, Self::Armed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_delay() {
        let mut timer = DeferredReset::new(3);
        assert!(!timer.advance());
        assert!(!timer.advance());
        assert!(timer.advance());
        assert_eq!(timer, DeferredReset::Fired);

        // Never fires again
        for _ in 0..10 {
            assert!(!timer.advance());
        }
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut timer = DeferredReset::new(2);
        assert!(!timer.advance());
        timer.cancel();
        assert!(timer.is_cancelled());
        assert!(!timer.advance());
        assert!(!timer.advance());
    }

    #[test]
    fn test_cancel_after_fire_is_noop() {
        let mut timer = DeferredReset::new(1);
        assert!(timer.advance());
        timer.cancel();
        assert_eq!(timer, DeferredReset::Fired);
    }

    #[test]
    fn test_zero_delay_still_waits_one_tick() {
        let mut timer = DeferredReset::new(0);
        assert!(timer.is_armed());
        assert!(timer.advance());
    }
}
