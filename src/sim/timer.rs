//! Shared panic countdown
//!
//! One timer per session. It counts whole ticks so expiry always lands on a
//! tick boundary. Session-level gating (only arm while Playing, loss on
//! expiry) lives in `session.rs`; this type only tracks the countdown.

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SEC;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlarmTimer {
    #[default]
    Idle,
    Running { remaining_ticks: u32 },
}

impl AlarmTimer {
    #[inline]
    pub fn is_idle(&self) -> bool {
        matches!(self, AlarmTimer::Idle)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        !self.is_idle()
    }

    /// Start the countdown. Returns false (and changes nothing) if already running.
    pub fn arm(&mut self, duration_ticks: u32) -> bool {
        if self.is_running() {
            return false;
        }
        *self = AlarmTimer::Running {
            remaining_ticks: duration_ticks.max(1),
        };
        true
    }

    /// Discard the pending expiry. Returns whether anything was running.
    pub fn cancel(&mut self) -> bool {
        let was_running = self.is_running();
        *self = AlarmTimer::Idle;
        was_running
    }

    /// Count down one tick. Returns true exactly once, on the tick it expires.
    pub fn advance(&mut self) -> bool {
        match self {
            AlarmTimer::Idle => false,
            AlarmTimer::Running { remaining_ticks } => {
                *remaining_ticks = remaining_ticks.saturating_sub(1);
                if *remaining_ticks == 0 {
                    *self = AlarmTimer::Idle;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn remaining_ticks(&self) -> Option<u32> {
        match *self {
            AlarmTimer::Idle => None,
            AlarmTimer::Running { remaining_ticks } => Some(remaining_ticks),
        }
    }

    /// Whole seconds for display: rounded up, never below zero
    pub fn display_secs(&self) -> Option<u32> {
        self.remaining_ticks().map(|t| t.div_ceil(TICKS_PER_SEC))
    }
}
