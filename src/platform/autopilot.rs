//! Scripted player input for headless runs

use crate::sim::{GamePhase, GameState, KeyState, Prey};

/// Horizontal slack before the autopilot bothers steering
const STEER_DEADZONE: f32 = 4.0;
/// How close an airborne target must be before the autopilot jumps after it
const JUMP_REACH: f32 = 80.0;

/// Chases the nearest remaining prey
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot {
    /// Sneak while nothing is panicking
    pub stealthy: bool,
}

impl Autopilot {
    pub fn new(stealthy: bool) -> Self {
        Self { stealthy }
    }

    fn target<'a>(&self, state: &'a GameState) -> Option<&'a Prey> {
        let x = state.player.pos.x;
        state
            .prey
            .iter()
            .filter(|p| p.active)
            .min_by(|a, b| (a.pos.x - x).abs().total_cmp(&(b.pos.x - x).abs()))
    }

    pub fn keys(&self, state: &GameState) -> KeyState {
        if state.phase != GamePhase::Playing {
            return KeyState::default();
        }
        let Some(target) = self.target(state) else {
            return KeyState::default();
        };

        let dx = target.pos.x - state.player.pos.x;
        let airborne_target = !target.grounded && target.pos.y < state.player.pos.y;
        KeyState {
            left: dx < -STEER_DEADZONE,
            right: dx > STEER_DEADZONE,
            down: self.stealthy && state.alarm.is_idle(),
            jump: airborne_target && dx.abs() < JUMP_REACH && state.player.grounded,
        }
    }
}
