//! Raising alarms and witness contagion
//!
//! Every path that alarms a prey (direct detection or witnessing a capture)
//! goes through [`GameState::raise_alarm`], so the onset hop, the event and
//! the timer arm happen exactly once per prey.

use glam::Vec2;

use super::behavior::apply_onset_impulse;
use super::state::{AlarmCause, AlarmState, GameEvent, GamePhase, GameState, Prey, PreyId};

/// Calm prey that see a capture at `at`: inside `radius` and facing it.
///
/// Evaluated against the table as it stands, so a prey alarmed by this very
/// capture cannot pass the alarm on.
pub fn witnesses(prey: &[Prey], at: Vec2, radius: f32) -> Vec<PreyId> {
    prey.iter()
        .filter(|p| p.is_calm())
        .filter(|p| p.pos.distance(at) < radius)
        .filter(|p| p.facing.looks_toward(p.pos.x, at.x))
        .map(|p| p.id)
        .collect()
}

impl GameState {
    /// Alarm a calm prey. No-op (returns false) outside Playing, for unknown
    /// ids, and for prey that are captured or already alarmed.
    pub fn raise_alarm(&mut self, id: PreyId, cause: AlarmCause) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let level = self.level_settings;
        let jump_speed = self.settings.rules.player_jump_speed;
        let Some(prey) = self.prey.get_mut(id.index()) else {
            return false;
        };
        if !prey.is_calm() {
            return false;
        }

        prey.alarm = AlarmState::Alarmed;
        apply_onset_impulse(prey, &level, jump_speed);
        log::debug!("Prey {} alarmed ({:?})", id.0, cause);
        self.events.push(GameEvent::PreyAlarmed { id, cause });

        self.arm_alarm_timer();
        true
    }

    /// Alarm every calm prey that witnessed a capture at `at`
    pub fn witness_capture(&mut self, at: Vec2) -> Vec<PreyId> {
        let seen = witnesses(&self.prey, at, self.settings.rules.witness_radius);
        for &id in &seen {
            self.raise_alarm(id, AlarmCause::Witnessed);
        }
        seen
    }
}
