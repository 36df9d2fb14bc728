//! Session state machine: start, capture, win/loss, restart
//!
//! Phase edges: PreStart -> Playing, Playing -> GameOver,
//! GameOver -> Playing and GameOver -> PreStart. Every operation re-checks the
//! phase first so a win and a timer expiry landing on the same tick cannot
//! both take effect.

use serde::{Deserialize, Serialize};

use super::state::{AlarmState, GameEvent, GamePhase, GameState, Outcome, PreyId};

/// Where `restart` leaves the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartMode {
    /// Back to the pre-start screen; needs another `start`
    PreStart,
    /// Straight into play
    Play,
}

impl GameState {
    /// PreStart -> Playing. Returns false from any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != GamePhase::PreStart {
            return false;
        }
        self.player.stealthed = false;
        for prey in &mut self.prey {
            prey.alarm = AlarmState::Calm;
            prey.startled = false;
        }
        self.alarm.cancel();
        self.outcome = None;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::SessionStarted { level: self.level });
        log::info!("Level {} started", self.level);
        true
    }

    /// Level a restart from the current outcome would load
    pub fn restart_level(&self) -> u32 {
        match self.outcome {
            Some(Outcome::AllLevelsComplete) => 1,
            // Win already advanced `level`; a loss retries it
            _ => self.level,
        }
    }

    /// GameOver -> PreStart/Playing, re-seeding the (possibly advanced) level
    pub fn restart(&mut self, mode: RestartMode) -> bool {
        if self.phase != GamePhase::GameOver {
            return false;
        }
        self.cancel_alarm_timer();
        let level = self.restart_level();
        self.load_level(level);
        self.outcome = None;
        self.phase = GamePhase::PreStart;
        if mode == RestartMode::Play {
            self.start();
        }
        true
    }

    /// Arm the panic timer if idle. No-op outside Playing or while running.
    pub fn arm_alarm_timer(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let ticks = self.settings.rules.alarm_duration_ticks();
        if !self.alarm.arm(ticks) {
            return false;
        }
        log::info!("Panic timer started ({} ticks)", ticks);
        self.events.push(GameEvent::TimerArmed { ticks });
        true
    }

    /// Discard the panic timer without firing it
    pub fn cancel_alarm_timer(&mut self) -> bool {
        if !self.alarm.cancel() {
            return false;
        }
        log::debug!("Panic timer cancelled");
        self.events.push(GameEvent::TimerCancelled);
        true
    }

    /// Called on the tick the panic timer runs out
    pub fn on_alarm_expired(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        if self.remaining_prey() > 0 {
            self.lose();
        }
    }

    /// Capture an overlapping prey. Returns false outside Playing or when the
    /// prey is unknown or already captured.
    pub fn capture(&mut self, id: PreyId) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let Some(prey) = self.prey.get_mut(id.index()) else {
            return false;
        };
        if !prey.active {
            return false;
        }
        prey.active = false;
        prey.vel = glam::Vec2::ZERO;
        let at = prey.pos;

        let remaining = self.remaining_prey();
        log::debug!("Prey {} captured, {} remaining", id.0, remaining);
        self.events.push(GameEvent::PreyCaptured { id, remaining });

        self.witness_capture(at);

        if remaining == 0 {
            self.win();
        }
        true
    }

    fn win(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.cancel_alarm_timer();
        let cleared = self.level;
        if self.level < self.settings.rules.max_level {
            self.level += 1;
            self.outcome = Some(Outcome::Win);
            self.events.push(GameEvent::Won { level: cleared });
            log::info!("WIN - level {} cleared", cleared);
        } else {
            self.outcome = Some(Outcome::AllLevelsComplete);
            self.events.push(GameEvent::AllLevelsComplete);
            log::info!("WIN - all {} levels complete", cleared);
        }
        self.phase = GamePhase::GameOver;
    }

    fn lose(&mut self) {
        self.cancel_alarm_timer();
        self.outcome = Some(Outcome::Loss);
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::Lost { level: self.level });
        log::info!("LOSE - timer ran out on level {}", self.level);
    }
}
