//! Session state and actor records
//!
//! Everything the simulation owns lives in [`GameState`]. Prey are kept in a
//! single table indexed by [`PreyId`]; captured prey stay in the table with
//! `active == false` so ids remain stable for the whole level.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{LevelSettings, spawn_layout};
use super::timer::AlarmTimer;
use crate::Facing;
use crate::consts::PLAYER_SPAWN;
use crate::settings::{Rules, Settings};

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actors placed, waiting for a start command
    PreStart,
    /// Active gameplay
    Playing,
    /// Run ended (see `GameState::outcome`)
    GameOver,
}

/// How the last run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// All prey captured; the next level is queued
    Win,
    /// Panic timer ran out with prey left
    Loss,
    /// The final level was won
    AllLevelsComplete,
}

/// Stable index of a prey within the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PreyId(pub u32);

impl PreyId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Physics feedback for one body, reported by the collision engine each tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BodyFeedback {
    pub pos: Vec2,
    pub vel: Vec2,
    pub grounded: bool,
}

/// The predator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Position recorded at the previous tick (movement gate for stealth detection)
    pub prev_pos: Vec2,
    /// Desired velocity handed back to the physics engine
    pub vel: Vec2,
    pub facing: Facing,
    pub stealthed: bool,
    pub grounded: bool,
}

impl Player {
    pub fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            prev_pos: pos,
            vel: Vec2::ZERO,
            facing: Facing::Right,
            stealthed: false,
            grounded: true,
        }
    }

    /// Whether the player changed position since the previous tick
    #[inline]
    pub fn moved(&self) -> bool {
        self.pos.x != self.prev_pos.x || self.pos.y != self.prev_pos.y
    }

    pub fn sync(&mut self, body: &BodyFeedback) {
        self.pos = body.pos;
        self.vel = body.vel;
        self.grounded = body.grounded;
    }
}

/// Prey alarm lifecycle; `Alarmed` is terminal until the level is re-seeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AlarmState {
    #[default]
    Calm,
    Alarmed,
}

/// A prey actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prey {
    pub id: PreyId,
    pub pos: Vec2,
    /// Desired velocity handed back to the physics engine
    pub vel: Vec2,
    /// Linear drag (px/s²) the physics engine should apply per axis
    pub drag: Vec2,
    pub facing: Facing,
    pub alarm: AlarmState,
    /// False once captured
    pub active: bool,
    pub grounded: bool,
    /// Set on the tick the prey became alarmed; suppresses one flee step
    #[serde(default)]
    pub startled: bool,
}

impl Prey {
    pub fn new(id: PreyId, pos: Vec2, facing: Facing) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            drag: Vec2::new(crate::consts::PREY_GROUND_DRAG, 0.0),
            facing,
            alarm: AlarmState::Calm,
            active: true,
            grounded: true,
            startled: false,
        }
    }

    /// Active and not yet alarmed
    #[inline]
    pub fn is_calm(&self) -> bool {
        self.active && self.alarm == AlarmState::Calm
    }

    #[inline]
    pub fn is_alarmed(&self) -> bool {
        self.alarm == AlarmState::Alarmed
    }

    pub fn sync(&mut self, body: &BodyFeedback) {
        self.pos = body.pos;
        self.vel = body.vel;
        self.grounded = body.grounded;
    }
}

/// Why a prey became alarmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmCause {
    /// Spotted the player directly
    Detected,
    /// Saw another prey get captured
    Witnessed,
}

/// Notable things that happened during a tick, for HUD/audio/log consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    SessionStarted { level: u32 },
    PreyAlarmed { id: PreyId, cause: AlarmCause },
    TimerArmed { ticks: u32 },
    TimerCancelled,
    PreyCaptured { id: PreyId, remaining: u32 },
    Won { level: u32 },
    Lost { level: u32 },
    AllLevelsComplete,
    LevelLoaded { level: u32 },
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Settings the session was built from
    pub settings: Settings,
    /// Behavior RNG, seeded from `settings.seed`
    pub(crate) rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    /// Tuning for `level`
    pub level_settings: LevelSettings,
    pub phase: GamePhase,
    /// Set when entering GameOver, cleared on restart
    pub outcome: Option<Outcome>,
    pub player: Player,
    /// Prey table, indexed by `PreyId`
    pub prey: Vec<Prey>,
    pub alarm: AlarmTimer,
    /// Simulation tick counter (Playing ticks only)
    pub time_ticks: u64,
    /// Events raised during the most recent tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh session in PreStart at the configured start level
    pub fn new(settings: Settings) -> Self {
        let level = settings.start_level.max(1);
        let mut state = Self {
            rng: Pcg32::seed_from_u64(settings.seed),
            level,
            level_settings: LevelSettings::for_level(level),
            phase: GamePhase::PreStart,
            outcome: None,
            player: Player::spawn(Vec2::from(PLAYER_SPAWN)),
            prey: Vec::new(),
            alarm: AlarmTimer::Idle,
            time_ticks: 0,
            events: Vec::new(),
            settings,
        };
        state.load_level(level);
        state
    }

    /// Throw everything away and start over from the settings
    pub fn reset(&mut self) {
        log::info!("Session reset (seed {})", self.settings.seed);
        *self = Self::new(self.settings.clone());
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.settings.rules
    }

    /// Number of prey not yet captured
    pub fn remaining_prey(&self) -> u32 {
        self.prey.iter().filter(|p| p.active).count() as u32
    }

    pub fn prey(&self, id: PreyId) -> Option<&Prey> {
        self.prey.get(id.index())
    }

    pub fn prey_mut(&mut self, id: PreyId) -> Option<&mut Prey> {
        self.prey.get_mut(id.index())
    }

    /// Take the events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reload tuning and re-seed every actor for `level`
    pub(crate) fn load_level(&mut self, level: u32) {
        self.level = level;
        self.level_settings = LevelSettings::for_level(level);
        self.player = Player::spawn(Vec2::from(PLAYER_SPAWN));
        self.prey = spawn_layout(level)
            .into_iter()
            .enumerate()
            .map(|(i, spawn)| Prey::new(PreyId(i as u32), spawn.pos, spawn.facing))
            .collect();
        self.events.push(GameEvent::LevelLoaded { level });
        log::info!("Level {} loaded with {} prey", level, self.prey.len());
    }
}
