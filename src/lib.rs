//! Henhouse - a stealth predator/prey platform game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (detection, alarm, prey behavior, session)
//! - `platform`: Arcade physics, autopilot and the headless loop
//! - `settings`: Data-driven rule configuration
//! - `ui`: HUD text and per-actor visual tags derived from sim state

pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::{Rules, Settings, SettingsError};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Simulation rate
    pub const TICKS_PER_SEC: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SEC as f32;

    /// World dimensions (y grows downward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Top surface of the ground platform
    pub const GROUND_Y: f32 = 560.0;
    pub const GAME_GRAVITY: f32 = 500.0;

    /// Player defaults
    pub const PLAYER_MOVE_SPEED: f32 = 160.0;
    pub const PLAYER_SNEAK_SPEED: f32 = 70.0;
    pub const PLAYER_JUMP_SPEED: f32 = 350.0;
    pub const PLAYER_SPAWN: (f32, f32) = (100.0, 450.0);

    /// Detection radii (pixels)
    pub const NORMAL_RADIUS: f32 = 200.0;
    pub const STEALTH_RADIUS: f32 = 80.0;
    pub const WITNESS_RADIUS: f32 = 250.0;

    /// Panic timer length
    pub const ALARM_DURATION_SECS: f32 = 10.0;

    /// Startled hop on alarm onset (fractions of flee speed / jump impulse)
    pub const ONSET_SPEED_FACTOR: f32 = 0.6;
    pub const ONSET_HOP_FACTOR: f32 = 0.4;

    /// Linear drag (px/s²) requested for prey bodies
    pub const PREY_GROUND_DRAG: f32 = 200.0;
    pub const PREY_AIR_DRAG: f32 = 60.0;
    /// Vertical drag while a panicked prey is airborne
    pub const PREY_GLIDE_DRAG: f32 = 300.0;

    /// Highest level tier with its own tuning
    pub const MAX_LEVEL: u32 = 5;
}

/// Horizontal facing of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Facing for a signed horizontal quantity; `None` when it is exactly zero
    #[inline]
    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Facing::Right)
        } else if value < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// True when an actor at `from_x` facing `self` looks toward `target_x`.
    /// A target directly above or below is never faced.
    #[inline]
    pub fn looks_toward(self, from_x: f32, target_x: f32) -> bool {
        Facing::from_sign(target_x - from_x) == Some(self)
    }
}
