//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by prey ID)
//! - No rendering, physics or platform dependencies

pub mod alarm;
pub mod behavior;
pub mod detection;
pub mod level;
pub mod session;
pub mod state;
pub mod tick;
pub mod timer;

pub use alarm::witnesses;
pub use level::{LevelSettings, PreySpawn, spawn_layout};
pub use session::RestartMode;
pub use state::{
    AlarmCause, AlarmState, BodyFeedback, GameEvent, GamePhase, GameState, Outcome, Player, Prey,
    PreyId,
};
pub use tick::{Command, KeyState, TickInput, tick};
pub use timer::AlarmTimer;
