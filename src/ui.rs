//! HUD and sprite state derived from the simulation
//!
//! Nothing here feeds back into the sim; a renderer reads these each frame.

use serde::{Deserialize, Serialize};

use crate::sim::{GamePhase, GameState, Outcome, Player, Prey};

/// Tint applied to panicked prey
pub const ALARMED_TINT: u32 = 0xffaaaa;
/// No tint
pub const NORMAL_TINT: u32 = 0xffffff;
/// Player tint once the run is won / lost
pub const WIN_TINT: u32 = 0xaaffaa;
pub const LOSS_TINT: u32 = 0xffaaaa;
/// Player opacity while sneaking
pub const STEALTH_ALPHA: f32 = 0.7;

/// Texture/pose key for an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    PlayerStand,
    PlayerAir,
    PlayerSneak,
    PreyStand,
    PreyAir,
}

impl Pose {
    /// Asset key the renderer looks the texture up by
    pub fn texture_key(&self) -> &'static str {
        match self {
            Pose::PlayerStand => "fox",
            Pose::PlayerAir => "fox_jump",
            Pose::PlayerSneak => "fox_sneak",
            Pose::PreyStand => "chicken",
            Pose::PreyAir => "chicken_flap",
        }
    }
}

/// Per-actor visual state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualTag {
    pub pose: Pose,
    /// RGB tint multiplier
    pub tint: u32,
    pub alpha: f32,
    /// Mirror the sprite (source art faces right)
    pub flip_x: bool,
}

pub fn player_visual(player: &Player, outcome: Option<Outcome>) -> VisualTag {
    let pose = if !player.grounded {
        Pose::PlayerAir
    } else if player.stealthed {
        Pose::PlayerSneak
    } else {
        Pose::PlayerStand
    };
    let tint = match outcome {
        Some(Outcome::Win | Outcome::AllLevelsComplete) => WIN_TINT,
        Some(Outcome::Loss) => LOSS_TINT,
        None => NORMAL_TINT,
    };
    VisualTag {
        pose,
        tint,
        alpha: if player.stealthed { STEALTH_ALPHA } else { 1.0 },
        flip_x: player.facing == crate::Facing::Left,
    }
}

pub fn prey_visual(prey: &Prey) -> VisualTag {
    VisualTag {
        pose: if prey.grounded {
            Pose::PreyStand
        } else {
            Pose::PreyAir
        },
        tint: if prey.is_alarmed() {
            ALARMED_TINT
        } else {
            NORMAL_TINT
        },
        alpha: 1.0,
        flip_x: prey.facing == crate::Facing::Left,
    }
}

/// End-of-run message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub text: &'static str,
    /// CSS-style hex colour
    pub color: &'static str,
}

impl Banner {
    pub fn for_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Win => Banner {
                text: "WIN!",
                color: "#00ff00",
            },
            Outcome::Loss => Banner {
                text: "LOSE!",
                color: "#ff0000",
            },
            Outcome::AllLevelsComplete => Banner {
                text: "ALL LEVELS COMPLETE!",
                color: "#ffd700",
            },
        }
    }
}

/// Everything the HUD shows for one frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hud {
    pub level: u32,
    pub prey_remaining: u32,
    /// Whole seconds left on the panic timer, None when idle or after a win.
    /// A loss leaves the run-out countdown showing 0.
    pub timer_secs: Option<u32>,
    pub banner: Option<Banner>,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        let (banner, timer_secs) = match (state.phase, state.outcome) {
            (GamePhase::GameOver, Some(Outcome::Loss)) => {
                (Some(Banner::for_outcome(Outcome::Loss)), Some(0))
            }
            (GamePhase::GameOver, outcome) => (outcome.map(Banner::for_outcome), None),
            _ => (None, state.alarm.display_secs()),
        };
        Self {
            level: state.level,
            prey_remaining: state.remaining_prey(),
            timer_secs,
            banner,
        }
    }

    pub fn prey_text(&self) -> String {
        format!("Prey: {}", self.prey_remaining)
    }

    pub fn timer_text(&self) -> String {
        match self.timer_secs {
            Some(secs) => format!("Panic Timer: {}", secs),
            None => "Panic Timer: -".to_string(),
        }
    }

    pub fn level_text(&self) -> String {
        format!("Level {}", self.level)
    }
}
