//! Per-level tuning and spawn layout
//!
//! Levels are 1-based. Anything past the last tier reuses the last tier's
//! tuning.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Facing;
use crate::consts::{GROUND_Y, WORLD_WIDTH};

/// Movement and behavior tuning for one level tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Flee speed while grounded (px/s)
    pub ground_speed: f32,
    /// Flee speed while airborne (px/s)
    pub air_speed: f32,
    /// Fraction of the player's jump impulse a prey can muster
    pub jump_velocity_multiplier: f32,
    /// Per-tick chance a grounded, panicked prey hops
    pub jump_probability: f32,
    /// Per-tick chance a panicked prey picks a new direction
    pub direction_change_probability: f32,
    /// Per-tick chance a calm prey turns around
    pub idle_turn_probability: f32,
}

const LEVEL_TABLE: [LevelSettings; 5] = [
    LevelSettings {
        ground_speed: 120.0,
        air_speed: 90.0,
        jump_velocity_multiplier: 0.55,
        jump_probability: 0.010,
        direction_change_probability: 0.010,
        idle_turn_probability: 0.004,
    },
    LevelSettings {
        ground_speed: 140.0,
        air_speed: 105.0,
        jump_velocity_multiplier: 0.60,
        jump_probability: 0.015,
        direction_change_probability: 0.015,
        idle_turn_probability: 0.006,
    },
    LevelSettings {
        ground_speed: 160.0,
        air_speed: 120.0,
        jump_velocity_multiplier: 0.65,
        jump_probability: 0.020,
        direction_change_probability: 0.020,
        idle_turn_probability: 0.008,
    },
    LevelSettings {
        ground_speed: 175.0,
        air_speed: 135.0,
        jump_velocity_multiplier: 0.70,
        jump_probability: 0.025,
        direction_change_probability: 0.025,
        idle_turn_probability: 0.010,
    },
    LevelSettings {
        ground_speed: 190.0,
        air_speed: 150.0,
        jump_velocity_multiplier: 0.75,
        jump_probability: 0.030,
        direction_change_probability: 0.030,
        idle_turn_probability: 0.012,
    },
];

impl LevelSettings {
    /// Tuning for a 1-based level, clamped into the table
    pub fn for_level(level: u32) -> Self {
        let idx = (level.max(1) as usize - 1).min(LEVEL_TABLE.len() - 1);
        LEVEL_TABLE[idx]
    }
}

/// Where a prey starts and which way it looks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreySpawn {
    pub pos: Vec2,
    pub facing: Facing,
}

/// Prey resting height above the ground surface
const PREY_SPAWN_Y: f32 = GROUND_Y - 25.0;
/// Leftmost prey column; the player spawns to the left of it
const FIRST_PREY_X: f32 = 300.0;
const MAX_PREY: u32 = 7;

/// Spawn layout for a level: 3 prey at level 1, one more per level after
pub fn spawn_layout(level: u32) -> Vec<PreySpawn> {
    let count = (2 + level.max(1)).min(MAX_PREY);
    let span = WORLD_WIDTH - 100.0 - FIRST_PREY_X;
    let step = if count > 1 { span / (count - 1) as f32 } else { 0.0 };

    (0..count)
        .map(|i| PreySpawn {
            pos: Vec2::new(FIRST_PREY_X + step * i as f32, PREY_SPAWN_Y),
            // Alternate so some prey start looking at the player
            facing: if i % 2 == 0 { Facing::Left } else { Facing::Right },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_lookup_clamps() {
        assert_eq!(LevelSettings::for_level(1), LEVEL_TABLE[0]);
        assert_eq!(LevelSettings::for_level(0), LEVEL_TABLE[0]);
        assert_eq!(LevelSettings::for_level(5), LEVEL_TABLE[4]);
        assert_eq!(LevelSettings::for_level(99), LEVEL_TABLE[4]);
    }

    #[test]
    fn test_probabilities_in_range() {
        for level in 1..=5 {
            let s = LevelSettings::for_level(level);
            for p in [
                s.jump_probability,
                s.direction_change_probability,
                s.idle_turn_probability,
            ] {
                assert!((0.0..=1.0).contains(&p));
            }
            assert!(s.air_speed < s.ground_speed);
        }
    }

    #[test]
    fn test_spawn_layout_grows_and_caps() {
        assert_eq!(spawn_layout(1).len(), 3);
        assert_eq!(spawn_layout(3).len(), 5);
        assert_eq!(spawn_layout(50).len(), 7);

        let layout = spawn_layout(1);
        assert_eq!(layout[0].pos, Vec2::new(300.0, PREY_SPAWN_Y));
        assert_eq!(layout[2].pos.x, 700.0);
        assert_eq!(layout[0].facing, Facing::Left);
    }
}
