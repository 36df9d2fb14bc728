//! Prey locomotion
//!
//! Calm prey mill about, occasionally turning around. Alarmed prey run flat
//! out, changing direction and hopping at random. All randomness comes from
//! the caller's RNG so runs replay exactly from a seed.

use glam::Vec2;
use rand::Rng;

use super::level::LevelSettings;
use super::state::Prey;
use crate::Facing;
use crate::consts::*;

/// Bernoulli roll that tolerates out-of-range probabilities from config
#[inline]
fn roll<R: Rng>(rng: &mut R, probability: f32) -> bool {
    rng.random::<f32>() < probability
}

/// The startled hop a prey makes the instant it becomes alarmed
pub fn apply_onset_impulse(prey: &mut Prey, level: &LevelSettings, jump_speed: f32) {
    prey.facing = prey.facing.flipped();
    prey.vel.x = prey.facing.sign() * level.ground_speed * ONSET_SPEED_FACTOR;
    if prey.grounded {
        prey.vel.y = -jump_speed * level.jump_velocity_multiplier * ONSET_HOP_FACTOR;
    }
    prey.startled = true;
}

/// Idle step: maybe turn around, otherwise leave motion to the physics engine
pub fn calm_tick<R: Rng>(prey: &mut Prey, level: &LevelSettings, rng: &mut R) {
    if roll(rng, level.idle_turn_probability) {
        prey.facing = prey.facing.flipped();
    }
    prey.drag = if prey.grounded {
        Vec2::new(PREY_GROUND_DRAG, 0.0)
    } else {
        Vec2::new(PREY_AIR_DRAG, 0.0)
    };
}

/// Panicked step: run, sometimes reverse, sometimes hop
pub fn alarmed_tick<R: Rng>(
    prey: &mut Prey,
    level: &LevelSettings,
    jump_speed: f32,
    rng: &mut R,
) {
    let speed = if prey.grounded {
        level.ground_speed
    } else {
        level.air_speed
    };

    let direction = if roll(rng, level.direction_change_probability) {
        if rng.random_bool(0.5) {
            Facing::Left
        } else {
            Facing::Right
        }
    } else {
        Facing::from_sign(prey.vel.x).unwrap_or(prey.facing)
    };
    prey.vel.x = direction.sign() * speed;
    prey.facing = direction;

    if prey.grounded && roll(rng, level.jump_probability) {
        prey.vel.y = -jump_speed * level.jump_velocity_multiplier;
    }

    prey.drag = alarmed_drag(prey.grounded);
}

/// Drag an alarmed prey asks for; heavier vertical drag in the air gives the
/// flapping glide
fn alarmed_drag(grounded: bool) -> Vec2 {
    if grounded {
        Vec2::new(PREY_GROUND_DRAG, 0.0)
    } else {
        Vec2::new(PREY_AIR_DRAG, PREY_GLIDE_DRAG)
    }
}

/// Advance one prey by a tick. Captured prey are left alone.
pub fn update<R: Rng>(prey: &mut Prey, level: &LevelSettings, jump_speed: f32, rng: &mut R) {
    if !prey.active {
        return;
    }
    if prey.startled {
        // Let the onset hop play out for one tick
        prey.startled = false;
        prey.drag = alarmed_drag(prey.grounded);
        return;
    }
    if prey.is_alarmed() {
        alarmed_tick(prey, level, jump_speed, rng);
    } else {
        calm_tick(prey, level, rng);
    }
}
