//! Minimal arcade physics
//!
//! Gravity, linear drag, a flat ground plane, world walls and AABB overlap.
//! It stands in for a real physics engine so sessions can run headless.

use glam::Vec2;

use crate::consts::*;
use crate::sim::{BodyFeedback, Command, GameState, KeyState, PreyId, TickInput};

const PLAYER_HALF_SIZE: Vec2 = Vec2::new(20.0, 30.0);
const PREY_HALF_SIZE: Vec2 = Vec2::new(16.0, 25.0);
const PLAYER_BOUNCE: f32 = 0.1;
const PREY_BOUNCE: f32 = 1.0;

/// Move `value` toward zero by at most `amount`
#[inline]
fn approach_zero(value: f32, amount: f32) -> f32 {
    if value > 0.0 {
        (value - amount).max(0.0)
    } else {
        (value + amount).min(0.0)
    }
}

/// An axis-aligned dynamic body
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Linear drag (px/s²) per axis
    pub drag: Vec2,
    pub half_size: Vec2,
    /// Fraction of horizontal speed kept when hitting a wall
    pub bounce: f32,
    pub grounded: bool,
}

impl Body {
    pub fn new(pos: Vec2, half_size: Vec2, bounce: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            drag: Vec2::ZERO,
            half_size,
            bounce,
            grounded: false,
        }
    }

    pub fn step(&mut self, dt: f32, gravity: f32) {
        self.vel.y += gravity * dt;
        self.vel.x = approach_zero(self.vel.x, self.drag.x * dt);
        self.vel.y = approach_zero(self.vel.y, self.drag.y * dt);
        self.pos += self.vel * dt;

        let floor = GROUND_Y - self.half_size.y;
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.vel.y = self.vel.y.min(0.0);
            self.grounded = true;
        } else {
            self.grounded = false;
        }

        let min_x = self.half_size.x;
        let max_x = WORLD_WIDTH - self.half_size.x;
        if self.pos.x < min_x {
            self.pos.x = min_x;
            self.vel.x = self.vel.x.abs() * self.bounce;
        } else if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = -self.vel.x.abs() * self.bounce;
        }
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        let delta = (self.pos - other.pos).abs();
        let reach = self.half_size + other.half_size;
        delta.x < reach.x && delta.y < reach.y
    }

    pub fn feedback(&self) -> BodyFeedback {
        BodyFeedback {
            pos: self.pos,
            vel: self.vel,
            grounded: self.grounded,
        }
    }
}

/// Physics world mirroring one level of a session
#[derive(Debug, Clone)]
pub struct Arcade {
    pub gravity: f32,
    pub player: Body,
    /// Indexed by `PreyId`; `None` once captured
    pub prey: Vec<Option<Body>>,
}

impl Arcade {
    /// Build bodies for the actors currently in `state`
    pub fn from_state(state: &GameState) -> Self {
        Self {
            gravity: GAME_GRAVITY,
            player: Body::new(state.player.pos, PLAYER_HALF_SIZE, PLAYER_BOUNCE),
            prey: state
                .prey
                .iter()
                .map(|p| {
                    p.active
                        .then(|| Body::new(p.pos, PREY_HALF_SIZE, PREY_BOUNCE))
                })
                .collect(),
        }
    }

    /// Prey bodies currently touching the player
    pub fn overlaps(&self) -> Vec<PreyId> {
        self.prey
            .iter()
            .enumerate()
            .filter_map(|(i, body)| {
                body.as_ref()
                    .filter(|b| b.overlaps(&self.player))
                    .map(|_| PreyId(i as u32))
            })
            .collect()
    }

    /// Package the world's current state as sim input
    pub fn tick_input(&self, keys: KeyState, commands: Vec<Command>) -> TickInput {
        TickInput {
            keys,
            player_body: Some(self.player.feedback()),
            prey_bodies: self
                .prey
                .iter()
                .enumerate()
                .filter_map(|(i, body)| body.as_ref().map(|b| (PreyId(i as u32), b.feedback())))
                .collect(),
            overlaps: self.overlaps(),
            commands,
        }
    }

    /// Take the sim's desired velocities and drags; drop captured prey
    pub fn apply(&mut self, state: &GameState) {
        self.player.vel = state.player.vel;
        for (slot, prey) in self.prey.iter_mut().zip(&state.prey) {
            if !prey.active {
                *slot = None;
                continue;
            }
            if let Some(body) = slot {
                body.vel = prey.vel;
                body.drag = prey.drag;
            }
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.player.step(dt, self.gravity);
        for body in self.prey.iter_mut().flatten() {
            body.step(dt, self.gravity);
        }
    }
}
