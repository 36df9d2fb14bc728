//! Prey perception of the player
//!
//! An unstealthed player is noticed by any calm prey inside the normal radius,
//! whichever way it faces. A stealthed player is only noticed while moving,
//! inside the smaller stealth radius, and only by prey looking at them.

use super::state::{Player, Prey};
use crate::settings::Rules;

/// Does `prey` notice `player` this tick?
///
/// Only meaningful for calm, active prey; anything else never triggers.
pub fn evaluate(player: &Player, prey: &Prey, player_moved: bool, rules: &Rules) -> bool {
    if !prey.is_calm() {
        return false;
    }

    let distance = player.pos.distance(prey.pos);

    if !player.stealthed {
        return distance < rules.normal_radius;
    }

    player_moved
        && distance < rules.stealth_radius
        && prey.facing.looks_toward(prey.pos.x, player.pos.x)
}
