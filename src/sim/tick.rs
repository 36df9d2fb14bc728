//! Fixed timestep simulation tick
//!
//! One call per frame. Order within a tick is fixed: commands, physics
//! feedback, player input, detection, prey behavior, captures, timer.

use serde::{Deserialize, Serialize};

use super::behavior;
use super::detection;
use super::session::RestartMode;
use super::state::{AlarmCause, BodyFeedback, GamePhase, GameState, Player, PreyId};
use crate::Facing;
use crate::settings::Rules;

/// Held keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    /// Sneak
    pub down: bool,
    pub jump: bool,
}

/// UI commands, applied at the start of the tick they arrive in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Restart(RestartMode),
}

/// Everything the outside world hands the simulation for one tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub keys: KeyState,
    /// Player body as resolved by the physics engine (None keeps the last known)
    pub player_body: Option<BodyFeedback>,
    /// Prey bodies as resolved by the physics engine
    pub prey_bodies: Vec<(PreyId, BodyFeedback)>,
    /// Prey the physics engine reports overlapping the player
    pub overlaps: Vec<PreyId>,
    pub commands: Vec<Command>,
}

/// Advance the session by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    // Feedback and overlaps from before a level reload describe bodies that
    // no longer exist
    let reloaded = apply_commands(state, &input.commands);
    if !reloaded {
        sync_bodies(state, input);
    }

    if state.phase != GamePhase::Playing {
        settle(state);
        state.player.prev_pos = state.player.pos;
        return;
    }

    state.time_ticks += 1;

    let player_moved = state.player.moved();
    state.player.prev_pos = state.player.pos;
    update_player(&mut state.player, &input.keys, &state.settings.rules);

    // Detection
    let spotted: Vec<PreyId> = state
        .prey
        .iter()
        .filter(|p| detection::evaluate(&state.player, p, player_moved, &state.settings.rules))
        .map(|p| p.id)
        .collect();
    for id in spotted {
        state.raise_alarm(id, AlarmCause::Detected);
    }

    // Prey behavior
    let jump_speed = state.settings.rules.player_jump_speed;
    let level = state.level_settings;
    for prey in &mut state.prey {
        behavior::update(prey, &level, jump_speed, &mut state.rng);
    }

    // Captures, in id order so same-tick overlaps resolve deterministically
    if !reloaded {
        let mut overlaps = input.overlaps.clone();
        overlaps.sort();
        overlaps.dedup();
        for id in overlaps {
            state.capture(id);
        }
    }

    // Panic timer
    if state.phase == GamePhase::Playing && state.alarm.advance() {
        state.on_alarm_expired();
    }
}

/// Returns true if a level was (re)loaded
fn apply_commands(state: &mut GameState, commands: &[Command]) -> bool {
    let mut reloaded = false;
    for command in commands {
        match *command {
            Command::Start => {
                state.start();
            }
            Command::Restart(mode) => {
                reloaded |= state.restart(mode);
            }
        }
    }
    reloaded
}

fn sync_bodies(state: &mut GameState, input: &TickInput) {
    if let Some(body) = &input.player_body {
        state.player.sync(body);
    }
    for (id, body) in &input.prey_bodies {
        if let Some(prey) = state.prey_mut(*id) {
            if prey.active {
                prey.sync(body);
            }
        }
    }
}

/// Non-playing ticks: stop everything so actors come to rest
fn settle(state: &mut GameState) {
    state.player.vel = glam::Vec2::ZERO;
    for prey in &mut state.prey {
        prey.vel = glam::Vec2::ZERO;
    }
}

/// Turn held keys into the player's desired velocity, facing and stealth
fn update_player(player: &mut Player, keys: &KeyState, rules: &Rules) {
    let jumping = keys.jump && player.grounded;
    // Jumping breaks stealth; falling with the key held does not
    player.stealthed = keys.down && !jumping;

    let speed = if player.stealthed {
        rules.player_sneak_speed
    } else {
        rules.player_move_speed
    };

    if keys.left {
        player.vel.x = -speed;
        player.facing = Facing::Left;
    } else if keys.right {
        player.vel.x = speed;
        player.facing = Facing::Right;
    } else {
        player.vel.x = 0.0;
    }

    if jumping {
        player.vel.y = -rules.player_jump_speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{GameEvent, Outcome, Prey};
    use glam::Vec2;
    use proptest::prelude::*;

    fn session_with(prey: &[(Vec2, Facing)]) -> GameState {
        let mut state = GameState::new(Settings::with_seed(12345));
        state.prey = prey
            .iter()
            .enumerate()
            .map(|(i, &(pos, facing))| Prey::new(PreyId(i as u32), pos, facing))
            .collect();
        // Keep facings fixed so witness checks are predictable
        state.level_settings.idle_turn_probability = 0.0;
        tick(
            &mut state,
            &TickInput {
                commands: vec![Command::Start],
                keys: KeyState {
                    down: true,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        state
    }

    fn sneak() -> TickInput {
        TickInput {
            keys: KeyState {
                down: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn player_at(pos: Vec2) -> BodyFeedback {
        BodyFeedback {
            pos,
            vel: Vec2::ZERO,
            grounded: true,
        }
    }

    #[test]
    fn test_prestart_ticks_do_nothing() {
        let mut state = GameState::new(Settings::with_seed(1));
        state.player.vel = Vec2::new(50.0, 0.0);
        state.prey[0].vel = Vec2::new(-30.0, 0.0);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::PreStart);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.prey[0].vel, Vec2::ZERO);
    }

    #[test]
    fn test_start_command() {
        let mut state = GameState::new(Settings::with_seed(1));
        tick(
            &mut state,
            &TickInput {
                commands: vec![Command::Start],
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.events.contains(&GameEvent::SessionStarted { level: 1 }));
    }

    #[test]
    fn test_unstealthed_player_within_normal_radius_alarms() {
        let mut state = session_with(&[(Vec2::new(400.0, 500.0), Facing::Right)]);
        state.player.pos = Vec2::new(250.0, 500.0);
        state.player.prev_pos = state.player.pos;
        tick(&mut state, &TickInput::default());
        assert!(state.prey[0].is_alarmed());
        assert!(state.alarm.is_running());
    }

    #[test]
    fn test_stationary_stealth_point_blank_stays_calm() {
        let pos = Vec2::new(390.0, 500.0);
        let mut state = session_with(&[(Vec2::new(400.0, 500.0), Facing::Left)]);
        state.player.pos = pos;
        state.player.prev_pos = pos;
        for _ in 0..30 {
            tick(&mut state, &sneak());
        }
        assert!(state.prey[0].is_calm());
        assert!(state.alarm.is_idle());
    }

    #[test]
    fn test_moving_stealth_close_and_facing_alarms() {
        let mut state = session_with(&[(Vec2::new(400.0, 500.0), Facing::Left)]);
        state.player.pos = Vec2::new(340.0, 500.0);
        state.player.prev_pos = state.player.pos;
        let input = TickInput {
            player_body: Some(player_at(Vec2::new(341.0, 500.0))),
            ..sneak()
        };
        tick(&mut state, &input);
        assert!(state.prey[0].is_alarmed());
    }

    #[test]
    fn test_jump_cancels_stealth() {
        let mut state = session_with(&[(Vec2::new(700.0, 500.0), Facing::Left)]);
        let input = TickInput {
            keys: KeyState {
                down: true,
                jump: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        assert!(!state.player.stealthed);
        assert_eq!(state.player.vel.y, -state.rules().player_jump_speed);
    }

    #[test]
    fn test_sneaking_while_falling_keeps_stealth() {
        let mut state = session_with(&[(Vec2::new(400.0, 500.0), Facing::Right)]);
        state.player.pos = Vec2::new(250.0, 500.0);
        state.player.prev_pos = state.player.pos;
        let input = TickInput {
            player_body: Some(BodyFeedback {
                pos: Vec2::new(251.0, 500.0),
                vel: Vec2::new(0.0, 80.0),
                grounded: false,
            }),
            ..sneak()
        };
        tick(&mut state, &input);
        assert!(state.player.stealthed);
        // 149 px away but facing away, so only the normal radius could catch it
        assert!(state.prey[0].is_calm());
        assert!(state.alarm.is_idle());
    }

    #[test]
    fn test_player_keys_set_velocity_and_facing() {
        let mut state = session_with(&[(Vec2::new(700.0, 500.0), Facing::Left)]);
        let input = TickInput {
            keys: KeyState {
                left: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.vel.x, -state.rules().player_move_speed);
        assert_eq!(state.player.facing, Facing::Left);

        let input = TickInput {
            keys: KeyState {
                right: true,
                down: true,
                ..Default::default()
            },
            ..Default::default()
        };
        tick(&mut state, &input);
        assert_eq!(state.player.vel.x, state.rules().player_sneak_speed);
        assert_eq!(state.player.facing, Facing::Right);
    }

    #[test]
    fn test_capture_alarms_facing_witness() {
        let mut state = session_with(&[
            (Vec2::new(300.0, 500.0), Facing::Right),
            (Vec2::new(320.0, 500.0), Facing::Left),
        ]);
        state.player.pos = Vec2::new(300.0, 500.0);
        state.player.prev_pos = state.player.pos;
        let input = TickInput {
            overlaps: vec![PreyId(0)],
            ..sneak()
        };
        tick(&mut state, &input);
        assert!(!state.prey[0].active);
        assert!(state.prey[1].is_alarmed());
        assert_eq!(state.remaining_prey(), 1);
        assert!(state.alarm.is_running());
    }

    #[test]
    fn test_last_capture_wins() {
        let mut state = session_with(&[(Vec2::new(700.0, 500.0), Facing::Right)]);
        state.raise_alarm(PreyId(0), AlarmCause::Detected);
        let input = TickInput {
            overlaps: vec![PreyId(0), PreyId(0)],
            ..sneak()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome, Some(Outcome::Win));
        assert_eq!(state.level, 2);
        assert!(state.alarm.is_idle());
    }

    #[test]
    fn test_timer_expiry_loses() {
        let mut state = session_with(&[
            (Vec2::new(400.0, 500.0), Facing::Right),
            (Vec2::new(700.0, 500.0), Facing::Right),
        ]);
        state.player.pos = Vec2::new(250.0, 500.0);
        state.player.prev_pos = state.player.pos;
        let duration = state.rules().alarm_duration_ticks();

        // Arming tick counts toward the duration
        for _ in 0..duration - 1 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.alarm.remaining_ticks(), Some(1));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.outcome, Some(Outcome::Loss));
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_win_on_expiry_tick_beats_loss() {
        let mut state = session_with(&[(Vec2::new(700.0, 500.0), Facing::Right)]);
        state.raise_alarm(PreyId(0), AlarmCause::Detected);
        state.alarm = crate::sim::timer::AlarmTimer::Running { remaining_ticks: 1 };
        let input = TickInput {
            overlaps: vec![PreyId(0)],
            ..sneak()
        };
        tick(&mut state, &input);
        assert_eq!(state.outcome, Some(Outcome::Win));
    }

    #[test]
    fn test_restart_ignores_stale_feedback() {
        let mut state = session_with(&[(Vec2::new(700.0, 500.0), Facing::Right)]);
        tick(
            &mut state,
            &TickInput {
                overlaps: vec![PreyId(0)],
                ..sneak()
            },
        );
        assert_eq!(state.phase, GamePhase::GameOver);
        let input = TickInput {
            commands: vec![Command::Restart(RestartMode::Play)],
            player_body: Some(player_at(Vec2::new(650.0, 500.0))),
            overlaps: vec![PreyId(0)],
            ..sneak()
        };
        tick(&mut state, &input);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.pos, Vec2::from(crate::consts::PLAYER_SPAWN));
        assert_eq!(state.remaining_prey(), 4);
    }

    #[test]
    fn test_determinism() {
        // Two sessions with the same seed and inputs stay identical
        let run = || {
            let mut state = GameState::new(Settings::with_seed(99999));
            let mut trace = Vec::new();
            for i in 0..400u32 {
                let input = TickInput {
                    commands: if i == 0 { vec![Command::Start] } else { vec![] },
                    keys: KeyState {
                        right: i % 3 != 0,
                        ..Default::default()
                    },
                    player_body: Some(player_at(Vec2::new(100.0 + i as f32, 535.0))),
                    ..Default::default()
                };
                tick(&mut state, &input);
                trace.push(state.prey.iter().map(|p| (p.vel, p.facing)).collect::<Vec<_>>());
            }
            trace
        };
        assert_eq!(run(), run());
    }

    proptest! {
        #[test]
        fn prop_alarm_is_monotonic_and_count_matches(
            seed in any::<u64>(),
            steps in proptest::collection::vec((0.0f32..800.0, any::<bool>(), any::<bool>(), 0u32..6), 1..120),
        ) {
            let mut state = GameState::new(Settings::with_seed(seed));
            state.start();
            let mut alarmed = vec![false; state.prey.len()];
            let mut remaining = state.remaining_prey();
            for (x, sneaking, capture, target) in steps {
                let input = TickInput {
                    keys: KeyState { down: sneaking, ..Default::default() },
                    player_body: Some(player_at(Vec2::new(x, 535.0))),
                    overlaps: if capture { vec![PreyId(target)] } else { vec![] },
                    ..Default::default()
                };
                tick(&mut state, &input);
                if state.phase != GamePhase::Playing {
                    break;
                }
                for (seen, prey) in alarmed.iter_mut().zip(&state.prey) {
                    prop_assert!(!*seen || prey.is_alarmed());
                    *seen = prey.is_alarmed();
                }
                let now = state.remaining_prey();
                prop_assert!(now == remaining || now + 1 == remaining);
                prop_assert_eq!(now as usize, state.prey.iter().filter(|p| p.active).count());
                remaining = now;
            }
        }
    }
}
