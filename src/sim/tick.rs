//! Fixed timestep simulation tick
//!
//! Core game loop that advances the session deterministically: spawning,
//! falling, catching, and the level cooldown.

use glam::Vec2;
use rand::Rng;

use super::collision::below_arena;
use super::round::{fall_speed, spawn_interval_frames};
use super::state::{FallingBit, GamePhase, GameState, PowerUp, PowerUpKind};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Nudge the collector left
    pub move_left: bool,
    /// Nudge the collector right
    pub move_right: bool,
    /// Pause toggle
    pub pause: bool,
    /// End the run
    pub quit: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.quit {
        state.quit();
        return;
    }

    if input.pause {
        state.toggle_pause();
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return,
        _ => {}
    }

    state.time_ticks += 1;

    // Real-time timers
    state.effects.decay(dt);
    state.penalty_timer = (state.penalty_timer - dt).max(0.0);
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    let boosted = state.effects.is_active(PowerUpKind::SpeedBoost);
    if input.move_left {
        state.collector.nudge(-1.0, boosted);
    }
    if input.move_right {
        state.collector.nudge(1.0, boosted);
    }

    let dt = dt * state.game_speed();

    match state.phase {
        GamePhase::LevelTransition => {
            // No spawning while the finished round is on display
            state.transition_timer -= dt;
            if state.transition_timer <= 0.0 {
                state.start_next_level();
            }
        }

        GamePhase::Playing => {
            state.spawn_frames += dt * FRAMES_PER_SEC;
            if state.spawn_frames >= spawn_interval_frames(state.level()) as f32 {
                spawn_bit(state);
                state.spawn_frames = 0.0;
            }

            state.power_up_frames += dt * FRAMES_PER_SEC;
            if state.power_up_frames >= POWER_UP_ROLL_FRAMES {
                if state.rng.random_ratio(1, 3) {
                    spawn_power_up(state);
                }
                state.power_up_frames = 0.0;
            }

            for bit in &mut state.falling_bits {
                bit.pos.y += bit.speed * dt;
            }
            for power_up in &mut state.power_ups {
                power_up.pos.y += power_up.speed * dt;
            }

            resolve_catches(state, dt);
        }

        _ => {}
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Spawn a bit sampled from the target sequence. Returns false when full.
pub fn spawn_bit(state: &mut GameState) -> bool {
    let count = state.round.target_bits().len();
    if state.falling_bits.len() >= MAX_FALLING_BITS || count == 0 {
        return false;
    }
    let x = state.rng.random_range(0.0..ARENA_WIDTH - BIT_SIZE);
    let index = state.rng.random_range(0..count);
    let value = state.round.target_bits().get(index).unwrap_or_default();
    let id = state.next_entity_id();
    state.falling_bits.push(FallingBit {
        id,
        pos: Vec2::new(x, 0.0),
        value,
        speed: fall_speed(state.level()),
    });
    true
}

/// Spawn a random power-up capsule. Returns false when full.
pub fn spawn_power_up(state: &mut GameState) -> bool {
    if state.power_ups.len() >= MAX_POWER_UPS {
        return false;
    }
    let x = state.rng.random_range(0.0..ARENA_WIDTH - POWER_UP_SIZE);
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp {
        id,
        kind,
        pos: Vec2::new(x, 0.0),
        speed: POWER_UP_SPEED,
    });
    true
}

/// Hand everything touching the collector to the session; drop what fell out.
///
/// Overlap is tested against the area swept during this step, so fast
/// entities cannot skip over the collector.
fn resolve_catches(state: &mut GameState, dt: f32) {
    let collector = state.collector.rect();

    let mut caught_bits = Vec::new();
    state.falling_bits.retain(|bit| {
        let rect = bit.rect();
        if collector.overlaps(&rect.swept_down(bit.speed * dt)) {
            caught_bits.push(bit.value);
            false
        } else {
            // Missed bits carry no penalty
            !below_arena(&rect, ARENA_HEIGHT)
        }
    });

    let mut caught_power_ups = Vec::new();
    state.power_ups.retain(|power_up| {
        let rect = power_up.rect();
        if collector.overlaps(&rect.swept_down(power_up.speed * dt)) {
            caught_power_ups.push(power_up.kind);
            false
        } else {
            !below_arena(&rect, ARENA_HEIGHT)
        }
    });

    for value in caught_bits {
        if state.phase != GamePhase::Playing {
            break;
        }
        state.collect_bit(value);
    }
    for kind in caught_power_ups {
        state.collect_power_up(kind);
    }
}
