//! Fixed-period simulation tick
//!
//! Step order matters: spawn, move targets (and apply damage), advance
//! projectiles, decay cosmetics.

use glam::Vec2;

use super::effects::ESCAPE_COLOR;
use super::progress::{spawn_interval_ms, take_damage};
use super::spawn::spawn_into;
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Advance the game state by one tick of `dt_ms`
pub fn tick(state: &mut GameState, dt_ms: u64) {
    if state.game_over {
        return;
    }

    state.time_ms += dt_ms;

    // 1. Spawn
    let due = match state.last_spawn_ms {
        None => true,
        Some(last) => (state.time_ms - last) as f32 > spawn_interval_ms(state.level()),
    };
    if due {
        spawn_into(state);
        state.last_spawn_ms = Some(state.time_ms);
    }

    // 2. Move targets, collect the ones crossing the boundary line
    let mut escaped = Vec::new();
    state.targets.retain_mut(|t| {
        t.pos.y += t.fall_speed;
        if t.pos.y > BOUNDARY_Y {
            escaped.push((t.id, t.pos.x));
            false
        } else {
            true
        }
    });

    for (id, x) in escaped {
        if state.locked == Some(id) {
            state.locked = None;
        }
        state.events.push(GameEvent::Escaped { id });
        state
            .effects
            .burst(&mut state.rng, Vec2::new(x, ESCAPE_BURST_Y), ESCAPE_COLOR, ESCAPE_PARTICLES);
        log::debug!("#{} escaped, {} lives left", id, state.lives.saturating_sub(1));
        if take_damage(state) {
            return;
        }
    }

    // 3. Projectiles; ones whose target is gone are dropped
    let live: Vec<u32> = state.targets.iter().map(|t| t.id).collect();
    state.projectiles.retain_mut(|p| {
        if !live.contains(&p.target_id) {
            return false;
        }
        p.progress += PROJECTILE_STEP;
        p.progress < 1.0
    });

    // 4. Cosmetics
    state.effects.decay(dt_ms);
}
