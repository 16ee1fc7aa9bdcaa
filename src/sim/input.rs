//! Key resolution: target lock, acquisition and per-letter matching
//!
//! A lock only changes when its target dies, escapes or is explicitly
//! released. Wrong keys never move it.

use glam::Vec2;

use super::effects::{DEFEAT_COLOR, FeedbackKind};
use super::progress::award;
use super::state::{GameEvent, GameState, ProjectileSize};
use crate::consts::*;

/// What a key press did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a letter, or the game is over
    Ignored,
    /// Nothing to lock onto
    NoTarget,
    /// Locked target needs a different letter
    WrongKey { id: u32 },
    /// Segment matched, target still alive
    Hit { id: u32, remaining: u8 },
    /// Last segment matched
    Defeated { id: u32, points: u64 },
}

/// Normalize a raw key to an uppercase ASCII letter
#[inline]
pub fn normalize_key(key: char) -> Option<char> {
    key.is_ascii_alphabetic().then(|| key.to_ascii_uppercase())
}

/// Pick the target a fresh key press should lock onto: among targets whose
/// next letter is `key`, the lowest on screen wins, then the oldest.
pub fn acquire(state: &GameState, key: char) -> Option<u32> {
    state
        .targets
        .iter()
        .filter(|t| t.next_char() == Some(key))
        .max_by(|a, b| {
            a.pos
                .y
                .total_cmp(&b.pos.y)
                .then_with(|| b.id.cmp(&a.id))
        })
        .map(|t| t.id)
}

/// Resolve one key press against the live targets
pub fn resolve_key(state: &mut GameState, key: char) -> KeyOutcome {
    if state.game_over {
        return KeyOutcome::Ignored;
    }
    let Some(key) = normalize_key(key) else {
        return KeyOutcome::Ignored;
    };

    // Drop a lock whose target is gone
    if let Some(id) = state.locked {
        if state.target(id).is_none() {
            state.locked = None;
        }
    }

    if state.locked.is_none() {
        match acquire(state, key) {
            Some(id) => {
                log::debug!("Locked onto #{}", id);
                state.locked = Some(id);
                state.events.push(GameEvent::Locked { id });
            }
            None => return KeyOutcome::NoTarget,
        }
    }

    let Some(id) = state.locked else {
        return KeyOutcome::NoTarget;
    };
    let Some(index) = state.targets.iter().position(|t| t.id == id) else {
        return KeyOutcome::NoTarget;
    };

    let target = &mut state.targets[index];
    if target.next_char() != Some(key) {
        let near = target.pos - Vec2::new(0.0, 5.0);
        state.effects.show("失誤！", FeedbackKind::Miss, near);
        state.events.push(GameEvent::WrongKey { id });
        return KeyOutcome::WrongKey { id };
    }

    target.remaining_segments -= 1;
    let remaining = target.remaining_segments;
    let pos = target.pos;

    if remaining > 0 {
        state.fire_projectile(id, pos, ProjectileSize::Small);
        state.events.push(GameEvent::Hit { id, remaining });
        return KeyOutcome::Hit { id, remaining };
    }

    // Finishing blow
    let points = state.mode.points();
    state.fire_projectile(id, pos, ProjectileSize::Big);
    state
        .effects
        .burst(&mut state.rng, pos, DEFEAT_COLOR, DEFEAT_PARTICLES);
    state.targets.remove(index);
    state.locked = None;
    log::debug!("Defeated #{} (+{})", id, points);
    state.events.push(GameEvent::Defeated { id, points });
    award(state, points);

    KeyOutcome::Defeated { id, points }
}

/// Release the current lock, if any
pub fn unlock(state: &mut GameState) {
    state.locked = None;
}
