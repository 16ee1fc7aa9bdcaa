//! Target spawning and the difficulty curve

use glam::Vec2;
use rand::Rng;

use super::progress::fall_speed_multiplier;
use super::state::{Content, GameEvent, GameMode, GameState, MonsterKind, Target};
use crate::consts::*;
use crate::data::{ROOT_TABLE, WORD_TABLE, WordCategory, WordEntry};

/// Word categories unlocked at a level. Each band adds to the previous one.
pub fn unlocked_categories(level: u32) -> Vec<WordCategory> {
    use WordCategory::*;

    let mut categories = vec![HighFreq];
    if level >= 2 {
        categories.extend([Common, Pronoun]);
    }
    if level >= 3 {
        categories.extend([Verb, Adjective]);
    }
    // Boss tier
    if level >= 4 {
        categories.extend([Difficult, Question]);
    }
    categories
}

/// Word entries a target can be drawn from at a level
pub fn word_pool(level: u32) -> Vec<&'static WordEntry> {
    let categories = unlocked_categories(level);
    WORD_TABLE
        .iter()
        .filter(|w| categories.contains(&w.category))
        .collect()
}

/// Monster kind weights (slime, bat, ghost, boss) out of 100
fn monster_weights(level: u32) -> [u32; 4] {
    match level {
        0 | 1 => [100, 0, 0, 0],
        2 => [40, 60, 0, 0],
        3 => [30, 40, 30, 0],
        _ => [0, 40, 45, 15],
    }
}

/// Draw a monster kind for a level
pub fn roll_monster_kind(rng: &mut impl Rng, level: u32) -> MonsterKind {
    const KINDS: [MonsterKind; 4] = [
        MonsterKind::Slime,
        MonsterKind::Bat,
        MonsterKind::Ghost,
        MonsterKind::Boss,
    ];

    let weights = monster_weights(level);
    let mut roll = rng.random_range(0..100u32);
    for (kind, weight) in KINDS.iter().zip(weights) {
        if roll < weight {
            return *kind;
        }
        roll -= weight;
    }
    MonsterKind::Slime
}

/// Draw what a new target asks for
fn roll_content(rng: &mut impl Rng, level: u32, mode: GameMode) -> Content {
    match mode {
        GameMode::RootDrill => Content::Root(&ROOT_TABLE[rng.random_range(0..ROOT_TABLE.len())]),
        GameMode::WordChallenge => {
            let pool = word_pool(level);
            Content::Word(pool[rng.random_range(0..pool.len())])
        }
    }
}

/// Build a new target for the current level and mode
pub fn spawn_target(state: &mut GameState) -> Target {
    let level = state.level();
    let mode = state.mode;
    let id = state.next_entity_id();

    let rng = &mut state.rng;
    let x = rng.random_range(SPAWN_X_MIN..SPAWN_X_MAX);
    let content = roll_content(rng, level, mode);
    let kind = roll_monster_kind(rng, level);
    let speed = mode.base_speed() * fall_speed_multiplier(level);

    Target::new(id, content, Vec2::new(x, SPAWN_Y), speed, kind)
}

/// Spawn a target into the live set
pub fn spawn_into(state: &mut GameState) -> u32 {
    let target = spawn_target(state);
    let id = target.id;
    log::debug!(
        "Spawned #{} {} ({}) {:?} at x={:.1}",
        id,
        target.content.glyph(),
        target.content.code(),
        target.kind,
        target.pos.x
    );
    state.targets.push(target);
    state.events.push(GameEvent::Spawned { id });
    id
}
