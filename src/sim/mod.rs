//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick period only
//! - Seeded RNG only
//! - One writer: `tick` and `resolve_key` never run concurrently
//! - No rendering or platform dependencies

pub mod effects;
pub mod input;
pub mod progress;
pub mod spawn;
pub mod state;
pub mod tick;

pub use effects::{Effects, Feedback, FeedbackKind, Particle};
pub use input::{KeyOutcome, acquire, normalize_key, resolve_key, unlock};
pub use progress::{
    difficulty_multiplier, fall_speed_multiplier, level_for_score, spawn_interval_ms,
};
pub use spawn::{roll_monster_kind, spawn_target, unlocked_categories, word_pool};
pub use state::{
    Content, GameEvent, GameMode, GameState, MonsterKind, Projectile, ProjectileSize, Target,
};
pub use tick::tick;
