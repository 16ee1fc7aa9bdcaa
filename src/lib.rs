//! Sucheng Quest - an arcade typing game for the Sucheng input method
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, falling targets, key resolution, scoring)
//! - `session`: Session state machine wrapping the simulation
//! - `data`: Static root and word code tables
//! - `practice`: Self-paced drill mode
//! - `highscores`: Top-50 leaderboard
//! - `settings`: Player preferences
//! - `persistence`: Durable key-value storage backends

pub mod data;
#[cfg(not(target_arch = "wasm32"))]
pub mod driver;
pub mod highscores;
pub mod persistence;
pub mod practice;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScoreEntry, HighScores};
pub use session::{Session, SessionPhase};
pub use settings::{QualityPreset, Settings};
pub use sim::GameMode;
pub use snapshot::SessionSnapshot;

/// Game configuration constants
///
/// Coordinates are percentages of the playfield (0-100 on both axes).
pub mod consts {
    /// Fixed simulation period (~33 ticks per second)
    pub const TICK_MS: u64 = 30;

    /// Spawn interval at difficulty multiplier 1.0
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    /// Difficulty added per level
    pub const DIFFICULTY_PER_LEVEL: f32 = 0.15;
    /// Score needed per level
    pub const POINTS_PER_LEVEL: u64 = 1500;
    /// Level at which word-mode hints are hidden
    pub const BLIND_MODE_LEVEL: u32 = 4;

    /// Starting lives
    pub const START_LIVES: u8 = 5;

    /// Horizontal spawn band (15% margin on each side)
    pub const SPAWN_X_MIN: f32 = 15.0;
    pub const SPAWN_X_MAX: f32 = 85.0;
    /// Targets start well above the visible playfield
    pub const SPAWN_Y: f32 = -15.0;
    /// Crossing this line damages the player
    pub const BOUNDARY_Y: f32 = 85.0;

    /// Per-tick fall speed before difficulty scaling
    pub const ROOT_BASE_SPEED: f32 = 0.15;
    pub const WORD_BASE_SPEED: f32 = 0.10;

    /// Points per defeated target
    pub const ROOT_POINTS: u64 = 50;
    pub const WORD_POINTS: u64 = 100;

    /// Where projectiles are fired from
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_Y: f32 = 90.0;
    /// Projectile progress per tick (300 ms flight)
    pub const PROJECTILE_STEP: f32 = 0.1;

    /// Particle life lost per tick (20 tick lifetime)
    pub const PARTICLE_DECAY: f32 = 0.05;
    /// Particle downward drift per tick
    pub const PARTICLE_DRIFT: f32 = 0.5;
    /// Particle spawn jitter around the burst origin
    pub const PARTICLE_JITTER: f32 = 2.0;
    pub const DEFEAT_PARTICLES: usize = 15;
    pub const ESCAPE_PARTICLES: usize = 10;
    /// Escape bursts appear at the player line
    pub const ESCAPE_BURST_Y: f32 = 90.0;

    /// How long a feedback message stays visible
    pub const FEEDBACK_MS: u64 = 1000;
}
