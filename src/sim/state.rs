//! Game state and core simulation types
//!
//! Everything a running session mutates lives in [`GameState`]. It is only
//! ever touched by `tick` and `resolve_key`, one call at a time.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::Effects;
use crate::consts::*;
use crate::data::{RootMapping, WordEntry};

/// Which table targets are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Single-letter roots, one segment each
    RootDrill,
    /// Word entries with multi-letter codes
    WordChallenge,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::RootDrill => "roots",
            GameMode::WordChallenge => "words",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "roots" | "root" | "rootdrill" => Some(GameMode::RootDrill),
            "words" | "word" | "wordchallenge" => Some(GameMode::WordChallenge),
            _ => None,
        }
    }

    /// Fall speed at difficulty multiplier 1.0
    pub fn base_speed(&self) -> f32 {
        match self {
            GameMode::RootDrill => ROOT_BASE_SPEED,
            GameMode::WordChallenge => WORD_BASE_SPEED,
        }
    }

    /// Points for a defeated target
    pub fn points(&self) -> u64 {
        match self {
            GameMode::RootDrill => ROOT_POINTS,
            GameMode::WordChallenge => WORD_POINTS,
        }
    }
}

/// Visual skin of a target, escalating with level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MonsterKind {
    #[default]
    Slime,
    Bat,
    Ghost,
    /// Elite kind, only drawn in the highest band
    Boss,
}

/// What a target asks the player to type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Content {
    Root(&'static RootMapping),
    Word(&'static WordEntry),
}

impl Content {
    /// The letters to type, in order
    pub fn code(&self) -> &'static str {
        match self {
            Content::Root(r) => root_code(r),
            Content::Word(w) => w.code,
        }
    }

    /// The glyph shown on the target
    pub fn glyph(&self) -> &'static str {
        match self {
            Content::Root(r) => r.root,
            Content::Word(w) => w.glyph,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Content::Root(_) => None,
            Content::Word(w) => Some(w.hint),
        }
    }

    /// Code letter at `index`
    #[inline]
    pub fn code_char(&self, index: usize) -> Option<char> {
        self.code().as_bytes().get(index).map(|&b| b as char)
    }
}

/// Root keys are their own one-letter code
fn root_code(r: &RootMapping) -> &'static str {
    const KEYS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let i = (r.key as u8).wrapping_sub(b'A') as usize;
    KEYS.get(i..i + 1).unwrap_or("")
}

/// A falling target
#[derive(Debug, Clone)]
pub struct Target {
    pub id: u32,
    pub content: Content,
    /// x is fixed at spawn, y only grows
    pub pos: Vec2,
    /// Vertical distance per tick
    pub fall_speed: f32,
    pub kind: MonsterKind,
    /// Code length
    pub total_segments: u8,
    /// Code letters not yet matched; the target dies at 0
    pub remaining_segments: u8,
}

impl Target {
    pub fn new(id: u32, content: Content, pos: Vec2, fall_speed: f32, kind: MonsterKind) -> Self {
        let total = content.code().len() as u8;
        Self {
            id,
            content,
            pos,
            fall_speed,
            kind,
            total_segments: total,
            remaining_segments: total,
        }
    }

    /// Index of the next unmatched code letter
    #[inline]
    pub fn needed_index(&self) -> usize {
        (self.total_segments - self.remaining_segments) as usize
    }

    /// Next letter the player has to type, `None` once defeated
    #[inline]
    pub fn next_char(&self) -> Option<char> {
        if self.remaining_segments == 0 {
            return None;
        }
        self.content.code_char(self.needed_index())
    }

    pub fn is_defeated(&self) -> bool {
        self.remaining_segments == 0
    }
}

/// Projectile size tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileSize {
    Small,
    /// The finishing blow
    Big,
}

/// A shot flying from the player toward a target
#[derive(Debug, Clone, Serialize)]
pub struct Projectile {
    pub id: u32,
    pub start: Vec2,
    pub target_id: u32,
    /// Target position when fired
    pub target_pos: Vec2,
    /// 0-1
    pub progress: f32,
    pub size: ProjectileSize,
}

/// Things the simulation reports to its owner
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    Spawned { id: u32 },
    Locked { id: u32 },
    Hit { id: u32, remaining: u8 },
    Defeated { id: u32, points: u64 },
    WrongKey { id: u32 },
    Escaped { id: u32 },
    LevelUp { level: u32 },
    GameOver { score: u64 },
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub mode: GameMode,
    /// Simulation clock (ms)
    pub time_ms: u64,
    /// Clock value of the last spawn, `None` before the first
    pub last_spawn_ms: Option<u64>,
    pub score: u64,
    pub lives: u8,
    /// Currently locked target
    pub locked: Option<u32>,
    /// Live targets, insertion order
    pub targets: Vec<Target>,
    pub projectiles: Vec<Projectile>,
    /// Particles and feedback text (cosmetic only)
    pub effects: Effects,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    /// Set once lives reach 0
    pub game_over: bool,
    next_id: u32,
    next_projectile_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(mode: GameMode, seed: u64) -> Self {
        Self {
            seed,
            mode,
            time_ms: 0,
            last_spawn_ms: None,
            score: 0,
            lives: START_LIVES,
            locked: None,
            targets: Vec::new(),
            projectiles: Vec::new(),
            effects: Effects::default(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            game_over: false,
            next_id: 1,
            next_projectile_id: 1,
        }
    }

    /// Allocate a new target ID (never reused)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn next_projectile_id(&mut self) -> u32 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Current level, derived from score
    pub fn level(&self) -> u32 {
        super::progress::level_for_score(self.score)
    }

    /// Word mode hides per-letter hints from this level on
    pub fn blind(&self) -> bool {
        self.mode == GameMode::WordChallenge && self.level() >= BLIND_MODE_LEVEL
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn is_locked(&self, id: u32) -> bool {
        self.locked == Some(id)
    }

    /// Fire a projectile from the player toward `target`
    pub fn fire_projectile(&mut self, target_id: u32, target_pos: Vec2, size: ProjectileSize) {
        let id = self.next_projectile_id();
        self.projectiles.push(Projectile {
            id,
            start: Vec2::new(PLAYER_X, PLAYER_Y),
            target_id,
            target_pos,
            progress: 0.0,
            size,
        });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ROOT_TABLE, WORD_TABLE};

    #[test]
    fn test_content_codes() {
        let root = Content::Root(&ROOT_TABLE[0]);
        assert_eq!(root.code(), "A");
        assert_eq!(root.glyph(), "日");
        assert_eq!(root.hint(), None);

        let wo = WORD_TABLE.iter().find(|w| w.glyph == "我").map(Content::Word);
        let wo = wo.expect("我 in table");
        assert_eq!(wo.code(), "HI");
        assert_eq!(wo.code_char(1), Some('I'));
        assert_eq!(wo.code_char(2), None);
    }

    #[test]
    fn test_target_segments() {
        let wo = WORD_TABLE.iter().find(|w| w.glyph == "我").expect("我 in table");
        let mut t = Target::new(1, Content::Word(wo), Vec2::ZERO, 0.1, MonsterKind::Slime);
        assert_eq!(t.total_segments, 2);
        assert_eq!(t.next_char(), Some('H'));
        t.remaining_segments = 1;
        assert_eq!(t.needed_index(), 1);
        assert_eq!(t.next_char(), Some('I'));
        t.remaining_segments = 0;
        assert!(t.is_defeated());
        assert_eq!(t.next_char(), None);
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut state = GameState::new(GameMode::RootDrill, 1);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert!(b > a);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lives, START_LIVES);
    }
}
