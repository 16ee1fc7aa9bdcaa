//! Observable session state, published to the view every tick

use serde::Serialize;

use crate::session::SessionPhase;
use crate::sim::{Feedback, GameMode, GameState, MonsterKind, Particle, Projectile};

/// One live target as the view sees it
#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub kind: MonsterKind,
    pub glyph: &'static str,
    pub code: &'static str,
    pub hint: Option<&'static str>,
    pub total_segments: u8,
    pub remaining_segments: u8,
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub mode: Option<GameMode>,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    /// Word-mode hints are hidden
    pub blind: bool,
    pub locked: Option<u32>,
    pub targets: Vec<TargetView>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub feedback: Option<Feedback>,
}

impl SessionSnapshot {
    /// Snapshot with no game attached
    pub fn idle(phase: SessionPhase) -> Self {
        Self {
            phase,
            mode: None,
            score: 0,
            lives: 0,
            level: 1,
            blind: false,
            locked: None,
            targets: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            feedback: None,
        }
    }

    pub fn capture(phase: SessionPhase, state: &GameState) -> Self {
        let targets = state
            .targets
            .iter()
            .map(|t| TargetView {
                id: t.id,
                x: t.pos.x,
                y: t.pos.y,
                kind: t.kind,
                glyph: t.content.glyph(),
                code: t.content.code(),
                hint: t.content.hint(),
                total_segments: t.total_segments,
                remaining_segments: t.remaining_segments,
                locked: state.is_locked(t.id),
            })
            .collect();

        Self {
            phase,
            mode: Some(state.mode),
            score: state.score,
            lives: state.lives,
            level: state.level(),
            blind: state.blind(),
            locked: state.locked,
            targets,
            projectiles: state.projectiles.clone(),
            particles: state.effects.particles.clone(),
            feedback: state.effects.feedback.clone(),
        }
    }

    /// The target with the given id
    pub fn target(&self, id: u32) -> Option<&TargetView> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
