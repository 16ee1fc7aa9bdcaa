//! Cosmetic effects: particles and the transient feedback message
//!
//! Nothing in here feeds back into scoring or matching.

use glam::Vec2;
use rand::Rng;
use serde::Serialize;

use crate::consts::*;

/// Color of a defeat burst
pub const DEFEAT_COLOR: &str = "#facc15";
/// Color of an escape burst
pub const ESCAPE_COLOR: &str = "#ef4444";

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub color: &'static str,
    /// 0-1, decreases every tick
    pub life: f32,
}

/// What the feedback message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeedbackKind {
    Damage,
    Miss,
    Wave,
    /// Word mode just went blind
    Blind,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feedback {
    pub text: String,
    pub kind: FeedbackKind,
    pub pos: Vec2,
    pub remaining_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub feedback: Option<Feedback>,
    /// Particle cap (0 disables bursts)
    pub max_particles: usize,
    /// Suppress feedback text
    pub quiet: bool,
}

impl Default for Effects {
    fn default() -> Self {
        Self {
            particles: Vec::new(),
            feedback: None,
            max_particles: MAX_PARTICLES,
            quiet: false,
        }
    }
}

impl Effects {
    /// Spawn `count` particles jittered around `origin`, up to the cap
    pub fn burst(&mut self, rng: &mut impl Rng, origin: Vec2, color: &'static str, count: usize) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let jitter = Vec2::new(
                rng.random_range(-PARTICLE_JITTER..PARTICLE_JITTER),
                rng.random_range(-PARTICLE_JITTER..PARTICLE_JITTER),
            );
            self.particles.push(Particle {
                pos: origin + jitter,
                color,
                life: 1.0,
            });
        }
    }

    /// Show a message, replacing any current one
    pub fn show(&mut self, text: impl Into<String>, kind: FeedbackKind, pos: Vec2) {
        if self.quiet {
            return;
        }
        self.feedback = Some(Feedback {
            text: text.into(),
            kind,
            pos,
            remaining_ms: FEEDBACK_MS,
        });
    }

    /// Advance one tick: particles fade and drift, feedback counts down
    pub fn decay(&mut self, dt_ms: u64) {
        for p in self.particles.iter_mut() {
            p.life -= PARTICLE_DECAY;
            p.pos.y += PARTICLE_DRIFT;
        }
        // tolerance absorbs f32 drift over the 20 decrements
        self.particles.retain(|p| p.life > 1e-4);

        if let Some(fb) = &mut self.feedback {
            fb.remaining_ms = fb.remaining_ms.saturating_sub(dt_ms);
            if fb.remaining_ms == 0 {
                self.feedback = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.particles.clear();
        self.feedback = None;
    }
}
