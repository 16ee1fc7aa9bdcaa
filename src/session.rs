//! Game session: owns the simulation and its lifecycle
//!
//! `Idle -> Running -> Ended`. Ticks and keys are only processed while
//! running; the game-over listener fires exactly once per run.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameMode, GameState, KeyOutcome};
use crate::snapshot::SessionSnapshot;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Idle,
    Running,
    /// Lives ran out; the final score has been reported
    Ended,
}

/// Called with the final score when a run ends
pub type GameOverListener = Box<dyn FnMut(u64) + Send>;

pub struct Session {
    phase: SessionPhase,
    state: Option<GameState>,
    settings: Settings,
    seed: u64,
    runs: u64,
    final_score: Option<u64>,
    events: Vec<GameEvent>,
    on_game_over: Option<GameOverListener>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("seed", &self.seed)
            .field("runs", &self.runs)
            .field("final_score", &self.final_score)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        Self {
            phase: SessionPhase::Idle,
            state: None,
            settings,
            seed,
            runs: 0,
            final_score: None,
            events: Vec::new(),
            on_game_over: None,
        }
    }

    /// Register the game-over callback
    pub fn set_game_over_listener(&mut self, listener: impl FnMut(u64) + Send + 'static) {
        self.on_game_over = Some(Box::new(listener));
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// The running (or just-ended) game
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Test and tooling access to the live game
    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. A run in progress keeps its effects caps;
    /// the next `start` picks these up.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Score reported by the last game over
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Begin a fresh run. Everything is reset; a run already in progress
    /// is abandoned without a game over.
    pub fn start(&mut self, mode: GameMode) {
        if self.phase == SessionPhase::Running {
            log::info!("Restarting session mid-run");
        }

        let seed = self.seed.wrapping_add(self.runs);
        self.runs += 1;

        let mut state = GameState::new(mode, seed);
        state.effects.max_particles = self.settings.max_particles();
        state.effects.quiet = self.settings.reduced_motion;

        self.state = Some(state);
        self.final_score = None;
        self.events.clear();
        self.phase = SessionPhase::Running;
        log::info!("Session started: mode={}, seed={}", mode.as_str(), seed);
    }

    /// Feed one key press
    pub fn on_key(&mut self, key: char) -> KeyOutcome {
        if self.phase != SessionPhase::Running {
            return KeyOutcome::Ignored;
        }
        let Some(state) = self.state.as_mut() else {
            return KeyOutcome::Ignored;
        };
        let outcome = sim::resolve_key(state, key);
        self.pump_events();
        outcome
    }

    /// Advance the simulation by one tick
    pub fn tick(&mut self, dt_ms: u64) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            sim::tick(state, dt_ms);
        }
        self.pump_events();
    }

    /// Release the current target lock
    pub fn unlock(&mut self) {
        if self.phase != SessionPhase::Running {
            return;
        }
        if let Some(state) = self.state.as_mut() {
            sim::unlock(state);
        }
    }

    /// Abandon the run without a game over. Safe to call at any time.
    pub fn on_exit(&mut self) {
        if self.phase == SessionPhase::Running {
            log::info!("Session exited");
        }
        self.phase = SessionPhase::Idle;
        self.state = None;
    }

    /// Events since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        match &self.state {
            Some(state) => SessionSnapshot::capture(self.phase, state),
            None => SessionSnapshot::idle(self.phase),
        }
    }

    /// Move simulation events into the session, handling game over
    fn pump_events(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for event in state.drain_events() {
            if let GameEvent::GameOver { score } = event {
                if self.phase == SessionPhase::Running {
                    self.phase = SessionPhase::Ended;
                    self.final_score = Some(score);
                    if let Some(listener) = self.on_game_over.as_mut() {
                        listener(score);
                    }
                }
            }
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use std::sync::{Arc, Mutex};

    fn run_until_over(session: &mut Session) {
        for _ in 0..100_000 {
            if !session.is_running() {
                return;
            }
            session.tick(TICK_MS);
        }
        panic!("game never ended");
    }

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new(1);
        assert_eq!(session.phase(), SessionPhase::Idle);
        session.tick(TICK_MS);
        assert!(session.state().is_none());
        assert_eq!(session.on_key('A'), KeyOutcome::Ignored);

        session.start(GameMode::RootDrill);
        assert_eq!(session.phase(), SessionPhase::Running);
        let state = session.state().expect("running state");
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, START_LIVES);
        assert_eq!(state.level(), 1);
    }

    #[test]
    fn test_game_over_fires_once() {
        let reported = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reported);

        let mut session = Session::new(7);
        session.set_game_over_listener(move |score| sink.lock().expect("lock").push(score));
        session.start(GameMode::WordChallenge);
        run_until_over(&mut session);

        assert_eq!(session.phase(), SessionPhase::Ended);
        assert_eq!(session.final_score(), Some(0));
        assert_eq!(*reported.lock().expect("lock"), vec![0]);

        // Nothing moves after the end
        let before = session.snapshot();
        session.tick(TICK_MS);
        session.tick(TICK_MS);
        assert_eq!(session.on_key('H'), KeyOutcome::Ignored);
        let after = session.snapshot();
        assert_eq!(before.targets.len(), after.targets.len());
        for (a, b) in before.targets.iter().zip(&after.targets) {
            assert_eq!(a.y, b.y);
        }
        assert_eq!(reported.lock().expect("lock").len(), 1);
    }

    #[test]
    fn test_exit_is_idempotent_and_silent() {
        let reported = Arc::new(Mutex::new(0u32));
        let sink = Arc::clone(&reported);

        let mut session = Session::new(3);
        session.set_game_over_listener(move |_| *sink.lock().expect("lock") += 1);
        session.start(GameMode::RootDrill);
        session.tick(TICK_MS);
        session.on_exit();
        session.on_exit();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.state().is_none());
        assert_eq!(*reported.lock().expect("lock"), 0);

        // Idle never-started exit is fine too
        let mut fresh = Session::new(4);
        fresh.on_exit();
        assert_eq!(fresh.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_restart_after_game_over_resets() {
        let mut session = Session::new(11);
        session.start(GameMode::RootDrill);
        run_until_over(&mut session);
        assert_eq!(session.phase(), SessionPhase::Ended);

        session.start(GameMode::WordChallenge);
        assert!(session.is_running());
        let state = session.state().expect("running state");
        assert_eq!(state.lives, START_LIVES);
        assert!(state.targets.is_empty());
        assert_eq!(session.final_score(), None);
    }

    #[test]
    fn test_settings_reach_effects() {
        let settings = Settings {
            particles: false,
            reduced_motion: true,
            ..Default::default()
        };
        let mut session = Session::with_settings(1, settings);
        session.start(GameMode::RootDrill);
        let state = session.state().expect("running state");
        assert_eq!(state.effects.max_particles, 0);
        assert!(state.effects.quiet);
    }

    #[test]
    fn test_settings_changed_mid_run_apply_on_restart() {
        let mut session = Session::new(2);
        session.start(GameMode::WordChallenge);
        session.tick(TICK_MS);

        session.set_settings(Settings {
            particles: false,
            ..Default::default()
        });
        let running = session.state().expect("running state");
        assert_eq!(running.effects.max_particles, 256);

        session.start(GameMode::WordChallenge);
        let state = session.state().expect("running state");
        assert_eq!(state.effects.max_particles, 0);
        assert!(!session.settings().particles);
    }
}
