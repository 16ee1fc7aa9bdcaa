//! Browser bindings
//!
//! The page drives the clock: it calls `tick` from a timer and forwards
//! `keydown` letters to `on_key`. Everything crosses the boundary as JSON.

use wasm_bindgen::prelude::*;

use crate::data;
use crate::highscores::HighScores;
use crate::persistence::LocalStore;
use crate::practice::PracticeDrill;
use crate::session::Session;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameMode, KeyOutcome};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(js_err)
}

/// Set up logging and panic reporting. Safe to call more than once.
#[wasm_bindgen]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Sucheng Quest starting...");
    }
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
    store: LocalStore,
    game_over: Option<u64>,
    events: Vec<GameEvent>,
}

#[wasm_bindgen]
impl WebSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        let store = LocalStore;
        let settings = Settings::load(&store);
        let seed = js_sys::Date::now() as u64;
        WebSession {
            session: Session::with_settings(seed, settings),
            store,
            game_over: None,
            events: Vec::new(),
        }
    }

    /// Tick period the page should use
    #[wasm_bindgen(getter)]
    pub fn tick_ms(&self) -> u32 {
        self.session.settings().tick_ms() as u32
    }

    /// Start (or restart) a run. `mode` is "roots" or "words".
    pub fn start_session(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = GameMode::from_str(mode)
            .ok_or_else(|| JsValue::from_str(&format!("unknown mode {mode:?}")))?;
        self.game_over = None;
        self.events.clear();
        self.session.start(mode);
        Ok(())
    }

    /// Feed a `KeyboardEvent.key`. Returns true when it hit something.
    pub fn on_key(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return false;
        };
        let outcome = self.session.on_key(c);
        self.collect_events();
        matches!(outcome, KeyOutcome::Hit { .. } | KeyOutcome::Defeated { .. })
    }

    pub fn unlock(&mut self) {
        self.session.unlock();
    }

    pub fn tick(&mut self, dt_ms: u32) {
        self.session.tick(u64::from(dt_ms));
        self.collect_events();
    }

    pub fn on_exit(&mut self) {
        self.session.on_exit();
        self.events.clear();
    }

    pub fn is_running(&self) -> bool {
        self.session.is_running()
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.session.snapshot().to_json().map_err(js_err)
    }

    /// Events since the last call, for sound and animation cues
    pub fn take_events_json(&mut self) -> Result<String, JsValue> {
        to_json(&std::mem::take(&mut self.events))
    }

    /// Final score, reported once per run
    pub fn take_game_over(&mut self) -> Option<f64> {
        self.game_over.take().map(|score| score as f64)
    }

    /// Rank a score would reach, 0 if it would not place
    pub fn potential_rank(&self, score: f64) -> u32 {
        HighScores::load(&self.store)
            .potential_rank(score as u64)
            .map_or(0, |rank| rank as u32)
    }

    /// Save a score. Returns the rank reached, 0 if refused.
    pub fn submit_score(&mut self, name: &str, score: f64) -> Result<u32, JsValue> {
        let rank = HighScores::submit(&mut self.store, name, score as u64, chrono::Utc::now())
            .map_err(js_err)?;

        let mut settings = self.session.settings().clone();
        settings.player_name = crate::highscores::clean_name(name);
        if let Err(e) = settings.save(&mut self.store) {
            log::warn!("Could not remember player name: {}", e);
        }
        self.session.set_settings(settings);
        Ok(rank.map_or(0, |rank| rank as u32))
    }

    pub fn leaderboard_json(&self) -> Result<String, JsValue> {
        to_json(&HighScores::load(&self.store))
    }

    pub fn settings_json(&self) -> Result<String, JsValue> {
        to_json(self.session.settings())
    }

    /// Replace and persist settings. They apply from the next run.
    pub fn save_settings_json(&mut self, json: &str) -> Result<(), JsValue> {
        let settings: Settings = serde_json::from_str(json).map_err(js_err)?;
        settings.save(&mut self.store).map_err(js_err)?;
        self.session.set_settings(settings);
        Ok(())
    }

    fn collect_events(&mut self) {
        for event in self.session.take_events() {
            if let GameEvent::GameOver { score } = event {
                self.game_over = Some(score);
            }
            self.events.push(event);
        }
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser wrapper for the practice drill
#[wasm_bindgen]
pub struct WebDrill {
    drill: PracticeDrill,
}

#[wasm_bindgen]
impl WebDrill {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebDrill {
        WebDrill {
            drill: PracticeDrill::new(js_sys::Date::now() as u64),
        }
    }

    /// Returns "typed", "correct", "wrong" or "ignored"
    pub fn on_key(&mut self, key: &str) -> String {
        if key == "Backspace" {
            self.drill.backspace();
            return "typed".into();
        }
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return "ignored".into();
        };
        format!("{:?}", self.drill.on_key(c)).to_lowercase()
    }

    pub fn request_hint(&mut self) {
        self.drill.request_hint();
    }

    pub fn skip(&mut self) {
        self.drill.next_word();
    }

    pub fn tick(&mut self, dt_ms: u32) {
        self.drill.advance(u64::from(dt_ms));
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        let word = self.drill.current();
        to_json(&serde_json::json!({
            "glyph": word.glyph,
            "hint": word.hint,
            "input": self.drill.input(),
            "slots": self.drill.slots(),
            "status": self.drill.status(),
            "streak": self.drill.streak(),
            "best_streak": self.drill.best_streak(),
            "next_hint": self.drill.hint(),
        }))
    }
}

impl Default for WebDrill {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference table lookup, as JSON rows
#[wasm_bindgen]
pub fn search_json(filter: &str) -> Result<String, JsValue> {
    let rows: Vec<_> = data::search(filter)
        .into_iter()
        .map(|w| {
            serde_json::json!({
                "glyph": w.glyph,
                "code": w.code,
                "category": w.category.as_str(),
                "roots": data::decompose(w.code),
            })
        })
        .collect();
    to_json(&rows)
}
