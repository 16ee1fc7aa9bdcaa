//! Self-paced practice drill
//!
//! One word at a time, no falling targets. The player fills the code
//! slots; a full buffer is checked automatically.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::data::{WORD_TABLE, WordEntry, root_glyph};
use crate::sim::normalize_key;

/// Delay before moving on after a correct answer
pub const ADVANCE_DELAY_MS: u64 = 1000;
/// Delay before clearing a wrong answer
pub const RETRY_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DrillStatus {
    Typing,
    Correct,
    Wrong,
}

/// What a key did in the drill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillOutcome {
    Ignored,
    Typed,
    Correct,
    Wrong,
}

/// Hint for the next slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DrillHint {
    /// "頭碼" for the first letter, "尾碼" after
    pub label: &'static str,
    pub root: &'static str,
}

#[derive(Debug, Clone)]
pub struct PracticeDrill {
    order: Vec<usize>,
    cursor: usize,
    input: String,
    status: DrillStatus,
    status_ms: u64,
    show_hint: bool,
    streak: u32,
    best_streak: u32,
}

impl PracticeDrill {
    /// Drill over the whole word table in a seeded random order
    pub fn new(seed: u64) -> Self {
        let mut order: Vec<usize> = (0..WORD_TABLE.len()).collect();
        order.shuffle(&mut Pcg32::seed_from_u64(seed));
        Self {
            order,
            cursor: 0,
            input: String::new(),
            status: DrillStatus::Typing,
            status_ms: 0,
            show_hint: false,
            streak: 0,
            best_streak: 0,
        }
    }

    pub fn current(&self) -> &'static WordEntry {
        &WORD_TABLE[self.order[self.cursor]]
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> DrillStatus {
        self.status
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.best_streak
    }

    /// Typed letters paired with their root glyphs, one per code slot
    pub fn slots(&self) -> Vec<Option<(char, &'static str)>> {
        let typed: Vec<char> = self.input.chars().collect();
        (0..self.current().code.len())
            .map(|i| {
                typed
                    .get(i)
                    .map(|&c| (c, root_glyph(c).unwrap_or("?")))
            })
            .collect()
    }

    pub fn on_key(&mut self, key: char) -> DrillOutcome {
        if self.status == DrillStatus::Correct {
            return DrillOutcome::Ignored;
        }
        let Some(key) = normalize_key(key) else {
            return DrillOutcome::Ignored;
        };
        let code = self.current().code;
        if self.input.len() >= code.len() {
            return DrillOutcome::Ignored;
        }

        self.input.push(key);
        self.show_hint = false;
        if self.input.len() < code.len() {
            return DrillOutcome::Typed;
        }

        if self.input == code {
            self.status = DrillStatus::Correct;
            self.status_ms = ADVANCE_DELAY_MS;
            self.streak += 1;
            self.best_streak = self.best_streak.max(self.streak);
            DrillOutcome::Correct
        } else {
            self.status = DrillStatus::Wrong;
            self.status_ms = RETRY_DELAY_MS;
            self.streak = 0;
            DrillOutcome::Wrong
        }
    }

    /// Delete the last typed letter
    pub fn backspace(&mut self) {
        if self.status == DrillStatus::Correct {
            return;
        }
        self.input.pop();
        self.status = DrillStatus::Typing;
        self.status_ms = 0;
        self.show_hint = false;
    }

    /// Reveal the root for the next slot
    pub fn request_hint(&mut self) {
        if self.status != DrillStatus::Correct && self.input.len() < self.current().code.len() {
            self.show_hint = true;
        }
    }

    pub fn hint(&self) -> Option<DrillHint> {
        if !self.show_hint {
            return None;
        }
        let next = self.input.len();
        let letter = self.current().code.chars().nth(next)?;
        Some(DrillHint {
            label: if next == 0 { "頭碼" } else { "尾碼" },
            root: root_glyph(letter)?,
        })
    }

    /// Run the post-answer timers
    pub fn advance(&mut self, dt_ms: u64) {
        if self.status == DrillStatus::Typing {
            return;
        }
        self.status_ms = self.status_ms.saturating_sub(dt_ms);
        if self.status_ms > 0 {
            return;
        }
        match self.status {
            DrillStatus::Correct => self.next_word(),
            DrillStatus::Wrong => {
                self.input.clear();
                self.status = DrillStatus::Typing;
            }
            DrillStatus::Typing => {}
        }
    }

    /// Skip to the next word, wrapping around the table
    pub fn next_word(&mut self) {
        self.cursor = (self.cursor + 1) % self.order.len();
        self.input.clear();
        self.status = DrillStatus::Typing;
        self.status_ms = 0;
        self.show_hint = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_code(drill: &mut PracticeDrill, code: &str) -> DrillOutcome {
        let mut last = DrillOutcome::Ignored;
        for c in code.chars() {
            last = drill.on_key(c);
        }
        last
    }

    #[test]
    fn test_order_covers_table() {
        let drill = PracticeDrill::new(1);
        let mut seen = drill.order.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..WORD_TABLE.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_correct_answer_advances_after_delay() {
        let mut drill = PracticeDrill::new(2);
        let first = drill.current();
        assert_eq!(type_code(&mut drill, first.code), DrillOutcome::Correct);
        assert_eq!(drill.streak(), 1);

        // Input is frozen while celebrating
        assert_eq!(drill.on_key('A'), DrillOutcome::Ignored);
        drill.advance(ADVANCE_DELAY_MS - 1);
        assert_eq!(drill.status(), DrillStatus::Correct);
        drill.advance(1);
        assert_eq!(drill.status(), DrillStatus::Typing);
        assert!(drill.input().is_empty());
        assert_eq!(drill.cursor, 1);
    }

    #[test]
    fn test_wrong_answer_resets_streak_and_clears() {
        let mut drill = PracticeDrill::new(3);
        let code = drill.current().code;
        type_code(&mut drill, code);
        drill.advance(ADVANCE_DELAY_MS);

        let code = drill.current().code;
        let wrong: String = code.chars().map(|c| if c == 'Q' { 'W' } else { 'Q' }).collect();
        assert_eq!(type_code(&mut drill, &wrong), DrillOutcome::Wrong);
        assert_eq!(drill.streak(), 0);
        assert_eq!(drill.best_streak(), 1);

        drill.advance(RETRY_DELAY_MS);
        assert_eq!(drill.status(), DrillStatus::Typing);
        assert!(drill.input().is_empty());
        assert_eq!(drill.cursor, 1);
    }

    #[test]
    fn test_backspace_and_hints() {
        let mut drill = PracticeDrill::new(4);
        // Find a two-letter word
        while drill.current().code.len() < 2 {
            drill.next_word();
        }
        let code = drill.current().code;
        let head = code.chars().next().expect("non-empty code");

        drill.request_hint();
        let hint = drill.hint().expect("hint shown");
        assert_eq!(hint.label, "頭碼");
        assert_eq!(Some(hint.root), root_glyph(head));

        assert_eq!(drill.on_key(head.to_ascii_lowercase()), DrillOutcome::Typed);
        assert!(drill.hint().is_none());
        drill.request_hint();
        assert_eq!(drill.hint().map(|h| h.label), Some("尾碼"));

        let slots = drill.slots();
        assert_eq!(slots.len(), code.len());
        assert_eq!(slots[0].map(|(c, _)| c), Some(head));
        assert!(slots[1].is_none());

        drill.backspace();
        assert!(drill.input().is_empty());
        assert_eq!(drill.on_key('7'), DrillOutcome::Ignored);
    }
}
