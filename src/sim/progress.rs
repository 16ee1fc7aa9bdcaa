//! Score and progression
//!
//! Level is never stored: it is always `score / POINTS_PER_LEVEL + 1`.

use glam::Vec2;

use super::effects::FeedbackKind;
use super::state::{GameEvent, GameMode, GameState};
use crate::consts::*;

/// Level for a given score (1-based)
#[inline]
pub fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL) as u32 + 1
}

/// Spawn-rate scaling for a level
#[inline]
pub fn difficulty_multiplier(level: u32) -> f32 {
    1.0 + level as f32 * DIFFICULTY_PER_LEVEL
}

/// Fall-speed scaling: unscaled until the first level-up, then the
/// level's difficulty multiplier
#[inline]
pub fn fall_speed_multiplier(level: u32) -> f32 {
    if level <= 1 {
        1.0
    } else {
        difficulty_multiplier(level)
    }
}

/// Minimum time between spawns at a level
#[inline]
pub fn spawn_interval_ms(level: u32) -> f32 {
    BASE_SPAWN_INTERVAL_MS / difficulty_multiplier(level)
}

/// Add points and announce a level change if one happened
pub fn award(state: &mut GameState, points: u64) {
    let before = state.level();
    state.score += points;
    let after = state.level();
    if after == before {
        return;
    }

    log::info!(
        "Wave {} reached (score {}, multiplier {:.2})",
        after,
        state.score,
        fall_speed_multiplier(after)
    );
    state.events.push(GameEvent::LevelUp { level: after });

    let banner = Vec2::new(50.0, 40.0);
    if state.mode == GameMode::WordChallenge && after == BLIND_MODE_LEVEL {
        state.effects.show("盲打模式！", FeedbackKind::Blind, banner);
    } else {
        state
            .effects
            .show(format!("第 {} 波", after), FeedbackKind::Wave, banner);
    }
}

/// Take one life. Returns true if this ended the game.
pub fn take_damage(state: &mut GameState) -> bool {
    state.lives = state.lives.saturating_sub(1);
    state
        .effects
        .show("受傷！", FeedbackKind::Damage, Vec2::new(50.0, 80.0));

    if state.lives == 0 && !state.game_over {
        state.game_over = true;
        log::info!("Game over with score {}", state.score);
        state.events.push(GameEvent::GameOver { score: state.score });
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_formula() {
        assert_eq!(level_for_score(0), 1);
        assert_eq!(level_for_score(1499), 1);
        assert_eq!(level_for_score(1500), 2);
        assert_eq!(level_for_score(4500), 4);
    }

    #[test]
    fn test_difficulty_curve() {
        assert!((difficulty_multiplier(1) - 1.15).abs() < 1e-6);
        assert!((difficulty_multiplier(2) - 1.30).abs() < 1e-6);
        assert!((spawn_interval_ms(2) - 2000.0 / 1.3).abs() < 1e-3);
        assert!(spawn_interval_ms(2) < spawn_interval_ms(1));

        // Level 1 falls at base speed, the multiplier kicks in on level-up
        assert_eq!(fall_speed_multiplier(1), 1.0);
        assert!((fall_speed_multiplier(2) - 1.30).abs() < 1e-6);
        assert!((fall_speed_multiplier(4) - 1.60).abs() < 1e-6);
    }

    #[test]
    fn test_score_reaching_1500_levels_up() {
        let mut state = GameState::new(GameMode::WordChallenge, 1);
        state.score = 1400;
        award(&mut state, 100);
        assert_eq!(state.score, 1500);
        assert_eq!(state.level(), 2);
        assert_eq!(state.events, vec![GameEvent::LevelUp { level: 2 }]);
        let fb = state.effects.feedback.as_ref().expect("wave banner");
        assert_eq!(fb.text, "第 2 波");
        assert_eq!(fb.kind, FeedbackKind::Wave);
    }

    #[test]
    fn test_blind_banner_only_in_word_mode() {
        let mut words = GameState::new(GameMode::WordChallenge, 1);
        words.score = 4400;
        award(&mut words, 100);
        assert_eq!(words.level(), BLIND_MODE_LEVEL);
        assert!(words.blind());
        assert_eq!(
            words.effects.feedback.as_ref().map(|f| f.kind),
            Some(FeedbackKind::Blind)
        );

        let mut roots = GameState::new(GameMode::RootDrill, 1);
        roots.score = 4450;
        award(&mut roots, 50);
        assert_eq!(roots.level(), BLIND_MODE_LEVEL);
        assert!(!roots.blind());
        assert_eq!(
            roots.effects.feedback.as_ref().map(|f| f.kind),
            Some(FeedbackKind::Wave)
        );
    }

    #[test]
    fn test_lives_floor_at_zero_and_game_over_once() {
        let mut state = GameState::new(GameMode::RootDrill, 1);
        state.lives = 1;
        assert!(take_damage(&mut state));
        assert!(!take_damage(&mut state));
        assert_eq!(state.lives, 0);
        let overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(overs, 1);
    }
}
