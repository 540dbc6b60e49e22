//! Scoring module - line points, combo bonus, level and gravity
//!
//! Rules:
//! - A clear of `n` lines at level `L` is worth `n * 100 * L` points.
//! - A clear that lands within 2000 ms of the previous clear extends the
//!   combo; otherwise the combo restarts at 1. Each combo step beyond the
//!   first adds `50 * n` points.
//! - `level = lines / 10 + 1`.
//! - Gravity interval is `max(100, 500 - (level - 1) * 50)` ms.
//!
//! Locks without a clear leave the combo untouched; it only ever resets on
//! the next clear that arrives after the timeout.

use crate::types::{
    BASE_FALL_MS, COMBO_POINTS, COMBO_TIMEOUT_MS, FALL_STEP_MS, LINES_PER_LEVEL, LINE_POINTS,
    MIN_FALL_MS,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// `lines * 100 * level`
    pub base: u32,
    /// `(combo - 1) * 50 * lines`
    pub combo_bonus: u32,
    pub total: u32,
}

/// Points for a clear of `lines` at `level` with the combo already updated.
pub fn calculate_score(lines: u32, level: u32, combo: u32) -> ScoreResult {
    if lines == 0 {
        return ScoreResult::default();
    }
    let base = lines.saturating_mul(LINE_POINTS).saturating_mul(level);
    let combo_bonus = combo
        .saturating_sub(1)
        .saturating_mul(COMBO_POINTS)
        .saturating_mul(lines);
    ScoreResult {
        base,
        combo_bonus,
        total: base.saturating_add(combo_bonus),
    }
}

/// Level reached after clearing `lines` in total
pub fn level_for_lines(lines: u32) -> u32 {
    lines / LINES_PER_LEVEL + 1
}

/// Gravity interval in ms for a level (levels below 1 count as 1)
pub fn fall_interval_ms(level: u32) -> u32 {
    let steps = level.saturating_sub(1);
    BASE_FALL_MS
        .saturating_sub(steps.saturating_mul(FALL_STEP_MS))
        .max(MIN_FALL_MS)
}

/// Combo counter keyed on the time of the previous successful clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComboTracker {
    combo: u32,
    last_clear_ms: Option<u64>,
}

impl ComboTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current combo; 0 until the first clear of the session
    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn last_clear_ms(&self) -> Option<u64> {
        self.last_clear_ms
    }

    /// Register a successful clear at `now_ms` and return the new combo.
    pub fn register_clear(&mut self, now_ms: u64) -> u32 {
        let within = self
            .last_clear_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < COMBO_TIMEOUT_MS);
        self.combo = if within {
            self.combo.saturating_add(1)
        } else {
            1
        };
        self.last_clear_ms = Some(now_ms);
        self.combo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_scores_by_level() {
        assert_eq!(calculate_score(1, 1, 1).total, 100);
        assert_eq!(calculate_score(1, 5, 1).total, 500);
    }

    #[test]
    fn test_multi_line_is_linear() {
        assert_eq!(calculate_score(2, 1, 1).total, 200);
        assert_eq!(calculate_score(3, 1, 1).total, 300);
        assert_eq!(calculate_score(4, 2, 1).total, 800);
    }

    #[test]
    fn test_combo_bonus() {
        let r = calculate_score(2, 1, 3);
        assert_eq!(r.base, 200);
        assert_eq!(r.combo_bonus, 200);
        assert_eq!(r.total, 400);
    }

    #[test]
    fn test_zero_lines_scores_nothing() {
        assert_eq!(calculate_score(0, 9, 9), ScoreResult::default());
    }

    #[test]
    fn test_level_for_lines() {
        assert_eq!(level_for_lines(0), 1);
        assert_eq!(level_for_lines(9), 1);
        assert_eq!(level_for_lines(10), 2);
        assert_eq!(level_for_lines(25), 3);
    }

    #[test]
    fn test_fall_interval() {
        assert_eq!(fall_interval_ms(0), 500);
        assert_eq!(fall_interval_ms(1), 500);
        assert_eq!(fall_interval_ms(2), 450);
        assert_eq!(fall_interval_ms(9), 100);
        assert_eq!(fall_interval_ms(10), 100);
        assert_eq!(fall_interval_ms(u32::MAX), 100);
    }

    #[test]
    fn test_first_clear_starts_combo_at_one() {
        let mut combo = ComboTracker::new();
        assert_eq!(combo.combo(), 0);
        assert_eq!(combo.register_clear(10_000), 1);
    }

    #[test]
    fn test_combo_within_window_increments() {
        let mut combo = ComboTracker::new();
        combo.register_clear(1_000);
        assert_eq!(combo.register_clear(1_500), 2);
        assert_eq!(combo.register_clear(3_000), 3);
    }

    #[test]
    fn test_combo_after_timeout_resets() {
        let mut combo = ComboTracker::new();
        combo.register_clear(1_000);
        combo.register_clear(1_500);
        assert_eq!(combo.register_clear(4_000), 1);
        assert_eq!(combo.last_clear_ms(), Some(4_000));
    }

    #[test]
    fn test_combo_boundary_is_exclusive() {
        let mut combo = ComboTracker::new();
        combo.register_clear(0);
        assert_eq!(combo.register_clear(COMBO_TIMEOUT_MS), 1);
    }
}
