//! Cumulative play statistics.
//!
//! Persisted counters survive restarts and are only zeroed by a factory
//! reset. Session fields (play time of the running session, piece streak)
//! are never serialized. Session play time is folded into
//! `total_game_time` when the session ends.

use serde::{Deserialize, Serialize};

use crate::types::PieceKind;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Statistics {
    /// Milliseconds of play across finished sessions
    pub total_game_time: u64,
    pub total_moves: u64,
    pub total_rotations: u64,
    pub highest_combo: u32,
    pub single_line_clears: u32,
    pub double_line_clears: u32,
    pub triple_line_clears: u32,
    pub tetris_clears: u32,
    pub max_consecutive_same: u32,
    pub games_played: u32,
    pub total_score: u64,
    pub highest_score: u32,

    #[serde(skip)]
    session_time_ms: u64,
    #[serde(skip)]
    session_active: bool,
    #[serde(skip)]
    last_piece: Option<PieceKind>,
    #[serde(skip)]
    consecutive_same: u32,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting a new session.
    pub fn begin_session(&mut self) {
        if self.session_active {
            self.end_session();
        }
        self.games_played = self.games_played.saturating_add(1);
        self.session_active = true;
        self.session_time_ms = 0;
        self.last_piece = None;
        self.consecutive_same = 0;
    }

    /// Fold the running session's play time into the persisted total.
    /// Returns false when no session was running.
    pub fn end_session(&mut self) -> bool {
        if !self.session_active {
            return false;
        }
        self.total_game_time = self.total_game_time.saturating_add(self.session_time_ms);
        self.session_time_ms = 0;
        self.session_active = false;
        true
    }

    pub fn session_active(&self) -> bool {
        self.session_active
    }

    /// Add active play time to the running session.
    pub fn accrue_play_time(&mut self, ms: u64) {
        if self.session_active {
            self.session_time_ms = self.session_time_ms.saturating_add(ms);
        }
    }

    pub fn session_time_ms(&self) -> u64 {
        self.session_time_ms
    }

    /// Finished sessions plus the running one
    pub fn total_time_with_session(&self) -> u64 {
        self.total_game_time.saturating_add(self.session_time_ms)
    }

    /// Copy to write to disk: the running session's time is counted as if
    /// the session had just ended.
    pub fn persisted(&self) -> Statistics {
        Statistics {
            total_game_time: self.total_time_with_session(),
            session_time_ms: 0,
            session_active: false,
            last_piece: None,
            consecutive_same: 0,
            ..self.clone()
        }
    }

    pub fn record_move(&mut self) {
        self.total_moves = self.total_moves.saturating_add(1);
    }

    pub fn record_rotation(&mut self) {
        self.total_rotations = self.total_rotations.saturating_add(1);
    }

    /// Moves plus rotations
    pub fn total_operations(&self) -> u64 {
        self.total_moves.saturating_add(self.total_rotations)
    }

    /// Count a clear by its size. Sizes outside 1..=4 are ignored.
    pub fn record_line_clear(&mut self, lines: u32) {
        let slot = match lines {
            1 => &mut self.single_line_clears,
            2 => &mut self.double_line_clears,
            3 => &mut self.triple_line_clears,
            4 => &mut self.tetris_clears,
            _ => return,
        };
        *slot = slot.saturating_add(1);
    }

    pub fn record_combo(&mut self, combo: u32) {
        self.highest_combo = self.highest_combo.max(combo);
    }

    pub fn record_score(&mut self, score: u32) {
        self.total_score = self.total_score.saturating_add(score as u64);
        self.highest_score = self.highest_score.max(score);
    }

    /// Track the streak of identical spawned kinds. Returns the streak
    /// length including this piece.
    pub fn record_spawn(&mut self, kind: PieceKind) -> u32 {
        if self.last_piece == Some(kind) {
            self.consecutive_same = self.consecutive_same.saturating_add(1);
        } else {
            self.consecutive_same = 1;
            self.last_piece = Some(kind);
        }
        self.max_consecutive_same = self.max_consecutive_same.max(self.consecutive_same);
        self.consecutive_same
    }

    /// Lines cleared across every recorded clear
    pub fn total_lines_cleared(&self) -> u64 {
        self.single_line_clears as u64
            + self.double_line_clears as u64 * 2
            + self.triple_line_clears as u64 * 3
            + self.tetris_clears as u64 * 4
    }
}

/// Format milliseconds as `HH:MM:SS`
pub fn format_duration(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_time_folds_on_end() {
        let mut stats = Statistics::new();
        stats.accrue_play_time(500);
        assert_eq!(stats.session_time_ms(), 0);

        stats.begin_session();
        assert_eq!(stats.games_played, 1);
        stats.accrue_play_time(1_500);
        assert_eq!(stats.total_time_with_session(), 1_500);
        assert_eq!(stats.total_game_time, 0);

        assert!(stats.end_session());
        assert_eq!(stats.total_game_time, 1_500);
        assert!(!stats.end_session());
        assert_eq!(stats.total_game_time, 1_500);
    }

    #[test]
    fn test_persisted_counts_running_session() {
        let mut stats = Statistics::new();
        stats.total_game_time = 1_000;
        stats.begin_session();
        stats.accrue_play_time(250);
        let saved = stats.persisted();
        assert_eq!(saved.total_game_time, 1_250);
        assert!(!saved.session_active());
        assert_eq!(stats.total_game_time, 1_000);
    }

    #[test]
    fn test_begin_session_closes_previous() {
        let mut stats = Statistics::new();
        stats.begin_session();
        stats.accrue_play_time(700);
        stats.begin_session();
        assert_eq!(stats.total_game_time, 700);
        assert_eq!(stats.games_played, 2);
    }

    #[test]
    fn test_line_clear_buckets() {
        let mut stats = Statistics::new();
        for n in [1, 2, 2, 3, 4, 4, 4, 0, 5] {
            stats.record_line_clear(n);
        }
        assert_eq!(stats.single_line_clears, 1);
        assert_eq!(stats.double_line_clears, 2);
        assert_eq!(stats.triple_line_clears, 1);
        assert_eq!(stats.tetris_clears, 3);
        assert_eq!(stats.total_lines_cleared(), 1 + 4 + 3 + 12);
    }

    #[test]
    fn test_score_and_combo_maxima() {
        let mut stats = Statistics::new();
        stats.record_score(300);
        stats.record_score(100);
        assert_eq!(stats.total_score, 400);
        assert_eq!(stats.highest_score, 300);

        stats.record_combo(4);
        stats.record_combo(2);
        assert_eq!(stats.highest_combo, 4);
    }

    #[test]
    fn test_spawn_streak() {
        let mut stats = Statistics::new();
        assert_eq!(stats.record_spawn(PieceKind::T), 1);
        assert_eq!(stats.record_spawn(PieceKind::T), 2);
        assert_eq!(stats.record_spawn(PieceKind::O), 1);
        assert_eq!(stats.max_consecutive_same, 2);
    }

    #[test]
    fn test_session_fields_not_serialized() {
        let mut stats = Statistics::new();
        stats.begin_session();
        stats.accrue_play_time(42);
        let json = serde_json::to_value(&stats).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 12);
        assert!(obj.get("session_time_ms").is_none());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let r: Result<Statistics, _> = serde_json::from_str(r#"{"games_played":3,"bogus":1}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "00:00:00");
        assert_eq!(format_duration(61_000), "00:01:01");
        assert_eq!(format_duration(3_723_999), "01:02:03");
    }
}
