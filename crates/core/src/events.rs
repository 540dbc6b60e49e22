//! Notifications emitted by the game state.
//!
//! Events are fire-and-forget: the state pushes them as things happen and
//! the owner drains them once per frame with
//! [`GameState::drain_events`](crate::GameState::drain_events). Nothing in
//! the core waits for them to be consumed.

use crate::achievements::AchievementId;
use crate::board::ClearedRows;
use crate::types::PieceKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// One countdown step elapsed; `remaining` is the new value (2, 1).
    CountdownTick { remaining: u8 },
    /// Countdown finished and play begins
    Go,
    /// A piece was merged into the board at `(x, y)`
    PieceLocked {
        kind: PieceKind,
        x: i8,
        y: i8,
        /// Rows travelled by the final hard drop (0 for gravity locks)
        drop_distance: u8,
    },
    /// Full rows removed, indices as they were before removal (ascending)
    LinesCleared { count: u8, rows: ClearedRows },
    /// A clear extended the combo beyond 1
    ComboReached { combo: u32 },
    LevelUp { level: u32 },
    AchievementUnlocked(AchievementId),
    /// The player settings changed and should be persisted
    SettingsChanged,
    /// A score entered the leaderboard at `rank` (0-based)
    LeaderboardUpdated { rank: usize },
    GameOver {
        score: u32,
        level: u32,
        lines: u32,
        high_score: bool,
    },
    /// A running session ended (game over or restart); statistics should
    /// be persisted
    SessionEnded,
    /// Every persisted record must be deleted
    FactoryReset,
}

impl CoreEvent {
    /// Short, stable name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            CoreEvent::CountdownTick { .. } => "countdown_tick",
            CoreEvent::Go => "go",
            CoreEvent::PieceLocked { .. } => "piece_locked",
            CoreEvent::LinesCleared { .. } => "lines_cleared",
            CoreEvent::ComboReached { .. } => "combo_reached",
            CoreEvent::LevelUp { .. } => "level_up",
            CoreEvent::AchievementUnlocked(_) => "achievement_unlocked",
            CoreEvent::SettingsChanged => "settings_changed",
            CoreEvent::LeaderboardUpdated { .. } => "leaderboard_updated",
            CoreEvent::GameOver { .. } => "game_over",
            CoreEvent::SessionEnded => "session_ended",
            CoreEvent::FactoryReset => "factory_reset",
        }
    }
}
