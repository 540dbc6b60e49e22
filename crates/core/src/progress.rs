//! Progression records owned by a game session.

use crate::achievements::Achievements;
use crate::leaderboard::Leaderboard;
use crate::settings::Settings;
use crate::statistics::Statistics;

/// Everything that outlives a single game: settings, statistics,
/// achievements and the leaderboard.
///
/// Loaded once at startup and handed to [`GameState::new`](crate::GameState::new);
/// the game mutates it in place and the owner persists copies of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub settings: Settings,
    pub statistics: Statistics,
    pub achievements: Achievements,
    pub leaderboard: Leaderboard,
}

impl Progress {
    pub fn new(
        settings: Settings,
        statistics: Statistics,
        achievements: Achievements,
        leaderboard: Leaderboard,
    ) -> Self {
        Self {
            settings,
            statistics,
            achievements,
            leaderboard,
        }
    }
}
