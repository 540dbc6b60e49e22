//! Achievement catalog and unlock set.
//!
//! The catalog is a closed enum of 19 entries. The unlock set keeps ids in
//! unlock order; unlocking twice is a no-op that returns `false`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstPiece,
    FirstClear,
    #[serde(rename = "score_500")]
    Score500,
    #[serde(rename = "level_3")]
    Level3,
    #[serde(rename = "combo_3")]
    Combo3,
    #[serde(rename = "tetris_1")]
    Tetris1,
    #[serde(rename = "survive_5min")]
    Survive5Min,
    #[serde(rename = "moves_100")]
    Moves100,
    NeonMaster,
    #[serde(rename = "score_1000")]
    Score1000,
    #[serde(rename = "score_10000")]
    Score10000,
    #[serde(rename = "combo_10")]
    Combo10,
    #[serde(rename = "clear_500")]
    Clear500,
    #[serde(rename = "clear_1000")]
    Clear1000,
    #[serde(rename = "moves_1000")]
    Moves1000,
    #[serde(rename = "tetris_10")]
    Tetris10,
    Lightning,
    Lucky,
    Legend,
}

/// Basic achievements come first in the catalog, advanced ones after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Basic,
    Advanced,
}

impl AchievementId {
    /// Catalog order
    pub const ALL: [AchievementId; 19] = [
        AchievementId::FirstPiece,
        AchievementId::FirstClear,
        AchievementId::Score500,
        AchievementId::Level3,
        AchievementId::Combo3,
        AchievementId::Tetris1,
        AchievementId::Survive5Min,
        AchievementId::Moves100,
        AchievementId::NeonMaster,
        AchievementId::Score1000,
        AchievementId::Score10000,
        AchievementId::Combo10,
        AchievementId::Clear500,
        AchievementId::Clear1000,
        AchievementId::Moves1000,
        AchievementId::Tetris10,
        AchievementId::Lightning,
        AchievementId::Lucky,
        AchievementId::Legend,
    ];

    /// Stable identifier, as written to disk
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementId::FirstPiece => "first_piece",
            AchievementId::FirstClear => "first_clear",
            AchievementId::Score500 => "score_500",
            AchievementId::Level3 => "level_3",
            AchievementId::Combo3 => "combo_3",
            AchievementId::Tetris1 => "tetris_1",
            AchievementId::Survive5Min => "survive_5min",
            AchievementId::Moves100 => "moves_100",
            AchievementId::NeonMaster => "neon_master",
            AchievementId::Score1000 => "score_1000",
            AchievementId::Score10000 => "score_10000",
            AchievementId::Combo10 => "combo_10",
            AchievementId::Clear500 => "clear_500",
            AchievementId::Clear1000 => "clear_1000",
            AchievementId::Moves1000 => "moves_1000",
            AchievementId::Tetris10 => "tetris_10",
            AchievementId::Lightning => "lightning",
            AchievementId::Lucky => "lucky",
            AchievementId::Legend => "legend",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AchievementId::FirstPiece => "First Steps",
            AchievementId::FirstClear => "First Clear",
            AchievementId::Score500 => "Five Hundred",
            AchievementId::Level3 => "Getting Warmer",
            AchievementId::Combo3 => "Combo Rookie",
            AchievementId::Tetris1 => "Tetris Debut",
            AchievementId::Survive5Min => "Persistence",
            AchievementId::Moves100 => "Busy Hands",
            AchievementId::NeonMaster => "Neon Lover",
            AchievementId::Score1000 => "Thousand Club",
            AchievementId::Score10000 => "Living Legend",
            AchievementId::Combo10 => "Combo Storm",
            AchievementId::Clear500 => "Line Sweeper",
            AchievementId::Clear1000 => "Line Annihilator",
            AchievementId::Moves1000 => "Ghost Fingers",
            AchievementId::Tetris10 => "Tetris Master",
            AchievementId::Lightning => "Lightning Hands",
            AchievementId::Lucky => "Lucky Streak",
            AchievementId::Legend => "Immortal",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AchievementId::FirstPiece => "Place your first piece",
            AchievementId::FirstClear => "Clear your first line",
            AchievementId::Score500 => "Reach 500 points",
            AchievementId::Level3 => "Reach level 3",
            AchievementId::Combo3 => "Chain a 3x combo",
            AchievementId::Tetris1 => "Clear four lines at once",
            AchievementId::Survive5Min => "Play for more than 5 minutes",
            AchievementId::Moves100 => "Make 100 moves",
            AchievementId::NeonMaster => "Switch on neon mode",
            AchievementId::Score1000 => "Reach 1000 points",
            AchievementId::Score10000 => "Reach 10000 points",
            AchievementId::Combo10 => "Chain a 10x combo",
            AchievementId::Clear500 => "Clear 500 lines in total",
            AchievementId::Clear1000 => "Clear 1000 lines in total",
            AchievementId::Moves1000 => "Make more than 1000 moves",
            AchievementId::Tetris10 => "Clear four lines at once 10 times",
            AchievementId::Lightning => "Clear 5 lines within 10 seconds",
            AchievementId::Lucky => "Get the same piece 5 times in a row",
            AchievementId::Legend => "Play for more than an hour",
        }
    }

    pub fn tier(&self) -> Tier {
        match self {
            AchievementId::FirstPiece
            | AchievementId::FirstClear
            | AchievementId::Score500
            | AchievementId::Level3
            | AchievementId::Combo3
            | AchievementId::Tetris1
            | AchievementId::Survive5Min
            | AchievementId::Moves100
            | AchievementId::NeonMaster => Tier::Basic,
            _ => Tier::Advanced,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        AchievementId::ALL.into_iter().find(|id| id.as_str() == s)
    }
}

/// Set of unlocked achievements, in unlock order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Achievements {
    #[serde(default)]
    unlocked: Vec<AchievementId>,
}

impl Achievements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlock `id`. Returns true only the first time.
    pub fn unlock(&mut self, id: AchievementId) -> bool {
        if self.is_unlocked(id) {
            return false;
        }
        self.unlocked.push(id);
        true
    }

    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }

    pub fn unlocked(&self) -> &[AchievementId] {
        &self.unlocked
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    /// Drop duplicate ids a hand-edited file may contain.
    pub fn normalized(mut self) -> Self {
        let mut seen = Vec::with_capacity(self.unlocked.len());
        self.unlocked.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_nineteen_unique_ids() {
        let mut ids: Vec<&str> = AchievementId::ALL.iter().map(|a| a.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 19);
    }

    #[test]
    fn test_tiers_split_nine_and_ten() {
        let basic = AchievementId::ALL
            .iter()
            .filter(|a| a.tier() == Tier::Basic)
            .count();
        assert_eq!(basic, 9);
    }

    #[test]
    fn test_serde_names_match_ids() {
        for id in AchievementId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
            assert_eq!(AchievementId::from_str(id.as_str()), Some(id));
        }
    }

    #[test]
    fn test_unlock_is_idempotent() {
        let mut a = Achievements::new();
        assert!(a.unlock(AchievementId::Lucky));
        assert!(!a.unlock(AchievementId::Lucky));
        assert!(a.unlock(AchievementId::FirstPiece));
        assert_eq!(
            a.unlocked(),
            &[AchievementId::Lucky, AchievementId::FirstPiece]
        );
    }

    #[test]
    fn test_record_format() {
        let mut a = Achievements::new();
        a.unlock(AchievementId::Combo3);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"unlocked":["combo_3"]}"#);
    }

    #[test]
    fn test_unknown_id_is_malformed() {
        let r: Result<Achievements, _> = serde_json::from_str(r#"{"unlocked":["speedrun"]}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_normalized_drops_duplicates() {
        let a: Achievements =
            serde_json::from_str(r#"{"unlocked":["lucky","legend","lucky"]}"#).unwrap();
        let a = a.normalized();
        assert_eq!(a.unlocked_count(), 2);
    }
}
