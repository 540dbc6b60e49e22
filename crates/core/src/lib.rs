//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the rules of the game and the records a player builds
//! up over time. It performs **no** file or terminal I/O:
//!
//! - **Deterministic**: the same seed and the same inputs replay the same game
//! - **Injected time**: callers advance the game with [`GameState::tick`]
//! - **Injected progress**: settings, statistics, achievements and the
//!   leaderboard are passed in at construction and mutated in place
//!
//! # Module Structure
//!
//! - [`rng`]: seeded 7-bag randomizer
//! - [`pieces`]: piece matrices, spawn positions and clockwise rotation
//! - [`board`]: 10x21 grid with validity checks, ghost row, merge and line removal
//! - [`scoring`]: line points, combo tracking, level and gravity curves
//! - [`game_state`]: the session state machine
//! - [`events`]: notifications for storage and presentation
//! - [`settings`], [`statistics`], [`achievements`], [`leaderboard`]: progression records
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned run of 7 draws holds each kind once
//! - **Rotation**: 90° clockwise inside the bounding box, no wall kicks
//! - **Gravity**: one row every `max(100, 500 - (level - 1) * 50)` ms
//! - **Lock**: a piece that cannot fall locks on the next gravity step; hard
//!   drop locks immediately
//! - **Scoring**: `lines * 100 * level` plus `(combo - 1) * 50 * lines`
//! - **Combo**: clears less than 2 s apart extend the combo
//!
//! # Example
//!
//! ```
//! use tetris_enhanced_core::{GameState, Progress};
//! use tetris_enhanced_core::types::{GameAction, Phase};
//!
//! let mut game = GameState::new(12345, Progress::default());
//! game.apply_action(GameAction::Start);
//!
//! // 3-2-1 countdown
//! game.tick(3000);
//! assert_eq!(game.phase(), Phase::Playing);
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::HardDrop);
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`](game_state::GameState::tick) every frame with
//! the elapsed milliseconds (the binary uses a 16 ms fixed step).

pub mod achievements;
pub mod board;
pub mod events;
pub mod game_state;
pub mod leaderboard;
pub mod pieces;
pub mod progress;
pub mod rng;
pub mod scoring;
pub mod settings;
pub mod snapshot;
pub mod statistics;

pub use tetris_enhanced_types as types;

// Re-export commonly used types for convenience
pub use achievements::{AchievementId, Achievements, Tier};
pub use board::{Board, ClearedRows};
pub use events::CoreEvent;
pub use game_state::GameState;
pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use pieces::{rotate, Piece};
pub use progress::Progress;
pub use rng::{PieceBag, SimpleRng};
pub use scoring::{calculate_score, fall_interval_ms, level_for_lines, ComboTracker, ScoreResult};
pub use settings::{Settings, Theme};
pub use snapshot::GameSnapshot;
pub use statistics::Statistics;
