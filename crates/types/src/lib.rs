//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no external dependencies, so they can be
//! used by the core rules, the key-binding layer, storage and rendering alike.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 21 rows (indexed 0-20)
//! - **Spawn**: `x = BOARD_WIDTH / 2 - piece_width / 2`, `y = 0`
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed timestep interval (~60 FPS) |
//! | `BASE_FALL_MS` | 500 | Gravity interval at level 1 |
//! | `FALL_STEP_MS` | 50 | Gravity speed-up per level |
//! | `MIN_FALL_MS` | 100 | Gravity floor |
//! | `COMBO_TIMEOUT_MS` | 2000 | Max gap between clears that keeps a combo alive |
//! | `COUNTDOWN_STEP_MS` | 1000 | One countdown step |
//!
//! # Examples
//!
//! ```
//! use tetris_enhanced_types::{GameAction, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_id(3).unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.id(), 3);
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 21);
//! ```

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (21 rows)
pub const BOARD_HEIGHT: u8 = 21;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Gravity interval at level 1
pub const BASE_FALL_MS: u32 = 500;

/// Gravity gets this much faster with every level
pub const FALL_STEP_MS: u32 = 50;

/// Gravity never gets faster than this
pub const MIN_FALL_MS: u32 = 100;

/// Lines needed per level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points per cleared line (multiplied by level)
pub const LINE_POINTS: u32 = 100;

/// Combo bonus per combo step and per cleared line
pub const COMBO_POINTS: u32 = 50;

/// Two clears closer than this keep the combo going
pub const COMBO_TIMEOUT_MS: u64 = 2000;

/// Countdown start value shown before play begins
pub const COUNTDOWN_START: u8 = 3;

/// Duration of one countdown step
pub const COUNTDOWN_STEP_MS: u32 = 1000;

/// Number of entries the leaderboard keeps
pub const LEADERBOARD_CAPACITY: usize = 10;

/// Default statistics autosave interval
pub const AUTOSAVE_INTERVAL_MS: u32 = 1000;


/// The seven piece kinds, in catalog order.
///
/// The discriminant order matches the board cell identifiers 1..=7:
/// - **I**: 1x4 bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **L**: L-shaped
/// - **J**: J-shaped (mirror of L)
/// - **Z**: Z-shaped
/// - **S**: S-shaped (mirror of Z)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    O,
    T,
    L,
    J,
    Z,
    S,
}

impl PieceKind {
    /// Every kind, in identifier order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::L,
        PieceKind::J,
        PieceKind::Z,
        PieceKind::S,
    ];

    /// Board cell identifier (1..=7). 0 is reserved for empty cells.
    pub fn id(self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::L => 4,
            PieceKind::J => 5,
            PieceKind::Z => 6,
            PieceKind::S => 7,
        }
    }

    /// Inverse of [`PieceKind::id`].
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(PieceKind::I),
            2 => Some(PieceKind::O),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::L),
            5 => Some(PieceKind::J),
            6 => Some(PieceKind::Z),
            7 => Some(PieceKind::S),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_enhanced_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("S"), Some(PieceKind::S));
    /// assert_eq!(PieceKind::from_str("x"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "l" => Some(PieceKind::L),
            "j" => Some(PieceKind::J),
            "z" => Some(PieceKind::Z),
            "s" => Some(PieceKind::S),
            _ => None,
        }
    }

    /// Single uppercase letter
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::O => "O",
            PieceKind::T => "T",
            PieceKind::L => "L",
            PieceKind::J => "J",
            PieceKind::Z => "Z",
            PieceKind::S => "S",
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Session phase.
///
/// ```text
/// WaitingToStart -> Countdown -> Playing <-> Paused
///                                Playing  -> GameOver -> WaitingToStart
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    WaitingToStart,
    Countdown,
    Playing,
    Paused,
    GameOver,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::WaitingToStart => "waiting",
            Phase::Countdown => "countdown",
            Phase::Playing => "playing",
            Phase::Paused => "paused",
            Phase::GameOver => "game_over",
        }
    }

    /// A session has started and not yet ended.
    pub fn in_session(&self) -> bool {
        matches!(self, Phase::Playing | Phase::Paused)
    }
}

/// Side panels drawn over the board.
///
/// Opening one while playing forces a pause; only one is open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Overlay {
    Statistics,
    Achievements,
    Settings,
}

/// Typed edits to the player settings.
///
/// Volumes are given in percent and clamped to 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingChange {
    ToggleSound,
    ToggleMusic,
    ToggleGhost,
    ToggleNeon,
    MusicVolume(u8),
    SfxVolume(u8),
    /// Advance to the next theme in catalog order.
    CycleTheme,
}

/// Logical game inputs.
///
/// Each action is a single edge-triggered event per physical key press.
/// Invalid moves are silently rejected by the game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Leave the waiting screen and begin the countdown
    Start,
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Rotate piece 90° clockwise
    Rotate,
    /// Move piece one cell down
    SoftDrop,
    /// Drop piece to its ghost row and lock it
    HardDrop,
    /// Toggle pause
    Pause,
    /// Abandon the session and return to the waiting screen
    Restart,
    ToggleNeon,
    ToggleSound,
    ToggleOverlay(Overlay),
    ChangeSetting(SettingChange),
    /// Wipe every persisted record and return to defaults
    FactoryReset,
}

impl GameAction {
    /// Parse a simple action from its camelCase name.
    ///
    /// Parameterized actions (overlays, setting changes) have no textual form.
    ///
    /// ```
    /// use tetris_enhanced_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate"), Some(GameAction::Rotate));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "start" => Some(GameAction::Start),
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "rotate" => Some(GameAction::Rotate),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            "toggleneon" => Some(GameAction::ToggleNeon),
            "togglesound" => Some(GameAction::ToggleSound),
            "factoryreset" => Some(GameAction::FactoryReset),
            _ => None,
        }
    }

    /// Whether this action manipulates the active piece.
    pub fn is_piece_move(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft
                | GameAction::MoveRight
                | GameAction::Rotate
                | GameAction::SoftDrop
                | GameAction::HardDrop
        )
    }
}
