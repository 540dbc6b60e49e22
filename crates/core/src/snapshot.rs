use crate::pieces::Piece;
use crate::types::{Overlay, Phase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Read-only view of a game for rendering.
///
/// Board cells hold piece identifiers (0 empty, 1..=7). `ghost_y` is only
/// set when the player has the ghost enabled and a piece is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<Piece>,
    pub ghost_y: Option<i8>,
    pub next: PieceKind,
    pub phase: Phase,
    pub overlay: Option<Overlay>,
    /// Countdown value while in `Phase::Countdown`
    pub countdown: u8,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub fall_interval_ms: u32,
    pub neon_mode: bool,
    pub episode_id: u32,
    pub seed: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Whether piece input is currently accepted
    pub fn playable(&self) -> bool {
        self.phase == Phase::Playing && self.overlay.is_none()
    }

    /// Piece identifier at `(x, y)`, 0 when empty or out of range
    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.board
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[0u8; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: PieceKind::I,
            phase: Phase::WaitingToStart,
            overlay: None,
            countdown: 0,
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            fall_interval_ms: 0,
            neon_mode: false,
            episode_id: 0,
            seed: 0,
        }
    }
}
