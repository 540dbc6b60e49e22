//! Game state module - the session state machine
//!
//! Ties the board, pieces, bag and scoring together and drives them through
//! the session phases:
//!
//! ```text
//! WaitingToStart --start--> Countdown --3s--> Playing <--pause--> Paused
//!                                             Playing --spawn blocked--> GameOver
//! any phase but WaitingToStart --restart--> WaitingToStart
//! ```
//!
//! Time is injected through [`GameState::tick`]; the state never reads a
//! clock. Overlays sit on top of the phase: opening one while playing
//! forces a pause, and the countdown is frozen while one is open.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::achievements::AchievementId;
use crate::board::Board;
use crate::events::CoreEvent;
use crate::pieces::Piece;
use crate::progress::Progress;
use crate::rng::PieceBag;
use crate::scoring::{calculate_score, fall_interval_ms, level_for_lines, ComboTracker, ScoreResult};
use crate::snapshot::GameSnapshot;
use crate::types::*;

/// Window for the lightning achievement
const LIGHTNING_WINDOW_MS: u64 = 10_000;
const LIGHTNING_LINES: u32 = 5;
const LUCKY_STREAK: u32 = 5;
const FIVE_MINUTES_MS: u64 = 5 * 60 * 1000;
const ONE_HOUR_MS: u64 = 60 * 60 * 1000;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Piece>,
    next: PieceKind,
    bag: PieceBag,
    phase: Phase,
    overlay: Option<Overlay>,
    /// The open overlay paused a running game and should resume it on close
    resume_after_overlay: bool,
    countdown: u8,
    countdown_timer_ms: u32,
    fall_timer_ms: u32,
    /// Milliseconds since construction, across every phase
    clock_ms: u64,
    score: u32,
    level: u32,
    lines: u32,
    combo: ComboTracker,
    /// `(clock_ms, lines)` for clears inside the lightning window
    recent_clears: VecDeque<(u64, u32)>,
    /// Monotonic session id (increments on restart)
    episode_id: u32,
    progress: Progress,
    events: Vec<CoreEvent>,
}

impl GameState {
    /// Create a session waiting to start. The next piece is drawn
    /// immediately so it can be previewed.
    pub fn new(seed: u32, progress: Progress) -> Self {
        let mut bag = PieceBag::new(seed);
        let next = bag.next_piece();

        Self {
            board: Board::new(),
            active: None,
            next,
            bag,
            phase: Phase::WaitingToStart,
            overlay: None,
            resume_after_overlay: false,
            countdown: COUNTDOWN_START,
            countdown_timer_ms: 0,
            fall_timer_ms: 0,
            clock_ms: 0,
            score: 0,
            level: 1,
            lines: 0,
            combo: ComboTracker::new(),
            recent_clears: VecDeque::new(),
            episode_id: 0,
            progress,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.overlay
    }

    pub fn countdown(&self) -> u8 {
        self.countdown
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Current combo (0 before the first clear of the session)
    pub fn combo(&self) -> u32 {
        self.combo.combo()
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for scripted setups.
    #[doc(hidden)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut Progress {
        &mut self.progress
    }

    pub fn into_progress(self) -> Progress {
        self.progress
    }

    /// Gravity interval for the current level
    pub fn fall_interval_ms(&self) -> u32 {
        fall_interval_ms(self.level)
    }

    /// Take every event emitted since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<CoreEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[CoreEvent] {
        &self.events
    }

    fn emit(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    fn unlock(&mut self, id: AchievementId) {
        if self.progress.achievements.unlock(id) {
            info!(achievement = id.as_str(), "achievement unlocked");
            self.emit(CoreEvent::AchievementUnlocked(id));
        }
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_u8_grid(&mut out.board);
        out.active = self.active;
        out.ghost_y = if self.progress.settings.show_ghost {
            self.ghost_y()
        } else {
            None
        };
        out.next = self.next;
        out.phase = self.phase;
        out.overlay = self.overlay;
        out.countdown = self.countdown;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.combo = self.combo.combo();
        out.fall_interval_ms = self.fall_interval_ms();
        out.neon_mode = self.progress.settings.neon_mode;
        out.episode_id = self.episode_id;
        out.seed = self.bag.seed();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Leave the waiting screen and begin the countdown
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::WaitingToStart {
            return false;
        }
        self.phase = Phase::Countdown;
        self.countdown = COUNTDOWN_START;
        self.countdown_timer_ms = 0;
        debug!(episode = self.episode_id, "countdown started");
        true
    }

    fn go(&mut self) {
        self.phase = Phase::Playing;
        self.fall_timer_ms = 0;
        self.progress.statistics.begin_session();
        debug!(episode = self.episode_id, "play started");
        self.emit(CoreEvent::Go);
        self.spawn_piece();
    }

    /// Make the previewed piece active at its spawn position and draw the
    /// next preview. Ends the game when the spawn position is blocked.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.next;
        self.next = self.bag.next_piece();

        if self.progress.statistics.record_spawn(kind) >= LUCKY_STREAK {
            self.unlock(AchievementId::Lucky);
        }

        let piece = Piece::new(kind);
        if !self.board.is_valid_position(&piece) {
            self.active = None;
            self.game_over();
            return false;
        }
        self.active = Some(piece);
        true
    }

    fn game_over(&mut self) {
        self.phase = Phase::GameOver;
        self.overlay = None;
        self.resume_after_overlay = false;

        let stats = &mut self.progress.statistics;
        stats.record_score(self.score);
        stats.end_session();

        let high_score = self.progress.leaderboard.is_high_score(self.score);
        if high_score {
            if let Some(rank) = self
                .progress
                .leaderboard
                .add_score(self.score, self.level, self.lines)
            {
                self.emit(CoreEvent::LeaderboardUpdated { rank });
            }
        }

        info!(
            score = self.score,
            level = self.level,
            lines = self.lines,
            high_score,
            "game over"
        );
        self.emit(CoreEvent::GameOver {
            score: self.score,
            level: self.level,
            lines: self.lines,
            high_score,
        });
        self.emit(CoreEvent::SessionEnded);
    }

    /// Try to move the active piece
    pub(crate) fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let moved = active.shifted(dx, dy);
        if self.board.is_valid_position(&moved) {
            self.active = Some(moved);
            return true;
        }
        false
    }

    /// Rotate clockwise in place; rejected when the result does not fit.
    pub(crate) fn try_rotate(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let rotated = active.rotated();
        if self.board.is_valid_position(&rotated) {
            self.active = Some(rotated);
            return true;
        }
        false
    }

    /// Drop the active piece to its ghost row and lock it
    pub(crate) fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        let ghost = self.board.ghost_drop_y(&active);
        let distance = (ghost - active.y).max(0) as u8;
        self.active = Some(active.at(active.x, ghost));
        self.lock_piece(distance);
        true
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(self.board.ghost_drop_y(&active))
    }

    /// Lock sequence: merge the active piece, clear lines, spawn the next
    /// piece.
    pub fn lock_piece(&mut self, drop_distance: u8) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board.merge(&active);
        self.emit(CoreEvent::PieceLocked {
            kind: active.kind,
            x: active.x,
            y: active.y,
            drop_distance,
        });
        self.unlock(AchievementId::FirstPiece);

        self.clear_lines();

        if self.phase == Phase::Playing {
            self.spawn_piece();
        }
    }

    /// Line-clear and scoring step, run once per lock after the merge.
    ///
    /// With no full rows nothing changes (the combo included). Otherwise
    /// the combo is updated against the previous clear, points are scored
    /// at the level in effect before the clear, rows are removed, and
    /// lines/level are recomputed.
    pub fn clear_lines(&mut self) -> ScoreResult {
        let rows = self.board.clear_full_rows();
        if rows.is_empty() {
            return ScoreResult::default();
        }

        let count = rows.len() as u32;
        let combo = self.combo.register_clear(self.clock_ms);
        let result = calculate_score(count, self.level, combo);

        self.score = self.score.saturating_add(result.total);
        self.lines = self.lines.saturating_add(count);
        let old_level = self.level;
        self.level = level_for_lines(self.lines);

        let stats = &mut self.progress.statistics;
        stats.record_line_clear(count);
        stats.record_combo(combo);

        self.emit(CoreEvent::LinesCleared {
            count: count as u8,
            rows,
        });
        if combo > 1 {
            self.emit(CoreEvent::ComboReached { combo });
        }
        if self.level > old_level {
            info!(level = self.level, fall_ms = self.fall_interval_ms(), "level up");
            self.emit(CoreEvent::LevelUp { level: self.level });
        }

        self.check_clear_achievements(count, combo);
        result
    }

    fn check_clear_achievements(&mut self, count: u32, combo: u32) {
        self.unlock(AchievementId::FirstClear);

        if count == 4 {
            self.unlock(AchievementId::Tetris1);
            if self.progress.statistics.tetris_clears >= 10 {
                self.unlock(AchievementId::Tetris10);
            }
        }
        if combo >= 3 {
            self.unlock(AchievementId::Combo3);
        }
        if combo >= 10 {
            self.unlock(AchievementId::Combo10);
        }

        self.recent_clears.push_back((self.clock_ms, count));
        while let Some(&(at, _)) = self.recent_clears.front() {
            if self.clock_ms - at > LIGHTNING_WINDOW_MS {
                self.recent_clears.pop_front();
            } else {
                break;
            }
        }
        let recent: u32 = self.recent_clears.iter().map(|&(_, n)| n).sum();
        if recent >= LIGHTNING_LINES {
            self.unlock(AchievementId::Lightning);
        }

        let total = self.progress.statistics.total_lines_cleared();
        if total >= 500 {
            self.unlock(AchievementId::Clear500);
        }
        if total >= 1000 {
            self.unlock(AchievementId::Clear1000);
        }

        for (threshold, id) in [
            (500, AchievementId::Score500),
            (1000, AchievementId::Score1000),
            (10_000, AchievementId::Score10000),
        ] {
            if self.score >= threshold {
                self.unlock(id);
            }
        }
        if self.level >= 3 {
            self.unlock(AchievementId::Level3);
        }
    }

    fn check_operation_achievements(&mut self) {
        let ops = self.progress.statistics.total_operations();
        if ops >= 100 {
            self.unlock(AchievementId::Moves100);
        }
        if ops >= 1000 {
            self.unlock(AchievementId::Moves1000);
        }
    }

    fn check_time_achievements(&mut self) {
        let total = self.progress.statistics.total_time_with_session();
        if total >= FIVE_MINUTES_MS {
            self.unlock(AchievementId::Survive5Min);
        }
        if total >= ONE_HOUR_MS {
            self.unlock(AchievementId::Legend);
        }
    }

    /// Advance time by `elapsed_ms`: countdown steps while counting down,
    /// gravity while playing. Returns whether the board or phase changed.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);

        match self.phase {
            Phase::Countdown => self.tick_countdown(elapsed_ms),
            Phase::Playing => self.tick_gravity(elapsed_ms),
            Phase::WaitingToStart | Phase::Paused | Phase::GameOver => false,
        }
    }

    fn tick_countdown(&mut self, elapsed_ms: u32) -> bool {
        if self.overlay.is_some() {
            return false;
        }
        self.countdown_timer_ms = self.countdown_timer_ms.saturating_add(elapsed_ms);

        let mut changed = false;
        while self.countdown_timer_ms >= COUNTDOWN_STEP_MS {
            self.countdown_timer_ms -= COUNTDOWN_STEP_MS;
            self.countdown = self.countdown.saturating_sub(1);
            changed = true;
            if self.countdown == 0 {
                self.go();
                break;
            }
            self.emit(CoreEvent::CountdownTick {
                remaining: self.countdown,
            });
        }
        changed
    }

    fn tick_gravity(&mut self, elapsed_ms: u32) -> bool {
        if self.overlay.is_some() {
            return false;
        }

        self.progress.statistics.accrue_play_time(elapsed_ms as u64);
        self.check_time_achievements();

        if self.active.is_none() {
            return false;
        }

        self.fall_timer_ms = self.fall_timer_ms.saturating_add(elapsed_ms);
        if self.fall_timer_ms <= self.fall_interval_ms() {
            return false;
        }
        self.fall_timer_ms = 0;

        if !self.try_move(0, 1) {
            self.lock_piece(0);
        }
        true
    }

    /// Open `overlay`, close it if it is already open, or switch to it from
    /// another overlay.
    pub fn toggle_overlay(&mut self, overlay: Overlay) -> bool {
        if self.overlay == Some(overlay) {
            self.overlay = None;
            if self.resume_after_overlay && self.phase == Phase::Paused {
                self.phase = Phase::Playing;
            }
            self.resume_after_overlay = false;
            return true;
        }

        if self.phase == Phase::WaitingToStart && overlay != Overlay::Settings {
            return false;
        }

        if self.overlay.is_none() && self.phase == Phase::Playing {
            self.phase = Phase::Paused;
            self.resume_after_overlay = true;
        }
        self.overlay = Some(overlay);
        true
    }

    /// Return to the waiting screen with a fresh board and bag.
    ///
    /// A running session has its score recorded first.
    pub fn restart(&mut self) -> bool {
        if self.phase == Phase::WaitingToStart {
            return false;
        }
        if self.phase.in_session() {
            let stats = &mut self.progress.statistics;
            stats.record_score(self.score);
            stats.end_session();
            self.emit(CoreEvent::SessionEnded);
        }
        self.reset_session();
        debug!(episode = self.episode_id, "session restarted");
        true
    }

    fn reset_session(&mut self) {
        self.bag = self.bag.reseeded();
        self.next = self.bag.next_piece();
        self.board.clear();
        self.active = None;
        self.phase = Phase::WaitingToStart;
        self.overlay = None;
        self.resume_after_overlay = false;
        self.countdown = COUNTDOWN_START;
        self.countdown_timer_ms = 0;
        self.fall_timer_ms = 0;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.combo = ComboTracker::new();
        self.recent_clears.clear();
        self.episode_id = self.episode_id.wrapping_add(1);
    }

    /// Replace every progression record with defaults and return to the
    /// waiting screen. The owner deletes persisted files on
    /// [`CoreEvent::FactoryReset`].
    pub fn factory_reset(&mut self) -> bool {
        self.progress = Progress::default();
        self.reset_session();
        info!("factory reset");
        self.emit(CoreEvent::FactoryReset);
        true
    }

    fn toggle_in_game_setting(&mut self, change: SettingChange) -> bool {
        if !matches!(
            self.phase,
            Phase::Countdown | Phase::Playing | Phase::Paused
        ) {
            return false;
        }
        self.change_setting(change)
    }

    /// Apply a settings edit; emits `SettingsChanged` when it changed
    /// anything.
    pub fn change_setting(&mut self, change: SettingChange) -> bool {
        if !self.progress.settings.apply(change) {
            return false;
        }
        if change == SettingChange::ToggleNeon {
            self.unlock(AchievementId::NeonMaster);
        }
        self.emit(CoreEvent::SettingsChanged);
        true
    }

    fn piece_input_allowed(&self) -> bool {
        self.phase == Phase::Playing && self.overlay.is_none()
    }

    /// Apply a game action. Returns false when the action was rejected.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        if action.is_piece_move() && !self.piece_input_allowed() {
            // Hard drop doubles as the start key on the waiting screen
            if action == GameAction::HardDrop && self.overlay.is_none() {
                return self.start();
            }
            return false;
        }

        match action {
            GameAction::Start => self.overlay.is_none() && self.start(),
            GameAction::MoveLeft | GameAction::MoveRight => {
                let dx = if action == GameAction::MoveLeft { -1 } else { 1 };
                let moved = self.try_move(dx, 0);
                if moved {
                    self.progress.statistics.record_move();
                    self.check_operation_achievements();
                }
                moved
            }
            GameAction::Rotate => {
                let rotated = self.try_rotate();
                if rotated {
                    self.progress.statistics.record_rotation();
                    self.check_operation_achievements();
                }
                rotated
            }
            GameAction::SoftDrop => self.try_move(0, 1),
            GameAction::HardDrop => self.hard_drop(),
            GameAction::Pause => match (self.phase, self.overlay) {
                (Phase::Playing, None) => {
                    self.phase = Phase::Paused;
                    true
                }
                (Phase::Paused, None) => {
                    self.phase = Phase::Playing;
                    true
                }
                _ => false,
            },
            GameAction::Restart => self.restart(),
            GameAction::ToggleNeon => self.toggle_in_game_setting(SettingChange::ToggleNeon),
            GameAction::ToggleSound => self.toggle_in_game_setting(SettingChange::ToggleSound),
            GameAction::ToggleOverlay(overlay) => self.toggle_overlay(overlay),
            GameAction::ChangeSetting(change) => self.change_setting(change),
            GameAction::FactoryReset => self.factory_reset(),
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1, Progress::default())
    }
}
