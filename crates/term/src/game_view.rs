//! GameView: maps a [`GameSnapshot`] plus the progression records into a
//! terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::statistics::format_duration;
use crate::core::{AchievementId, GameSnapshot, Piece, Progress, Tier};
use crate::fb::{CellStyle, FrameBuffer};
use crate::input::{BindableAction, KeyBindings, KeybindPanel, PanelMode, PanelStatus};
use crate::palette::Palette;
use crate::types::{Overlay, Phase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Entries shown in the side panel leaderboard
const PANEL_TOP_SCORES: usize = 5;
/// Side panel width, including the gap after the board
const PANEL_W: u16 = 22;

pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // Two columns per cell roughly squares the cells in most fonts
        Self { cell_w: 2 }
    }
}

/// Board frame placement for one frame
#[derive(Debug, Clone, Copy)]
struct Layout {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
        }
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        progress: &Progress,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        let palette = Palette::new(progress.settings.theme, snap.neon_mode);
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let frame_w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let frame_h = BOARD_HEIGHT as u16 + 2;
        let layout = Layout {
            x: viewport.width.saturating_sub(frame_w + PANEL_W) / 2,
            y: viewport.height.saturating_sub(frame_h) / 2,
            w: frame_w,
            h: frame_h,
        };

        self.draw_board(fb, snap, &palette, layout);
        self.draw_side_panel(fb, snap, progress, &palette, layout);

        match snap.overlay {
            Some(Overlay::Statistics) => draw_statistics(fb, progress, &palette, viewport),
            Some(Overlay::Achievements) => draw_achievements(fb, progress, &palette, viewport),
            Some(Overlay::Settings) => draw_settings(fb, progress, &palette, viewport),
            None => self.draw_phase_banner(fb, snap, &palette, layout),
        }
    }

    /// Draw the key-binding panel over an already rendered frame. Does
    /// nothing while the panel is closed.
    pub fn render_keybinds_into(
        &self,
        panel: &KeybindPanel,
        bindings: &KeyBindings,
        progress: &Progress,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        let mode = panel.mode();
        if mode == PanelMode::Closed {
            return;
        }
        let settings = &progress.settings;
        let palette = Palette::new(settings.theme, settings.neon_mode);
        let rows = BindableAction::ALL.len() as u16 + 3;
        let (mut y, x) = self::panel(fb, &palette, viewport, "KEY BINDINGS", rows);

        for (action, key) in bindings.iter() {
            let style = if action == panel.selected() {
                palette.label().bold()
            } else {
                palette.muted()
            };
            let marker = if action == panel.selected() { ">" } else { " " };
            fb.put_str(x, y, marker, palette.label());
            fb.put_str(x + 2, y, action.label(), style);
            let shown = match mode {
                PanelMode::Capture(a) if a == action => "press a key".to_string(),
                _ => key.to_string(),
            };
            fb.put_str(x + 22, y, &shown, palette.value());
            y += 1;
        }

        y += 1;
        let status = match panel.status() {
            Some(PanelStatus::Bound(action, key)) => format!("{} set to {}", action.label(), key),
            Some(PanelStatus::Rejected(key, e)) => format!("{key}: {e}"),
            Some(PanelStatus::Reset) => "defaults restored".to_string(),
            None => String::new(),
        };
        fb.put_str(x, y, &status, palette.value());
        let hint = match mode {
            PanelMode::Capture(_) => "ESC cancel",
            _ => "ENTER bind  D defaults  ESC back",
        };
        fb.put_str(x, y + 1, hint, palette.muted().dim());
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, progress: &Progress, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, progress, viewport, &mut fb);
        fb
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, palette: &Palette, l: Layout) {
        fb.draw_box(l.x, l.y, l.w, l.h, palette.frame());

        for y in 0..BOARD_HEIGHT {
            for x in 0..BOARD_WIDTH {
                match PieceKind::from_id(snap.cell(x as usize, y as usize)) {
                    Some(kind) => self.fill_cell(fb, l, x as i8, y as i8, '█', palette.block(kind)),
                    None => self.fill_cell(fb, l, x as i8, y as i8, '·', palette.empty()),
                }
            }
        }

        let Some(active) = snap.active else {
            return;
        };
        if let Some(ghost_y) = snap.ghost_y {
            for (dx, dy) in active.cells() {
                self.fill_cell(fb, l, active.x + dx, ghost_y + dy, '░', palette.ghost(active.kind));
            }
        }
        for (dx, dy) in active.cells() {
            self.fill_cell(fb, l, active.x + dx, active.y + dy, '█', palette.block(active.kind));
        }
    }

    /// Fill one board cell; cells outside the board are skipped.
    fn fill_cell(&self, fb: &mut FrameBuffer, l: Layout, x: i8, y: i8, ch: char, style: CellStyle) {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let px = l.x + 1 + x as u16 * self.cell_w;
        fb.fill_rect(px, l.y + 1 + y as u16, self.cell_w, 1, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        progress: &Progress,
        palette: &Palette,
        l: Layout,
    ) {
        let x = l.x + l.w + 2;
        let label = palette.label();
        let value = palette.value();
        let mut y = l.y;

        for (name, v) in [
            ("SCORE", snap.score),
            ("LEVEL", snap.level),
            ("LINES", snap.lines),
            ("COMBO", snap.combo),
        ] {
            fb.put_str(x, y, name, label);
            fb.put_str(x + 7, y, &v.to_string(), value);
            y += 1;
        }

        y += 1;
        fb.put_str(x, y, "NEXT", label);
        y += 1;
        let next = Piece::new(snap.next);
        for row in 0..next.height() as usize {
            for col in 0..next.width() as usize {
                if next.filled(col, row) {
                    let px = x + 2 + col as u16 * self.cell_w;
                    fb.fill_rect(px, y, self.cell_w, 1, '█', palette.block(snap.next));
                }
            }
            y += 1;
        }
        // Keep the leaderboard in place whatever the next piece's height
        y += 3 - next.height().min(2) as u16;

        fb.put_str(x, y, "TOP SCORES", label);
        y += 1;
        let top = progress.leaderboard.top_scores(PANEL_TOP_SCORES);
        if top.is_empty() {
            fb.put_str(x, y, "no scores yet", palette.muted());
        }
        for (rank, entry) in top.iter().enumerate() {
            let line = format!("{}. {:>7}  L{}", rank + 1, entry.score, entry.level);
            fb.put_str(x, y, &line, value);
            y += 1;
        }
    }

    fn draw_phase_banner(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, palette: &Palette, l: Layout) {
        let lines: &[&str] = match snap.phase {
            Phase::WaitingToStart => &["PRESS SPACE", "TO START"],
            Phase::Countdown => &[countdown_digit(snap.countdown)],
            Phase::Paused => &["PAUSED"],
            Phase::GameOver => &["GAME OVER", "R TO RESTART"],
            Phase::Playing => return,
        };
        let style = CellStyle::new(palette.text, palette.grid_bg).bold();
        let mid = l.y + l.h / 2;
        let top = mid.saturating_sub(lines.len() as u16 / 2);
        for (i, text) in lines.iter().enumerate() {
            fb.put_str_centered(l.x, l.w, top + i as u16, text, style);
        }
    }
}

fn countdown_digit(n: u8) -> &'static str {
    match n {
        3 => "3",
        2 => "2",
        1 => "1",
        _ => "GO!",
    }
}

/// Boxed panel centered in the viewport; returns the first content row and
/// the content column.
fn panel(fb: &mut FrameBuffer, palette: &Palette, viewport: Viewport, title: &str, rows: u16) -> (u16, u16) {
    let w = 44.min(viewport.width);
    let h = (rows + 4).min(viewport.height);
    let x = viewport.width.saturating_sub(w) / 2;
    let y = viewport.height.saturating_sub(h) / 2;
    fb.fill_rect(x, y, w, h, ' ', CellStyle::default());
    fb.draw_box(x, y, w, h, palette.frame());
    fb.put_str_centered(x, w, y + 1, title, palette.label());
    (y + 3, x + 2)
}

fn draw_statistics(fb: &mut FrameBuffer, progress: &Progress, palette: &Palette, viewport: Viewport) {
    let stats = &progress.statistics;
    let rows: [(&str, String); 12] = [
        ("Play time", format_duration(stats.total_time_with_session())),
        ("Games played", stats.games_played.to_string()),
        ("Total score", stats.total_score.to_string()),
        ("Highest score", stats.highest_score.to_string()),
        ("Moves", stats.total_moves.to_string()),
        ("Rotations", stats.total_rotations.to_string()),
        ("Highest combo", stats.highest_combo.to_string()),
        ("Single clears", stats.single_line_clears.to_string()),
        ("Double clears", stats.double_line_clears.to_string()),
        ("Triple clears", stats.triple_line_clears.to_string()),
        ("Tetris clears", stats.tetris_clears.to_string()),
        ("Same piece streak", stats.max_consecutive_same.to_string()),
    ];
    let (mut y, x) = panel(fb, palette, viewport, "STATISTICS", rows.len() as u16);
    for (name, v) in rows.iter() {
        fb.put_str(x, y, name, palette.muted());
        fb.put_str(x + 22, y, v, palette.value());
        y += 1;
    }
}

fn draw_achievements(fb: &mut FrameBuffer, progress: &Progress, palette: &Palette, viewport: Viewport) {
    let achievements = &progress.achievements;
    let title = format!(
        "ACHIEVEMENTS {}/{}",
        achievements.unlocked_count(),
        AchievementId::ALL.len()
    );
    let (mut y, x) = panel(fb, palette, viewport, &title, AchievementId::ALL.len() as u16 + 1);
    let mut tier = None;
    for id in AchievementId::ALL {
        if tier != Some(id.tier()) {
            tier = Some(id.tier());
            if id.tier() == Tier::Advanced {
                y += 1;
            }
        }
        let (mark, style) = if achievements.is_unlocked(id) {
            ("[x]", palette.value())
        } else {
            ("[ ]", palette.muted())
        };
        let end = fb.put_str(x, y, mark, style);
        let end = fb.put_str(end + 1, y, id.name(), style);
        if end + 2 < x + 40 {
            let room = (x + 40 - end - 2) as usize;
            let desc: String = id.description().chars().take(room).collect();
            fb.put_str(end + 2, y, &desc, palette.muted().dim());
        }
        y += 1;
    }
}

fn draw_settings(fb: &mut FrameBuffer, progress: &Progress, palette: &Palette, viewport: Viewport) {
    let s = &progress.settings;
    let on_off = |b: bool| (if b { "ON" } else { "OFF" }).to_string();
    let pct = |v: f32| format!("{}%", (v * 100.0).round() as u32);
    let rows: [(&str, &str, String); 9] = [
        ("1", "Sound", on_off(s.sound_enabled)),
        ("2", "Music", on_off(s.music_enabled)),
        ("3", "Ghost piece", on_off(s.show_ghost)),
        ("4", "Neon mode", on_off(s.neon_mode)),
        ("5", "Theme", s.theme.as_str().to_string()),
        ("[ ]", "Music volume", pct(s.music_volume)),
        (", .", "Effects volume", pct(s.sfx_volume)),
        ("K", "Key bindings", String::new()),
        ("X", "Factory reset", String::new()),
    ];
    let (mut y, x) = panel(fb, palette, viewport, "SETTINGS", rows.len() as u16);
    for (key, name, v) in rows.iter() {
        fb.put_str(x, y, key, palette.label());
        fb.put_str(x + 5, y, name, palette.muted());
        fb.put_str(x + 22, y, v, palette.value());
        y += 1;
    }
}

trait IntoCell {
    fn into_cell(self, ch: char) -> crate::fb::Cell;
}

impl IntoCell for CellStyle {
    fn into_cell(self, ch: char) -> crate::fb::Cell {
        crate::fb::Cell { ch, style: self }
    }
}
