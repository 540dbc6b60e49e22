//! Key mapping from terminal events to game actions.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::bindings::{BindableAction, Key, KeyBindings};
use crate::panel::{PanelCommand, PanelMode};
use crate::types::{GameAction, Overlay, SettingChange};

/// Volume step for the settings overlay, in percent
const VOLUME_STEP: u8 = 10;

/// What a key press asks the loop to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    Game(GameAction),
    /// Edit for the key-binding panel
    Keybinds(PanelCommand),
    Quit,
}

/// Game state the mapping depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub overlay: Option<Overlay>,
    /// Current music volume, percent
    pub music_volume: u8,
    /// Current effects volume, percent
    pub sfx_volume: u8,
    pub keybinds: PanelMode,
}

/// Map keyboard input to a command.
///
/// Ctrl-C always quits. An open key-binding panel consumes every other
/// key. While the settings overlay is open its edit keys take precedence
/// over the bindings. Enter starts a waiting game.
pub fn handle_key_event(key: KeyEvent, bindings: &KeyBindings, ctx: &InputContext) -> Option<InputCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputCommand::Quit);
    }

    match ctx.keybinds {
        PanelMode::Closed => {}
        PanelMode::Capture(_) => return capture_key(key).map(InputCommand::Keybinds),
        PanelMode::Browse(_) => return panel_key(key).map(InputCommand::Keybinds),
    }

    if ctx.overlay == Some(Overlay::Settings) {
        if let Some(cmd) = settings_edit(key, ctx) {
            return Some(cmd);
        }
    }

    if let Some(action) = bindings.action_for(key) {
        return Some(command_for(action));
    }

    match key.code {
        KeyCode::Enter => Some(InputCommand::Game(GameAction::Start)),
        _ => None,
    }
}

fn command_for(action: BindableAction) -> InputCommand {
    let game = match action {
        BindableAction::Left => GameAction::MoveLeft,
        BindableAction::Right => GameAction::MoveRight,
        BindableAction::Rotate => GameAction::Rotate,
        BindableAction::SoftDrop => GameAction::SoftDrop,
        BindableAction::HardDrop => GameAction::HardDrop,
        BindableAction::Pause => GameAction::Pause,
        BindableAction::Neon => GameAction::ToggleNeon,
        BindableAction::Mute => GameAction::ToggleSound,
        BindableAction::Restart => GameAction::Restart,
        BindableAction::Quit => return InputCommand::Quit,
        BindableAction::Stats => GameAction::ToggleOverlay(Overlay::Statistics),
        BindableAction::Achievements => GameAction::ToggleOverlay(Overlay::Achievements),
        BindableAction::Settings => GameAction::ToggleOverlay(Overlay::Settings),
    };
    InputCommand::Game(game)
}

/// Edit keys shown in the settings overlay
fn settings_edit(key: KeyEvent, ctx: &InputContext) -> Option<InputCommand> {
    let change = match key.code {
        KeyCode::Char('1') => SettingChange::ToggleSound,
        KeyCode::Char('2') => SettingChange::ToggleMusic,
        KeyCode::Char('3') => SettingChange::ToggleGhost,
        KeyCode::Char('4') => SettingChange::ToggleNeon,
        KeyCode::Char('5') => SettingChange::CycleTheme,
        KeyCode::Char('[') => SettingChange::MusicVolume(ctx.music_volume.saturating_sub(VOLUME_STEP)),
        KeyCode::Char(']') => SettingChange::MusicVolume(step_up(ctx.music_volume)),
        KeyCode::Char(',') => SettingChange::SfxVolume(ctx.sfx_volume.saturating_sub(VOLUME_STEP)),
        KeyCode::Char('.') => SettingChange::SfxVolume(step_up(ctx.sfx_volume)),
        // Uppercase only, so a stray keypress cannot wipe progress
        KeyCode::Char('X') => return Some(InputCommand::Game(GameAction::FactoryReset)),
        KeyCode::Char('k') | KeyCode::Char('K') => return Some(InputCommand::Keybinds(PanelCommand::Open)),
        _ => return None,
    };
    Some(InputCommand::Game(GameAction::ChangeSetting(change)))
}

/// Navigation inside the key-binding panel
fn panel_key(key: KeyEvent) -> Option<PanelCommand> {
    match key.code {
        KeyCode::Up => Some(PanelCommand::Select(-1)),
        KeyCode::Down => Some(PanelCommand::Select(1)),
        KeyCode::Enter => Some(PanelCommand::Capture),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(PanelCommand::ResetDefaults),
        KeyCode::Esc | KeyCode::Char('k') | KeyCode::Char('K') => Some(PanelCommand::Close),
        _ => None,
    }
}

/// Esc backs out of capture; any other bindable key is taken as-is.
fn capture_key(key: KeyEvent) -> Option<PanelCommand> {
    if key.code == KeyCode::Esc {
        return Some(PanelCommand::Cancel);
    }
    Key::from_event(key).map(PanelCommand::Bind)
}

fn step_up(pct: u8) -> u8 {
    pct.saturating_add(VOLUME_STEP).min(100)
}
