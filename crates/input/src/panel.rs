//! Key-binding panel opened from the settings overlay.
//!
//! The panel is presenter state: it lists every [`BindableAction`], lets
//! the player pick one, captures the next key press and applies it through
//! [`KeyBindings::set_key`]. Key presses reach it as [`PanelCommand`]s
//! produced by [`crate::handle_key_event`].

use crate::bindings::{BindError, BindableAction, Key, KeyBindings};

/// Where the panel is in its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelMode {
    #[default]
    Closed,
    /// Moving the selection
    Browse(BindableAction),
    /// Waiting for the key to bind to this action
    Capture(BindableAction),
}

/// Edits requested by key presses while the panel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelCommand {
    Open,
    Close,
    /// Move the selection by this many rows, wrapping
    Select(i8),
    /// Start waiting for a key for the selected action
    Capture,
    /// Bind the captured key to the selected action
    Bind(Key),
    /// Leave capture without changing anything
    Cancel,
    ResetDefaults,
}

/// Outcome of the last edit, shown under the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStatus {
    Bound(BindableAction, Key),
    Rejected(Key, BindError),
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeybindPanel {
    open: bool,
    selected: usize,
    capturing: bool,
    status: Option<PanelStatus>,
}

impl KeybindPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> PanelMode {
        match (self.open, self.capturing) {
            (false, _) => PanelMode::Closed,
            (true, false) => PanelMode::Browse(self.selected()),
            (true, true) => PanelMode::Capture(self.selected()),
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> BindableAction {
        BindableAction::ALL[self.selected % BindableAction::ALL.len()]
    }

    pub fn status(&self) -> Option<PanelStatus> {
        self.status
    }

    pub fn close(&mut self) {
        *self = Self {
            selected: self.selected,
            ..Self::default()
        };
    }

    /// Apply a panel command. Returns true when `bindings` changed and
    /// should be saved.
    pub fn apply(&mut self, cmd: PanelCommand, bindings: &mut KeyBindings) -> bool {
        match cmd {
            PanelCommand::Open => {
                self.open = true;
                self.capturing = false;
                self.status = None;
            }
            PanelCommand::Close => self.close(),
            PanelCommand::Select(delta) => {
                let n = BindableAction::ALL.len() as i64;
                self.selected = (self.selected as i64 + delta as i64).rem_euclid(n) as usize;
                self.status = None;
            }
            PanelCommand::Capture => {
                self.capturing = self.open;
                self.status = None;
            }
            PanelCommand::Cancel => self.capturing = false,
            PanelCommand::Bind(key) => {
                if !self.capturing {
                    return false;
                }
                self.capturing = false;
                let action = self.selected();
                let before = bindings.key_for(action);
                match bindings.set_key(action, key) {
                    Ok(()) => {
                        self.status = Some(PanelStatus::Bound(action, key));
                        return before != key;
                    }
                    Err(e) => self.status = Some(PanelStatus::Rejected(key, e)),
                }
            }
            PanelCommand::ResetDefaults => {
                let changed = *bindings != KeyBindings::default();
                bindings.reset_to_defaults();
                self.status = Some(PanelStatus::Reset);
                return changed;
            }
        }
        false
    }
}
