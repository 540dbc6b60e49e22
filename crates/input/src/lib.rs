//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`] through a
//! user-editable set of key bindings. Nothing here touches the terminal;
//! the caller polls events and feeds them in.

pub mod bindings;
pub mod map;
pub mod panel;

pub use tetris_enhanced_types as types;

pub use bindings::{BindError, BindableAction, Key, KeyBindings};
pub use map::{handle_key_event, InputCommand, InputContext};
pub use panel::{KeybindPanel, PanelCommand, PanelMode, PanelStatus};
