//! Persisted key bindings.
//!
//! Every bindable action maps to exactly one key. The record file is a
//! JSON object from action name to key name, e.g. `{"rotate": "Up"}`.
//! Actions missing from the file keep their default key. An unknown action
//! or key name makes the whole file malformed, as does a key that ends up
//! bound to two actions once the defaults are filled in.

use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindableAction {
    Left,
    Right,
    Rotate,
    SoftDrop,
    HardDrop,
    Pause,
    Neon,
    Mute,
    Restart,
    Quit,
    Stats,
    Achievements,
    Settings,
}

impl BindableAction {
    pub const ALL: [BindableAction; 13] = [
        BindableAction::Left,
        BindableAction::Right,
        BindableAction::Rotate,
        BindableAction::SoftDrop,
        BindableAction::HardDrop,
        BindableAction::Pause,
        BindableAction::Neon,
        BindableAction::Mute,
        BindableAction::Restart,
        BindableAction::Quit,
        BindableAction::Stats,
        BindableAction::Achievements,
        BindableAction::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BindableAction::Left => "left",
            BindableAction::Right => "right",
            BindableAction::Rotate => "rotate",
            BindableAction::SoftDrop => "soft_drop",
            BindableAction::HardDrop => "hard_drop",
            BindableAction::Pause => "pause",
            BindableAction::Neon => "neon",
            BindableAction::Mute => "mute",
            BindableAction::Restart => "restart",
            BindableAction::Quit => "quit",
            BindableAction::Stats => "stats",
            BindableAction::Achievements => "achievements",
            BindableAction::Settings => "settings",
        }
    }

    /// Label for help text
    pub fn label(&self) -> &'static str {
        match self {
            BindableAction::Left => "Move left",
            BindableAction::Right => "Move right",
            BindableAction::Rotate => "Rotate",
            BindableAction::SoftDrop => "Soft drop",
            BindableAction::HardDrop => "Hard drop",
            BindableAction::Pause => "Pause",
            BindableAction::Neon => "Neon mode",
            BindableAction::Mute => "Mute",
            BindableAction::Restart => "Restart",
            BindableAction::Quit => "Quit",
            BindableAction::Stats => "Statistics",
            BindableAction::Achievements => "Achievements",
            BindableAction::Settings => "Settings",
        }
    }

    pub fn default_key(&self) -> Key {
        match self {
            BindableAction::Left => Key::Left,
            BindableAction::Right => Key::Right,
            BindableAction::Rotate => Key::Up,
            BindableAction::SoftDrop => Key::Down,
            BindableAction::HardDrop => Key::Space,
            BindableAction::Pause => Key::Char('p'),
            BindableAction::Neon => Key::Char('n'),
            BindableAction::Mute => Key::Char('m'),
            BindableAction::Restart => Key::Char('r'),
            BindableAction::Quit => Key::Char('q'),
            BindableAction::Stats => Key::Tab,
            BindableAction::Achievements => Key::Char('h'),
            BindableAction::Settings => Key::Esc,
        }
    }
}

/// A bindable physical key. Letters are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Esc,
    Tab,
    Char(char),
}

impl Key {
    /// Parse a key name as written in the bindings file.
    pub fn parse(s: &str) -> Option<Key> {
        let key = match s {
            "Left" => Key::Left,
            "Right" => Key::Right,
            "Up" => Key::Up,
            "Down" => Key::Down,
            "Space" => Key::Space,
            "Enter" => Key::Enter,
            "Esc" => Key::Esc,
            "Tab" => Key::Tab,
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_graphic() => Key::Char(c.to_ascii_lowercase()),
                    _ => return None,
                }
            }
        };
        Some(key)
    }

    /// The key a terminal event refers to, if it is bindable.
    pub fn from_event(event: KeyEvent) -> Option<Key> {
        match event.code {
            KeyCode::Left => Some(Key::Left),
            KeyCode::Right => Some(Key::Right),
            KeyCode::Up => Some(Key::Up),
            KeyCode::Down => Some(Key::Down),
            KeyCode::Enter => Some(Key::Enter),
            KeyCode::Esc => Some(Key::Esc),
            KeyCode::Tab => Some(Key::Tab),
            KeyCode::Char(' ') => Some(Key::Space),
            KeyCode::Char(c) if c.is_ascii_graphic() => Some(Key::Char(c.to_ascii_lowercase())),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Left => f.write_str("Left"),
            Key::Right => f.write_str("Right"),
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::Space => f.write_str("Space"),
            Key::Enter => f.write_str("Enter"),
            Key::Esc => f.write_str("Esc"),
            Key::Tab => f.write_str("Tab"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

impl TryFrom<String> for Key {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Key::parse(&s).ok_or_else(|| format!("unknown key name `{s}`"))
    }
}

impl From<Key> for String {
    fn from(key: Key) -> String {
        key.to_string()
    }
}

/// Rejected rebinding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// The key already triggers another action
    AlreadyBound(BindableAction),
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::AlreadyBound(action) => write!(f, "key already bound to {}", action.as_str()),
        }
    }
}

impl std::error::Error for BindError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<BindableAction, Key>", into = "BTreeMap<BindableAction, Key>")]
pub struct KeyBindings {
    keys: [Key; 13],
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            keys: BindableAction::ALL.map(|a| a.default_key()),
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(action: BindableAction) -> usize {
        BindableAction::ALL
            .iter()
            .position(|a| *a == action)
            .unwrap_or(0)
    }

    pub fn key_for(&self, action: BindableAction) -> Key {
        self.keys[Self::slot(action)]
    }

    /// Bind `key` to `action`. Fails if another action already uses it.
    pub fn set_key(&mut self, action: BindableAction, key: Key) -> Result<(), BindError> {
        if let Some(other) = self.action_for_key(key) {
            if other != action {
                return Err(BindError::AlreadyBound(other));
            }
        }
        self.keys[Self::slot(action)] = key;
        Ok(())
    }

    pub fn reset_to_defaults(&mut self) {
        *self = Self::default();
    }

    pub fn action_for_key(&self, key: Key) -> Option<BindableAction> {
        BindableAction::ALL
            .into_iter()
            .zip(self.keys)
            .find_map(|(action, bound)| (bound == key).then_some(action))
    }

    pub fn action_for(&self, event: KeyEvent) -> Option<BindableAction> {
        Key::from_event(event).and_then(|key| self.action_for_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindableAction, Key)> + '_ {
        BindableAction::ALL.into_iter().zip(self.keys)
    }
}

impl TryFrom<BTreeMap<BindableAction, Key>> for KeyBindings {
    type Error = String;

    fn try_from(map: BTreeMap<BindableAction, Key>) -> Result<Self, Self::Error> {
        let mut bindings = KeyBindings::default();
        for (action, key) in map {
            bindings.keys[Self::slot(action)] = key;
        }
        // Checked on the merged table so swaps between two actions load fine
        for (i, key) in bindings.keys.iter().enumerate() {
            if let Some(j) = bindings.keys[..i].iter().position(|k| k == key) {
                return Err(format!(
                    "key `{key}` bound to both {} and {}",
                    BindableAction::ALL[j].as_str(),
                    BindableAction::ALL[i].as_str()
                ));
            }
        }
        Ok(bindings)
    }
}

impl From<KeyBindings> for BTreeMap<BindableAction, Key> {
    fn from(bindings: KeyBindings) -> Self {
        bindings.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_defaults_are_unique() {
        let bindings = KeyBindings::default();
        for (action, key) in bindings.iter() {
            assert_eq!(bindings.action_for_key(key), Some(action));
        }
        assert_eq!(bindings.key_for(BindableAction::Settings), Key::Esc);
        assert_eq!(bindings.key_for(BindableAction::Achievements), Key::Char('h'));
    }

    #[test]
    fn test_set_key_rejects_taken_key() {
        let mut bindings = KeyBindings::default();
        assert_eq!(
            bindings.set_key(BindableAction::Rotate, Key::Space),
            Err(BindError::AlreadyBound(BindableAction::HardDrop))
        );
        assert_eq!(bindings.key_for(BindableAction::Rotate), Key::Up);

        bindings.set_key(BindableAction::Rotate, Key::Char('x')).unwrap();
        assert_eq!(bindings.action_for_key(Key::Char('x')), Some(BindableAction::Rotate));
        assert_eq!(bindings.action_for_key(Key::Up), None);

        // Rebinding to the same key is a no-op
        assert!(bindings.set_key(BindableAction::Rotate, Key::Char('x')).is_ok());

        bindings.reset_to_defaults();
        assert_eq!(bindings, KeyBindings::default());
    }

    #[test]
    fn test_events_are_case_insensitive() {
        let bindings = KeyBindings::default();
        let upper = KeyEvent::new(KeyCode::Char('P'), KeyModifiers::SHIFT);
        assert_eq!(bindings.action_for(upper), Some(BindableAction::Pause));
        assert_eq!(
            bindings.action_for(KeyEvent::from(KeyCode::Char(' '))),
            Some(BindableAction::HardDrop)
        );
        assert_eq!(bindings.action_for(KeyEvent::from(KeyCode::F(1))), None);
    }

    #[test]
    fn test_key_names() {
        assert_eq!(Key::parse("Space"), Some(Key::Space));
        assert_eq!(Key::parse("Q"), Some(Key::Char('q')));
        assert_eq!(Key::parse("PageUp"), None);
        assert_eq!(Key::parse(""), None);
        assert_eq!(Key::Char('q').to_string(), "Q");
    }

    #[test]
    fn test_record_format() {
        let json = serde_json::to_value(KeyBindings::default()).unwrap();
        assert_eq!(json["soft_drop"], "Down");
        assert_eq!(json["pause"], "P");
        assert_eq!(json.as_object().unwrap().len(), 13);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let bindings: KeyBindings = serde_json::from_str(r#"{"rotate": "W"}"#).unwrap();
        assert_eq!(bindings.key_for(BindableAction::Rotate), Key::Char('w'));
        assert_eq!(bindings.key_for(BindableAction::Left), Key::Left);
    }

    #[test]
    fn test_unknown_entries_are_malformed() {
        assert!(serde_json::from_str::<KeyBindings>(r#"{"hold": "C"}"#).is_err());
        assert!(serde_json::from_str::<KeyBindings>(r#"{"rotate": "F13"}"#).is_err());
    }

    #[test]
    fn test_shared_key_is_malformed() {
        // Space still belongs to hard drop by default
        let err = serde_json::from_str::<KeyBindings>(r#"{"rotate": "Space"}"#).unwrap_err();
        assert!(err.to_string().contains("rotate and hard_drop"), "{err}");
        assert!(serde_json::from_str::<KeyBindings>(r#"{"left": "A", "right": "a"}"#).is_err());
    }

    #[test]
    fn test_swapped_keys_load() {
        let bindings: KeyBindings =
            serde_json::from_str(r#"{"rotate": "Space", "hard_drop": "Up"}"#).unwrap();
        assert_eq!(bindings.action_for_key(Key::Space), Some(BindableAction::Rotate));
        assert_eq!(bindings.action_for_key(Key::Up), Some(BindableAction::HardDrop));
    }
}
