//! Player settings record.
//!
//! Plain data: the core reads `show_ghost` when building snapshots and
//! flips the neon/sound flags from gameplay actions. Storage lives in the
//! store crate; unknown keys in a saved file make it malformed.

use serde::{Deserialize, Serialize};

use crate::types::SettingChange;

/// Visual theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Default,
    NeonCity,
    SpaceScifi,
    RetroPixel,
    OceanWorld,
    SunsetDusk,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Default,
        Theme::NeonCity,
        Theme::SpaceScifi,
        Theme::RetroPixel,
        Theme::OceanWorld,
        Theme::SunsetDusk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Default => "default",
            Theme::NeonCity => "neon_city",
            Theme::SpaceScifi => "space_scifi",
            Theme::RetroPixel => "retro_pixel",
            Theme::OceanWorld => "ocean_world",
            Theme::SunsetDusk => "sunset_dusk",
        }
    }

    /// Next theme in catalog order, wrapping around
    pub fn next(self) -> Theme {
        let idx = Theme::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Theme::ALL[(idx + 1) % Theme::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub sound_enabled: bool,
    pub music_enabled: bool,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub show_ghost: bool,
    pub neon_mode: bool,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            music_enabled: true,
            music_volume: 0.5,
            sfx_volume: 0.5,
            show_ghost: true,
            neon_mode: true,
            theme: Theme::Default,
        }
    }
}

fn clamp_volume(v: f32) -> f32 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

impl Settings {
    /// Clamp volumes into `[0, 1]`; applied after loading.
    pub fn normalized(mut self) -> Self {
        self.music_volume = clamp_volume(self.music_volume);
        self.sfx_volume = clamp_volume(self.sfx_volume);
        self
    }

    /// Music volume the audio layer should use (0 when muted)
    pub fn effective_music_volume(&self) -> f32 {
        if self.sound_enabled && self.music_enabled {
            clamp_volume(self.music_volume)
        } else {
            0.0
        }
    }

    /// Effect volume the audio layer should use (0 when muted)
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.sound_enabled {
            clamp_volume(self.sfx_volume)
        } else {
            0.0
        }
    }

    /// Apply a typed edit. Returns whether anything changed.
    pub fn apply(&mut self, change: SettingChange) -> bool {
        let before = self.clone();
        match change {
            SettingChange::ToggleSound => self.sound_enabled = !self.sound_enabled,
            SettingChange::ToggleMusic => self.music_enabled = !self.music_enabled,
            SettingChange::ToggleGhost => self.show_ghost = !self.show_ghost,
            SettingChange::ToggleNeon => self.neon_mode = !self.neon_mode,
            SettingChange::MusicVolume(pct) => {
                self.music_volume = pct.min(100) as f32 / 100.0;
            }
            SettingChange::SfxVolume(pct) => {
                self.sfx_volume = pct.min(100) as f32 / 100.0;
            }
            SettingChange::CycleTheme => self.theme = self.theme.next(),
        }
        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert!(s.sound_enabled);
        assert!(s.music_enabled);
        assert!(s.show_ghost);
        assert!(s.neon_mode);
        assert_eq!(s.music_volume, 0.5);
        assert_eq!(s.theme, Theme::Default);
    }

    #[test]
    fn test_effective_volume_respects_toggles() {
        let mut s = Settings::default();
        assert_eq!(s.effective_music_volume(), 0.5);
        s.apply(SettingChange::ToggleMusic);
        assert_eq!(s.effective_music_volume(), 0.0);
        assert_eq!(s.effective_sfx_volume(), 0.5);
        s.apply(SettingChange::ToggleSound);
        assert_eq!(s.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn test_volume_changes_are_clamped() {
        let mut s = Settings::default();
        assert!(s.apply(SettingChange::MusicVolume(250)));
        assert_eq!(s.music_volume, 1.0);
        assert!(s.apply(SettingChange::SfxVolume(0)));
        assert_eq!(s.sfx_volume, 0.0);
        assert!(!s.apply(SettingChange::SfxVolume(0)));
    }

    #[test]
    fn test_theme_cycles_through_catalog() {
        let mut theme = Theme::Default;
        for _ in 0..Theme::ALL.len() {
            theme = theme.next();
        }
        assert_eq!(theme, Theme::Default);
        assert_eq!(Theme::Default.next(), Theme::NeonCity);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["theme"], "default");
        assert_eq!(json["neon_mode"], true);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let s: Settings = serde_json::from_str(r#"{"theme":"ocean_world"}"#).unwrap();
        assert_eq!(s.theme, Theme::OceanWorld);
        assert!(s.show_ghost);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let r: Result<Settings, _> = serde_json::from_str(r#"{"volume_boost":true}"#);
        assert!(r.is_err());
    }

    #[test]
    fn test_normalized_clamps_loaded_volumes() {
        let s: Settings = serde_json::from_str(r#"{"music_volume":3.5,"sfx_volume":-1}"#).unwrap();
        let s = s.normalized();
        assert_eq!(s.music_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
    }
}
