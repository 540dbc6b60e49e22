//! Colors per theme.
//!
//! Neon mode brightens piece colors; with it off, pieces are drawn at
//! roughly 70% intensity.

use crate::core::Theme;
use crate::fb::{CellStyle, Rgb};
use crate::types::PieceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub grid_bg: Rgb,
    pub border: Rgb,
    pub text: Rgb,
    pub highlight: Rgb,
    pub neon: bool,
}

impl Palette {
    pub fn new(theme: Theme, neon: bool) -> Self {
        let (grid_bg, border, highlight) = match theme {
            Theme::Default => (Rgb::new(24, 24, 32), Rgb::new(70, 70, 85), Rgb::new(240, 240, 245)),
            Theme::NeonCity => (Rgb::new(24, 24, 32), Rgb::new(40, 40, 50), Rgb::new(0, 229, 255)),
            Theme::SpaceScifi => (Rgb::new(8, 8, 20), Rgb::new(40, 50, 90), Rgb::new(100, 150, 255)),
            Theme::RetroPixel => (Rgb::new(50, 40, 60), Rgb::new(90, 70, 100), Rgb::new(255, 200, 100)),
            Theme::OceanWorld => (Rgb::new(10, 35, 55), Rgb::new(30, 70, 100), Rgb::new(100, 200, 255)),
            Theme::SunsetDusk => (Rgb::new(45, 30, 35), Rgb::new(90, 55, 60), Rgb::new(255, 180, 100)),
        };
        Self {
            grid_bg,
            border,
            text: Rgb::new(240, 240, 245),
            highlight,
            neon,
        }
    }

    pub fn piece(&self, kind: PieceKind) -> Rgb {
        let base = match kind {
            PieceKind::I => Rgb::new(0, 229, 255),
            PieceKind::O => Rgb::new(255, 215, 0),
            PieceKind::T => Rgb::new(170, 0, 255),
            PieceKind::L => Rgb::new(255, 140, 0),
            PieceKind::J => Rgb::new(30, 144, 255),
            PieceKind::Z => Rgb::new(255, 80, 80),
            PieceKind::S => Rgb::new(100, 255, 100),
        };
        if self.neon {
            base
        } else {
            base.scaled(180)
        }
    }

    pub fn block(&self, kind: PieceKind) -> CellStyle {
        CellStyle {
            bold: self.neon,
            ..CellStyle::new(self.piece(kind), self.grid_bg)
        }
    }

    pub fn ghost(&self, kind: PieceKind) -> CellStyle {
        CellStyle::new(self.piece(kind).scaled(140), self.grid_bg).dim()
    }

    pub fn empty(&self) -> CellStyle {
        CellStyle::new(self.border, self.grid_bg).dim()
    }

    pub fn frame(&self) -> CellStyle {
        CellStyle::new(self.border, Rgb::default())
    }

    pub fn label(&self) -> CellStyle {
        CellStyle::new(self.highlight, Rgb::default()).bold()
    }

    pub fn value(&self) -> CellStyle {
        CellStyle::new(self.text, Rgb::default())
    }

    pub fn muted(&self) -> CellStyle {
        CellStyle::new(Rgb::new(150, 150, 160), Rgb::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neon_is_brighter() {
        let on = Palette::new(Theme::Default, true);
        let off = Palette::new(Theme::Default, false);
        assert_eq!(on.piece(PieceKind::O), Rgb::new(255, 215, 0));
        assert!(off.piece(PieceKind::O).r < on.piece(PieceKind::O).r);
    }

    #[test]
    fn test_every_theme_has_distinct_background_or_accent() {
        let mut seen = Vec::new();
        for theme in Theme::ALL {
            let p = Palette::new(theme, true);
            let key = (p.grid_bg, p.highlight);
            assert!(!seen.contains(&key), "{theme:?} duplicates another theme");
            seen.push(key);
        }
    }
}
