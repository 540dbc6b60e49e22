//! Terminal presentation for the Tetris game.
//!
//! Rendering goes through a small framebuffer instead of a widget toolkit:
//! [`GameView`] draws a [`core::GameSnapshot`] and the progression records
//! into a [`FrameBuffer`], and [`TerminalRenderer`] flushes only the cells
//! that changed since the previous frame.
//!
//! Cells are two columns wide to compensate for the aspect ratio of
//! terminal glyphs.

pub mod fb;
pub mod game_view;
pub mod palette;
pub mod renderer;

pub use tetris_enhanced_core as core;
pub use tetris_enhanced_input as input;
pub use tetris_enhanced_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use palette::Palette;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
