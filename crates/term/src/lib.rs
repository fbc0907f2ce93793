//! Terminal renderer for the puzzle.
//!
//! Rendering happens in two stages: [`PuzzleView`] paints a game into a
//! [`FrameBuffer`] without touching the terminal, then [`TerminalRenderer`]
//! flushes that buffer, rewriting only the cells that changed.
//!
//! The view also owns the screen geometry, so mouse coordinates are resolved
//! with [`BoardLayout::hit_test`] against the same layout that was drawn.

pub mod fb;
pub mod puzzle_view;
pub mod renderer;

pub use tui_jigsaw_core as core;
pub use tui_jigsaw_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use puzzle_view::{BoardLayout, CursorMark, Hit, Palette, PuzzleView, Toast, ViewState, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
