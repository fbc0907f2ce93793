//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into board [`Intent`]s and tracks a keyboard
//! cursor over the grid and the staging tray. Deciding what an intent does
//! (move the cursor or move the armed piece) is left to the caller, which
//! knows the game state.

pub mod cursor;
pub mod map;

pub use tui_jigsaw_types as types;

pub use cursor::{BoardCursor, Focus};
pub use map::{map_key, should_quit, Intent};
