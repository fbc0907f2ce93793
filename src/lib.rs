//! TUI Jigsaw (workspace facade crate).
//!
//! Re-exports the workspace crates under one name and hosts the terminal
//! front-end state in [`app`]. The game itself lives in `crates/core`.

pub mod app;

pub use tui_jigsaw_core as core;
pub use tui_jigsaw_engine as engine;
pub use tui_jigsaw_input as input;
pub use tui_jigsaw_term as term;
pub use tui_jigsaw_types as types;
