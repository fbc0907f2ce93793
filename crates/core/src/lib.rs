//! Core puzzle logic - pure, deterministic, and testable
//!
//! This crate contains the piece model, the grid integrity rules, the
//! interaction protocol, hints, the session state machine and the save codec.
//! It has **no dependencies** on terminals, files or networking:
//!
//! - **Deterministic**: same seed and inputs produce the same game
//! - **Clock-free**: time only advances through `tick(elapsed_ms)`
//! - **Self-healing**: conflicting positions are repaired, never fatal
//!
//! # Module Structure
//!
//! - [`piece`]: piece record, slots and correctness predicates
//! - [`grid`]: derived occupancy, placement/eviction, reconciliation,
//!   trapped detection and stacking order
//! - [`interaction`]: armed-piece controller (drag, click, keyboard moves)
//! - [`hint`]: near-correct piece selection
//! - [`session`]: phase, clock, counters and completion
//! - [`timer`]: cancellable interval timers
//! - [`codec`]: versioned save records
//! - [`game`]: the [`PuzzleGame`] aggregate front-ends talk to
//!
//! # Rules
//!
//! - Every grid cell holds at most one piece; the staging tray holds any number
//! - Dropping onto an occupied cell sends the occupant to staging
//! - A piece is correct on its home cell (and upright, in challenge games)
//! - The puzzle completes the first time every piece is correct
//!
//! # Example
//!
//! ```
//! use tui_jigsaw_core::{GameSettings, Piece, PuzzleGame, Slot};
//! use tui_jigsaw_types::PuzzleAction;
//!
//! let mut game = PuzzleGame::new(GameSettings::default(), 12345);
//!
//! // pieces 0 and 1 swapped, everything else home
//! let mut pieces: Vec<Piece> = (0..9).map(Piece::new).collect();
//! pieces[0].slot = Slot::Cell(1);
//! pieces[1].slot = Slot::Cell(0);
//! assert!(game.start_with_layout(pieces));
//!
//! game.apply_action(PuzzleAction::Click(0));
//! game.apply_action(PuzzleAction::DropOnCell(0));
//! game.apply_action(PuzzleAction::Click(1));
//! game.apply_action(PuzzleAction::DropOnCell(1));
//!
//! assert!(game.session().is_complete());
//! assert_eq!(game.session().move_count(), 2);
//! ```

pub mod codec;
pub mod game;
pub mod grid;
pub mod hint;
pub mod interaction;
pub mod piece;
pub mod rng;
pub mod session;
pub mod settings;
pub mod shuffle;
pub mod snapshot;
pub mod throttle;
pub mod timer;

pub use tui_jigsaw_types as types;

// Re-export commonly used types for convenience
pub use codec::{CodecError, LoadedGame, SavedPiece, SavedState, SAVE_VERSION};
pub use game::PuzzleGame;
pub use grid::{
    ensure_grid_integrity, place_piece, render_order, validate_puzzle_state, Annotation, Grid, Placement,
};
pub use hint::select_hints;
pub use interaction::{ArmMode, Armed, DropTarget, InteractionController, Outcome};
pub use piece::{cell_of, count_correct, is_correct, is_staged, Piece, Slot};
pub use rng::SimpleRng;
pub use session::{format_elapsed, Phase, Session, SessionBaseline};
pub use settings::GameSettings;
pub use shuffle::initialize;
pub use snapshot::{GameSnapshot, ImageStatus};
pub use timer::{Fired, TimerHandle, Timers};
