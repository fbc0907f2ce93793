use arrayvec::ArrayVec;

use crate::session::Phase;
use crate::types::{Difficulty, GameMode, MAX_HINTS, MAX_PIECES};

/// Where the puzzle image is in its load cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Read-only view of a running game for renderers and observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: Phase,
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub rotation_rule: bool,
    pub grid_size: usize,
    /// Occupant per cell, row-major
    pub cells: ArrayVec<Option<usize>, MAX_PIECES>,
    /// Staged piece ids in set order
    pub staged: ArrayVec<usize, MAX_PIECES>,
    pub armed: Option<usize>,
    pub hover_cell: Option<usize>,
    pub hints: ArrayVec<usize, MAX_HINTS>,
    pub move_count: u32,
    pub time_spent_secs: u32,
    pub time_remaining_secs: Option<u32>,
    pub correct_pieces: usize,
    pub total_pieces: usize,
    pub image: ImageStatus,
    pub timed_out: bool,
}

impl GameSnapshot {
    pub fn playable(&self) -> bool {
        self.phase == Phase::Active
    }

    /// Fraction of pieces in place, 0.0..=1.0
    pub fn progress(&self) -> f32 {
        if self.total_pieces == 0 {
            return 0.0;
        }
        self.correct_pieces as f32 / self.total_pieces as f32
    }
}
