//! Session state machine - phase, clock, move and correctness counters
//!
//! ```text
//! NotStarted ──start──▶ Active ⇄ Paused
//!                          │
//!                          └──all correct──▶ Complete
//! ```
//!
//! The session never touches pieces. The game aggregate feeds it the
//! correct-piece projection after each mutation and turns its return values
//! into sounds and notifications.

use crate::types::{Difficulty, GameMode, Notification, DEFAULT_TIME_LIMIT_SECS};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Active,
    Paused,
    Complete,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::NotStarted => "not_started",
            Phase::Active => "active",
            Phase::Paused => "paused",
            Phase::Complete => "complete",
        }
    }
}

/// Baseline values used when resuming a saved game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBaseline {
    pub difficulty: Difficulty,
    pub game_mode: GameMode,
    pub time_limit_secs: Option<u32>,
    pub time_spent_secs: u32,
    pub move_count: u32,
    pub correct_piece_count: usize,
    pub total_pieces: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    phase: Phase,
    difficulty: Difficulty,
    next_difficulty: Difficulty,
    game_mode: GameMode,
    time_limit_secs: Option<u32>,
    time_spent_secs: u32,
    move_count: u32,
    correct_piece_count: usize,
    timed_out: bool,
}

impl Session {
    pub fn new(difficulty: Difficulty, game_mode: GameMode) -> Self {
        Self {
            phase: Phase::NotStarted,
            difficulty,
            next_difficulty: difficulty,
            game_mode,
            time_limit_secs: None,
            time_spent_secs: 0,
            move_count: 0,
            correct_piece_count: 0,
            timed_out: false,
        }
    }

    /// Reset counters and go Active with the pending difficulty.
    ///
    /// Timed mode without an explicit limit uses [`DEFAULT_TIME_LIMIT_SECS`];
    /// other modes carry no limit.
    pub fn start(&mut self, game_mode: GameMode, time_limit_secs: Option<u32>) {
        self.difficulty = self.next_difficulty;
        self.game_mode = game_mode;
        self.time_limit_secs = effective_limit(game_mode, time_limit_secs);
        self.time_spent_secs = 0;
        self.move_count = 0;
        self.correct_piece_count = 0;
        self.timed_out = false;
        self.phase = Phase::Active;
        tracing::info!(difficulty = self.difficulty.label(), mode = game_mode.as_str(), "session started");
    }

    /// Resume from saved counters. A layout that is already solved lands in
    /// Complete without any completion side effects; a timed run whose clock
    /// already reached the limit lands timed out.
    pub fn restore(&mut self, baseline: SessionBaseline) {
        self.difficulty = baseline.difficulty;
        self.next_difficulty = baseline.difficulty;
        self.game_mode = baseline.game_mode;
        self.time_limit_secs = effective_limit(baseline.game_mode, baseline.time_limit_secs);
        self.time_spent_secs = baseline.time_spent_secs;
        self.move_count = baseline.move_count;
        self.correct_piece_count = baseline.correct_piece_count;
        let solved = baseline.total_pieces > 0 && baseline.correct_piece_count == baseline.total_pieces;
        let expired = self.game_mode == GameMode::Timed
            && self.time_limit_secs.is_some_and(|limit| self.time_spent_secs >= limit);
        self.timed_out = !solved && expired;
        self.phase = if solved {
            Phase::Complete
        } else if expired {
            Phase::Paused
        } else {
            Phase::Active
        };
    }

    /// One elapsed second. Returns true when this tick hit the time limit,
    /// in which case the session is now Paused.
    pub fn tick(&mut self) -> bool {
        if self.phase != Phase::Active {
            return false;
        }
        self.time_spent_secs = self.time_spent_secs.saturating_add(1);
        if let Some(limit) = self.time_limit_secs {
            if self.game_mode == GameMode::Timed && self.time_spent_secs >= limit {
                self.phase = Phase::Paused;
                self.timed_out = true;
                tracing::info!(limit, "time limit reached");
                return true;
            }
        }
        false
    }

    /// Active ⇄ Paused. Returns the new phase, or `None` when nothing changed
    /// (complete, not started, or resuming a timed-out session).
    pub fn toggle_pause(&mut self) -> Option<Phase> {
        let next = match self.phase {
            Phase::Active => Phase::Paused,
            Phase::Paused if !self.timed_out => Phase::Active,
            _ => return None,
        };
        self.phase = next;
        tracing::debug!(phase = next.as_str(), "pause toggled");
        Some(next)
    }

    pub fn increment_moves(&mut self) {
        if self.phase != Phase::Complete {
            self.move_count = self.move_count.saturating_add(1);
        }
    }

    pub fn update_correct_pieces(&mut self, count: usize) {
        if self.phase != Phase::Complete {
            self.correct_piece_count = count;
        }
    }

    /// Transition to Complete the first time every piece is correct.
    /// Returns true only on that transition.
    pub fn check_completion(&mut self, total: usize, correct: usize) -> bool {
        if self.phase == Phase::Complete || total == 0 || correct != total {
            return false;
        }
        self.phase = Phase::Complete;
        tracing::info!(moves = self.move_count, secs = self.time_spent_secs, "puzzle complete");
        true
    }

    /// Takes effect on the next [`Session::start`]
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.next_difficulty = difficulty;
    }

    pub fn completion_notice(&self) -> Notification {
        Notification::info(
            "Puzzle Complete!",
            format!(
                "Solved in {} moves and {}",
                self.move_count,
                format_elapsed(self.time_spent_secs)
            ),
        )
    }

    pub fn time_up_notice(&self) -> Notification {
        Notification::error(
            "Time's up!",
            format!("You placed {} pieces correctly", self.correct_piece_count),
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == Phase::Active
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn next_difficulty(&self) -> Difficulty {
        self.next_difficulty
    }

    pub fn game_mode(&self) -> GameMode {
        self.game_mode
    }

    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    pub fn time_spent_secs(&self) -> u32 {
        self.time_spent_secs
    }

    /// Seconds left in a timed game
    pub fn time_remaining_secs(&self) -> Option<u32> {
        self.time_limit_secs
            .map(|limit| limit.saturating_sub(self.time_spent_secs))
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn correct_piece_count(&self) -> usize {
        self.correct_piece_count
    }
}

fn effective_limit(game_mode: GameMode, limit: Option<u32>) -> Option<u32> {
    match game_mode {
        GameMode::Timed => Some(limit.filter(|&l| l > 0).unwrap_or(DEFAULT_TIME_LIMIT_SECS)),
        _ => None,
    }
}

/// `m:ss`, minutes unbounded
pub fn format_elapsed(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
