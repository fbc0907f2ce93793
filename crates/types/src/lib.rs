//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond parsing and conversion, so
//! they can be shared by the engine, the terminal front-end and the save codec.
//!
//! # Grid Dimensions
//!
//! Puzzles are always square. The grid side comes from the [`Difficulty`]
//! preset:
//!
//! | Difficulty | Grid | Pieces |
//! |------------|------|--------|
//! | Easy | 3x3 | 9 |
//! | Medium | 4x4 | 16 |
//! | Hard | 5x5 | 25 |
//! | Expert | 6x6 | 36 |
//!
//! Cells are indexed row-major: `cell = row * grid_size + col`. A piece that
//! is not on the grid sits in the staging tray, encoded as [`STAGING`] (`-1`)
//! on the wire.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `FRAME_MS` | 16 | Front-end frame interval (~60 FPS) |
//! | `SESSION_TICK_MS` | 1000 | Elapsed-time accumulator period |
//! | `HINT_INTERVAL_MS` | 5000 | Hint recomputation period |
//! | `HOVER_THROTTLE_MS` | 50 | Minimum interval between hover updates |
//!
//! # Examples
//!
//! ```
//! use tui_jigsaw_types::{Difficulty, Direction, GameMode, PuzzleAction, Rotation};
//!
//! let difficulty = Difficulty::from_str("4x4").unwrap();
//! assert_eq!(difficulty.grid_size(), 4);
//! assert_eq!(difficulty.piece_count(), 16);
//!
//! assert_eq!(GameMode::from_str("challenge"), Some(GameMode::Challenge));
//! assert_eq!(Rotation::R270.rotate_cw(), Rotation::R0);
//!
//! let action = PuzzleAction::from_str("moveLeft").unwrap();
//! assert_eq!(action, PuzzleAction::Move(Direction::Left));
//! ```

use serde::{Deserialize, Serialize};

/// Wire value of a staged piece position
pub const STAGING: i32 = -1;

/// Front-end frame interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// Session clock period (one elapsed second per tick)
pub const SESSION_TICK_MS: u32 = 1000;

/// Hint recomputation period
pub const HINT_INTERVAL_MS: u32 = 5000;

/// Minimum interval between two accepted hover updates
pub const HOVER_THROTTLE_MS: u64 = 50;

/// Upper bound on simultaneously highlighted hint pieces
pub const MAX_HINTS: usize = 2;

/// Largest supported grid side
pub const MAX_GRID_SIZE: usize = 6;

/// Largest supported piece count (`MAX_GRID_SIZE²`)
pub const MAX_PIECES: usize = MAX_GRID_SIZE * MAX_GRID_SIZE;

/// Default limit for timed games (5 minutes)
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 300;


/// Difficulty presets
///
/// Each preset fixes the grid side (rows = columns). Changing difficulty
/// discards the piece set on the next puzzle start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "3x3")]
    Easy,
    #[serde(rename = "4x4")]
    Medium,
    #[serde(rename = "5x5")]
    Hard,
    #[serde(rename = "6x6")]
    Expert,
}

impl Difficulty {
    /// All presets, smallest first
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Grid side length
    pub fn grid_size(&self) -> usize {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
            Difficulty::Expert => 6,
        }
    }

    /// Total pieces (and cells) for this preset
    pub fn piece_count(&self) -> usize {
        self.grid_size() * self.grid_size()
    }

    /// Grid label, also used as the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "3x3",
            Difficulty::Medium => "4x4",
            Difficulty::Hard => "5x5",
            Difficulty::Expert => "6x6",
        }
    }

    /// Human-readable name shown next to the grid label
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    /// Preset whose grid side is `size`
    pub fn from_grid_size(size: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.grid_size() == size)
    }

    /// Parse from a grid label ("4x4") or a name ("medium"), case-insensitive
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_jigsaw_types::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_str("6X6"), Some(Difficulty::Expert));
    /// assert_eq!(Difficulty::from_str("easy"), Some(Difficulty::Easy));
    /// assert_eq!(Difficulty::from_str("7x7"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "3x3" | "easy" => Some(Difficulty::Easy),
            "4x4" | "medium" => Some(Difficulty::Medium),
            "5x5" | "hard" => Some(Difficulty::Hard),
            "6x6" | "expert" => Some(Difficulty::Expert),
            _ => None,
        }
    }
}

/// Game modes
///
/// - **Classic**: untimed, position-only completion
/// - **Timed**: the session pauses when the time limit is reached
/// - **Challenge**: pieces start rotated; completion also requires zero rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    #[default]
    Classic,
    Timed,
    Challenge,
}

impl GameMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GameMode::Classic),
            "timed" => Some(GameMode::Timed),
            "challenge" => Some(GameMode::Challenge),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Timed => "timed",
            GameMode::Challenge => "challenge",
        }
    }

    /// Next mode in display order (classic → timed → challenge → classic)
    pub fn next(&self) -> Self {
        match self {
            GameMode::Classic => GameMode::Timed,
            GameMode::Timed => GameMode::Challenge,
            GameMode::Challenge => GameMode::Classic,
        }
    }
}

/// Piece rotation in right-angle steps
///
/// Serialized as degrees (0, 90, 180, 270). The cycle goes
/// R0 → R90 → R180 → R270 → R0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270];

    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Only exact right angles in `[0, 360)` are accepted
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::R0 => Rotation::R90,
            Rotation::R90 => Rotation::R180,
            Rotation::R180 => Rotation::R270,
            Rotation::R270 => Rotation::R0,
        }
    }

    pub fn is_upright(&self) -> bool {
        *self == Rotation::R0
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(value).ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, got {value}"))
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

/// Directional move for the armed piece (keyboard or on-screen buttons)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// (row delta, column delta)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Cosmetic piece outline. Has no effect on engine rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceShape {
    #[default]
    Classic,
    Rounded,
    Square,
}

/// Cosmetic color theme. Has no effect on engine rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualTheme {
    #[default]
    Classic,
    Dark,
    Pastel,
}

/// Sound cues handed to the host's audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    Pickup,
    Place,
    Complete,
}

impl Sound {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sound::Pickup => "pickup",
            Sound::Place => "place",
            Sound::Complete => "complete",
        }
    }
}

/// Toast style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

/// User-visible notification (completion, time's up, I/O failures)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }
}

/// Engine-side event queued for the host.
///
/// The engine never calls out directly; hosts drain the queue after each
/// input or tick and forward events to their sound and toast collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Sound(Sound),
    Notify(Notification),
}

/// Actions that can be applied to a running puzzle
///
/// These are used by keyboard input, scripted play and benches. Pointer
/// gestures (down/move/up) go through the dedicated pointer API instead
/// because they carry hover state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuzzleAction {
    /// Click a piece: arms it, or swaps the armed piece onto its cell
    Click(usize),
    /// Drop the armed piece onto a grid cell
    DropOnCell(usize),
    /// Send the armed piece to the staging tray
    DropToStaging,
    /// Move the armed piece one cell in a direction (clamped to the grid)
    Move(Direction),
    /// Rotate the armed piece 90° clockwise
    Rotate,
    /// Toggle pause
    Pause,
    /// Recompute hints immediately
    Hint,
    /// Start a fresh puzzle with the configured difficulty
    NewPuzzle,
}

impl PuzzleAction {
    /// Parse argument-free actions from their camelCase names
    ///
    /// # Examples
    ///
    /// ```
    /// use tui_jigsaw_types::{Direction, PuzzleAction};
    ///
    /// assert_eq!(PuzzleAction::from_str("pause"), Some(PuzzleAction::Pause));
    /// assert_eq!(PuzzleAction::from_str("moveUp"), Some(PuzzleAction::Move(Direction::Up)));
    /// assert_eq!(PuzzleAction::from_str("click"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveup" => Some(PuzzleAction::Move(Direction::Up)),
            "movedown" => Some(PuzzleAction::Move(Direction::Down)),
            "moveleft" => Some(PuzzleAction::Move(Direction::Left)),
            "moveright" => Some(PuzzleAction::Move(Direction::Right)),
            "stage" => Some(PuzzleAction::DropToStaging),
            "rotate" => Some(PuzzleAction::Rotate),
            "pause" => Some(PuzzleAction::Pause),
            "hint" => Some(PuzzleAction::Hint),
            "newpuzzle" => Some(PuzzleAction::NewPuzzle),
            _ => None,
        }
    }

    /// camelCase name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleAction::Click(_) => "click",
            PuzzleAction::DropOnCell(_) => "dropOnCell",
            PuzzleAction::DropToStaging => "stage",
            PuzzleAction::Move(Direction::Up) => "moveUp",
            PuzzleAction::Move(Direction::Down) => "moveDown",
            PuzzleAction::Move(Direction::Left) => "moveLeft",
            PuzzleAction::Move(Direction::Right) => "moveRight",
            PuzzleAction::Rotate => "rotate",
            PuzzleAction::Pause => "pause",
            PuzzleAction::Hint => "hint",
            PuzzleAction::NewPuzzle => "newPuzzle",
        }
    }
}
