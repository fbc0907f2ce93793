//! Key mapping from terminal events to board intents.

use crate::types::{Difficulty, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What the player asked for, before game state is consulted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Arrow-style input: moves the armed piece, or the cursor when nothing is armed
    Navigate(Direction),
    /// Click whatever is under the cursor
    Activate,
    /// Release the armed piece without moving it
    Release,
    Stage,
    Rotate,
    Pause,
    Hint,
    NewPuzzle,
    SetDifficulty(Difficulty),
    CycleMode,
    ToggleRotation,
    Save,
    LoadLatest,
}

/// Map keyboard input to an intent. Release events are ignored.
pub fn map_key(key: KeyEvent) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('s') | KeyCode::Char('S') => Some(Intent::Save),
            KeyCode::Char('o') | KeyCode::Char('O') => Some(Intent::LoadLatest),
            _ => None,
        };
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(Intent::Navigate(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(Intent::Navigate(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(Intent::Navigate(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(Intent::Navigate(Direction::Right))
        }

        // Piece actions
        KeyCode::Char(' ') | KeyCode::Enter => Some(Intent::Activate),
        KeyCode::Esc => Some(Intent::Release),
        KeyCode::Char('x') | KeyCode::Char('X') => Some(Intent::Stage),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Intent::Rotate),

        // Session
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Intent::Pause),
        KeyCode::Char('?') => Some(Intent::Hint),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::NewPuzzle),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(Intent::CycleMode),
        KeyCode::Char('t') | KeyCode::Char('T') => Some(Intent::ToggleRotation),

        // Difficulty presets
        KeyCode::Char(c @ '1'..='4') => {
            let size = (c as u8 - b'1') as usize + 3;
            Difficulty::from_grid_size(size).map(Intent::SetDifficulty)
        }

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
