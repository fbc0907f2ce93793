//! Terminal front-end state: routes key and mouse input into the game,
//! keeps the keyboard cursor and toast, and talks to the save library.
//!
//! Everything here is deterministic and terminal-free so it can be driven
//! from tests; `main` only does the I/O.

use std::path::PathBuf;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use tui_jigsaw_core::{ArmMode, DropTarget, GameSettings, PuzzleGame, SimpleRng};
use tui_jigsaw_engine::{dispatch, Feedback, SaveLibrary, SaveStore};
use tui_jigsaw_input::{BoardCursor, Focus, Intent};
use tui_jigsaw_term::{CursorMark, FrameBuffer, Hit, PuzzleView, Toast, ViewState, Viewport};
use tui_jigsaw_types::{Notification, NotificationVariant, Sound};

/// How long a toast stays on screen
pub const TOAST_MS: u32 = 3000;

/// Runtime configuration read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub settings: GameSettings,
    /// Image reference shown with the puzzle and stored in saves
    pub image: Option<String>,
    pub save_dir: PathBuf,
    /// Tracing output goes here; logging is off when unset
    pub log_path: Option<PathBuf>,
    pub seed: Option<u32>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let settings = GameSettings::from_lookup(&lookup);

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let save_dir = non_empty("JIGSAW_SAVE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_save_dir(&non_empty));

        let seed = non_empty("JIGSAW_SEED").and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                tracing::warn!(value = %raw, "ignoring invalid JIGSAW_SEED");
                None
            }
        });

        Self {
            settings,
            image: non_empty("JIGSAW_IMAGE"),
            save_dir,
            log_path: non_empty("JIGSAW_LOG_PATH").map(PathBuf::from),
            seed,
        }
    }
}

fn default_save_dir(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    let base = lookup("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("tui-jigsaw").join("saves")
}

/// Toast and bell sink for engine events
#[derive(Debug, Default)]
struct TermFeedback {
    toast: Option<Toast>,
    toast_ms: u32,
    bell: bool,
}

impl Feedback for TermFeedback {
    fn play_sound(&mut self, sound: Sound) {
        tracing::trace!(sound = sound.as_str(), "sound");
        if sound == Sound::Complete {
            self.bell = true;
        }
    }

    fn notify(&mut self, notification: &Notification) {
        let text = if notification.description.is_empty() {
            notification.title.clone()
        } else {
            format!("{}: {}", notification.title, notification.description)
        };
        self.toast = Some(Toast {
            text,
            error: notification.variant == NotificationVariant::Destructive,
        });
        self.toast_ms = TOAST_MS;
    }
}

pub struct App<S: SaveStore> {
    game: PuzzleGame,
    library: SaveLibrary<S>,
    cursor: BoardCursor,
    view: PuzzleView,
    feedback: TermFeedback,
}

impl<S: SaveStore> App<S> {
    /// Build the app and deal the first puzzle.
    pub fn new(config: &AppConfig, store: S) -> Self {
        let seed = config.seed.unwrap_or_else(|| SimpleRng::from_clock().state());
        let mut game = PuzzleGame::new(config.settings, seed);
        match &config.image {
            // terminal front-end: the reference is ready as soon as it is set
            Some(image) => {
                game.set_image(image.clone());
                game.image_ready();
            }
            None => {
                game.start_new_puzzle();
            }
        }
        tracing::info!(seed, difficulty = config.settings.difficulty.label(), "app started");

        let mut app = Self {
            cursor: BoardCursor::new(game.grid_size()),
            game,
            library: SaveLibrary::new(store),
            view: PuzzleView::new(config.settings.visual_theme),
            feedback: TermFeedback::default(),
        };
        app.flush_events();
        app
    }

    pub fn game(&self) -> &PuzzleGame {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut PuzzleGame {
        &mut self.game
    }

    pub fn library(&self) -> &SaveLibrary<S> {
        &self.library
    }

    pub fn cursor(&self) -> &BoardCursor {
        &self.cursor
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.feedback.toast.as_ref()
    }

    /// True once per completed puzzle; the caller rings the terminal bell.
    pub fn take_bell(&mut self) -> bool {
        std::mem::take(&mut self.feedback.bell)
    }

    fn staged_ids(&self) -> Vec<usize> {
        self.game.snapshot().staged.to_vec()
    }

    fn armed_cell(&self) -> Option<usize> {
        let armed = self.game.armed()?;
        self.game
            .pieces()
            .iter()
            .find(|p| p.id == armed.id)
            .and_then(|p| p.slot.cell())
    }

    /// Apply one keyboard intent. Returns true if the game changed.
    pub fn handle_intent(&mut self, intent: Intent) -> bool {
        let changed = match intent {
            Intent::Navigate(direction) => match self.game.armed().filter(|_| self.armed_cell().is_some()) {
                Some(armed) => {
                    let moved = self.game.move_armed(direction);
                    let landed = self
                        .game
                        .pieces()
                        .iter()
                        .find(|p| p.id == armed.id)
                        .and_then(|p| p.slot.cell());
                    if let Some(cell) = landed {
                        self.cursor.set_cell(cell);
                    }
                    moved
                }
                None => {
                    self.cursor.step(direction, self.staged_ids().len());
                    false
                }
            },
            Intent::Activate => self.activate(),
            Intent::Release => self.game.release_armed(),
            Intent::Stage => self.stage_under_cursor(),
            Intent::Rotate => self.game.rotate_armed(),
            Intent::Pause => self.game.toggle_pause(),
            Intent::Hint => self.game.show_hints_now(),
            Intent::NewPuzzle => self.game.start_new_puzzle(),
            Intent::SetDifficulty(difficulty) => {
                self.game.change_difficulty(difficulty);
                true
            }
            Intent::CycleMode => {
                let mode = self.game.settings().game_mode.next();
                self.game.set_game_mode(mode);
                self.feedback
                    .notify(&Notification::info("Mode", format!("{} from the next puzzle", mode.as_str())));
                true
            }
            Intent::ToggleRotation => {
                let enabled = !self.game.settings().rotation_enabled;
                self.game.set_rotation_enabled(enabled);
                let state = if enabled { "on" } else { "off" };
                self.feedback
                    .notify(&Notification::info("Rotation", format!("{state} from the next puzzle")));
                true
            }
            Intent::Save => {
                let snap = self.game.snapshot();
                let name = format!("{} puzzle, {} moves", snap.difficulty.label(), snap.move_count);
                self.library.save(&self.game, &name).is_some()
            }
            Intent::LoadLatest => self.library.load_latest(&mut self.game),
        };

        self.cursor.resize(self.game.grid_size());
        self.cursor.clamp_tray(self.staged_ids().len());
        self.flush_events();
        changed
    }

    /// Click whatever the cursor is on, or drop the armed piece there.
    fn activate(&mut self) -> bool {
        match self.cursor.focus() {
            Focus::Cell(cell) => match self.game.grid().occupant(cell) {
                Some(id) => self.game.click_piece(id),
                None if self.game.armed().is_some() => self.game.drop_armed_on_cell(cell),
                None => false,
            },
            Focus::Tray(index) => {
                if self.armed_cell().is_some() {
                    return self.game.drop_armed_to_staging();
                }
                match self.staged_ids().get(index) {
                    Some(&id) => self.game.click_piece(id),
                    None => false,
                }
            }
        }
    }

    /// Stage the armed piece, or the piece under the cursor when nothing is armed
    fn stage_under_cursor(&mut self) -> bool {
        if self.game.armed().is_none() {
            let Focus::Cell(cell) = self.cursor.focus() else {
                return false;
            };
            let Some(id) = self.game.grid().occupant(cell) else {
                return false;
            };
            if !self.game.click_piece(id) {
                return false;
            }
        }
        self.game.drop_armed_to_staging()
    }

    /// Route a mouse event against the last drawn layout.
    pub fn handle_mouse(&mut self, event: MouseEvent) -> bool {
        let staged = self.staged_ids();
        let layout = self.view.layout(&self.game);
        let hit = layout.hit_test(event.column, event.row, staged.len());

        let changed = match event.kind {
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Hit::Cell(cell) => {
                    self.cursor.set_cell(cell);
                    match self.game.grid().occupant(cell) {
                        Some(id) => self.game.pointer_down(id),
                        None => self.game.drop_armed_on_cell(cell),
                    }
                }
                Hit::Tray(Some(index)) => match staged.get(index) {
                    Some(&id) => self.game.pointer_down(id),
                    None => false,
                },
                Hit::Tray(None) => self.armed_cell().is_some() && self.game.drop_armed_to_staging(),
                Hit::Outside => false,
            },
            MouseEventKind::Drag(MouseButton::Left) => {
                let cell = match hit {
                    Hit::Cell(cell) => Some(cell),
                    _ => None,
                };
                self.game.pointer_move(cell)
            }
            MouseEventKind::Up(MouseButton::Left) if self.game.armed().is_some_and(|a| a.mode == ArmMode::Drag) => {
                let target = match hit {
                    Hit::Cell(cell) => DropTarget::Cell(cell),
                    Hit::Tray(_) => DropTarget::Staging,
                    Hit::Outside => DropTarget::Nowhere,
                };
                self.game.pointer_up(target)
            }
            _ => false,
        };

        self.cursor.clamp_tray(self.staged_ids().len());
        self.flush_events();
        changed
    }

    /// Advance game time and the toast timer.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.game.tick(elapsed_ms);
        if self.feedback.toast.is_some() {
            self.feedback.toast_ms = self.feedback.toast_ms.saturating_sub(elapsed_ms);
            if self.feedback.toast_ms == 0 {
                self.feedback.toast = None;
            }
        }
        self.flush_events();
    }

    pub fn render_into(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        let cursor = match self.cursor.focus() {
            Focus::Cell(cell) => CursorMark::Cell(cell),
            Focus::Tray(index) => CursorMark::Tray(index),
        };
        let ui = ViewState {
            cursor: Some(cursor),
            toast: self.feedback.toast.clone(),
        };
        self.view.render_into(&self.game, &ui, viewport, fb);
    }

    fn flush_events(&mut self) {
        let mut events = self.game.take_events();
        events.extend(self.library.take_events());
        dispatch(events, &mut self.feedback);
    }
}
