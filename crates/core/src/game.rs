//! Game aggregate - the single entry point front-ends talk to
//!
//! `PuzzleGame` owns the piece set, the session, the interaction controller,
//! the timers and the outgoing event queue. Every piece mutation runs the
//! same pipeline: move counter, correct-piece projection, completion check.
//!
//! Nothing here blocks or reads a clock; the host drives time with
//! [`PuzzleGame::tick`] and drains side effects with
//! [`PuzzleGame::take_events`].

use arrayvec::ArrayVec;

use crate::codec::{self, CodecError, SavedState};
use crate::grid::{annotate, ensure_grid_integrity, render_order, validate_puzzle_state, Annotation, Grid};
use crate::hint::{hint_candidates, select_hints};
use crate::interaction::{Armed, DropTarget, InteractionController, Outcome};
use crate::piece::{count_correct, Piece};
use crate::rng::SimpleRng;
use crate::session::{Phase, Session};
use crate::settings::GameSettings;
use crate::shuffle::initialize;
use crate::snapshot::{GameSnapshot, ImageStatus};
use crate::timer::{TimerHandle, Timers};
use crate::types::{
    Difficulty, Direction, EngineEvent, GameMode, Notification, PuzzleAction, Sound, HINT_INTERVAL_MS,
    MAX_HINTS, SESSION_TICK_MS,
};

/// Shuffles that come out already solved are redrawn at most this many times
const MAX_RESHUFFLES: u32 = 8;

#[derive(Debug, Clone)]
pub struct PuzzleGame {
    settings: GameSettings,
    session: Session,
    pieces: Vec<Piece>,
    controller: InteractionController,
    timers: Timers,
    clock_timer: Option<TimerHandle>,
    hint_timer: Option<TimerHandle>,
    hints: ArrayVec<usize, MAX_HINTS>,
    rng: SimpleRng,
    seed: u32,
    /// Rotation rule of the running puzzle, fixed at start
    rotation_rule: bool,
    image: ImageStatus,
    image_ref: Option<String>,
    pending_image: Option<String>,
    /// Milliseconds fed through `tick`, used for hover throttling
    clock_ms: u64,
    events: Vec<EngineEvent>,
}

impl PuzzleGame {
    pub fn new(settings: GameSettings, seed: u32) -> Self {
        Self {
            settings,
            session: Session::new(settings.difficulty, settings.game_mode),
            pieces: Vec::new(),
            controller: InteractionController::new(),
            timers: Timers::new(),
            clock_timer: None,
            hint_timer: None,
            hints: ArrayVec::new(),
            rng: SimpleRng::new(seed),
            seed,
            rotation_rule: settings.rotation_rule(),
            image: ImageStatus::Idle,
            image_ref: None,
            pending_image: None,
            clock_ms: 0,
            events: Vec::new(),
        }
    }

    // ---- accessors ----

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn grid_size(&self) -> usize {
        self.session.difficulty().grid_size()
    }

    pub fn rotation_rule(&self) -> bool {
        self.rotation_rule
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn armed(&self) -> Option<Armed> {
        self.controller.armed()
    }

    pub fn hints(&self) -> &[usize] {
        &self.hints
    }

    pub fn image_status(&self) -> ImageStatus {
        self.image
    }

    pub fn image_ref(&self) -> Option<&str> {
        self.image_ref.as_deref()
    }

    pub fn timers_running(&self) -> usize {
        self.timers.active_count()
    }

    /// Debug check of the one-piece-per-cell invariant
    pub fn is_consistent(&self) -> bool {
        validate_puzzle_state(&self.pieces, self.grid_size())
    }

    // ---- image lifecycle ----

    /// Begin loading a new image. The current puzzle keeps running until the
    /// image is ready.
    pub fn set_image(&mut self, image_ref: impl Into<String>) {
        let image_ref = image_ref.into();
        tracing::info!(image = %image_ref, "loading image");
        self.pending_image = Some(image_ref);
        self.image = ImageStatus::Loading;
    }

    /// The pending image loaded; starts a fresh puzzle with it.
    pub fn image_ready(&mut self) -> bool {
        let Some(image_ref) = self.pending_image.take() else {
            return false;
        };
        self.image_ref = Some(image_ref);
        self.image = ImageStatus::Ready;
        self.start_new_puzzle()
    }

    /// The pending image failed; the running puzzle is left untouched.
    pub fn image_failed(&mut self, reason: &str) {
        let image = self.pending_image.take().unwrap_or_default();
        tracing::warn!(%image, reason, "image failed to load");
        self.image = ImageStatus::Failed;
        self.events.push(EngineEvent::Notify(Notification::error(
            "Image failed to load",
            format!("{reason}. Please try another image."),
        )));
    }

    // ---- lifecycle ----

    /// Discard the current puzzle and deal a new one with the configured
    /// difficulty and mode. Refused while an image is loading.
    pub fn start_new_puzzle(&mut self) -> bool {
        if self.image == ImageStatus::Loading {
            return false;
        }
        self.reset_transient();
        self.session.change_difficulty(self.settings.difficulty);
        self.session.start(self.settings.game_mode, self.settings.time_limit());
        self.rotation_rule = self.settings.rotation_rule();

        let size = self.grid_size();
        let scatter = self.settings.scatter_rotation();
        let mut pieces = initialize(size, scatter, &mut self.rng);
        let mut redraws = 0;
        while count_correct(&pieces, self.rotation_rule) == pieces.len() && redraws < MAX_RESHUFFLES {
            pieces = initialize(size, scatter, &mut self.rng);
            redraws += 1;
        }
        self.pieces = pieces;
        self.after_mutation(false);
        if self.session.is_active() {
            self.start_timers();
        }
        true
    }

    /// Start a puzzle from an explicit layout (scripted play, tests). The
    /// difficulty is inferred from the piece count; other counts are refused.
    pub fn start_with_layout(&mut self, pieces: Vec<Piece>) -> bool {
        let Some(difficulty) = Difficulty::ALL
            .into_iter()
            .find(|d| d.piece_count() == pieces.len())
        else {
            tracing::warn!(count = pieces.len(), "layout does not match any difficulty");
            return false;
        };

        self.reset_transient();
        self.settings.difficulty = difficulty;
        self.session.change_difficulty(difficulty);
        self.session.start(self.settings.game_mode, self.settings.time_limit());
        self.rotation_rule = self.settings.rotation_rule();

        self.pieces = pieces;
        ensure_grid_integrity(&mut self.pieces, difficulty.grid_size());
        self.after_mutation(false);
        if self.session.is_active() {
            self.start_timers();
        }
        true
    }

    /// Active ⇄ Paused
    pub fn toggle_pause(&mut self) -> bool {
        match self.session.toggle_pause() {
            Some(Phase::Paused) => {
                self.stop_timers();
                self.controller.disarm();
                true
            }
            Some(Phase::Active) => {
                self.start_timers();
                true
            }
            _ => false,
        }
    }

    /// Switch difficulty. A puzzle already in progress is redealt at the new
    /// size.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.session.change_difficulty(difficulty);
        tracing::info!(difficulty = difficulty.label(), "difficulty changed");
        if self.session.phase() != Phase::NotStarted {
            self.start_new_puzzle();
        }
    }

    /// Takes effect on the next puzzle
    pub fn set_game_mode(&mut self, game_mode: GameMode) {
        self.settings.game_mode = game_mode;
    }

    /// Takes effect on the next puzzle
    pub fn set_rotation_enabled(&mut self, enabled: bool) {
        self.settings.rotation_enabled = enabled;
    }

    pub fn set_time_limit(&mut self, secs: u32) {
        if secs > 0 {
            self.settings.time_limit_secs = secs;
        }
    }

    // ---- time ----

    /// Advance timers by `elapsed_ms`: session clock every second, hint
    /// recomputation every five.
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.clock_ms = self.clock_ms.saturating_add(elapsed_ms as u64);

        for fired in self.timers.advance(elapsed_ms) {
            if !self.timers.is_running(fired.handle) {
                continue;
            }
            if Some(fired.handle) == self.clock_timer {
                for _ in 0..fired.count {
                    if self.session.tick() {
                        self.stop_timers();
                        self.controller.disarm();
                        self.hints.clear();
                        self.events.push(EngineEvent::Notify(self.session.time_up_notice()));
                        break;
                    }
                }
            } else if Some(fired.handle) == self.hint_timer && self.session.is_active() {
                self.refresh_hints();
            }
        }
    }

    /// Recompute hints immediately
    pub fn show_hints_now(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        self.refresh_hints();
        true
    }

    // ---- interaction ----

    pub fn apply_action(&mut self, action: PuzzleAction) -> bool {
        tracing::trace!(action = action.as_str(), "apply action");
        match action {
            PuzzleAction::Click(id) => self.click_piece(id),
            PuzzleAction::DropOnCell(cell) => self.drop_armed_on_cell(cell),
            PuzzleAction::DropToStaging => self.drop_armed_to_staging(),
            PuzzleAction::Move(direction) => self.move_armed(direction),
            PuzzleAction::Rotate => self.rotate_armed(),
            PuzzleAction::Pause => self.toggle_pause(),
            PuzzleAction::Hint => self.show_hints_now(),
            PuzzleAction::NewPuzzle => self.start_new_puzzle(),
        }
    }

    pub fn pointer_down(&mut self, id: usize) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let size = self.grid_size();
        let outcome = self.controller.pointer_down(&mut self.pieces, size, id);
        self.handle(outcome)
    }

    pub fn pointer_move(&mut self, cell: Option<usize>) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let outcome = self.controller.pointer_move(self.clock_ms, cell);
        self.handle(outcome)
    }

    pub fn pointer_up(&mut self, target: DropTarget) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let size = self.grid_size();
        let outcome = self.controller.pointer_up(&mut self.pieces, size, target);
        self.handle(outcome)
    }

    pub fn click_piece(&mut self, id: usize) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let size = self.grid_size();
        let outcome = self.controller.click(&mut self.pieces, size, id);
        self.handle(outcome)
    }

    pub fn drop_armed_on_cell(&mut self, cell: usize) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let size = self.grid_size();
        let outcome = self.controller.drop_on_cell(&mut self.pieces, size, cell);
        self.handle(outcome)
    }

    pub fn move_armed(&mut self, direction: Direction) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let size = self.grid_size();
        let outcome = self.controller.move_armed(&mut self.pieces, size, direction);
        self.handle(outcome)
    }

    pub fn drop_armed_to_staging(&mut self) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let outcome = self.controller.stage_armed(&mut self.pieces);
        self.handle(outcome)
    }

    /// Release the armed piece without moving it
    pub fn release_armed(&mut self) -> bool {
        if self.controller.armed().is_none() {
            return false;
        }
        self.controller.disarm();
        true
    }

    /// Only available when the running puzzle uses the rotation rule
    pub fn rotate_armed(&mut self) -> bool {
        if !self.session.is_active() || !self.rotation_rule {
            return false;
        }
        let outcome = self.controller.rotate_armed(&mut self.pieces);
        self.handle(outcome)
    }

    // ---- persistence ----

    /// Records the rules the running puzzle was dealt with, not pending
    /// setting changes.
    pub fn save(&self, name: &str, id: &str) -> SavedState {
        let settings = GameSettings {
            rotation_enabled: self.rotation_rule && self.session.game_mode() != GameMode::Challenge,
            ..self.settings
        };
        codec::save(
            &self.session,
            &self.pieces,
            &settings,
            self.image_ref.as_deref().unwrap_or_default(),
            name,
            id,
        )
    }

    /// Replace the running game with a saved one. On error nothing changes.
    pub fn load(&mut self, record: &SavedState) -> Result<(), CodecError> {
        let loaded = codec::load(record, &self.settings)?;

        self.reset_transient();
        self.settings = loaded.settings;
        self.session = loaded.session;
        self.pieces = loaded.pieces;
        self.rotation_rule = self.settings.rotation_rule();
        self.pending_image = None;
        if !loaded.image_ref.is_empty() {
            self.image_ref = Some(loaded.image_ref);
        }
        self.image = if self.image_ref.is_some() {
            ImageStatus::Ready
        } else {
            ImageStatus::Idle
        };
        if self.session.is_active() {
            self.start_timers();
        }
        tracing::info!(record = %record.id, phase = self.session.phase().as_str(), "game loaded");
        Ok(())
    }

    // ---- views ----

    /// Render flags for every piece, index-aligned with [`PuzzleGame::pieces`]
    pub fn annotations(&self) -> Vec<Annotation> {
        annotate(
            &self.pieces,
            self.rotation_rule,
            self.controller.dragging(),
            self.controller.selected(),
            &self.hints,
        )
    }

    /// Piece ids bottom to top
    pub fn render_order(&self) -> Vec<usize> {
        render_order(&self.annotations())
    }

    pub fn grid(&self) -> Grid {
        Grid::from_pieces(&self.pieces, self.grid_size())
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let grid = self.grid();
        GameSnapshot {
            phase: self.session.phase(),
            difficulty: self.session.difficulty(),
            game_mode: self.session.game_mode(),
            rotation_rule: self.rotation_rule,
            grid_size: self.grid_size(),
            cells: grid.cells().iter().copied().collect(),
            staged: self
                .pieces
                .iter()
                .filter(|p| p.slot.is_staging())
                .map(|p| p.id)
                .collect(),
            armed: self.controller.armed_id(),
            hover_cell: self.controller.hover_cell(),
            hints: self.hints.clone(),
            move_count: self.session.move_count(),
            time_spent_secs: self.session.time_spent_secs(),
            time_remaining_secs: self.session.time_remaining_secs(),
            correct_pieces: self.session.correct_piece_count(),
            total_pieces: self.pieces.len(),
            image: self.image,
            timed_out: self.session.timed_out(),
        }
    }

    /// Drain queued sounds and notifications
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    // ---- internals ----

    fn handle(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Ignored => false,
            Outcome::Disarmed | Outcome::Hovered => true,
            Outcome::PickedUp(_) => {
                self.events.push(EngineEvent::Sound(Sound::Pickup));
                true
            }
            Outcome::Moved { .. } | Outcome::Staged(_) | Outcome::Rotated(_) => {
                self.events.push(EngineEvent::Sound(Sound::Place));
                self.after_mutation(true);
                true
            }
        }
    }

    fn after_mutation(&mut self, counted: bool) {
        if counted {
            self.session.increment_moves();
        }
        let correct = count_correct(&self.pieces, self.rotation_rule);
        self.session.update_correct_pieces(correct);
        self.prune_hints();
        if self.session.check_completion(self.pieces.len(), correct) {
            self.stop_timers();
            self.controller.disarm();
            self.hints.clear();
            self.events.push(EngineEvent::Sound(Sound::Complete));
            self.events.push(EngineEvent::Notify(self.session.completion_notice()));
        }
    }

    fn refresh_hints(&mut self) {
        let size = self.grid_size();
        self.hints = select_hints(&self.pieces, size, self.rotation_rule, &mut self.rng);
        tracing::debug!(hints = ?self.hints.as_slice(), "hints refreshed");
    }

    /// Drop hinted pieces that are no longer one step from home
    fn prune_hints(&mut self) {
        let size = self.grid_size();
        let candidates = hint_candidates(&self.pieces, size, self.rotation_rule);
        self.hints.retain(|id| candidates.contains(id));
    }

    fn reset_transient(&mut self) {
        self.stop_timers();
        self.controller.disarm();
        self.hints.clear();
    }

    fn start_timers(&mut self) {
        self.stop_timers();
        self.clock_timer = Some(self.timers.start_interval(SESSION_TICK_MS));
        self.hint_timer = Some(self.timers.start_interval(HINT_INTERVAL_MS));
    }

    fn stop_timers(&mut self) {
        self.timers.cancel_all();
        self.clock_timer = None;
        self.hint_timer = None;
    }
}
