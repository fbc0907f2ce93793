//! Interaction controller - pickups, drops, swaps and directional moves
//!
//! The controller holds at most one armed piece. A piece is armed either by
//! a pointer press (drag) or by a click/keyboard selection; both share the
//! same drop rules. The controller only mutates piece positions and reports
//! what happened; phase gating, move counting and sounds belong to
//! [`crate::game::PuzzleGame`].

use crate::grid::{place_piece, stage_piece, Placement};
use crate::piece::{cell_of, Piece};
use crate::throttle::HoverThrottle;
use crate::types::{Direction, HOVER_THROTTLE_MS};

/// How the armed piece was picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmMode {
    /// Pointer press; rendered as dragging
    Drag,
    /// Click or keyboard selection; rendered as selected
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Armed {
    pub id: usize,
    pub mode: ArmMode,
}

/// Where a pointer was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Cell(usize),
    Staging,
    /// Outside the board and the tray
    Nowhere,
}

/// Result of one controller call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed
    Ignored,
    PickedUp(usize),
    /// Armed piece released without a move
    Disarmed,
    /// Armed piece placed on a cell (possibly evicting the occupant)
    Moved { id: usize, placement: Placement },
    Staged(usize),
    Rotated(usize),
    /// Hover position updated
    Hovered,
}

impl Outcome {
    /// Whether this outcome counts toward the move counter
    pub fn counts_as_move(&self) -> bool {
        matches!(self, Outcome::Moved { .. } | Outcome::Staged(_) | Outcome::Rotated(_))
    }
}

#[derive(Debug, Clone)]
pub struct InteractionController {
    armed: Option<Armed>,
    hover_cell: Option<usize>,
    throttle: HoverThrottle,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            armed: None,
            hover_cell: None,
            throttle: HoverThrottle::new(HOVER_THROTTLE_MS),
        }
    }

    pub fn armed(&self) -> Option<Armed> {
        self.armed
    }

    pub fn armed_id(&self) -> Option<usize> {
        self.armed.map(|a| a.id)
    }

    /// Id of the piece being dragged by the pointer
    pub fn dragging(&self) -> Option<usize> {
        self.armed.filter(|a| a.mode == ArmMode::Drag).map(|a| a.id)
    }

    /// Id of the piece selected by click or keyboard
    pub fn selected(&self) -> Option<usize> {
        self.armed.filter(|a| a.mode == ArmMode::Select).map(|a| a.id)
    }

    pub fn hover_cell(&self) -> Option<usize> {
        self.hover_cell
    }

    pub fn disarm(&mut self) {
        self.armed = None;
        self.hover_cell = None;
        self.throttle.reset();
    }

    fn arm(&mut self, id: usize, mode: ArmMode) -> Outcome {
        self.armed = Some(Armed { id, mode });
        self.hover_cell = None;
        self.throttle.reset();
        tracing::debug!(piece = id, ?mode, "piece armed");
        Outcome::PickedUp(id)
    }

    /// Pointer press on a piece. With nothing armed this starts a drag;
    /// otherwise it behaves like a click.
    pub fn pointer_down(&mut self, pieces: &mut [Piece], grid_size: usize, id: usize) -> Outcome {
        if self.armed.is_some() {
            return self.click(pieces, grid_size, id);
        }
        if !pieces.iter().any(|p| p.id == id) {
            return Outcome::Ignored;
        }
        self.arm(id, ArmMode::Drag)
    }

    /// Pointer movement over `cell` while dragging. Throttled.
    pub fn pointer_move(&mut self, now_ms: u64, cell: Option<usize>) -> Outcome {
        if self.dragging().is_none() || self.hover_cell == cell {
            return Outcome::Ignored;
        }
        if !self.throttle.accept(now_ms) {
            return Outcome::Ignored;
        }
        self.hover_cell = cell;
        Outcome::Hovered
    }

    /// Pointer release. Releasing outside the board cancels the drag.
    pub fn pointer_up(&mut self, pieces: &mut [Piece], grid_size: usize, target: DropTarget) -> Outcome {
        if self.armed.is_none() {
            return Outcome::Ignored;
        }
        match target {
            DropTarget::Cell(cell) => self.drop_on_cell(pieces, grid_size, cell),
            DropTarget::Staging => self.stage_armed(pieces),
            DropTarget::Nowhere => {
                self.disarm();
                Outcome::Disarmed
            }
        }
    }

    /// Click on a piece.
    ///
    /// - nothing armed: select it
    /// - the armed piece: release it
    /// - another piece on the grid: drop the armed piece onto its cell
    /// - another piece in staging: switch the selection to it
    pub fn click(&mut self, pieces: &mut [Piece], grid_size: usize, id: usize) -> Outcome {
        let Some(target) = pieces.iter().find(|p| p.id == id).copied() else {
            return Outcome::Ignored;
        };
        match self.armed {
            None => self.arm(id, ArmMode::Select),
            Some(armed) if armed.id == id => {
                self.disarm();
                Outcome::Disarmed
            }
            Some(_) => match target.slot.cell() {
                Some(cell) => self.drop_on_cell(pieces, grid_size, cell),
                None => self.arm(id, ArmMode::Select),
            },
        }
    }

    /// Drop the armed piece on `cell`. Out-of-range cells are ignored and the
    /// piece stays armed; dropping on its own cell just releases it.
    pub fn drop_on_cell(&mut self, pieces: &mut [Piece], grid_size: usize, cell: usize) -> Outcome {
        let Some(armed) = self.armed else {
            return Outcome::Ignored;
        };
        match place_piece(pieces, grid_size, armed.id, cell) {
            Placement::Rejected => Outcome::Ignored,
            Placement::Unchanged => {
                self.disarm();
                Outcome::Disarmed
            }
            placement => {
                self.disarm();
                tracing::debug!(piece = armed.id, cell, ?placement, "piece dropped");
                Outcome::Moved {
                    id: armed.id,
                    placement,
                }
            }
        }
    }

    /// Move the armed piece one cell, clamped to the grid. A clamped move and
    /// a staged piece are both no-ops that keep the piece armed.
    pub fn move_armed(&mut self, pieces: &mut [Piece], grid_size: usize, direction: Direction) -> Outcome {
        let Some(armed) = self.armed else {
            return Outcome::Ignored;
        };
        let Some(piece) = pieces.iter().find(|p| p.id == armed.id) else {
            return Outcome::Ignored;
        };
        let Some((row, col)) = cell_of(piece, grid_size) else {
            return Outcome::Ignored;
        };
        let (dr, dc) = direction.delta();
        let last = grid_size.saturating_sub(1) as i32;
        let new_row = (row as i32 + dr).clamp(0, last) as usize;
        let new_col = (col as i32 + dc).clamp(0, last) as usize;
        if (new_row, new_col) == (row, col) {
            return Outcome::Ignored;
        }
        self.drop_on_cell(pieces, grid_size, new_row * grid_size + new_col)
    }

    /// Send the armed piece to the staging tray
    pub fn stage_armed(&mut self, pieces: &mut [Piece]) -> Outcome {
        let Some(armed) = self.armed else {
            return Outcome::Ignored;
        };
        if !stage_piece(pieces, armed.id) {
            return Outcome::Ignored;
        }
        self.disarm();
        tracing::debug!(piece = armed.id, "piece staged");
        Outcome::Staged(armed.id)
    }

    /// Rotate the armed piece 90° clockwise; it stays armed
    pub fn rotate_armed(&mut self, pieces: &mut [Piece]) -> Outcome {
        let Some(armed) = self.armed else {
            return Outcome::Ignored;
        };
        match pieces.iter_mut().find(|p| p.id == armed.id) {
            Some(piece) => {
                piece.rotation = piece.rotation.rotate_cw();
                Outcome::Rotated(armed.id)
            }
            None => Outcome::Ignored,
        }
    }
}
