//! Piece module - the authoritative piece record and its predicates
//!
//! A piece is identified by its integer id, which is also its home cell.
//! Render-only flags (dragging, trapped, hint) are not stored here; see
//! [`crate::grid::annotate`].

use serde::{Deserialize, Serialize};

use crate::types::{Rotation, STAGING};

/// Where a piece currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum Slot {
    /// In the staging tray, off the grid
    Staging,
    /// On the grid at a row-major cell index
    Cell(usize),
}

impl Slot {
    pub fn cell(&self) -> Option<usize> {
        match self {
            Slot::Staging => None,
            Slot::Cell(c) => Some(*c),
        }
    }

    pub fn is_staging(&self) -> bool {
        matches!(self, Slot::Staging)
    }
}

impl From<i32> for Slot {
    fn from(value: i32) -> Self {
        if value < 0 {
            Slot::Staging
        } else {
            Slot::Cell(value as usize)
        }
    }
}

impl From<Slot> for i32 {
    fn from(value: Slot) -> Self {
        match value {
            Slot::Staging => STAGING,
            Slot::Cell(c) => c as i32,
        }
    }
}

/// A single jigsaw piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: usize,
    pub slot: Slot,
    pub rotation: Rotation,
}

impl Piece {
    /// A piece sitting on its home cell, upright
    pub fn new(id: usize) -> Self {
        Self {
            id,
            slot: Slot::Cell(id),
            rotation: Rotation::R0,
        }
    }

    pub fn at(id: usize, slot: Slot) -> Self {
        Self {
            id,
            slot,
            rotation: Rotation::R0,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Home cell; fixed at creation and equal to the id
    pub fn home(&self) -> usize {
        self.id
    }
}

/// Correct iff on its home cell and, when the rotation rule applies, upright.
pub fn is_correct(piece: &Piece, rotation_rule: bool) -> bool {
    piece.slot == Slot::Cell(piece.home()) && (!rotation_rule || piece.rotation.is_upright())
}

pub fn is_staged(piece: &Piece) -> bool {
    piece.slot.is_staging()
}

/// (row, col) of the piece's current cell, `None` when staged
pub fn cell_of(piece: &Piece, grid_size: usize) -> Option<(usize, usize)> {
    let cell = piece.slot.cell()?;
    Some(row_col(cell, grid_size))
}

/// Row-major (row, col) of a flat cell index
#[inline(always)]
pub fn row_col(cell: usize, grid_size: usize) -> (usize, usize) {
    (cell / grid_size, cell % grid_size)
}

/// Count correct pieces under the given rotation rule
pub fn count_correct(pieces: &[Piece], rotation_rule: bool) -> usize {
    pieces.iter().filter(|p| is_correct(p, rotation_rule)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_piece_is_home_and_upright() {
        let p = Piece::new(4);
        assert_eq!(p.home(), 4);
        assert_eq!(p.slot, Slot::Cell(4));
        assert!(is_correct(&p, true));
    }

    #[test]
    fn rotation_rule_only_matters_when_enabled() {
        let p = Piece::new(2).with_rotation(Rotation::R90);
        assert!(is_correct(&p, false));
        assert!(!is_correct(&p, true));
    }

    #[test]
    fn staged_piece_has_no_cell() {
        let p = Piece::at(1, Slot::Staging);
        assert!(is_staged(&p));
        assert!(!is_correct(&p, false));
        assert_eq!(cell_of(&p, 3), None);
    }

    #[test]
    fn cell_of_uses_grid_size() {
        let p = Piece::at(0, Slot::Cell(7));
        assert_eq!(cell_of(&p, 3), Some((2, 1)));
        assert_eq!(cell_of(&p, 4), Some((1, 3)));
    }

    #[test]
    fn slot_wire_encoding() {
        assert_eq!(i32::from(Slot::Staging), -1);
        assert_eq!(i32::from(Slot::Cell(5)), 5);
        assert_eq!(Slot::from(-1), Slot::Staging);
        assert_eq!(Slot::from(-7), Slot::Staging);
        assert_eq!(Slot::from(8), Slot::Cell(8));
    }
}
