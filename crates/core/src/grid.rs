//! Grid module - derived cell occupancy and the grid integrity service
//!
//! The grid is never authoritative: it is rebuilt from the piece set whenever
//! it is needed. Uses a flat array (row-major, `row * size + col`) capped at
//! the largest preset so rebuilding never allocates.
//!
//! Everything that keeps the one-piece-per-cell invariant lives here:
//! placement with eviction, the reconciliation pass, trapped-piece detection,
//! stacking order and the debug validator.

use arrayvec::ArrayVec;

use crate::piece::{is_correct, Piece, Slot};
use crate::types::{MAX_HINTS, MAX_PIECES};

/// Cell occupancy for one puzzle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    /// Flat array of occupants, row-major order
    cells: ArrayVec<Option<usize>, MAX_PIECES>,
}

impl Grid {
    /// Create an empty grid with `size` rows and columns
    pub fn new(size: usize) -> Self {
        let size = size.min(crate::types::MAX_GRID_SIZE);
        let mut cells = ArrayVec::new();
        for _ in 0..size * size {
            cells.push(None);
        }
        Self { size, cells }
    }

    /// Build occupancy from pieces. First claimant of a cell wins; claims on
    /// out-of-range cells are ignored. Does not modify the pieces.
    pub fn from_pieces(pieces: &[Piece], size: usize) -> Self {
        let mut grid = Self::new(size);
        for piece in pieces {
            if let Some(cell) = piece.slot.cell() {
                if let Some(slot) = grid.cells.get_mut(cell) {
                    if slot.is_none() {
                        *slot = Some(piece.id);
                    }
                }
            }
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Flat index from (row, col); `None` when outside the grid
    #[inline(always)]
    pub fn index(&self, row: i32, col: i32) -> Option<usize> {
        let size = self.size as i32;
        if row < 0 || row >= size || col < 0 || col >= size {
            return None;
        }
        Some((row as usize) * self.size + col as usize)
    }

    pub fn in_bounds(&self, cell: usize) -> bool {
        cell < self.cells.len()
    }

    /// Occupant of `cell`, `None` when empty or out of range
    pub fn occupant(&self, cell: usize) -> Option<usize> {
        self.cells.get(cell).copied().flatten()
    }

    pub fn is_cell_empty(&self, cell: usize) -> bool {
        matches!(self.cells.get(cell), Some(None))
    }

    pub fn cells(&self) -> &[Option<usize>] {
        &self.cells
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, occupant)| occupant.is_none())
            .map(|(cell, _)| cell)
    }
}

/// Outcome of a placement request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Moved onto an empty cell
    Placed,
    /// Took the cell; the previous occupant went to staging
    Swapped { evicted: usize },
    /// The piece already sits on the target cell
    Unchanged,
    /// Unknown piece or out-of-range cell; nothing changed
    Rejected,
}

impl Placement {
    /// Whether the piece set changed
    pub fn moved(&self) -> bool {
        matches!(self, Placement::Placed | Placement::Swapped { .. })
    }
}

/// Move `piece_id` onto `target`, evicting any other occupant to staging.
pub fn place_piece(pieces: &mut [Piece], grid_size: usize, piece_id: usize, target: usize) -> Placement {
    if target >= grid_size * grid_size {
        return Placement::Rejected;
    }
    let Some(mover) = pieces.iter().position(|p| p.id == piece_id) else {
        return Placement::Rejected;
    };
    if pieces[mover].slot == Slot::Cell(target) {
        return Placement::Unchanged;
    }

    let mut evicted = None;
    for (i, piece) in pieces.iter_mut().enumerate() {
        if i != mover && piece.slot == Slot::Cell(target) {
            piece.slot = Slot::Staging;
            evicted.get_or_insert(piece.id);
        }
    }
    pieces[mover].slot = Slot::Cell(target);

    match evicted {
        Some(evicted) => Placement::Swapped { evicted },
        None => Placement::Placed,
    }
}

/// Send `piece_id` to staging. Returns false for an unknown id.
pub fn stage_piece(pieces: &mut [Piece], piece_id: usize) -> bool {
    match pieces.iter_mut().find(|p| p.id == piece_id) {
        Some(piece) => {
            piece.slot = Slot::Staging;
            true
        }
        None => false,
    }
}

/// Reconciliation pass.
///
/// Rebuilds occupancy scanning pieces in set order: the first piece to claim a
/// cell keeps it, every later claimant and every out-of-range claim is sent to
/// staging. Returns the ids that were staged. Running it twice is the same as
/// running it once.
pub fn ensure_grid_integrity(pieces: &mut [Piece], grid_size: usize) -> ArrayVec<usize, MAX_PIECES> {
    let mut grid = Grid::new(grid_size);
    let mut staged = ArrayVec::new();

    for piece in pieces.iter_mut() {
        let Some(cell) = piece.slot.cell() else {
            continue;
        };
        match grid.cells.get(cell).copied() {
            Some(None) => {
                grid.cells[cell] = Some(piece.id);
            }
            Some(Some(owner)) => {
                tracing::warn!(piece = piece.id, cell, owner, "cell conflict, staging later claimant");
                piece.slot = Slot::Staging;
                let _ = staged.try_push(piece.id);
            }
            None => {
                tracing::warn!(piece = piece.id, cell, grid_size, "cell out of range, staging piece");
                piece.slot = Slot::Staging;
                let _ = staged.try_push(piece.id);
            }
        }
    }

    staged
}

/// Whether the piece at `index` is trapped: on the grid, not correct, and
/// sharing its cell with some other piece that is correct.
pub fn is_trapped(pieces: &[Piece], index: usize, rotation_rule: bool) -> bool {
    let Some(piece) = pieces.get(index) else {
        return false;
    };
    let Some(cell) = piece.slot.cell() else {
        return false;
    };
    if is_correct(piece, rotation_rule) {
        return false;
    }
    pieces.iter().enumerate().any(|(j, other)| {
        j != index && other.slot == Slot::Cell(cell) && is_correct(other, rotation_rule)
    })
}

/// Ids of all trapped pieces, in set order
pub fn trapped_pieces(pieces: &[Piece], rotation_rule: bool) -> ArrayVec<usize, MAX_PIECES> {
    let mut out = ArrayVec::new();
    for i in 0..pieces.len() {
        if is_trapped(pieces, i, rotation_rule) {
            let _ = out.try_push(pieces[i].id);
        }
    }
    out
}

/// Per-piece render flags, derived fresh every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Annotation {
    pub id: usize,
    pub correct: bool,
    pub trapped: bool,
    pub dragging: bool,
    pub selected: bool,
    pub show_hint: bool,
}

impl Annotation {
    /// Stacking priority; larger is drawn later (on top)
    pub fn layer(&self) -> u8 {
        if self.trapped {
            4
        } else if self.dragging {
            3
        } else if self.selected {
            2
        } else if !self.correct {
            1
        } else {
            0
        }
    }
}

/// Compute render annotations, index-aligned with `pieces`.
pub fn annotate(
    pieces: &[Piece],
    rotation_rule: bool,
    dragging: Option<usize>,
    selected: Option<usize>,
    hints: &ArrayVec<usize, MAX_HINTS>,
) -> Vec<Annotation> {
    pieces
        .iter()
        .enumerate()
        .map(|(i, piece)| Annotation {
            id: piece.id,
            correct: is_correct(piece, rotation_rule),
            trapped: is_trapped(pieces, i, rotation_rule),
            dragging: dragging == Some(piece.id),
            selected: selected == Some(piece.id),
            show_hint: hints.contains(&piece.id),
        })
        .collect()
}

/// Piece ids in draw order (first drawn first, top-most last).
///
/// trapped > dragging > selected > incorrect > correct; ties keep set order.
pub fn render_order(annotations: &[Annotation]) -> Vec<usize> {
    let mut order: Vec<&Annotation> = annotations.iter().collect();
    order.sort_by_key(|a| a.layer());
    order.into_iter().map(|a| a.id).collect()
}

/// Debug validator: logs every violation and returns false if any was found.
///
/// Violations are a cell claimed by two pieces or a claim on a cell outside
/// the grid.
pub fn validate_puzzle_state(pieces: &[Piece], grid_size: usize) -> bool {
    let total = grid_size * grid_size;
    let mut claims: ArrayVec<Option<usize>, MAX_PIECES> = ArrayVec::new();
    for _ in 0..total.min(MAX_PIECES) {
        claims.push(None);
    }

    let mut valid = true;
    for piece in pieces {
        let Some(cell) = piece.slot.cell() else {
            continue;
        };
        match claims.get(cell).copied() {
            None => {
                tracing::warn!(piece = piece.id, cell, grid_size, "piece claims out-of-range cell");
                valid = false;
            }
            Some(Some(owner)) => {
                tracing::warn!(piece = piece.id, cell, owner, "cell claimed twice");
                valid = false;
            }
            Some(None) => claims[cell] = Some(piece.id),
        }
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rotation;

    fn layout(slots: &[i32]) -> Vec<Piece> {
        slots
            .iter()
            .enumerate()
            .map(|(id, &s)| Piece::at(id, Slot::from(s)))
            .collect()
    }

    #[test]
    fn grid_index_calculation() {
        let grid = Grid::new(3);
        assert_eq!(grid.index(0, 0), Some(0));
        assert_eq!(grid.index(0, 2), Some(2));
        assert_eq!(grid.index(1, 0), Some(3));
        assert_eq!(grid.index(2, 2), Some(8));
        assert_eq!(grid.index(-1, 0), None);
        assert_eq!(grid.index(0, 3), None);
        assert_eq!(grid.index(3, 0), None);
    }

    #[test]
    fn from_pieces_first_claimant_wins() {
        let pieces = layout(&[1, 1, -1]);
        let grid = Grid::from_pieces(&pieces, 3);
        assert_eq!(grid.occupant(1), Some(0));
        assert_eq!(grid.occupant(0), None);
        assert_eq!(grid.empty_cells().count(), 8);
    }

    #[test]
    fn place_on_empty_cell() {
        let mut pieces = layout(&[0, 1, -1]);
        assert_eq!(place_piece(&mut pieces, 3, 2, 5), Placement::Placed);
        assert_eq!(pieces[2].slot, Slot::Cell(5));
    }

    #[test]
    fn place_evicts_occupant_to_staging() {
        let mut pieces = layout(&[0, 1]);
        assert_eq!(
            place_piece(&mut pieces, 3, 0, 1),
            Placement::Swapped { evicted: 1 }
        );
        assert_eq!(pieces[0].slot, Slot::Cell(1));
        assert_eq!(pieces[1].slot, Slot::Staging);
    }

    #[test]
    fn place_rejects_bad_input() {
        let mut pieces = layout(&[0, 1]);
        assert_eq!(place_piece(&mut pieces, 3, 9, 2), Placement::Rejected);
        assert_eq!(place_piece(&mut pieces, 3, 0, 9), Placement::Rejected);
        assert_eq!(place_piece(&mut pieces, 3, 0, 0), Placement::Unchanged);
        assert_eq!(pieces, layout(&[0, 1]));
    }

    #[test]
    fn reconciliation_stages_conflicts_and_out_of_range() {
        let mut pieces = layout(&[4, 4, 12, 4]);
        let staged = ensure_grid_integrity(&mut pieces, 3);
        assert_eq!(staged.as_slice(), &[1, 2, 3]);
        assert_eq!(pieces[0].slot, Slot::Cell(4));
        assert!(pieces[1..].iter().all(|p| p.slot == Slot::Staging));
    }

    #[test]
    fn reconciliation_is_idempotent() {
        let mut pieces = layout(&[2, 2, 0, 7, 7]);
        ensure_grid_integrity(&mut pieces, 3);
        let once = pieces.clone();
        let staged = ensure_grid_integrity(&mut pieces, 3);
        assert!(staged.is_empty());
        assert_eq!(pieces, once);
    }

    #[test]
    fn trapped_requires_correct_piece_underneath() {
        // piece 1 is home; piece 0 sits on the same cell
        let pieces = layout(&[1, 1, -1]);
        assert!(is_trapped(&pieces, 0, false));
        assert!(!is_trapped(&pieces, 1, false));
        assert!(!is_trapped(&pieces, 2, false));
        assert_eq!(trapped_pieces(&pieces, false).as_slice(), &[0]);

        // two incorrect pieces sharing a cell do not trap each other
        let pieces = layout(&[2, 2, -1]);
        assert!(trapped_pieces(&pieces, false).is_empty());
    }

    #[test]
    fn rotated_home_piece_does_not_trap_in_challenge() {
        let mut pieces = layout(&[1, 1]);
        pieces[1].rotation = Rotation::R90;
        assert!(is_trapped(&pieces, 0, false));
        assert!(!is_trapped(&pieces, 0, true));
    }

    #[test]
    fn render_order_is_stable_and_layered() {
        // 0 correct, 1 incorrect, 2 correct, 3 incorrect (dragging), 4 selected
        let pieces = layout(&[0, 3, 2, 1, 4]);
        let hints = ArrayVec::new();
        let ann = annotate(&pieces, false, Some(3), Some(4), &hints);
        // piece 4 is correct but selected
        assert_eq!(render_order(&ann), vec![0, 2, 1, 4, 3]);
    }

    #[test]
    fn trapped_draws_above_dragging() {
        let pieces = layout(&[1, 1, 5]);
        let hints = ArrayVec::new();
        let ann = annotate(&pieces, false, Some(2), None, &hints);
        assert_eq!(render_order(&ann), vec![1, 2, 0]);
    }

    #[test]
    fn validator_flags_duplicates_and_range() {
        assert!(validate_puzzle_state(&layout(&[0, 1, -1]), 3));
        assert!(!validate_puzzle_state(&layout(&[0, 0]), 3));
        assert!(!validate_puzzle_state(&layout(&[9]), 3));
    }
}
