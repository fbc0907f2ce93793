//! Hint engine.
//!
//! Highlights at most [`MAX_HINTS`] pieces that are exactly one cell away
//! (Manhattan distance) from home. Stateless: every call recomputes the full
//! set, so hints never accumulate.

use arrayvec::ArrayVec;

use crate::piece::{cell_of, is_correct, row_col, Piece};
use crate::rng::SimpleRng;
use crate::types::{MAX_HINTS, MAX_PIECES};

/// Manhattan distance between the piece's cell and its home, `None` when staged
pub fn distance_from_home(piece: &Piece, grid_size: usize) -> Option<usize> {
    let (row, col) = cell_of(piece, grid_size)?;
    let (home_row, home_col) = row_col(piece.home(), grid_size);
    Some(row.abs_diff(home_row) + col.abs_diff(home_col))
}

/// Pieces one move away from correct, in set order
pub fn hint_candidates(pieces: &[Piece], grid_size: usize, rotation_rule: bool) -> ArrayVec<usize, MAX_PIECES> {
    let mut out = ArrayVec::new();
    for piece in pieces {
        if is_correct(piece, rotation_rule) {
            continue;
        }
        if distance_from_home(piece, grid_size) == Some(1) {
            let _ = out.try_push(piece.id);
        }
    }
    out
}

/// Select the hint set: all candidates when there are at most two, otherwise
/// two chosen by shuffle-and-truncate.
pub fn select_hints(
    pieces: &[Piece],
    grid_size: usize,
    rotation_rule: bool,
    rng: &mut SimpleRng,
) -> ArrayVec<usize, MAX_HINTS> {
    let mut candidates = hint_candidates(pieces, grid_size, rotation_rule);
    if candidates.len() > MAX_HINTS {
        rng.shuffle(&mut candidates);
    }
    candidates.into_iter().take(MAX_HINTS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Slot;

    fn layout(slots: &[i32]) -> Vec<Piece> {
        slots
            .iter()
            .enumerate()
            .map(|(id, &s)| Piece::at(id, Slot::from(s)))
            .collect()
    }

    #[test]
    fn distance_uses_active_grid_size() {
        // piece 3 at cell 4: on a 3x3 grid home (1,0) vs (1,1) → 1
        let p = Piece::at(3, Slot::Cell(4));
        assert_eq!(distance_from_home(&p, 3), Some(1));
        // on a 4x4 grid home (0,3) vs (1,0) → 4
        assert_eq!(distance_from_home(&p, 4), Some(4));
        assert_eq!(distance_from_home(&Piece::at(0, Slot::Staging), 3), None);
    }

    #[test]
    fn only_distance_one_qualifies() {
        // 0 at 1 (d=1), 1 at 0 (d=1), 2 at 8 (d=2), 3..8 home
        let pieces = layout(&[1, 0, 8, 3, 4, 5, 6, 7, 2]);
        let c = hint_candidates(&pieces, 3, false);
        assert_eq!(c.as_slice(), &[0, 1]);
    }

    #[test]
    fn never_more_than_two() {
        // rows swapped pairwise: 0↔3, 1↔4, 2↔5 are all distance 1
        let pieces = layout(&[3, 4, 5, 0, 1, 2, 6, 7, 8]);
        let mut rng = SimpleRng::new(9);
        for _ in 0..20 {
            let hints = select_hints(&pieces, 3, false, &mut rng);
            assert_eq!(hints.len(), 2);
            assert_ne!(hints[0], hints[1]);
            for id in &hints {
                assert_eq!(distance_from_home(&pieces[*id], 3), Some(1));
            }
        }
    }

    #[test]
    fn rotated_home_piece_is_not_a_candidate() {
        // home but rotated: distance 0, still excluded
        let mut pieces = layout(&[0]);
        pieces[0].rotation = crate::types::Rotation::R90;
        assert!(hint_candidates(&pieces, 1, true).is_empty());
    }

    #[test]
    fn solved_puzzle_has_no_hints() {
        let pieces = layout(&[0, 1, 2, 3]);
        let mut rng = SimpleRng::new(1);
        assert!(select_hints(&pieces, 2, false, &mut rng).is_empty());
    }
}
