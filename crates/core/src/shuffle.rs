//! Initial layout generation.
//!
//! Any permutation of a complete piece set is solvable (there is no
//! adjacency constraint), so a plain Fisher-Yates shuffle of positions is
//! enough.

use crate::piece::{Piece, Slot};
use crate::rng::SimpleRng;
use crate::types::Rotation;

/// Create `grid_size²` pieces and scatter them over the grid.
///
/// Every cell receives exactly one piece. With `rotate` set, each piece also
/// gets a uniform-random right-angle rotation.
pub fn initialize(grid_size: usize, rotate: bool, rng: &mut SimpleRng) -> Vec<Piece> {
    let total = grid_size * grid_size;
    let mut positions: Vec<usize> = (0..total).collect();
    rng.shuffle(&mut positions);

    let mut pieces: Vec<Piece> = positions
        .into_iter()
        .enumerate()
        .map(|(id, cell)| Piece::at(id, Slot::Cell(cell)))
        .collect();

    if rotate {
        for piece in &mut pieces {
            piece.rotation = rng.choose(&Rotation::ALL).unwrap_or_default();
        }
    }

    tracing::debug!(grid_size, rotate, "initialized piece set");
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::validate_puzzle_state;

    #[test]
    fn every_cell_filled_once() {
        for size in 3..=6 {
            let mut rng = SimpleRng::new(size as u32);
            let pieces = initialize(size, false, &mut rng);
            assert_eq!(pieces.len(), size * size);
            assert!(validate_puzzle_state(&pieces, size));
            let mut cells: Vec<usize> = pieces.iter().filter_map(|p| p.slot.cell()).collect();
            cells.sort_unstable();
            assert_eq!(cells, (0..size * size).collect::<Vec<_>>());
        }
    }

    #[test]
    fn ids_are_home_positions() {
        let mut rng = SimpleRng::new(11);
        let pieces = initialize(4, false, &mut rng);
        for (i, p) in pieces.iter().enumerate() {
            assert_eq!(p.id, i);
            assert_eq!(p.home(), i);
        }
    }

    #[test]
    fn rotation_only_when_requested() {
        let mut rng = SimpleRng::new(21);
        let plain = initialize(6, false, &mut rng);
        assert!(plain.iter().all(|p| p.rotation == Rotation::R0));

        let rotated = initialize(6, true, &mut rng);
        assert!(rotated.iter().any(|p| p.rotation != Rotation::R0));
    }

    #[test]
    fn same_seed_same_layout() {
        let a = initialize(5, true, &mut SimpleRng::new(77));
        let b = initialize(5, true, &mut SimpleRng::new(77));
        assert_eq!(a, b);
    }
}
