//! Grid occupancy, placement and reconciliation tests

use tui_jigsaw::core::grid::{trapped_pieces, Grid};
use tui_jigsaw::core::{ensure_grid_integrity, place_piece, validate_puzzle_state, Piece, Placement, Slot};
use tui_jigsaw::types::Rotation;

fn home_layout(n: usize) -> Vec<Piece> {
    (0..n).map(Piece::new).collect()
}

#[test]
fn test_drop_on_occupied_cell_evicts_to_staging() {
    let mut pieces = home_layout(9);
    pieces[2].slot = Slot::Staging;

    let placement = place_piece(&mut pieces, 3, 2, 0);
    assert_eq!(placement, Placement::Swapped { evicted: 0 });
    assert_eq!(pieces[2].slot, Slot::Cell(0));
    assert_eq!(pieces[0].slot, Slot::Staging);
    assert!(validate_puzzle_state(&pieces, 3));
}

#[test]
fn test_drop_on_empty_cell() {
    let mut pieces = home_layout(9);
    pieces[4].slot = Slot::Staging;
    pieces[8].slot = Slot::Staging;

    assert_eq!(place_piece(&mut pieces, 3, 8, 4), Placement::Placed);
    assert_eq!(pieces[8].slot, Slot::Cell(4));
    assert_eq!(pieces.iter().filter(|p| p.slot.is_staging()).count(), 1);
}

#[test]
fn test_out_of_range_and_same_cell_drops() {
    let mut pieces = home_layout(9);
    assert_eq!(place_piece(&mut pieces, 3, 1, 9), Placement::Rejected);
    assert_eq!(place_piece(&mut pieces, 3, 1, 1), Placement::Unchanged);
    assert_eq!(place_piece(&mut pieces, 3, 42, 0), Placement::Rejected);
    assert_eq!(pieces, home_layout(9));
}

#[test]
fn test_integrity_keeps_first_claimant() {
    let mut pieces = home_layout(9);
    pieces[5].slot = Slot::Cell(3);
    pieces[7].slot = Slot::Cell(3);

    let staged = ensure_grid_integrity(&mut pieces, 3);
    assert_eq!(staged.as_slice(), &[5, 7]);
    assert_eq!(pieces[3].slot, Slot::Cell(3));
    assert!(validate_puzzle_state(&pieces, 3));

    // idempotent
    let before = pieces.clone();
    assert!(ensure_grid_integrity(&mut pieces, 3).is_empty());
    assert_eq!(pieces, before);
}

#[test]
fn test_integrity_stages_out_of_range_claims() {
    let mut pieces = home_layout(9);
    pieces[0].slot = Slot::Cell(20);
    assert!(!validate_puzzle_state(&pieces, 3));

    let staged = ensure_grid_integrity(&mut pieces, 3);
    assert_eq!(staged.as_slice(), &[0]);
    assert_eq!(pieces[0].slot, Slot::Staging);
}

#[test]
fn test_grid_view_reflects_pieces() {
    let mut pieces = home_layout(4 * 4);
    pieces[0].slot = Slot::Staging;
    let grid = Grid::from_pieces(&pieces, 4);

    assert_eq!(grid.size(), 4);
    assert_eq!(grid.len(), 16);
    assert_eq!(grid.occupant(0), None);
    assert_eq!(grid.occupant(15), Some(15));
    assert_eq!(grid.index(1, 2), Some(6));
    assert_eq!(grid.index(-1, 0), None);
    assert_eq!(grid.index(0, 4), None);
    assert_eq!(grid.empty_cells().collect::<Vec<_>>(), vec![0]);
}

#[test]
fn test_trapped_piece_detection() {
    // Piece 3 shares its home cell with piece 6, which is not at home.
    let mut pieces = home_layout(9);
    pieces[6].slot = Slot::Cell(3);
    assert_eq!(trapped_pieces(&pieces, false).as_slice(), &[6]);

    // Under the rotation rule a tilted home piece is not correct, so nothing
    // is trapped against it.
    pieces[3].rotation = Rotation::R90;
    assert!(trapped_pieces(&pieces, true).is_empty());
    assert_eq!(trapped_pieces(&pieces, false).as_slice(), &[6]);
}
