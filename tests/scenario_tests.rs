//! Longer play-throughs and scripted placement

use tui_jigsaw::core::{GameSettings, Piece, PuzzleGame, Slot};
use tui_jigsaw::engine::{apply_place, PlaceError, PlaceTarget};
use tui_jigsaw::types::{EngineEvent, PuzzleAction, Sound};

/// Piece 0 home, pieces 1..=7 shifted one cell right, piece 8 on cell 1.
fn rotated_row_layout() -> Vec<Piece> {
    let mut pieces: Vec<Piece> = (0..9).map(Piece::new).collect();
    for id in 1..8 {
        pieces[id].slot = Slot::Cell(id + 1);
    }
    pieces[8].slot = Slot::Cell(1);
    pieces
}

#[test]
fn test_eight_move_solve() {
    let mut game = PuzzleGame::new(GameSettings::default(), 1);
    assert!(game.start_with_layout(rotated_row_layout()));
    assert_eq!(game.session().correct_piece_count(), 1);
    game.take_events();

    for id in 1..=8 {
        assert!(game.apply_action(PuzzleAction::Click(id)), "click {id}");
        assert!(game.apply_action(PuzzleAction::DropOnCell(id)), "drop {id}");
        assert!(game.is_consistent());
    }

    assert!(game.session().is_complete());
    assert_eq!(game.session().move_count(), 8);
    assert_eq!(game.session().correct_piece_count(), 9);
    assert_eq!(game.timers_running(), 0);

    let events = game.take_events();
    assert_eq!(events.last().map(|e| matches!(e, EngineEvent::Notify(_))), Some(true));
    assert!(events.contains(&EngineEvent::Sound(Sound::Complete)));
}

#[test]
fn test_apply_place_solves_swap() {
    let mut game = PuzzleGame::new(GameSettings::default(), 1);
    let mut pieces: Vec<Piece> = (0..9).map(Piece::new).collect();
    pieces[0].slot = Slot::Cell(1);
    pieces[1].slot = Slot::Cell(0);
    game.start_with_layout(pieces);

    let report = apply_place(&mut game, 0, PlaceTarget::Cell(0), None).unwrap();
    assert_eq!(report.evicted, Some(1));
    assert_eq!(report.moves, 1);
    assert!(!report.completed);

    let report = apply_place(&mut game, 1, PlaceTarget::Cell(1), None).unwrap();
    assert!(report.completed);

    assert_eq!(
        apply_place(&mut game, 1, PlaceTarget::Cell(2), None),
        Err(PlaceError::NotPlayable)
    );
}
