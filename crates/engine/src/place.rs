use tui_jigsaw_core::{PuzzleGame, Slot};
use tui_jigsaw_types::Rotation;

/// Where a scripted placement sends the piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceTarget {
    Cell(usize),
    Staging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    NotPlayable,
    UnknownPiece,
    CellOutOfRange,
    RotationUnavailable,
    AlreadyPlaced,
    /// The interactive protocol declined the pickup or the drop
    Refused,
}

impl PlaceError {
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "not_playable",
            PlaceError::Refused => "place_refused",
            PlaceError::RotationUnavailable => "rotation_unavailable",
            PlaceError::UnknownPiece | PlaceError::CellOutOfRange | PlaceError::AlreadyPlaced => {
                "invalid_place"
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::NotPlayable => "puzzle is not active",
            PlaceError::UnknownPiece => "no piece with that id",
            PlaceError::CellOutOfRange => "target cell is outside the grid",
            PlaceError::RotationUnavailable => "rotation is disabled for this puzzle",
            PlaceError::AlreadyPlaced => "piece is already at the target",
            PlaceError::Refused => "the game did not accept the move",
        }
    }
}

/// What a successful placement did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceReport {
    /// Moves added to the counter (drop plus rotation steps)
    pub moves: u32,
    /// Piece sent to staging by the drop
    pub evicted: Option<usize>,
    pub completed: bool,
}

/// Validated one-shot placement for scripted play.
///
/// Unlike the interactive protocol, which silently absorbs bad input, this
/// rejects anything that would be a no-op and reports why. Optional
/// `rotation` is reached by clockwise steps before the drop.
pub fn apply_place(
    game: &mut PuzzleGame,
    piece_id: usize,
    target: PlaceTarget,
    rotation: Option<Rotation>,
) -> Result<PlaceReport, PlaceError> {
    if !game.session().is_active() {
        return Err(PlaceError::NotPlayable);
    }

    let Some(piece) = game.pieces().iter().find(|p| p.id == piece_id).copied() else {
        return Err(PlaceError::UnknownPiece);
    };

    let size = game.grid_size();
    let target_slot = match target {
        PlaceTarget::Cell(cell) if cell >= size * size => return Err(PlaceError::CellOutOfRange),
        PlaceTarget::Cell(cell) => Slot::Cell(cell),
        PlaceTarget::Staging => Slot::Staging,
    };

    let rotation_steps = match rotation {
        Some(r) if r != piece.rotation && !game.rotation_rule() => {
            return Err(PlaceError::RotationUnavailable)
        }
        Some(r) => steps_cw(piece.rotation, r),
        None => 0,
    };

    if piece.slot == target_slot && rotation_steps == 0 {
        return Err(PlaceError::AlreadyPlaced);
    }

    let evicted = match target_slot {
        Slot::Cell(cell) => game.grid().occupant(cell).filter(|&id| id != piece_id),
        Slot::Staging => None,
    };

    let moves_before = game.session().move_count();

    // Start from a clean controller so the click arms our piece.
    game.release_armed();
    if !game.click_piece(piece_id) {
        return Err(PlaceError::Refused);
    }

    for _ in 0..rotation_steps {
        game.rotate_armed();
    }

    if !game.session().is_complete() {
        if piece.slot == target_slot {
            game.release_armed();
        } else {
            let dropped = match target_slot {
                Slot::Cell(cell) => game.drop_armed_on_cell(cell),
                Slot::Staging => game.drop_armed_to_staging(),
            };
            if !dropped {
                game.release_armed();
                return Err(PlaceError::Refused);
            }
        }
    }

    Ok(PlaceReport {
        moves: game.session().move_count() - moves_before,
        evicted,
        completed: game.session().is_complete(),
    })
}

fn steps_cw(from: Rotation, to: Rotation) -> u32 {
    let from = from.degrees() as i32 / 90;
    let to = to.degrees() as i32 / 90;
    (to - from).rem_euclid(4) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_jigsaw_core::{GameSettings, Piece};
    use tui_jigsaw_types::GameMode;

    fn swapped_pair(settings: GameSettings) -> PuzzleGame {
        let mut game = PuzzleGame::new(settings, 1);
        let mut pieces: Vec<Piece> = (0..9).map(Piece::new).collect();
        pieces[0].slot = Slot::Cell(1);
        pieces[1].slot = Slot::Cell(0);
        assert!(game.start_with_layout(pieces));
        game
    }

    #[test]
    fn place_rejected_when_paused() {
        let mut game = swapped_pair(GameSettings::default());
        assert!(game.toggle_pause());
        let err = apply_place(&mut game, 0, PlaceTarget::Cell(0), None).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
        assert_eq!(err.code(), "not_playable");
    }

    #[test]
    fn place_rejects_bad_targets() {
        let mut game = swapped_pair(GameSettings::default());
        assert_eq!(
            apply_place(&mut game, 99, PlaceTarget::Cell(0), None).unwrap_err(),
            PlaceError::UnknownPiece
        );
        assert_eq!(
            apply_place(&mut game, 0, PlaceTarget::Cell(9), None).unwrap_err(),
            PlaceError::CellOutOfRange
        );
        assert_eq!(
            apply_place(&mut game, 0, PlaceTarget::Cell(1), None).unwrap_err(),
            PlaceError::AlreadyPlaced
        );
        assert_eq!(
            apply_place(&mut game, 0, PlaceTarget::Cell(0), Some(Rotation::R90)).unwrap_err(),
            PlaceError::RotationUnavailable
        );
        assert_eq!(game.session().move_count(), 0);
    }

    #[test]
    fn place_reports_eviction_and_completion() {
        let mut game = swapped_pair(GameSettings::default());
        let first = apply_place(&mut game, 0, PlaceTarget::Cell(0), None).unwrap();
        assert_eq!(first, PlaceReport { moves: 1, evicted: Some(1), completed: false });

        let second = apply_place(&mut game, 1, PlaceTarget::Cell(1), None).unwrap();
        assert_eq!(second, PlaceReport { moves: 1, evicted: None, completed: true });
    }

    #[test]
    fn place_rotates_in_place() {
        let settings = GameSettings {
            game_mode: GameMode::Challenge,
            ..GameSettings::default()
        };
        let mut game = PuzzleGame::new(settings, 1);
        let mut pieces: Vec<Piece> = (0..9).map(Piece::new).collect();
        pieces[2].rotation = Rotation::R90;
        pieces[3].slot = Slot::Staging;
        assert!(game.start_with_layout(pieces));

        let report = apply_place(&mut game, 2, PlaceTarget::Cell(2), Some(Rotation::R0)).unwrap();
        assert_eq!(report.moves, 3);
        assert!(!report.completed);
        assert!(game.armed().is_none());
    }

    #[test]
    fn refused_moves_have_their_own_code() {
        assert_eq!(PlaceError::Refused.code(), "place_refused");
        assert_ne!(PlaceError::Refused.message(), PlaceError::NotPlayable.message());

        let mut game = swapped_pair(GameSettings::default());
        let report = apply_place(&mut game, 1, PlaceTarget::Staging, None).unwrap();
        assert_eq!(report.moves, 1);
        assert!(game.pieces().iter().any(|p| p.id == 1 && p.slot == Slot::Staging));
        assert!(game.armed().is_none());
    }

    #[test]
    fn rotation_steps_wrap_clockwise() {
        assert_eq!(steps_cw(Rotation::R270, Rotation::R0), 1);
        assert_eq!(steps_cw(Rotation::R0, Rotation::R270), 3);
        assert_eq!(steps_cw(Rotation::R180, Rotation::R180), 0);
    }
}
