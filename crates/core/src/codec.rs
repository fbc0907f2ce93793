//! Save/load codec - versioned JSON records with validation and repair
//!
//! Records are camelCase JSON. Structural problems (wrong piece count,
//! duplicate ids, bad rotations, future versions) reject the record;
//! positional problems (out-of-range or doubly-claimed cells) are repaired by
//! staging the offending pieces.
//!
//! # Record shape
//!
//! ```json
//! {
//!   "id": "save-1", "name": "Lunch break", "timestamp": 1700000000000,
//!   "difficulty": "3x3", "moveCount": 4, "timeSpent": 37,
//!   "imageRef": "images/harbor.jpg", "version": 2,
//!   "gameMode": "classic", "rotationEnabled": false,
//!   "pieces": [{ "id": 0, "homePosition": 0, "position": -1, "rotation": 0 }]
//! }
//! ```

use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::grid::ensure_grid_integrity;
use crate::piece::{count_correct, Piece, Slot};
use crate::session::{Session, SessionBaseline};
use crate::settings::GameSettings;
use crate::types::{Difficulty, GameMode, Rotation, DEFAULT_TIME_LIMIT_SECS};

/// Current record version written by [`save`]
pub const SAVE_VERSION: u32 = 2;

/// Records written before versioning carried no field
fn legacy_version() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPiece {
    pub id: usize,
    pub home_position: usize,
    /// Cell index, or -1 for staging
    pub position: i32,
    /// Degrees; validated on load
    pub rotation: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: u64,
    pub difficulty: Difficulty,
    pub pieces: Vec<SavedPiece>,
    pub move_count: u32,
    pub time_spent: u32,
    #[serde(default)]
    pub image_ref: String,
    #[serde(default = "legacy_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_mode: Option<GameMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
}

/// Rejection reasons for a record
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("save version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("{difficulty} puzzle needs {expected} pieces, record has {found}")]
    PieceCount {
        difficulty: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("piece id {0} is out of range")]
    IdOutOfRange(usize),
    #[error("piece id {0} appears more than once")]
    DuplicateId(usize),
    #[error("piece {id} has home position {home}")]
    HomeMismatch { id: usize, home: usize },
    #[error("piece {id} has rotation {degrees}, expected 0, 90, 180 or 270")]
    BadRotation { id: usize, degrees: u16 },
    #[error("invalid save record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to resume a saved puzzle
#[derive(Debug, Clone)]
pub struct LoadedGame {
    pub pieces: Vec<Piece>,
    pub session: Session,
    pub settings: GameSettings,
    pub image_ref: String,
    /// Pieces moved to staging while repairing positions
    pub repaired: Vec<usize>,
}

/// Snapshot the current game into a record
pub fn save(
    session: &Session,
    pieces: &[Piece],
    settings: &GameSettings,
    image_ref: &str,
    name: &str,
    id: &str,
) -> SavedState {
    SavedState {
        id: id.to_string(),
        name: name.to_string(),
        timestamp: now_ms(),
        difficulty: session.difficulty(),
        pieces: pieces
            .iter()
            .map(|p| SavedPiece {
                id: p.id,
                home_position: p.home(),
                position: p.slot.into(),
                rotation: p.rotation.degrees(),
            })
            .collect(),
        move_count: session.move_count(),
        time_spent: session.time_spent_secs(),
        image_ref: image_ref.to_string(),
        version: SAVE_VERSION,
        game_mode: Some(session.game_mode()),
        rotation_enabled: Some(settings.rotation_enabled),
        time_limit: session.time_limit_secs(),
    }
}

/// Validate a record and rebuild the game it describes.
///
/// Settings not stored in the record (cosmetics) come from `base`.
pub fn load(record: &SavedState, base: &GameSettings) -> Result<LoadedGame, CodecError> {
    if record.version > SAVE_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: record.version,
            supported: SAVE_VERSION,
        });
    }

    let expected = record.difficulty.piece_count();
    if record.pieces.len() != expected {
        return Err(CodecError::PieceCount {
            difficulty: record.difficulty.label(),
            expected,
            found: record.pieces.len(),
        });
    }

    let mut seen = HashSet::with_capacity(expected);
    let mut pieces = Vec::with_capacity(expected);
    for saved in &record.pieces {
        if saved.id >= expected {
            return Err(CodecError::IdOutOfRange(saved.id));
        }
        if !seen.insert(saved.id) {
            return Err(CodecError::DuplicateId(saved.id));
        }
        if saved.home_position != saved.id {
            return Err(CodecError::HomeMismatch {
                id: saved.id,
                home: saved.home_position,
            });
        }
        let rotation = Rotation::from_degrees(saved.rotation).ok_or(CodecError::BadRotation {
            id: saved.id,
            degrees: saved.rotation,
        })?;
        pieces.push(Piece::at(saved.id, Slot::from(saved.position)).with_rotation(rotation));
    }

    let grid_size = record.difficulty.grid_size();
    let repaired = ensure_grid_integrity(&mut pieces, grid_size).to_vec();
    if !repaired.is_empty() {
        tracing::warn!(record = %record.id, staged = repaired.len(), "repaired piece positions on load");
    }

    let game_mode = record.game_mode.unwrap_or_default();
    let settings = GameSettings {
        game_mode,
        difficulty: record.difficulty,
        rotation_enabled: record.rotation_enabled.unwrap_or(false),
        time_limit_secs: record.time_limit.unwrap_or(DEFAULT_TIME_LIMIT_SECS),
        ..*base
    };

    let correct = count_correct(&pieces, settings.rotation_rule());
    let mut session = Session::new(record.difficulty, game_mode);
    session.restore(SessionBaseline {
        difficulty: record.difficulty,
        game_mode,
        time_limit_secs: settings.time_limit(),
        time_spent_secs: record.time_spent,
        move_count: record.move_count,
        correct_piece_count: correct,
        total_pieces: expected,
    });

    Ok(LoadedGame {
        pieces,
        session,
        settings,
        image_ref: record.image_ref.clone(),
        repaired,
    })
}

pub fn to_json(record: &SavedState) -> Result<String, CodecError> {
    Ok(serde_json::to_string(record)?)
}

pub fn from_json(json: &str) -> Result<SavedState, CodecError> {
    Ok(serde_json::from_str(json)?)
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;

    fn record(positions: &[i32]) -> SavedState {
        SavedState {
            id: "s1".into(),
            name: "test".into(),
            timestamp: 0,
            difficulty: Difficulty::Easy,
            pieces: positions
                .iter()
                .enumerate()
                .map(|(id, &position)| SavedPiece {
                    id,
                    home_position: id,
                    position,
                    rotation: 0,
                })
                .collect(),
            move_count: 3,
            time_spent: 12,
            image_ref: "img".into(),
            version: SAVE_VERSION,
            game_mode: None,
            rotation_enabled: None,
            time_limit: None,
        }
    }

    #[test]
    fn optional_fields_fall_back() {
        let loaded = load(&record(&[1, 0, 2, 3, 4, 5, 6, 7, 8]), &GameSettings::default()).unwrap();
        assert_eq!(loaded.settings.game_mode, GameMode::Classic);
        assert!(!loaded.settings.rotation_enabled);
        assert_eq!(loaded.session.phase(), Phase::Active);
        assert_eq!(loaded.session.time_spent_secs(), 12);
        assert_eq!(loaded.session.move_count(), 3);
        assert_eq!(loaded.session.correct_piece_count(), 7);
    }

    #[test]
    fn out_of_range_positions_are_staged() {
        let loaded = load(&record(&[0, 1, 2, 3, 4, 5, 6, 7, 40]), &GameSettings::default()).unwrap();
        assert_eq!(loaded.repaired, vec![8]);
        assert_eq!(loaded.pieces[8].slot, Slot::Staging);
    }

    #[test]
    fn duplicate_cells_keep_first_claimant() {
        let loaded = load(&record(&[0, 0, 2, 3, 4, 5, 6, 7, 8]), &GameSettings::default()).unwrap();
        assert_eq!(loaded.pieces[0].slot, Slot::Cell(0));
        assert_eq!(loaded.pieces[1].slot, Slot::Staging);
    }

    #[test]
    fn structural_errors_reject() {
        let base = GameSettings::default();

        let mut r = record(&[0, 1, 2]);
        assert!(matches!(load(&r, &base), Err(CodecError::PieceCount { expected: 9, found: 3, .. })));

        r = record(&[0; 9]);
        r.pieces[1].id = 0;
        r.pieces[1].home_position = 0;
        assert!(matches!(load(&r, &base), Err(CodecError::DuplicateId(0))));

        r = record(&[0; 9]);
        r.pieces[2].home_position = 5;
        assert!(matches!(load(&r, &base), Err(CodecError::HomeMismatch { id: 2, home: 5 })));

        r = record(&[0; 9]);
        r.pieces[3].id = 12;
        assert!(matches!(load(&r, &base), Err(CodecError::IdOutOfRange(12))));

        r = record(&[0; 9]);
        r.pieces[4].rotation = 45;
        assert!(matches!(load(&r, &base), Err(CodecError::BadRotation { id: 4, degrees: 45 })));

        r = record(&[0; 9]);
        r.version = SAVE_VERSION + 1;
        assert!(matches!(load(&r, &base), Err(CodecError::UnsupportedVersion { .. })));
    }

    #[test]
    fn pieces_keep_record_order() {
        let mut r = record(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        r.pieces.reverse();
        let loaded = load(&r, &GameSettings::default()).unwrap();
        let ids: Vec<usize> = loaded.pieces.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(loaded.pieces[7].slot, Slot::Cell(0));
    }

    #[test]
    fn expired_timed_record_loads_timed_out() {
        let mut r = record(&[1, 0, 2, 3, 4, 5, 6, 7, 8]);
        r.game_mode = Some(GameMode::Timed);
        r.time_limit = Some(10);
        let loaded = load(&r, &GameSettings::default()).unwrap();
        assert_eq!(loaded.session.phase(), Phase::Paused);
        assert!(loaded.session.timed_out());
        assert_eq!(loaded.session.time_remaining_secs(), Some(0));
    }

    #[test]
    fn solved_record_loads_complete() {
        let loaded = load(&record(&[0, 1, 2, 3, 4, 5, 6, 7, 8]), &GameSettings::default()).unwrap();
        assert!(loaded.session.is_complete());
    }

    #[test]
    fn json_uses_camel_case_and_staging_sentinel() {
        let json = to_json(&record(&[-1, 1, 2, 3, 4, 5, 6, 7, 8])).unwrap();
        assert!(json.contains("\"homePosition\":0"));
        assert!(json.contains("\"position\":-1"));
        assert!(json.contains("\"moveCount\":3"));
        assert!(!json.contains("gameMode"));
    }

    #[test]
    fn missing_version_reads_as_legacy() {
        let json = r#"{"id":"a","name":"b","timestamp":1,"difficulty":"3x3","pieces":[],"moveCount":0,"timeSpent":0}"#;
        let r = from_json(json).unwrap();
        assert_eq!(r.version, 1);
        assert_eq!(r.image_ref, "");
        assert!(matches!(from_json("{not json"), Err(CodecError::Json(_))));
    }
}
