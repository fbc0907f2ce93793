//! Save library - ties the codec, a store and a running game together
//!
//! Failures never touch the game: a failed save leaves the record unwritten,
//! a failed load leaves the running puzzle as it was. Every failure is
//! reported as a destructive notification on the library's event queue.

use tui_jigsaw_core::codec::{self, SavedState};
use tui_jigsaw_core::{GameSettings, PuzzleGame};
use tui_jigsaw_types::{EngineEvent, Notification};

use crate::store::SaveStore;

/// Parsed listing of a store
#[derive(Debug, Clone, Default)]
pub struct Listing {
    /// Loadable records, newest first
    pub records: Vec<SavedState>,
    /// Ids of records that failed to parse or validate
    pub corrupt: Vec<String>,
}

pub struct SaveLibrary<S: SaveStore> {
    store: S,
    seq: u32,
    events: Vec<EngineEvent>,
}

impl<S: SaveStore> SaveLibrary<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            seq: 0,
            events: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Read and validate every stored record. Corrupt ones are reported and
    /// left out; a failing store yields an empty listing.
    pub fn list(&mut self) -> Listing {
        let raw = match self.store.list() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "listing saves failed");
                self.events.push(EngineEvent::Notify(Notification::error(
                    "Could not read saved games",
                    e.to_string(),
                )));
                return Listing::default();
            }
        };

        let base = GameSettings::default();
        let mut listing = Listing::default();
        for stored in raw {
            let checked = codec::from_json(&stored.json)
                .and_then(|record| codec::load(&record, &base).map(|_| record));
            match checked {
                Ok(record) => listing.records.push(record),
                Err(e) => {
                    tracing::warn!(id = %stored.id, error = %e, "skipping corrupt save");
                    listing.corrupt.push(stored.id);
                }
            }
        }

        if !listing.corrupt.is_empty() {
            self.events.push(EngineEvent::Notify(Notification::error(
                "Some saved games are damaged",
                format!("{} record(s) could not be loaded", listing.corrupt.len()),
            )));
        }

        listing
            .records
            .sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        listing
    }

    /// Save the running game under `name`. Returns the written record.
    pub fn save(&mut self, game: &PuzzleGame, name: &str) -> Option<SavedState> {
        let id = self.next_id();
        let record = game.save(name, &id);
        let json = match codec::to_json(&record) {
            Ok(json) => json,
            Err(e) => {
                self.report_write_failure("Failed to save game", &e.to_string());
                return None;
            }
        };
        if let Err(e) = self.store.save(&record.id, &json) {
            tracing::warn!(id = %record.id, error = %e, "save failed");
            self.report_write_failure("Failed to save game", &e.to_string());
            return None;
        }
        tracing::info!(id = %record.id, name, "game saved");
        self.events
            .push(EngineEvent::Notify(Notification::info("Game saved", name.to_string())));
        Some(record)
    }

    /// Load record `id` into `game`
    pub fn load_into(&mut self, game: &mut PuzzleGame, id: &str) -> bool {
        let listing = self.list();
        let Some(record) = listing.records.iter().find(|r| r.id == id) else {
            self.events.push(EngineEvent::Notify(Notification::error(
                "Failed to load game",
                format!("No saved game {id}"),
            )));
            return false;
        };
        self.apply(game, record)
    }

    /// Load the newest valid record into `game`
    pub fn load_latest(&mut self, game: &mut PuzzleGame) -> bool {
        let listing = self.list();
        let Some(record) = listing.records.first() else {
            self.events.push(EngineEvent::Notify(Notification::info(
                "Nothing to load",
                "No saved games yet",
            )));
            return false;
        };
        self.apply(game, record)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        match self.store.delete(id) {
            Ok(()) => {
                tracing::info!(id, "save deleted");
                true
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "delete failed");
                self.report_write_failure("Failed to delete game", &e.to_string());
                false
            }
        }
    }

    /// Drain queued notifications
    pub fn take_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    fn apply(&mut self, game: &mut PuzzleGame, record: &SavedState) -> bool {
        match game.load(record) {
            Ok(()) => {
                self.events.push(EngineEvent::Notify(Notification::info(
                    "Game loaded",
                    record.name.clone(),
                )));
                true
            }
            Err(e) => {
                self.events.push(EngineEvent::Notify(Notification::error(
                    "Failed to load game",
                    e.to_string(),
                )));
                false
            }
        }
    }

    fn report_write_failure(&mut self, title: &str, detail: &str) {
        self.events.push(EngineEvent::Notify(Notification::error(
            title,
            format!("{detail}. Your storage might be full."),
        )));
    }

    fn next_id(&mut self) -> String {
        self.seq = self.seq.wrapping_add(1);
        let millis = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        format!("save-{millis}-{}", self.seq)
    }
}
