//! Engine services around the core game: scripted placement, save storage
//! and event dispatch to host collaborators.

pub mod feedback;
pub mod place;
pub mod saves;
pub mod store;

pub use feedback::{dispatch, EventLog, Feedback};
pub use place::{apply_place, PlaceError, PlaceReport, PlaceTarget};
pub use saves::{Listing, SaveLibrary};
pub use store::{JsonDirStore, MemoryStore, SaveStore, StoreError, StoredRecord};
