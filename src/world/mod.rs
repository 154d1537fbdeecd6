//! Zone 25 world model and persistence scaffolding: record types, the
//! sled-backed store, and display shelf operations.

pub mod errors;
pub mod shelf;
pub mod storage;
pub mod types;

pub use errors::WorldError;
pub use shelf::{claim_shelf, display_item, release_shelf, retrieve_item, ShelfResult};
pub use storage::{WorldStore, WorldStoreBuilder};
pub use types::*;
