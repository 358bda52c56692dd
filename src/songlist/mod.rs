//! Songlister data model: entities, storage, and metadata enrichment.

mod enrichment;
mod manager;
mod models;
mod schema;
mod store;
mod trait_def;

pub use enrichment::{Enricher, DEFAULT_ENRICHMENT_TIMEOUT};
pub use manager::{IndexSongs, SonglistError, SonglistManager, SonglistResult};
pub use models::*;
pub use schema::SONGLIST_SCHEMA;
pub use store::{is_unique_violation, SqliteSonglistStore};
pub use trait_def::{SonglistStore, StoreCounts};
