//! Songlister library
//!
//! Exposes the internal modules to the binaries and the end-to-end tests.

pub mod config;
pub mod echonest;
pub mod server;
pub mod songlist;
pub mod sqlite_persistence;

pub use server::{run_server, RequestsLoggingLevel, ServerConfig};
pub use songlist::{SonglistManager, SqliteSonglistStore};
