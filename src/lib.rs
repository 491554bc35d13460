//! Lyrics Enrichment Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod config;
pub mod enrichment;
pub mod llm;
pub mod lyrics;
pub mod server;
pub mod song;
pub mod sqlite_persistence;
pub mod user;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export commonly used types for convenience
pub use enrichment::EnrichmentPipeline;
pub use server::{run_server, RequestsLoggingLevel};
pub use song::{SongStore, SqliteSongStore};
pub use user::SqliteUserStore;
