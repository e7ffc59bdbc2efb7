//! Recommendify Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod catalog;
pub mod recommend;
pub mod server;

// Re-export commonly used types for convenience
pub use catalog::{load_catalog, Song, SongCatalog};
pub use recommend::{RecommendOutcome, Recommender, SeedSong};
pub use server::{make_app, run_server, RequestsLoggingLevel, ServerConfig};
