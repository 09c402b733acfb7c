//! High-level SDK for Taproom.
//!
//! Wires the CRUD stores, the object-URL registry, and the URL tracker into
//! one [`Taproom`] handle. This is the entry point for front ends and the
//! `tap` CLI.

pub mod config;
pub mod error;
pub mod seed;
pub mod taproom;

pub use config::TaproomConfig;
pub use error::{SdkError, SdkResult};
pub use seed::SeedData;
pub use taproom::{CheckInRequest, MissionProgress, Photo, Taproom};

// Re-export key types
pub use tap_store::{CrudError, CrudStore, DocumentStore, InMemoryBackend, MemoryStore};
pub use tap_types::{Badge, BadgeCriteria, CheckIn, Entity, Mission, Pub};
pub use tap_urls::{ObjectUrlRegistry, UrlTracker};
