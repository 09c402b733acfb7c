//! Domain types for Taproom.
//!
//! This crate provides the entities that the rest of the workspace stores,
//! tracks, and scores. Every other Taproom crate depends on `tap-types`.
//!
//! # Key Types
//!
//! - [`Entity`] — The id/patch contract every stored collection item satisfies
//! - [`Pub`] — A venue users can check into
//! - [`CheckIn`] — One visit by one user, optionally carrying a carpet photo
//! - [`Badge`] — An award with machine-checkable [`BadgeCriteria`]
//! - [`Mission`] — A named set of pubs with progress tracking
//! - [`format_elapsed`] — Human-readable "3 hours ago" rendering

pub mod badge;
pub mod checkin;
pub mod elapsed;
pub mod entity;
pub mod error;
pub mod mission;
pub mod venue;

pub use badge::{Badge, BadgeCriteria, BadgePatch};
pub use checkin::{CheckIn, CheckInPatch};
pub use elapsed::format_elapsed;
pub use entity::Entity;
pub use error::TypeError;
pub use mission::{Mission, MissionPatch};
pub use venue::{Pub, PubPatch};
