//! Ephemeral object-URL lifecycle tracking.
//!
//! Locally rendered images (carpet photos straight off the camera) are
//! exposed as process-local `blob:` URLs. Each one pins its bytes in memory
//! until it is revoked. This crate ties the lifetime of those URLs to
//! membership in a caller-supplied item list so that nothing leaks.
//!
//! # Components
//!
//! - [`UrlRevoker`] -- the platform primitive that releases a URL
//! - [`ObjectUrlRegistry`] -- in-memory URL minting/revocation for tests and
//!   native hosts
//! - [`UrlTracker`] -- key → URL bookkeeping that revokes URLs whose owning
//!   key disappears, and everything on teardown
//!
//! # Invariants
//!
//! 1. At most one active URL per key.
//! 2. Every URL the tracker registered is either mapped from exactly one
//!    key or has been revoked.
//! 3. Revocation errors propagate to the caller; nothing is retried
//!    internally and nothing is swallowed (except on `Drop`, which logs).

pub mod error;
pub mod registry;
pub mod tracker;
pub mod traits;

pub use error::{UrlError, UrlResult};
pub use registry::{ObjectBlob, ObjectUrlRegistry};
pub use tracker::{UrlEntry, UrlTracker, DEFAULT_EPHEMERAL_SCHEME};
pub use traits::UrlRevoker;
