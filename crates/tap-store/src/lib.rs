//! Generic CRUD store contract.
//!
//! UI-facing code depends on the [`CrudStore`] trait rather than on a
//! concrete backend, so list/detail/edit views are written once and bound
//! to any store that satisfies it.
//!
//! # Contract
//!
//! - Three read-only reactive [`Projection`]s: `data`, `loading`, `error`.
//! - `load` always fetches; `load_once` fetches only until a load has
//!   succeeded.
//! - `add`, `update`, `remove` resolve once `data` reflects the change.
//! - Failures are either [`CrudError::NotFound`] or
//!   [`CrudError::OperationFailed`], and are mirrored into `error`.
//!
//! # Implementations
//!
//! - [`DocumentStore`] -- fronts any [`DocumentBackend`] (an external
//!   document database, or [`InMemoryBackend`] in tests)
//! - [`MemoryStore`] -- self-contained, no backend at all
//!
//! Concurrent mutations are not serialized: the last completed write to
//! `data` wins.

pub mod backend;
pub mod document;
pub mod error;
pub mod local;
pub mod memory;
pub mod projection;
pub mod traits;

pub use backend::{BackendError, BackendResult, DocumentBackend};
pub use document::DocumentStore;
pub use error::{CrudError, CrudResult};
pub use local::MemoryStore;
pub use memory::InMemoryBackend;
pub use projection::{LoadGuard, Projection, StoreState};
pub use traits::CrudStore;
