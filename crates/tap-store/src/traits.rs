//! The [`CrudStore`] capability set.

use async_trait::async_trait;
use tap_types::Entity;

use crate::error::CrudResult;
use crate::projection::Projection;

/// Uniform CRUD surface over a collection of `T`.
///
/// All implementations must satisfy these rules:
/// - `load` always goes to the source. On success it replaces `data`; on
///   failure it sets `error` and leaves `data` untouched. `loading` is
///   `true` only while a load is in flight.
/// - `load_once` behaves like `load` until a load has succeeded on this
///   instance, then returns `Ok(())` without touching the source.
/// - `add` rejects an id that collides with an existing entry, and returns
///   the persisted item (with any source-assigned fields).
/// - `update` and `remove` fail with `NotFound` if no entry has `id`.
/// - Every failure is also written to `error`; every operation clears
///   `error` when it starts.
#[async_trait]
pub trait CrudStore<T: Entity>: Send + Sync {
    fn data(&self) -> Projection<Vec<T>>;

    fn loading(&self) -> Projection<bool>;

    fn error(&self) -> Projection<Option<String>>;

    async fn load(&self) -> CrudResult<()>;

    async fn load_once(&self) -> CrudResult<()>;

    async fn add(&self, item: T) -> CrudResult<T>;

    async fn update(&self, id: &str, patch: T::Patch) -> CrudResult<T>;

    async fn remove(&self, id: &str) -> CrudResult<()>;

    /// Current contents of `data`.
    fn snapshot(&self) -> Vec<T> {
        self.data().get()
    }

    /// Look up one entry in the current `data`.
    fn find(&self, id: &str) -> Option<T> {
        self.data().with(|items| items.iter().find(|i| i.id() == id).cloned())
    }
}
