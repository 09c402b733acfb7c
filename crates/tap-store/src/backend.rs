//! The [`DocumentBackend`] seam to the authoritative data source.

use std::sync::Arc;

use async_trait::async_trait;
use tap_types::Entity;

/// Errors reported by a document backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("document already exists: {0}")]
    Conflict(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

pub type BackendResult<T> = Result<T, BackendError>;

/// An external collection of documents of type `T`.
///
/// This is the only way a [`DocumentStore`](crate::DocumentStore) talks to
/// its data source. Implementations may retry internally but must resolve
/// every call to success or a [`BackendError`].
#[async_trait]
pub trait DocumentBackend<T: Entity>: Send + Sync {
    /// Fetch the full collection in backend order.
    async fn fetch_all(&self) -> BackendResult<Vec<T>>;

    /// Persist a new document and return it with backend-assigned fields
    /// (at least the id, if the caller left it empty).
    async fn insert(&self, item: T) -> BackendResult<T>;

    /// Apply a partial update and return the updated document.
    async fn update(&self, id: &str, patch: &T::Patch) -> BackendResult<T>;

    async fn delete(&self, id: &str) -> BackendResult<()>;
}

#[async_trait]
impl<T, B> DocumentBackend<T> for Arc<B>
where
    T: Entity,
    B: DocumentBackend<T> + ?Sized,
{
    async fn fetch_all(&self) -> BackendResult<Vec<T>> {
        (**self).fetch_all().await
    }

    async fn insert(&self, item: T) -> BackendResult<T> {
        (**self).insert(item).await
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> BackendResult<T> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: &str) -> BackendResult<()> {
        (**self).delete(id).await
    }
}
