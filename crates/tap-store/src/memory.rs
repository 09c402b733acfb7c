//! In-memory document backend for tests and embedding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use tap_types::Entity;
use uuid::Uuid;

use crate::backend::{BackendError, BackendResult, DocumentBackend};

/// A `Vec`-backed [`DocumentBackend`].
///
/// Documents keep insertion order. Inserting a document with an empty id
/// assigns a fresh UUID v7. Counts fetches and can be told to fail the next
/// call, which is what store tests need.
pub struct InMemoryBackend<T> {
    docs: RwLock<Vec<T>>,
    fetches: AtomicUsize,
    fail_next: Mutex<Option<String>>,
}

impl<T: Entity> InMemoryBackend<T> {
    pub fn new() -> Self {
        Self::with_documents(Vec::new())
    }

    pub fn with_documents(docs: Vec<T>) -> Self {
        Self {
            docs: RwLock::new(docs),
            fetches: AtomicUsize::new(0),
            fail_next: Mutex::new(None),
        }
    }

    /// Number of `fetch_all` calls that reached this backend.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Make the next call of any kind fail with `Unavailable(reason)`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(reason.into());
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().map(|d| d.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every stored document.
    pub fn documents(&self) -> Vec<T> {
        self.docs.read().map(|d| d.clone()).unwrap_or_default()
    }

    fn check_failure(&self) -> BackendResult<()> {
        let mut slot = self.fail_next.lock().map_err(poisoned)?;
        match slot.take() {
            Some(reason) => Err(BackendError::Unavailable(reason)),
            None => Ok(()),
        }
    }
}

impl<T: Entity> Default for InMemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> BackendError {
    BackendError::Unavailable(format!("lock poisoned: {e}"))
}

#[async_trait]
impl<T: Entity> DocumentBackend<T> for InMemoryBackend<T> {
    async fn fetch_all(&self) -> BackendResult<Vec<T>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        let docs = self.docs.read().map_err(poisoned)?;
        Ok(docs.clone())
    }

    async fn insert(&self, mut item: T) -> BackendResult<T> {
        self.check_failure()?;
        if item.is_unassigned() {
            item.set_id(Uuid::now_v7().to_string());
        }
        let mut docs = self.docs.write().map_err(poisoned)?;
        if docs.iter().any(|d| d.id() == item.id()) {
            return Err(BackendError::Conflict(item.id().to_string()));
        }
        docs.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: &str, patch: &T::Patch) -> BackendResult<T> {
        self.check_failure()?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        let doc = docs
            .iter_mut()
            .find(|d| d.id() == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        doc.apply(patch);
        Ok(doc.clone())
    }

    async fn delete(&self, id: &str) -> BackendResult<()> {
        self.check_failure()?;
        let mut docs = self.docs.write().map_err(poisoned)?;
        let before = docs.len();
        docs.retain(|d| d.id() != id);
        if docs.len() == before {
            return Err(BackendError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for InMemoryBackend<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.docs.read().map(|d| d.len()).unwrap_or(0);
        f.debug_struct("InMemoryBackend")
            .field("document_count", &count)
            .field("fetches", &self.fetches.load(Ordering::SeqCst))
            .finish()
    }
}
