//! [`DocumentStore`]: a [`CrudStore`] fronting a [`DocumentBackend`].

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tap_types::Entity;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::backend::DocumentBackend;
use crate::error::{CrudError, CrudResult};
use crate::projection::{Projection, StoreState};
use crate::traits::CrudStore;

/// CRUD store backed by an external document collection.
///
/// `data` is a local cache of the backend collection: loads replace it,
/// successful mutations patch it. The backend is the source of truth for
/// existence checks on `update` and `remove`.
pub struct DocumentStore<T, B> {
    backend: B,
    state: StoreState<T>,
    loaded: AtomicBool,
    first_load: Mutex<()>,
    _entity: PhantomData<fn() -> T>,
}

impl<T, B> DocumentStore<T, B>
where
    T: Entity,
    B: DocumentBackend<T>,
{
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: StoreState::new(Vec::new()),
            loaded: AtomicBool::new(false),
            first_load: Mutex::new(()),
            _entity: PhantomData,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Whether a load has succeeded on this store.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    fn fail<R>(&self, err: CrudError) -> CrudResult<R> {
        warn!(kind = T::KIND, error = %err, "store operation failed");
        self.state.set_error(err.to_string());
        Err(err)
    }
}

#[async_trait]
impl<T, B> CrudStore<T> for DocumentStore<T, B>
where
    T: Entity,
    B: DocumentBackend<T>,
{
    fn data(&self) -> Projection<Vec<T>> {
        self.state.data()
    }

    fn loading(&self) -> Projection<bool> {
        self.state.loading()
    }

    fn error(&self) -> Projection<Option<String>> {
        self.state.error()
    }

    async fn load(&self) -> CrudResult<()> {
        let in_flight = self.state.begin_load();
        let result = self.backend.fetch_all().await;
        drop(in_flight);
        match result {
            Ok(items) => {
                info!(kind = T::KIND, count = items.len(), "store loaded");
                self.state.replace(items);
                self.loaded.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }

    async fn load_once(&self) -> CrudResult<()> {
        if self.is_loaded() {
            return Ok(());
        }
        // Concurrent first callers queue here; only the first one fetches.
        let _gate = self.first_load.lock().await;
        if self.is_loaded() {
            return Ok(());
        }
        self.load().await
    }

    async fn add(&self, item: T) -> CrudResult<T> {
        self.state.clear_error();
        if !item.is_unassigned() && self.state.contains(|i| i.id() == item.id()) {
            let id = item.id().to_string();
            return self.fail(CrudError::OperationFailed(format!(
                "{} {id} already exists",
                T::KIND
            )));
        }
        match self.backend.insert(item).await {
            Ok(stored) => {
                debug!(kind = T::KIND, id = stored.id(), "added");
                let copy = stored.clone();
                self.state.modify(|items| items.push(copy));
                Ok(stored)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    async fn update(&self, id: &str, patch: T::Patch) -> CrudResult<T> {
        self.state.clear_error();
        match self.backend.update(id, &patch).await {
            Ok(updated) => {
                debug!(kind = T::KIND, id, "updated");
                let copy = updated.clone();
                self.state.modify(|items| {
                    if let Some(slot) = items.iter_mut().find(|i| i.id() == id) {
                        *slot = copy;
                    }
                });
                Ok(updated)
            }
            Err(e) => self.fail(e.into()),
        }
    }

    async fn remove(&self, id: &str) -> CrudResult<()> {
        self.state.clear_error();
        match self.backend.delete(id).await {
            Ok(()) => {
                debug!(kind = T::KIND, id, "removed");
                self.state.modify(|items| items.retain(|i| i.id() != id));
                Ok(())
            }
            Err(e) => self.fail(e.into()),
        }
    }
}

impl<T, B: std::fmt::Debug> std::fmt::Debug for DocumentStore<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("backend", &self.backend)
            .field("loaded", &self.loaded.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBackend;
    use std::collections::HashSet;
    use std::sync::Arc;
    use tap_types::{Pub, PubPatch};

    fn seeded() -> (Arc<InMemoryBackend<Pub>>, DocumentStore<Pub, Arc<InMemoryBackend<Pub>>>) {
        let backend = Arc::new(InMemoryBackend::with_documents(vec![
            Pub::new("p1", "The Red Lion"),
            Pub::new("p2", "The Crown"),
        ]));
        let store = DocumentStore::new(backend.clone());
        (backend, store)
    }

    fn ids(store: &impl CrudStore<Pub>) -> HashSet<String> {
        store.snapshot().into_iter().map(|p| p.id).collect()
    }

    // -----------------------------------------------------------------------
    // load / load_once
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn load_replaces_data() {
        let (_, store) = seeded();
        assert!(store.snapshot().is_empty());
        store.load().await.unwrap();
        assert_eq!(store.snapshot().len(), 2);
        assert!(!store.loading().get());
        assert!(store.is_loaded());
    }

    #[tokio::test]
    async fn load_always_refetches() {
        let (backend, store) = seeded();
        store.load().await.unwrap();
        store.load().await.unwrap();
        assert_eq!(backend.fetch_count(), 2);
    }

    #[tokio::test]
    async fn load_once_fetches_at_most_once() {
        let (backend, store) = seeded();
        store.load_once().await.unwrap();
        store.load_once().await.unwrap();
        assert_eq!(backend.fetch_count(), 1);
    }

    #[tokio::test]
    async fn load_once_after_load_does_not_fetch() {
        let (backend, store) = seeded();
        store.load().await.unwrap();
        store.load_once().await.unwrap();
        assert_eq!(backend.fetch_count(), 1);
    }

    #[tokio::test]
    async fn concurrent_load_once_fetches_once() {
        let (backend, store) = seeded();
        let (a, b) = tokio::join!(store.load_once(), store.load_once());
        a.unwrap();
        b.unwrap();
        assert_eq!(backend.fetch_count(), 1);
    }

    #[tokio::test]
    async fn failed_load_keeps_data_and_sets_error() {
        let (backend, store) = seeded();
        store.load().await.unwrap();
        backend.fail_next("offline");

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, CrudError::OperationFailed(_)));
        assert_eq!(store.snapshot().len(), 2);
        assert!(!store.loading().get());
        let message = store.error().get().expect("error set");
        assert!(message.contains("offline"));
    }

    /// Parks the first `fetch_all` until released.
    struct GatedBackend {
        inner: InMemoryBackend<Pub>,
        gate: std::sync::Mutex<Option<Arc<tokio::sync::Notify>>>,
        parked: tokio::sync::Notify,
    }

    #[async_trait]
    impl DocumentBackend<Pub> for GatedBackend {
        async fn fetch_all(&self) -> crate::BackendResult<Vec<Pub>> {
            let gate = self.gate.lock().unwrap().take();
            if let Some(gate) = gate {
                self.parked.notify_one();
                gate.notified().await;
            }
            self.inner.fetch_all().await
        }

        async fn insert(&self, item: Pub) -> crate::BackendResult<Pub> {
            self.inner.insert(item).await
        }

        async fn update(&self, id: &str, patch: &PubPatch) -> crate::BackendResult<Pub> {
            self.inner.update(id, patch).await
        }

        async fn delete(&self, id: &str) -> crate::BackendResult<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn overlapping_loads_keep_loading_until_both_finish() {
        let release = Arc::new(tokio::sync::Notify::new());
        let store = DocumentStore::new(GatedBackend {
            inner: InMemoryBackend::with_documents(vec![Pub::new("p1", "The Red Lion")]),
            gate: std::sync::Mutex::new(Some(release.clone())),
            parked: tokio::sync::Notify::new(),
        });

        let slow = store.load();
        let fast = async {
            store.backend().parked.notified().await;
            assert!(store.loading().get());
            store.load().await.unwrap();
            assert!(store.loading().get(), "slow load is still in flight");
            release.notify_one();
        };
        let (slow, ()) = tokio::join!(slow, fast);
        slow.unwrap();
        assert!(!store.loading().get());
        assert_eq!(store.backend().inner.fetch_count(), 2);
    }

    #[tokio::test]
    async fn abandoned_load_does_not_stick_in_loading() {
        let release = Arc::new(tokio::sync::Notify::new());
        let store = DocumentStore::new(GatedBackend {
            inner: InMemoryBackend::new(),
            gate: std::sync::Mutex::new(Some(release)),
            parked: tokio::sync::Notify::new(),
        });
        tokio::select! {
            _ = store.load() => unreachable!("gate never opens"),
            _ = store.backend().parked.notified() => {}
        }
        assert!(!store.loading().get());
    }

    #[tokio::test]
    async fn load_once_retries_after_failure() {
        let (backend, store) = seeded();
        backend.fail_next("offline");
        assert!(store.load_once().await.is_err());
        store.load_once().await.unwrap();
        assert_eq!(backend.fetch_count(), 2);
        assert_eq!(store.error().get(), None);
    }

    // -----------------------------------------------------------------------
    // add / update / remove
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn add_then_remove_restores_data() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        let before = ids(&store);

        let added = store.add(Pub::new("", "The Swan")).await.unwrap();
        assert!(!added.id.is_empty());
        assert!(ids(&store).contains(&added.id));

        store.remove(&added.id).await.unwrap();
        assert_eq!(ids(&store), before);
    }

    #[tokio::test]
    async fn add_rejects_colliding_id() {
        let (backend, store) = seeded();
        store.load().await.unwrap();
        let err = store.add(Pub::new("p1", "Imposter")).await.unwrap_err();
        assert!(matches!(err, CrudError::OperationFailed(_)));
        assert_eq!(backend.len(), 2);
        assert_eq!(store.snapshot().len(), 2);
        assert!(store.error().get().is_some());
    }

    #[tokio::test]
    async fn add_collision_caught_by_backend_before_load() {
        let (_, store) = seeded();
        let err = store.add(Pub::new("p2", "Imposter")).await.unwrap_err();
        assert!(matches!(err, CrudError::OperationFailed(_)));
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn update_applies_patch() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        let patch = PubPatch {
            name: Some("The Red Lion & Sun".into()),
            ..Default::default()
        };
        let updated = store.update("p1", patch).await.unwrap();
        assert_eq!(updated.name, "The Red Lion & Sun");
        assert_eq!(store.find("p1").unwrap().name, "The Red Lion & Sun");
    }

    #[tokio::test]
    async fn update_missing_is_not_found_and_data_unchanged() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        let before = store.snapshot();
        let err = store
            .update("missing-id", PubPatch { points: Some(5), ..Default::default() })
            .await
            .unwrap_err();
        assert_eq!(err, CrudError::NotFound("missing-id".into()));
        assert_eq!(store.snapshot(), before);
        assert!(store.error().get().is_some());
    }

    #[tokio::test]
    async fn remove_missing_is_not_found() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        let err = store.remove("ghost").await.unwrap_err();
        assert_eq!(err, CrudError::NotFound("ghost".into()));
        assert_eq!(store.snapshot().len(), 2);
    }

    #[tokio::test]
    async fn successful_operation_clears_error() {
        let (_, store) = seeded();
        store.load().await.unwrap();
        let _ = store.remove("ghost").await;
        assert!(store.error().get().is_some());
        store.remove("p1").await.unwrap();
        assert_eq!(store.error().get(), None);
    }

    #[tokio::test]
    async fn works_through_trait_object() {
        let (_, store) = seeded();
        let store: Box<dyn CrudStore<Pub>> = Box::new(store);
        store.load_once().await.unwrap();
        assert_eq!(store.snapshot().len(), 2);
    }
}
