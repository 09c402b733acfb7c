//! [`MemoryStore`]: a self-contained [`CrudStore`] with no backend.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tap_types::Entity;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CrudError, CrudResult};
use crate::projection::{Projection, StoreState};
use crate::traits::CrudStore;

/// CRUD store whose authoritative collection lives in the store itself.
///
/// `load` republishes the authoritative collection into `data`; mutations
/// apply to both at once. Intended for tests of code written against
/// [`CrudStore`], and for small fixed collections.
pub struct MemoryStore<T> {
    items: Mutex<Vec<T>>,
    state: StoreState<T>,
    loaded: AtomicBool,
    loads: AtomicUsize,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_items(Vec::new())
    }

    /// A store whose source holds `items`. `data` stays empty until loaded.
    pub fn with_items(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
            state: StoreState::new(Vec::new()),
            loaded: AtomicBool::new(false),
            loads: AtomicUsize::new(0),
        }
    }

    /// Number of times the source was read by `load`.
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    fn source(&self) -> CrudResult<std::sync::MutexGuard<'_, Vec<T>>> {
        self.items
            .lock()
            .map_err(|e| CrudError::OperationFailed(format!("lock poisoned: {e}")))
    }

    fn fail<R>(&self, err: CrudError) -> CrudResult<R> {
        self.state.set_error(err.to_string());
        Err(err)
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> CrudStore<T> for MemoryStore<T> {
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
        self.loads.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.source().map(|items| items.clone());
        drop(in_flight);
        match snapshot {
            Ok(items) => {
                self.state.replace(items);
                self.loaded.store(true, Ordering::SeqCst);
                Ok(())
            }
            Err(e) => self.fail(e),
        }
    }

    async fn load_once(&self) -> CrudResult<()> {
        if self.loaded.load(Ordering::SeqCst) {
            return Ok(());
        }
        self.load().await
    }

    async fn add(&self, mut item: T) -> CrudResult<T> {
        self.state.clear_error();
        if item.is_unassigned() {
            item.set_id(Uuid::now_v7().to_string());
        }
        let result = self.source().and_then(|mut items| {
            if items.iter().any(|i| i.id() == item.id()) {
                return Err(CrudError::OperationFailed(format!(
                    "{} {} already exists",
                    T::KIND,
                    item.id()
                )));
            }
            items.push(item.clone());
            Ok(())
        });
        if let Err(e) = result {
            return self.fail(e);
        }
        debug!(kind = T::KIND, id = item.id(), "added");
        let copy = item.clone();
        self.state.modify(|items| items.push(copy));
        Ok(item)
    }

    async fn update(&self, id: &str, patch: T::Patch) -> CrudResult<T> {
        self.state.clear_error();
        let result = self.source().and_then(|mut items| {
            let slot = items
                .iter_mut()
                .find(|i| i.id() == id)
                .ok_or_else(|| CrudError::NotFound(id.to_string()))?;
            slot.apply(&patch);
            Ok(slot.clone())
        });
        let updated = match result {
            Ok(updated) => updated,
            Err(e) => return self.fail(e),
        };
        let copy = updated.clone();
        self.state.modify(|items| {
            if let Some(slot) = items.iter_mut().find(|i| i.id() == id) {
                *slot = copy;
            }
        });
        Ok(updated)
    }

    async fn remove(&self, id: &str) -> CrudResult<()> {
        self.state.clear_error();
        let result = self.source().and_then(|mut items| {
            let before = items.len();
            items.retain(|i| i.id() != id);
            if items.len() == before {
                return Err(CrudError::NotFound(id.to_string()));
            }
            Ok(())
        });
        if let Err(e) = result {
            return self.fail(e);
        }
        self.state.modify(|items| items.retain(|i| i.id() != id));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tap_types::{CheckIn, CheckInPatch};

    fn store() -> MemoryStore<CheckIn> {
        let mut first = CheckIn::new("p1", "u1", Utc::now());
        first.id = "c1".into();
        MemoryStore::with_items(vec![first])
    }

    #[tokio::test]
    async fn data_is_empty_until_loaded() {
        let s = store();
        assert!(s.snapshot().is_empty());
        s.load_once().await.unwrap();
        assert_eq!(s.snapshot().len(), 1);
    }

    #[tokio::test]
    async fn load_once_twice_reads_source_once() {
        let s = store();
        s.load_once().await.unwrap();
        s.load_once().await.unwrap();
        assert_eq!(s.load_count(), 1);
        s.load().await.unwrap();
        assert_eq!(s.load_count(), 2);
    }

    #[tokio::test]
    async fn add_assigns_id_and_remove_restores() {
        let s = store();
        s.load().await.unwrap();
        let before = s.snapshot();

        let added = s.add(CheckIn::new("p2", "u1", Utc::now())).await.unwrap();
        assert!(!added.id.is_empty());
        assert_eq!(s.snapshot().len(), 2);

        s.remove(&added.id).await.unwrap();
        assert_eq!(s.snapshot(), before);
    }

    #[tokio::test]
    async fn add_duplicate_fails() {
        let s = store();
        let mut dup = CheckIn::new("p9", "u9", Utc::now());
        dup.id = "c1".into();
        let err = s.add(dup).await.unwrap_err();
        assert!(matches!(err, CrudError::OperationFailed(_)));
        assert!(s.error().get().is_some());
    }

    #[tokio::test]
    async fn update_missing_leaves_data_unchanged() {
        let s = store();
        s.load().await.unwrap();
        let before = s.snapshot();
        let err = s
            .update("missing-id", CheckInPatch { points_awarded: Some(3), image_url: None })
            .await
            .unwrap_err();
        assert_eq!(err, CrudError::NotFound("missing-id".into()));
        assert_eq!(s.snapshot(), before);
    }

    #[tokio::test]
    async fn update_patches_both_source_and_data() {
        let s = store();
        s.load().await.unwrap();
        s.update("c1", CheckInPatch { points_awarded: Some(15), image_url: None })
            .await
            .unwrap();
        assert_eq!(s.find("c1").unwrap().points_awarded, 15);
        s.load().await.unwrap();
        assert_eq!(s.find("c1").unwrap().points_awarded, 15);
    }

    #[tokio::test]
    async fn remove_missing_is_not_found() {
        let s = store();
        let err = s.remove("ghost").await.unwrap_err();
        assert_eq!(err, CrudError::NotFound("ghost".into()));
    }
}
