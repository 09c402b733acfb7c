//! Reactive read-only views over store state.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::watch;

/// Read-only, observable view of one piece of store state.
///
/// Holds the latest value and lets callers await the next change. Cloning a
/// projection yields an independent observer of the same value.
#[derive(Clone, Debug)]
pub struct Projection<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Projection<T> {
    /// The current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Run `f` against the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.rx.borrow())
    }

    /// Wait until the value changes after the last one this projection saw.
    ///
    /// Returns `false` if the owning store has been dropped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// The writable side of the `data` / `loading` / `error` triple.
///
/// Store implementations own one of these and hand out [`Projection`]s.
#[derive(Debug)]
pub struct StoreState<T> {
    data: watch::Sender<Vec<T>>,
    loading: watch::Sender<bool>,
    error: watch::Sender<Option<String>>,
    in_flight: AtomicUsize,
}

/// Marks one load as in flight; `loading` drops back to `false` once the
/// last outstanding guard is gone.
#[must_use = "loading ends when the guard is dropped"]
#[derive(Debug)]
pub struct LoadGuard<'a> {
    loading: &'a watch::Sender<bool>,
    in_flight: &'a AtomicUsize,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.loading.send_if_modified(|loading| {
            if in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
                *loading = false;
                true
            } else {
                false
            }
        });
    }
}

impl<T: Clone> StoreState<T> {
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            data: watch::channel(initial).0,
            loading: watch::channel(false).0,
            error: watch::channel(None).0,
            in_flight: AtomicUsize::new(0),
        }
    }

    pub fn data(&self) -> Projection<Vec<T>> {
        Projection { rx: self.data.subscribe() }
    }

    pub fn loading(&self) -> Projection<bool> {
        Projection { rx: self.loading.subscribe() }
    }

    pub fn error(&self) -> Projection<Option<String>> {
        Projection { rx: self.error.subscribe() }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.data.borrow().clone()
    }

    /// Whether any current item satisfies `pred`.
    pub fn contains(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.data.borrow().iter().any(pred)
    }

    /// Enter the in-flight window of a load.
    ///
    /// Overlapping loads keep `loading` true until every guard is dropped,
    /// including guards held by futures that were abandoned mid-fetch.
    pub fn begin_load(&self) -> LoadGuard<'_> {
        self.clear_error();
        let in_flight = &self.in_flight;
        self.loading.send_modify(|loading| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            *loading = true;
        });
        LoadGuard {
            loading: &self.loading,
            in_flight,
        }
    }

    pub fn clear_error(&self) {
        self.error.send_if_modified(|e| e.take().is_some());
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.error.send_replace(Some(message.into()));
    }

    pub fn replace(&self, items: Vec<T>) {
        self.data.send_replace(items);
    }

    /// Mutate `data` in place and notify observers.
    pub fn modify(&self, f: impl FnOnce(&mut Vec<T>)) {
        self.data.send_modify(f);
    }
}
