use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::UrlResult;
use crate::traits::UrlRevoker;

/// Scheme prefix that marks a URL as ephemeral unless configured otherwise.
pub const DEFAULT_EPHEMERAL_SCHEME: &str = "blob:";

/// One item of the list handed to [`UrlTracker::track_urls`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UrlEntry<'a> {
    /// Stable id of the owning item.
    pub key: &'a str,
    pub image_url: Option<&'a str>,
}

impl<'a> UrlEntry<'a> {
    pub fn new(key: &'a str, image_url: Option<&'a str>) -> Self {
        Self { key, image_url }
    }
}

impl<'a> From<(&'a str, &'a str)> for UrlEntry<'a> {
    fn from((key, url): (&'a str, &'a str)) -> Self {
        Self::new(key, Some(url))
    }
}

/// Ties ephemeral URLs to the items that display them.
///
/// Every call to [`track_urls`](Self::track_urls) describes the complete
/// current item list. URLs whose owning key is gone are revoked; new
/// ephemeral URLs are adopted; anything already tracked is left alone.
/// Dropping the tracker revokes everything it still holds.
///
/// The tracker has a single owner (`&mut self`) and does no locking.
pub struct UrlTracker {
    revoker: Arc<dyn UrlRevoker>,
    scheme: String,
    by_key: HashMap<String, String>,
    by_url: HashMap<String, String>,
}

impl UrlTracker {
    pub fn new(revoker: Arc<dyn UrlRevoker>) -> Self {
        Self::with_scheme(revoker, DEFAULT_EPHEMERAL_SCHEME)
    }

    pub fn with_scheme(revoker: Arc<dyn UrlRevoker>, scheme: impl Into<String>) -> Self {
        Self {
            revoker,
            scheme: scheme.into(),
            by_key: HashMap::new(),
            by_url: HashMap::new(),
        }
    }

    /// Whether `url` carries the ephemeral scheme prefix.
    pub fn is_ephemeral(&self, url: &str) -> bool {
        url.starts_with(&self.scheme)
    }

    /// Reconcile tracked URLs against the current item list.
    ///
    /// 1. Every tracked key that is missing from `items`, or whose item now
    ///    carries a different URL, gives up its URL. The URL is revoked
    ///    unless another item in `items` still references it, in which case
    ///    ownership passes to that item below.
    /// 2. Every item with an ephemeral URL whose key is not tracked is
    ///    registered. The first occurrence of a key wins; a URL already owned
    ///    by another key is not registered twice.
    ///
    /// A tracked key whose URL is unchanged is left alone. A revocation error
    /// aborts the call and is returned as-is. The entry whose revocation
    /// failed stays tracked, so the next call retries it.
    pub fn track_urls<'a, I, E>(&mut self, items: I) -> UrlResult<()>
    where
        I: IntoIterator<Item = E>,
        E: Into<UrlEntry<'a>>,
    {
        let mut current: HashMap<&'a str, Option<&'a str>> = HashMap::new();
        let mut wanted: Vec<(&'a str, &'a str)> = Vec::new();
        for entry in items {
            let entry: UrlEntry<'a> = entry.into();
            if current.contains_key(entry.key) {
                continue;
            }
            current.insert(entry.key, entry.image_url);
            if let Some(url) = entry.image_url.filter(|u| self.is_ephemeral(u)) {
                wanted.push((entry.key, url));
            }
        }
        let referenced: HashSet<&str> = wanted.iter().map(|(_, url)| *url).collect();

        let mut stale: Vec<String> = self
            .by_key
            .iter()
            .filter(|(key, url)| current.get(key.as_str()).copied().flatten() != Some(url.as_str()))
            .map(|(key, _)| key.clone())
            .collect();
        stale.sort();
        for key in stale {
            let handed_over = self
                .by_key
                .get(&key)
                .is_some_and(|url| referenced.contains(url.as_str()));
            if handed_over {
                self.forget(&key);
            } else {
                self.release(&key)?;
            }
        }

        for (key, url) in wanted {
            if self.by_key.contains_key(key) {
                continue;
            }
            if let Some(owner) = self.by_url.get(url) {
                debug!(%url, %key, %owner, "url already tracked under another key");
                continue;
            }
            self.by_key.insert(key.to_string(), url.to_string());
            self.by_url.insert(url.to_string(), key.to_string());
            debug!(%key, %url, "tracking url");
        }
        Ok(())
    }

    /// Revoke every tracked URL and forget all state.
    ///
    /// Calling this on an empty tracker does nothing.
    pub fn cleanup(&mut self) -> UrlResult<()> {
        let mut keys: Vec<String> = self.by_key.keys().cloned().collect();
        keys.sort();
        for key in keys {
            self.release(&key)?;
        }
        self.by_url.clear();
        Ok(())
    }

    /// Number of live tracked URLs.
    pub fn tracked_count(&self) -> usize {
        self.by_key.len()
    }

    pub fn url_for(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub fn owner_of(&self, url: &str) -> Option<&str> {
        self.by_url.get(url).map(String::as_str)
    }

    fn release(&mut self, key: &str) -> UrlResult<()> {
        let Some(url) = self.by_key.get(key).cloned() else {
            return Ok(());
        };
        self.revoker.revoke(&url)?;
        self.forget(key);
        debug!(%key, %url, "revoked url");
        Ok(())
    }

    /// Drop both mappings for `key` without revoking its URL.
    fn forget(&mut self, key: &str) {
        if let Some(url) = self.by_key.remove(key) {
            self.by_url.remove(&url);
        }
    }
}

impl Drop for UrlTracker {
    fn drop(&mut self) {
        if self.by_key.is_empty() {
            return;
        }
        if let Err(e) = self.cleanup() {
            warn!(remaining = self.by_key.len(), error = %e, "url cleanup failed on drop");
        }
    }
}

impl std::fmt::Debug for UrlTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlTracker")
            .field("scheme", &self.scheme)
            .field("tracked_count", &self.tracked_count())
            .finish()
    }
}
