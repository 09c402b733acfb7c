use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

use crate::error::{UrlError, UrlResult};
use crate::traits::UrlRevoker;

/// Bytes pinned behind an ephemeral URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectBlob {
    pub data: Bytes,
    pub mime_type: String,
}

/// In-memory ephemeral URL registry.
///
/// Mints `blob:<origin>/<uuid>` handles for captured bytes and releases them
/// on [`revoke`](UrlRevoker::revoke). Holds everything behind a `RwLock`, so
/// a single registry can be shared between the capture side and the
/// tracker.
pub struct ObjectUrlRegistry {
    origin: String,
    blobs: RwLock<HashMap<String, ObjectBlob>>,
}

impl ObjectUrlRegistry {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            blobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Pin `data` and return a fresh URL for it.
    pub fn create(&self, data: impl Into<Bytes>, mime_type: &str) -> UrlResult<String> {
        let url = format!("blob:{}/{}", self.origin, Uuid::now_v7());
        let blob = ObjectBlob {
            data: data.into(),
            mime_type: mime_type.to_string(),
        };
        let size = blob.data.len();
        self.blobs
            .write()
            .map_err(|e| UrlError::Poisoned(e.to_string()))?
            .insert(url.clone(), blob);
        debug!(%url, size, "object url created");
        Ok(url)
    }

    /// The bytes behind `url`, if it is still live.
    pub fn resolve(&self, url: &str) -> UrlResult<Option<ObjectBlob>> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| UrlError::Poisoned(e.to_string()))?;
        Ok(blobs.get(url).cloned())
    }

    /// Number of URLs that have been created and not yet revoked.
    pub fn live_count(&self) -> UrlResult<usize> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| UrlError::Poisoned(e.to_string()))?;
        Ok(blobs.len())
    }

    /// Total bytes pinned by live URLs.
    pub fn live_bytes(&self) -> UrlResult<usize> {
        let blobs = self
            .blobs
            .read()
            .map_err(|e| UrlError::Poisoned(e.to_string()))?;
        Ok(blobs.values().map(|blob| blob.data.len()).sum())
    }
}

impl UrlRevoker for ObjectUrlRegistry {
    fn revoke(&self, url: &str) -> UrlResult<()> {
        let removed = self
            .blobs
            .write()
            .map_err(|e| UrlError::Poisoned(e.to_string()))?
            .remove(url);
        if removed.is_some() {
            debug!(%url, "object url revoked");
        }
        Ok(())
    }
}

impl std::fmt::Debug for ObjectUrlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectUrlRegistry")
            .field("origin", &self.origin)
            .field("live_count", &self.live_count().ok())
            .finish()
    }
}
