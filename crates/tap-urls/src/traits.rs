use crate::error::UrlResult;

/// The platform primitive that releases an ephemeral URL.
///
/// In a browser this is `URL.revokeObjectURL`; natively it is whatever owns
/// the bytes behind the handle (see [`ObjectUrlRegistry`](crate::ObjectUrlRegistry)).
///
/// Revoking a URL that is unknown or already revoked must succeed. Any error
/// returned is surfaced unchanged by [`UrlTracker`](crate::UrlTracker).
pub trait UrlRevoker: Send + Sync {
    fn revoke(&self, url: &str) -> UrlResult<()>;
}
