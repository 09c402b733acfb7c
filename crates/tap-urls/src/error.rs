/// Errors from URL minting and revocation.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    /// The platform refused to revoke a URL.
    #[error("failed to revoke {url}: {reason}")]
    Revocation { url: String, reason: String },

    /// Internal state lock was poisoned by a panicking thread.
    #[error("url registry lock poisoned: {0}")]
    Poisoned(String),
}

/// Result alias for URL operations.
pub type UrlResult<T> = Result<T, UrlError>;
