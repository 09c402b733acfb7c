use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("unknown pub: {0}")]
    UnknownPub(String),

    #[error("check-in rejected: {0}")]
    CheckInRejected(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("seed error: {0}")]
    Seed(String),

    #[error("store error: {0}")]
    Store(#[from] tap_store::CrudError),

    #[error("url error: {0}")]
    Url(#[from] tap_urls::UrlError),

    #[error("invalid data: {0}")]
    Types(#[from] tap_types::TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SdkResult<T> = Result<T, SdkError>;
