use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[error("store is closed")]
    Closed,
    #[error("store backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid construction parameters.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A posting whose value does not decode to a document id.
    #[error("corrupt index entry at key {key:?}")]
    Corrupt { key: Vec<u8> },
    #[error("index task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
