use thiserror::Error;

/// Errors surfaced by cache backends.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache value could not be encoded: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("cache backend unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;
