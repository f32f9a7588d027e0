use thiserror::Error;

use crate::error::ErrorKind;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Offline cache unavailable on this platform")]
    StorageUnavailable,

    #[error("Offline cache I/O failed: {0}")]
    StorageIo(StoreError),

    #[error("Cached {written} of {total} tours; {failed} rows failed")]
    PartialWrite {
        written: usize,
        failed: usize,
        total: usize,
    },
}

impl CacheError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CacheError::StorageUnavailable => ErrorKind::StorageUnavailable,
            CacheError::StorageIo(_) => ErrorKind::StorageIo,
            CacheError::PartialWrite { .. } => ErrorKind::PartialCacheWrite,
        }
    }
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        if err.is_unavailable() {
            CacheError::StorageUnavailable
        } else {
            CacheError::StorageIo(err)
        }
    }
}
