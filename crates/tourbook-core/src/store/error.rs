use thiserror::Error;

use crate::error::ErrorKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Persistent storage is not available on this platform")]
    Unavailable,

    #[error("Storage operation failed: {0}")]
    Io(#[from] rusqlite::Error),

    #[error("Failed to prepare storage location: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Storage worker failed: {0}")]
    Worker(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Unavailable => ErrorKind::StorageUnavailable,
            StoreError::Io(_) | StoreError::Filesystem(_) | StoreError::Worker(_) => {
                ErrorKind::StorageIo
            }
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable)
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
