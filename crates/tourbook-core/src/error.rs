//! Failure kinds shared across the cache and remote layers.

use std::fmt;

/// The four ways the offline tour path can fail.
///
/// Concrete error enums (`StoreError`, `CacheError`, `ApiError`) each map
/// onto one of these so logs and callers can reason about them uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No persistent store exists on this platform.
    StorageUnavailable,
    /// A single store operation failed.
    StorageIo,
    /// A bulk replace finished with some rows not written.
    PartialCacheWrite,
    /// The network call did not succeed.
    RemoteUnavailable,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::StorageUnavailable => write!(f, "StorageUnavailable"),
            ErrorKind::StorageIo => write!(f, "StorageIOError"),
            ErrorKind::PartialCacheWrite => write!(f, "PartialCacheWrite"),
            ErrorKind::RemoteUnavailable => write!(f, "RemoteUnavailable"),
        }
    }
}
