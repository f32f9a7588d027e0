//! Offline tour cache.
//!
//! This module provides the `CacheManager`, the sole owner of the
//! on-device `tours` table. It replaces the cached catalog wholesale after
//! every successful remote fetch and serves reads when the network is
//! unavailable.
//!
//! The cache is best-effort: no operation here returns an error. Storage
//! that is missing or failing degrades to empty results, and the failure
//! is logged instead.

pub mod error;
pub mod manager;

pub use error::CacheError;
pub use manager::{CacheInfo, CacheManager, WriteReport};
