//! On-device relational store for the offline tour cache.
//!
//! `LocalStore` wraps a single SQLite database file holding one table,
//! `tours`. All operations are async; the blocking SQLite calls run on
//! tokio's blocking pool behind a shared connection.
//!
//! When the platform offers no persistent location the store reports
//! `StoreError::Unavailable` and the cache layer above degrades to
//! empty results.

pub mod error;
pub mod sqlite;

pub use error::StoreError;
pub use sqlite::{LocalStore, StoreLocation, DB_FILE};
