//! Core library for tourbook.
//!
//! Provides the pieces a tourbook front-end is built from:
//!
//! - `api`: REST client and one typed service per backend resource
//! - `store`: the on-device SQLite adapter holding the `tours` table
//! - `cache`: the `CacheManager` that owns the cached tour rows
//! - `repository`: network-first reads that fall back to the cache
//! - `auth`: the session context (current user, remember-me state)
//! - `config`: application configuration and data locations
//! - `tasks`: supervision of detached background work
//! - `notify`: the `(message, severity)` sink front-ends implement

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod repository;
pub mod store;
pub mod tasks;
pub mod utils;

pub use api::{ApiClient, ApiError};
pub use auth::Session;
pub use cache::{CacheInfo, CacheManager};
pub use config::Config;
pub use error::ErrorKind;
pub use notify::{Notifier, Severity};
pub use repository::{ReadOrigin, TourRepository, TourSource};
pub use store::{LocalStore, StoreLocation};
pub use tasks::DetachedTasks;
