//! REST API client module for the tourbook backend.
//!
//! `ApiClient` issues plain JSON requests against the backend base URL.
//! Each resource (tours, tour types, departures, promotions, bookings,
//! users) has its calls in its own module, all as methods on the one
//! client. Every call is attempted exactly once; retrying is left to
//! whoever triggered it.

pub mod bookings;
pub mod client;
pub mod departures;
pub mod error;
pub mod promotions;
pub mod tours;
pub mod users;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
