//! Data models for tourbook entities.
//!
//! This module contains the data structures exchanged with the REST
//! backend, plus the one shape persisted on the device:
//!
//! - `Tour`, `TourType`, `CachedTour`: catalog entries and their cached rows
//! - `TourDeparture`, `TourGuide`, `Availability`: scheduled departures
//! - `Promotion`, `PromotionStats`: discounts and their date windows
//! - `Booking`, `BookingRequest`: the booking workflow
//! - `User`, `Role`, auth request/response types

pub mod booking;
pub mod departure;
pub mod promotion;
pub mod tour;
pub mod user;

pub use booking::{AvailableSlots, Booking, BookingReceipt, BookingRequest};
pub use departure::{Availability, TourDeparture, TourGuide};
pub use promotion::{Promotion, PromotionStats, PromotionStatus};
pub use tour::{CachedTour, PromotionRef, Tour, TourInput, TourRef, TourType};
pub use user::{ApiResponse, LoginRequest, OtpVerifyRequest, RegisterRequest, Role, User};
