//! Booking endpoints.

use super::client::ApiClient;
use super::error::Result;
use crate::models::{AvailableSlots, Booking, BookingReceipt, BookingRequest};

impl ApiClient {
    pub async fn create_booking(&self, request: &BookingRequest) -> Result<BookingReceipt> {
        self.post("bookings", request).await
    }

    pub async fn fetch_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>> {
        self.get(&format!("bookings/user/{}", user_id)).await
    }

    pub async fn fetch_active_user_bookings(&self, user_id: i64) -> Result<Vec<Booking>> {
        self.get(&format!("bookings/user/{}/active", user_id)).await
    }

    pub async fn fetch_booking(&self, booking_id: i64) -> Result<Booking> {
        self.get(&format!("bookings/{}", booking_id)).await
    }

    pub async fn cancel_booking(&self, booking_id: i64) -> Result<BookingReceipt> {
        self.put(&format!("bookings/{}/cancel", booking_id), &serde_json::json!({}))
            .await
    }

    pub async fn fetch_available_slots(&self, departure_id: i64) -> Result<AvailableSlots> {
        self.get(&format!("bookings/departure/{}/available-slots", departure_id))
            .await
    }
}
