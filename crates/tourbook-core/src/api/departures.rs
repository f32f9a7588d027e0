//! Tour departure and tour guide endpoints.

use super::client::ApiClient;
use super::error::Result;
use crate::models::{Availability, TourDeparture, TourGuide};

impl ApiClient {
    // ===== Departures =====

    pub async fn fetch_departures(&self) -> Result<Vec<TourDeparture>> {
        self.get("tour-departures").await
    }

    pub async fn fetch_upcoming_departures(&self) -> Result<Vec<TourDeparture>> {
        self.get("tour-departures/upcoming").await
    }

    pub async fn fetch_departures_for_tour(&self, tour_id: i64) -> Result<Vec<TourDeparture>> {
        self.get(&format!("tour-departures/tour/{}", tour_id)).await
    }

    pub async fn fetch_upcoming_departures_for_tour(&self, tour_id: i64) -> Result<Vec<TourDeparture>> {
        self.get(&format!("tour-departures/tour/{}/upcoming", tour_id)).await
    }

    pub async fn fetch_departure(&self, departure_id: i64) -> Result<TourDeparture> {
        self.get(&format!("tour-departures/{}", departure_id)).await
    }

    /// Ask the backend whether `quantity` seats can still be booked
    pub async fn check_departure_availability(
        &self,
        departure_id: i64,
        quantity: u32,
    ) -> Result<Availability> {
        self.get_query(
            &format!("tour-departures/{}/check-availability", departure_id),
            &[("quantity", quantity)],
        )
        .await
    }

    pub async fn create_departure(&self, departure: &TourDeparture) -> Result<serde_json::Value> {
        self.post("tour-departures", departure).await
    }

    pub async fn update_departure(
        &self,
        departure_id: i64,
        departure: &TourDeparture,
    ) -> Result<serde_json::Value> {
        self.put(&format!("tour-departures/{}", departure_id), departure).await
    }

    pub async fn delete_departure(&self, departure_id: i64) -> Result<()> {
        self.delete(&format!("tour-departures/{}", departure_id)).await
    }

    pub async fn assign_guide(&self, departure_id: i64, guide_id: i64) -> Result<serde_json::Value> {
        self.put(
            &format!("tour-departures/{}/assign-guide/{}", departure_id, guide_id),
            &serde_json::json!({}),
        )
        .await
    }

    pub async fn unassign_guide(&self, departure_id: i64) -> Result<()> {
        self.delete(&format!("tour-departures/{}/unassign-guide", departure_id))
            .await
    }

    // ===== Tour Guides =====

    pub async fn fetch_tour_guides(&self) -> Result<Vec<TourGuide>> {
        self.get("tour-guides").await
    }

    pub async fn fetch_available_guides_for_departure(&self, departure_id: i64) -> Result<Vec<TourGuide>> {
        self.get(&format!("tour-guides/available/{}", departure_id)).await
    }
}
