use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Promotion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TourGuide {
    #[serde(rename = "tourGuideID")]
    pub id: i64,
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub fullname: String,
    pub email: Option<String>,
    pub rating: Option<f64>,
    pub languages: Option<String>,
}

/// A scheduled run of a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TourDeparture {
    /// Assigned by the backend on create.
    #[serde(rename = "tourDepartureID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "tourID")]
    pub tour_id: i64,
    #[serde(rename = "tourName", default, skip_serializing_if = "Option::is_none")]
    pub tour_name: Option<String>,
    #[serde(rename = "touristDestination", default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(rename = "dayNum")]
    pub day_num: u32,
    #[serde(rename = "originalPrice")]
    pub original_price: f64,
    #[serde(rename = "departureLocation")]
    pub departure_location: String,
    #[serde(rename = "departureTime")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub departure_time: NaiveDateTime,
    #[serde(rename = "returnTime")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub return_time: NaiveDateTime,
    #[serde(rename = "maxQuantity")]
    pub max_quantity: u32,
    #[serde(rename = "availableSlots", default, skip_serializing_if = "Option::is_none")]
    pub available_slots: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
    #[serde(rename = "tourGuide", default, skip_serializing_if = "Option::is_none")]
    pub tour_guide: Option<TourGuide>,
}

impl TourDeparture {
    /// True only when the backend reported zero remaining slots.
    pub fn is_full(&self) -> bool {
        self.available_slots == Some(0)
    }

    /// Per-person price after the departure's promotion, if any.
    pub fn final_price(&self) -> f64 {
        match &self.promotion {
            Some(promo) => promo.apply(self.original_price),
            None => self.original_price,
        }
    }
}

/// Response of `GET /tour-departures/{id}/check-availability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Availability {
    #[serde(rename = "tourDepartureID")]
    pub departure_id: i64,
    #[serde(rename = "requestedQuantity")]
    pub requested_quantity: u32,
    pub available: bool,
}
