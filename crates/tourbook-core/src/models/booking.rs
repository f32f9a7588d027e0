use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Body of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct BookingRequest {
    #[serde(rename = "userID", alias = "idKhachHang")]
    pub user_id: i64,
    #[serde(rename = "tourDepartureID")]
    pub departure_id: i64,
    #[serde(alias = "soLuong")]
    pub quantity: u32,
    #[serde(rename = "promotionID")]
    pub promotion_id: Option<i64>,
}

impl BookingRequest {
    pub fn new(user_id: i64, departure_id: i64, quantity: u32) -> Self {
        Self {
            user_id,
            departure_id,
            quantity,
            promotion_id: None,
        }
    }
}

/// Response of `POST /bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct BookingReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(rename = "bookingID", default)]
    pub booking_id: Option<i64>,
}

/// A booking as listed by `GET /bookings/user/{id}`.
///
/// Older payloads used different field names; they are accepted as aliases
/// so there is a single booking shape on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Booking {
    #[serde(rename = "bookingID", alias = "idDangKy")]
    pub id: i64,
    #[serde(rename = "userID", alias = "idKhachHang", default)]
    pub user_id: Option<i64>,
    #[serde(rename = "userFullname", alias = "tenKhachHang", default)]
    pub user_fullname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "tourDepartureID", default)]
    pub departure_id: Option<i64>,
    #[serde(rename = "tourName", alias = "tenTour", default)]
    pub tour_name: Option<String>,
    #[serde(alias = "soLuong", default)]
    pub quantity: u32,
    #[serde(rename = "originalPrice", alias = "giaTourGoc", default)]
    pub original_price: Option<f64>,
    #[serde(rename = "discountAmount", default)]
    pub discount_amount: Option<f64>,
    #[serde(rename = "totalPayment", alias = "tongGia", default)]
    pub total_payment: Option<f64>,
    #[serde(rename = "paymentStatus", alias = "trangThai", default)]
    pub payment_status: Option<String>,
    #[serde(rename = "bookingDate", alias = "dateCreated", default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub booking_date: Option<NaiveDateTime>,
    #[serde(rename = "departureTime", default)]
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub departure_time: Option<NaiveDateTime>,
    #[serde(rename = "guideFullname", default)]
    pub guide_fullname: Option<String>,
    #[serde(rename = "guideRating", default)]
    pub guide_rating: Option<f64>,
    #[serde(rename = "guideLanguages", default)]
    pub guide_languages: Option<String>,
}

impl Booking {
    pub fn is_cancelled(&self) -> bool {
        self.payment_status
            .as_deref()
            .map(|s| s.eq_ignore_ascii_case("cancelled") || s.eq_ignore_ascii_case("canceled"))
            .unwrap_or(false)
    }
}

/// Response of `GET /bookings/departure/{id}/available-slots`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AvailableSlots {
    #[serde(rename = "tourDepartureID")]
    pub departure_id: i64,
    #[serde(rename = "availableSlots")]
    pub available_slots: u32,
}
