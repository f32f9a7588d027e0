//! Tour catalog models.
//!
//! `Tour` is the shape the backend returns; `CachedTour` is the row kept
//! in the on-device `tours` table. Serde names follow the backend's JSON
//! field names, with legacy names accepted as aliases.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Promotion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TourType {
    #[serde(rename = "tourTypeID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "tourTypeName", default, deserialize_with = "deserialize_null_as_empty")]
    pub name: String,
}

/// A catalog tour as returned by `GET /tours` and `GET /tours/{id}`.
///
/// Unknown fields are ignored; missing optional fields default to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Tour {
    #[serde(rename = "tourID", alias = "idTour")]
    pub id: i64,
    #[serde(
        rename = "tourName",
        alias = "tenTour",
        default,
        deserialize_with = "deserialize_null_as_empty"
    )]
    pub name: String,
    #[serde(alias = "moTa", default)]
    pub description: Option<String>,
    /// Lowest departure price, when the backend computed one.
    #[serde(rename = "originalPrice", alias = "price", alias = "giaTourGoc", default)]
    pub price: Option<f64>,
    #[serde(rename = "touristDestination", alias = "diaDiem", default)]
    pub destination: Option<String>,
    #[serde(rename = "tourType", default, skip_serializing_if = "Option::is_none")]
    pub tour_type: Option<TourType>,
    #[serde(rename = "tourTypeID", default, skip_serializing_if = "Option::is_none")]
    pub tour_type_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Promotion>,
    #[serde(rename = "promotionID", default, skip_serializing_if = "Option::is_none")]
    pub promotion_id: Option<i64>,
    #[serde(rename = "totalBookings", default)]
    pub total_bookings: Option<i64>,
}

impl Tour {
    /// Tour type id, whether sent flat or nested.
    pub fn category_id(&self) -> Option<i64> {
        self.tour_type_id
            .or_else(|| self.tour_type.as_ref().and_then(|t| t.id))
    }

    /// Promotion id, whether sent flat or nested.
    pub fn applied_promotion_id(&self) -> Option<i64> {
        self.promotion_id
            .or_else(|| self.promotion.as_ref().and_then(|p| p.id))
    }

    /// Price after the attached promotion's discount, if both are known.
    pub fn discounted_price(&self) -> Option<f64> {
        let price = self.price?;
        match &self.promotion {
            Some(promo) => Some(promo.apply(price)),
            None => Some(price),
        }
    }
}

/// A row of the on-device `tours` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct CachedTour {
    #[serde(rename = "tourID")]
    pub id: i64,
    #[serde(rename = "tourName")]
    pub name: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[serde(rename = "touristDestination")]
    pub destination: Option<String>,
    #[serde(rename = "tourTypeID")]
    pub category_id: Option<i64>,
    #[serde(rename = "promotionID")]
    pub promotion_id: Option<i64>,
    /// Set by the store on insert; `None` for rows not yet persisted.
    #[cfg_attr(feature = "ts", ts(type = "string | null"))]
    pub cached_at: Option<DateTime<Utc>>,
}

impl CachedTour {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            price: None,
            destination: None,
            category_id: None,
            promotion_id: None,
            cached_at: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

impl From<&Tour> for CachedTour {
    fn from(tour: &Tour) -> Self {
        Self {
            id: tour.id,
            name: tour.name.clone(),
            description: tour.description.clone(),
            price: tour.price,
            destination: tour.destination.clone(),
            category_id: tour.category_id(),
            promotion_id: tour.applied_promotion_id(),
            cached_at: None,
        }
    }
}

impl From<CachedTour> for Tour {
    fn from(row: CachedTour) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            destination: row.destination,
            tour_type: None,
            tour_type_id: row.category_id,
            promotion: None,
            promotion_id: row.promotion_id,
            total_bookings: None,
        }
    }
}

/// Reference to a tour type by id, as the backend expects on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TourRef {
    #[serde(rename = "tourTypeID")]
    pub id: i64,
}

/// Reference to a promotion by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct PromotionRef {
    #[serde(rename = "promotionID")]
    pub id: i64,
}

/// Body of `POST /tours` and `PUT /tours/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TourInput {
    #[serde(rename = "tourName")]
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "touristDestination")]
    pub destination: String,
    #[serde(rename = "tourType", skip_serializing_if = "Option::is_none")]
    pub tour_type: Option<TourRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionRef>,
}

// Helper to deserialize a nullable text column as an empty string
fn deserialize_null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
