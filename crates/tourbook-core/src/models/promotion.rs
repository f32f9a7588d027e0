use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Where a promotion sits relative to a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum PromotionStatus {
    Upcoming,
    Active,
    Expired,
}

impl std::fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromotionStatus::Upcoming => write!(f, "Upcoming"),
            PromotionStatus::Active => write!(f, "Active"),
            PromotionStatus::Expired => write!(f, "Expired"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Promotion {
    /// Assigned by the backend on create.
    #[serde(rename = "promotionID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "promotionName")]
    pub name: String,
    /// Discount in percent, 1-100.
    pub percent: f64,
    #[serde(rename = "startDate")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub end_date: NaiveDate,
}

impl Promotion {
    /// Status on `day`; both window ends are inclusive.
    pub fn status_on(&self, day: NaiveDate) -> PromotionStatus {
        if day < self.start_date {
            PromotionStatus::Upcoming
        } else if day > self.end_date {
            PromotionStatus::Expired
        } else {
            PromotionStatus::Active
        }
    }

    pub fn status(&self) -> PromotionStatus {
        self.status_on(Utc::now().date_naive())
    }

    pub fn is_active(&self) -> bool {
        self.status() == PromotionStatus::Active
    }

    /// Apply the discount to `price`.
    pub fn apply(&self, price: f64) -> f64 {
        price * (1.0 - self.percent / 100.0)
    }
}

/// Counts returned by `GET /promotions/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct PromotionStats {
    pub total: u32,
    pub active: u32,
    pub expired: u32,
    pub upcoming: u32,
}
