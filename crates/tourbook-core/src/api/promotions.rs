//! Promotion endpoints.

use super::client::ApiClient;
use super::error::Result;
use crate::models::{Promotion, PromotionStats};

impl ApiClient {
    pub async fn fetch_promotions(&self) -> Result<Vec<Promotion>> {
        self.get("promotions").await
    }

    pub async fn fetch_promotion(&self, id: i64) -> Result<Promotion> {
        self.get(&format!("promotions/{}", id)).await
    }

    /// Promotions whose date window contains today, as judged by the backend
    pub async fn fetch_active_promotions(&self) -> Result<Vec<Promotion>> {
        self.get("promotions/active").await
    }

    pub async fn fetch_promotion_stats(&self) -> Result<PromotionStats> {
        self.get("promotions/stats").await
    }

    pub async fn create_promotion(&self, promotion: &Promotion) -> Result<Promotion> {
        self.post("promotions", promotion).await
    }

    pub async fn update_promotion(&self, id: i64, promotion: &Promotion) -> Result<Promotion> {
        self.put(&format!("promotions/{}", id), promotion).await
    }

    pub async fn delete_promotion(&self, id: i64) -> Result<()> {
        self.delete(&format!("promotions/{}", id)).await
    }
}
