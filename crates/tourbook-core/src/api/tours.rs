//! Tour and tour-type endpoints.

use super::client::ApiClient;
use super::error::Result;
use crate::models::{Tour, TourInput, TourType};

impl ApiClient {
    // ===== Tours =====

    /// Fetch the whole catalog (`GET /tours`)
    pub async fn fetch_tours(&self) -> Result<Vec<Tour>> {
        self.get("tours").await
    }

    pub async fn fetch_tour(&self, id: i64) -> Result<Tour> {
        self.get(&format!("tours/{}", id)).await
    }

    pub async fn fetch_tours_by_type(&self, tour_type_id: i64) -> Result<Vec<Tour>> {
        self.get(&format!("tours/type/{}", tour_type_id)).await
    }

    /// Server-side keyword search over name and description
    pub async fn search_tours(&self, keyword: &str) -> Result<Vec<Tour>> {
        self.get_query("tours/search", &[("q", keyword)]).await
    }

    pub async fn search_tours_by_destination(&self, keyword: &str) -> Result<Vec<Tour>> {
        self.get_query("tours/search/destination", &[("q", keyword)]).await
    }

    pub async fn create_tour(&self, tour: &TourInput) -> Result<serde_json::Value> {
        self.post("tours", tour).await
    }

    pub async fn update_tour(&self, id: i64, tour: &TourInput) -> Result<serde_json::Value> {
        self.put(&format!("tours/{}", id), tour).await
    }

    pub async fn delete_tour(&self, id: i64) -> Result<()> {
        self.delete(&format!("tours/{}", id)).await
    }

    // ===== Tour Types =====

    pub async fn fetch_tour_types(&self) -> Result<Vec<TourType>> {
        self.get("tour-types").await
    }

    pub async fn fetch_tour_type(&self, id: i64) -> Result<TourType> {
        self.get(&format!("tour-types/{}", id)).await
    }

    pub async fn create_tour_type(&self, tour_type: &TourType) -> Result<TourType> {
        self.post("tour-types", tour_type).await
    }

    pub async fn update_tour_type(&self, id: i64, tour_type: &TourType) -> Result<TourType> {
        self.put(&format!("tour-types/{}", id), tour_type).await
    }

    pub async fn delete_tour_type(&self, id: i64) -> Result<()> {
        self.delete(&format!("tour-types/{}", id)).await
    }
}
