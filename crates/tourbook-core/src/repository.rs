//! Network-first access to the tour catalog.
//!
//! Reads go to the backend first. On success the result is returned at
//! once and the cache is refreshed in a detached task; on failure the
//! error is logged and the cached rows are returned instead, so a caller
//! sees "fewer or older tours", never an error. Writes are not cached and
//! propagate remote failures unchanged.

use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::api::{error::Result as ApiResult, ApiClient};
use crate::cache::{CacheInfo, CacheManager};
use crate::models::{CachedTour, Tour, TourInput};
use crate::store::StoreLocation;
use crate::tasks::DetachedTasks;

/// Remote side of the tour catalog.
#[async_trait]
pub trait TourSource: Send + Sync {
    async fn fetch_tours(&self) -> ApiResult<Vec<Tour>>;
    async fn fetch_tour(&self, id: i64) -> ApiResult<Tour>;
    async fn create_tour(&self, tour: &TourInput) -> ApiResult<serde_json::Value>;
    async fn update_tour(&self, id: i64, tour: &TourInput) -> ApiResult<serde_json::Value>;
    async fn delete_tour(&self, id: i64) -> ApiResult<()>;
}

#[async_trait]
impl TourSource for ApiClient {
    async fn fetch_tours(&self) -> ApiResult<Vec<Tour>> {
        ApiClient::fetch_tours(self).await
    }

    async fn fetch_tour(&self, id: i64) -> ApiResult<Tour> {
        ApiClient::fetch_tour(self, id).await
    }

    async fn create_tour(&self, tour: &TourInput) -> ApiResult<serde_json::Value> {
        ApiClient::create_tour(self, tour).await
    }

    async fn update_tour(&self, id: i64, tour: &TourInput) -> ApiResult<serde_json::Value> {
        ApiClient::update_tour(self, id, tour).await
    }

    async fn delete_tour(&self, id: i64) -> ApiResult<()> {
        ApiClient::delete_tour(self, id).await
    }
}

/// Where a read was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadOrigin {
    Remote,
    Cache,
}

pub struct TourRepository<S> {
    remote: Arc<S>,
    cache: CacheManager,
    tasks: Arc<DetachedTasks>,
}

impl<S> Clone for TourRepository<S> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            cache: self.cache.clone(),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<S: TourSource + 'static> TourRepository<S> {
    pub fn new(remote: S, cache: CacheManager, tasks: Arc<DetachedTasks>) -> Self {
        Self {
            remote: Arc::new(remote),
            cache,
            tasks,
        }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    pub fn tasks(&self) -> &Arc<DetachedTasks> {
        &self.tasks
    }

    // ===== Reads =====

    pub async fn get_all_tours(&self) -> Vec<Tour> {
        self.get_all_tours_with_origin().await.0
    }

    /// Like [`get_all_tours`](Self::get_all_tours), also reporting whether
    /// the backend answered.
    pub async fn get_all_tours_with_origin(&self) -> (Vec<Tour>, ReadOrigin) {
        match self.remote.fetch_tours().await {
            Ok(tours) => {
                debug!(count = tours.len(), "Fetched tours from backend");
                self.schedule_refresh(tours.clone());
                (tours, ReadOrigin::Remote)
            }
            Err(e) => {
                warn!(kind = %e.kind(), error = %e, "Tour fetch failed, serving cached tours");
                let tours = self
                    .cache
                    .read_all()
                    .await
                    .into_iter()
                    .map(Tour::from)
                    .collect();
                (tours, ReadOrigin::Cache)
            }
        }
    }

    /// A single tour. `None` only when the backend is unreachable and the
    /// cache has no such row.
    pub async fn get_tour(&self, id: i64) -> Option<Tour> {
        match self.remote.fetch_tour(id).await {
            Ok(tour) => Some(tour),
            Err(e) => {
                warn!(tour_id = id, kind = %e.kind(), error = %e, "Tour fetch failed, checking cache");
                self.cache.read_by_id(id).await.map(Tour::from)
            }
        }
    }

    /// Case-insensitive search over cached names and destinations.
    pub async fn search_cached(&self, needle: &str) -> Vec<Tour> {
        self.cache
            .search(needle)
            .await
            .into_iter()
            .map(Tour::from)
            .collect()
    }

    pub async fn cache_info(&self) -> CacheInfo {
        self.cache.info().await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    // ===== Writes =====

    pub async fn create_tour(&self, tour: &TourInput) -> ApiResult<serde_json::Value> {
        let created = self.remote.create_tour(tour).await?;
        info!(name = %tour.name, "Tour created");
        Ok(created)
    }

    pub async fn update_tour(&self, id: i64, tour: &TourInput) -> ApiResult<serde_json::Value> {
        let updated = self.remote.update_tour(id, tour).await?;
        info!(tour_id = id, "Tour updated");
        Ok(updated)
    }

    pub async fn delete_tour(&self, id: i64) -> ApiResult<()> {
        self.remote.delete_tour(id).await?;
        info!(tour_id = id, "Tour deleted");
        Ok(())
    }

    /// Replace the cache with `tours` without making the caller wait.
    fn schedule_refresh(&self, tours: Vec<Tour>) {
        if *self.cache.store().location() == StoreLocation::Unavailable {
            debug!("Offline cache unavailable, skipping refresh");
            return;
        }

        let cache = self.cache.clone();
        self.tasks.spawn("tour-cache-refresh", async move {
            let rows: Vec<CachedTour> = tours.iter().map(CachedTour::from).collect();
            // Write failures are already logged by the cache manager
            cache.replace_all(&rows).await;
            Ok::<(), Infallible>(())
        });
    }
}
