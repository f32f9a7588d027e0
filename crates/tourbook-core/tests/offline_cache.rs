//! End-to-end behavior of the offline tour cache: store, cache manager
//! and the network-first repository wired together over a temp directory.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tempfile::TempDir;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

use tourbook_core::api::error::Result as ApiResult;
use tourbook_core::models::{CachedTour, Tour, TourInput};
use tourbook_core::{
    ApiError, CacheManager, DetachedTasks, ErrorKind, LocalStore, ReadOrigin, StoreLocation,
    TourRepository, TourSource,
};

// ============================================================================
// Fixtures
// ============================================================================

/// Backend stand-in. `None` means every call fails as if unreachable.
#[derive(Clone, Default)]
struct FakeBackend {
    tours: Arc<Mutex<Option<Vec<Tour>>>>,
    create_calls: Arc<Mutex<usize>>,
}

impl FakeBackend {
    fn online(tours: Vec<Tour>) -> Self {
        let backend = Self::default();
        *backend.tours.lock().unwrap() = Some(tours);
        backend
    }

    fn offline() -> Self {
        Self::default()
    }

    fn go_offline(&self) {
        *self.tours.lock().unwrap() = None;
    }

    fn down() -> ApiError {
        ApiError::ServerError("503 Service Unavailable".to_string())
    }
}

#[async_trait]
impl TourSource for FakeBackend {
    async fn fetch_tours(&self) -> ApiResult<Vec<Tour>> {
        self.tours.lock().unwrap().clone().ok_or_else(Self::down)
    }

    async fn fetch_tour(&self, id: i64) -> ApiResult<Tour> {
        let tours = self.tours.lock().unwrap().clone().ok_or_else(Self::down)?;
        tours
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("tour {}", id)))
    }

    async fn create_tour(&self, _tour: &TourInput) -> ApiResult<serde_json::Value> {
        *self.create_calls.lock().unwrap() += 1;
        Err(ApiError::BadRequest("Tour name already exists".to_string()))
    }

    async fn update_tour(&self, _id: i64, _tour: &TourInput) -> ApiResult<serde_json::Value> {
        Err(Self::down())
    }

    async fn delete_tour(&self, _id: i64) -> ApiResult<()> {
        Err(Self::down())
    }
}

fn tour(id: i64, name: &str, destination: &str) -> Tour {
    serde_json::from_value(json!({
        "tourID": id,
        "tourName": name,
        "touristDestination": destination,
        "originalPrice": 1_990_000.0,
        "tourType": { "tourTypeID": 2, "tourTypeName": "Adventure" },
        "departures": [],
        "reviews": 12
    }))
    .unwrap()
}

/// Collects the level of every event emitted on the current thread.
#[derive(Clone, Default)]
struct LevelRecorder(Arc<Mutex<Vec<Level>>>);

impl LevelRecorder {
    fn loud_events(&self) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|level| **level == Level::WARN || **level == Level::ERROR)
            .count()
    }

    fn errors(&self) -> usize {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|level| **level == Level::ERROR)
            .count()
    }
}

impl<S: Subscriber> Layer<S> for LevelRecorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.0.lock().unwrap().push(*event.metadata().level());
    }
}

fn temp_store(dir: &TempDir) -> LocalStore {
    LocalStore::new(StoreLocation::in_dir(Some(dir.path().to_path_buf())))
}

fn repository(dir: &TempDir, backend: FakeBackend) -> TourRepository<FakeBackend> {
    TourRepository::new(
        backend,
        CacheManager::new(temp_store(dir)),
        DetachedTasks::new(),
    )
}

// ============================================================================
// Local store
// ============================================================================

#[tokio::test]
async fn open_twice_is_harmless() {
    let dir = TempDir::new().unwrap();
    let store = temp_store(&dir);
    store.open().await.unwrap();
    store.open().await.unwrap();

    let objects = store
        .query(
            "SELECT name FROM sqlite_master WHERE tbl_name = 'tours' AND name NOT LIKE 'sqlite_%' ORDER BY name",
            vec![],
            |row| row.get::<_, String>(0),
        )
        .await
        .unwrap();
    assert_eq!(objects, vec!["idx_cached_at", "idx_tour_name", "tours"]);
}

// ============================================================================
// Cache manager
// ============================================================================

#[tokio::test]
async fn replace_all_replaces_fully() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));

    cache
        .replace_all(&[CachedTour::new(1, "A"), CachedTour::new(2, "B")])
        .await;
    cache.replace_all(&[CachedTour::new(3, "C")]).await;

    let rows = cache.read_all().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, 3);
    assert_eq!(rows[0].name, "C");
}

#[tokio::test]
async fn empty_replace_clears() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));

    cache.replace_all(&[CachedTour::new(1, "A")]).await;
    cache.replace_all(&[]).await;
    assert!(cache.read_all().await.is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));
    cache
        .replace_all(&[
            CachedTour::new(1, "Đà Lạt Discovery"),
            CachedTour::new(2, "Phú Quốc Getaway"),
        ])
        .await;

    for needle in ["lạt", "LẠT", "Lạt"] {
        let hits = cache.search(needle).await;
        assert_eq!(hits.len(), 1, "needle {:?}", needle);
        assert_eq!(hits[0].name, "Đà Lạt Discovery");
    }

    let all = cache.search("").await;
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn read_by_id_absent_is_none() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));
    cache.replace_all(&[CachedTour::new(1, "A")]).await;

    assert!(cache.read_by_id(999).await.is_none());
}

#[tokio::test]
async fn info_reflects_state() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));

    let start = Utc::now();
    cache
        .replace_all(&[
            CachedTour::new(1, "A"),
            CachedTour::new(2, "B"),
            CachedTour::new(3, "C"),
        ])
        .await;

    let info = cache.info().await;
    assert_eq!(info.count, 3);
    assert!(info.last_update.unwrap() >= start);

    cache.clear().await;
    let info = cache.info().await;
    assert_eq!(info.count, 0);
    assert_eq!(info.last_update, None);
}

#[tokio::test]
async fn failed_rows_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let cache = CacheManager::new(temp_store(&dir));

    let report = cache
        .replace_all(&[
            CachedTour::new(10, "Mekong Delta"),
            CachedTour::new(10, "Mekong Delta (dup)"),
            CachedTour::new(11, "Sapa Trek"),
        ])
        .await;

    assert_eq!(report.error, Some(ErrorKind::PartialCacheWrite));
    assert_eq!((report.written, report.failed), (2, 1));
    assert_eq!(cache.info().await.count, 2);
}

#[tokio::test]
async fn unavailable_storage_degrades_to_empty() {
    let cache = CacheManager::new(LocalStore::new(StoreLocation::Unavailable));

    let report = cache.replace_all(&[CachedTour::new(1, "A")]).await;
    assert_eq!(report.error, Some(ErrorKind::StorageUnavailable));
    assert!(cache.read_all().await.is_empty());
    assert!(cache.read_by_id(1).await.is_none());
    assert_eq!(cache.info().await.count, 0);
}

// ============================================================================
// Network-first repository
// ============================================================================

#[tokio::test]
async fn remote_success_returns_remote_and_refreshes_cache() {
    let dir = TempDir::new().unwrap();
    let backend = FakeBackend::online(vec![
        tour(1, "Đà Lạt Discovery", "Lâm Đồng"),
        tour(2, "Phú Quốc Getaway", "Kiên Giang"),
    ]);
    let repo = repository(&dir, backend);

    let (tours, origin) = repo.get_all_tours_with_origin().await;
    assert_eq!(origin, ReadOrigin::Remote);
    assert_eq!(tours.len(), 2);
    assert_eq!(tours[0].category_id(), Some(2));

    repo.tasks().drain().await;
    let cached = repo.cache().read_all().await;
    assert_eq!(cached.len(), 2);
    assert_eq!(cached[0].category_id, Some(2));
    assert_eq!(cached[0].destination.as_deref(), Some("Lâm Đồng"));
}

#[tokio::test]
async fn online_read_with_unavailable_storage_stays_quiet() {
    let recorder = LevelRecorder::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder.clone()));

    let backend = FakeBackend::online(vec![tour(1, "Đà Lạt Discovery", "Lâm Đồng")]);
    let repo = TourRepository::new(
        backend,
        CacheManager::new(LocalStore::new(StoreLocation::Unavailable)),
        DetachedTasks::new(),
    );

    let (tours, origin) = repo.get_all_tours_with_origin().await;
    repo.tasks().drain().await;

    assert_eq!(origin, ReadOrigin::Remote);
    assert_eq!(tours.len(), 1);
    assert_eq!(repo.cache_info().await.count, 0);
    assert_eq!(recorder.loud_events(), 0);
}

#[tokio::test]
async fn online_read_survives_broken_storage() {
    let recorder = LevelRecorder::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(recorder.clone()));

    let dir = TempDir::new().unwrap();
    // A regular file where the data directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = LocalStore::new(StoreLocation::in_dir(Some(blocker)));

    let backend = FakeBackend::online(vec![
        tour(1, "Đà Lạt Discovery", "Lâm Đồng"),
        tour(2, "Phú Quốc Getaway", "Kiên Giang"),
    ]);
    let repo = TourRepository::new(backend, CacheManager::new(store), DetachedTasks::new());

    let (tours, origin) = repo.get_all_tours_with_origin().await;
    repo.tasks().drain().await;

    assert_eq!(origin, ReadOrigin::Remote);
    assert_eq!(tours.len(), 2);
    assert_eq!(tours[1].name, "Phú Quốc Getaway");
    // Logged once at warn by the cache, not escalated
    assert_eq!(recorder.errors(), 0);
}

#[tokio::test]
async fn warm_cache_fallback_on_remote_failure() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir, FakeBackend::offline());
    repo.cache()
        .replace_all(&[CachedTour::new(7, "Hạ Long Bay")])
        .await;

    let tours = repo.get_all_tours().await;
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].id, 7);
    assert_eq!(tours[0].name, "Hạ Long Bay");
}

#[tokio::test]
async fn cold_cache_fallback_is_empty() {
    let dir = TempDir::new().unwrap();
    let repo = repository(&dir, FakeBackend::offline());

    assert!(repo.get_all_tours().await.is_empty());
    assert!(repo.get_tour(7).await.is_none());
}

#[tokio::test]
async fn get_tour_falls_back_after_going_offline() {
    let dir = TempDir::new().unwrap();
    let backend = FakeBackend::online(vec![tour(7, "Hạ Long Bay", "Quảng Ninh")]);
    let repo = repository(&dir, backend.clone());

    assert_eq!(repo.get_tour(7).await.unwrap().name, "Hạ Long Bay");
    // A single-item read never writes to the cache
    repo.tasks().drain().await;
    assert_eq!(repo.cache_info().await.count, 0);

    repo.get_all_tours().await;
    repo.tasks().drain().await;

    backend.go_offline();
    let cached = repo.get_tour(7).await.unwrap();
    assert_eq!(cached.destination.as_deref(), Some("Quảng Ninh"));
    assert!(repo.get_tour(999).await.is_none());
}

#[tokio::test]
async fn write_paths_do_not_fall_back() {
    let dir = TempDir::new().unwrap();
    let backend = FakeBackend::online(vec![tour(1, "Mekong Delta", "Cần Thơ")]);
    let repo = repository(&dir, backend.clone());
    repo.get_all_tours().await;
    repo.tasks().drain().await;

    let input = TourInput {
        name: "Mekong Delta".to_string(),
        ..TourInput::default()
    };
    let err = repo.create_tour(&input).await.unwrap_err();
    assert!(matches!(err, ApiError::BadRequest(ref m) if m == "Tour name already exists"));
    assert_eq!(*backend.create_calls.lock().unwrap(), 1);

    assert!(matches!(repo.delete_tour(1).await, Err(ApiError::ServerError(_))));
    assert!(repo.update_tour(1, &input).await.is_err());
    // Cache untouched by failed writes
    assert_eq!(repo.cache_info().await.count, 1);
}
