use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::{params, types::Value, Row};
use tracing::{debug, info, warn};

use super::error::CacheError;
use crate::error::ErrorKind;
use crate::models::CachedTour;
use crate::store::{LocalStore, StoreError};
use crate::utils::contains_ignore_case;

/// Consider the cached catalog stale after 1 hour.
const CACHE_STALE_MINUTES: i64 = 60;

const SELECT_TOURS: &str = "SELECT tourID, tourName, description, price, touristDestination, \
     tourTypeID, promotionID, cached_at FROM tours";

const INSERT_TOUR: &str = "INSERT INTO tours \
     (tourID, tourName, description, price, touristDestination, tourTypeID, promotionID, cached_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Row count and freshness of the cached catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheInfo {
    pub count: usize,
    /// Newest `cached_at` across all rows; `None` when empty.
    pub last_update: Option<DateTime<Utc>>,
}

impl CacheInfo {
    pub fn age_minutes(&self) -> Option<i64> {
        self.last_update
            .map(|at| (Utc::now() - at).num_minutes())
    }

    pub fn age_display(&self) -> String {
        let Some(minutes) = self.age_minutes() else {
            return "never".to_string();
        };
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    /// Empty caches count as stale.
    pub fn is_stale(&self) -> bool {
        self.age_minutes()
            .map(|m| m > CACHE_STALE_MINUTES)
            .unwrap_or(true)
    }
}

/// Outcome of a bulk replace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: usize,
    pub failed: usize,
    /// Set when anything went wrong; the failure has already been logged.
    pub error: Option<ErrorKind>,
}

impl WriteReport {
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }
}

/// Owner of the cached tour rows.
///
/// Clone is cheap; clones share the underlying store.
#[derive(Clone)]
pub struct CacheManager {
    store: LocalStore,
}

impl CacheManager {
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Replace the whole cache with `tours`.
    ///
    /// Runs in one transaction: readers never see a mix of old and new
    /// rows. A row that fails to insert is logged and skipped; the rest
    /// are still committed and the report carries `PartialCacheWrite`.
    /// If SQLite aborts the whole transaction instead (disk full, I/O
    /// error), nothing is written and the previous rows are kept.
    /// An empty slice clears the cache.
    pub async fn replace_all(&self, tours: &[CachedTour]) -> WriteReport {
        let rows = tours.to_vec();
        let total = rows.len();
        let cached_at = Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true);

        let result = self
            .store
            .transaction(move |tx| {
                tx.execute("DELETE FROM tours", [])?;

                let mut stmt = tx.prepare(INSERT_TOUR)?;
                let mut written = 0;
                let mut failures = Vec::new();
                for row in &rows {
                    let inserted = stmt.execute(params![
                        row.id,
                        row.name,
                        row.description,
                        row.price,
                        row.destination,
                        row.category_id,
                        row.promotion_id,
                        cached_at,
                    ]);
                    match inserted {
                        Ok(_) => written += 1,
                        // SQLite rolled the whole transaction back; later
                        // inserts would run outside it
                        Err(e) if tx.is_autocommit() => return Err(e.into()),
                        Err(e) => failures.push((row.id, e)),
                    }
                }
                Ok((written, failures))
            })
            .await;

        match result {
            Ok((written, failures)) if failures.is_empty() => {
                info!(count = written, "Cached tours");
                WriteReport {
                    written,
                    failed: 0,
                    error: None,
                }
            }
            Ok((written, failures)) => {
                for (tour_id, e) in &failures {
                    warn!(tour_id, error = %e, "Failed to cache tour");
                }
                let err = CacheError::PartialWrite {
                    written,
                    failed: failures.len(),
                    total,
                };
                warn!(kind = %err.kind(), error = %err, "Tour cache partially written");
                WriteReport {
                    written,
                    failed: failures.len(),
                    error: Some(err.kind()),
                }
            }
            Err(e) => {
                let kind = log_store_failure("replace_all", e);
                WriteReport {
                    written: 0,
                    failed: total,
                    error: Some(kind),
                }
            }
        }
    }

    /// Every cached tour, ordered by name (binary collation).
    pub async fn read_all(&self) -> Vec<CachedTour> {
        let sql = format!("{} ORDER BY tourName", SELECT_TOURS);
        match self.store.query(sql, vec![], row_to_tour).await {
            Ok(tours) => {
                debug!(count = tours.len(), "Read cached tours");
                tours
            }
            Err(e) => {
                log_store_failure("read_all", e);
                Vec::new()
            }
        }
    }

    /// The cached tour with `id`, or `None` if there is no such row.
    pub async fn read_by_id(&self, id: i64) -> Option<CachedTour> {
        let sql = format!("{} WHERE tourID = ?1 LIMIT 1", SELECT_TOURS);
        match self.store.query(sql, vec![Value::Integer(id)], row_to_tour).await {
            Ok(tours) => tours.into_iter().next(),
            Err(e) => {
                log_store_failure("read_by_id", e);
                None
            }
        }
    }

    /// Tours whose name or destination contains `needle`, ignoring case.
    ///
    /// Ordered by name; an empty needle returns every row.
    pub async fn search(&self, needle: &str) -> Vec<CachedTour> {
        let mut tours = self.read_all().await;
        tours.retain(|tour| {
            contains_ignore_case(&tour.name, needle)
                || tour
                    .destination
                    .as_deref()
                    .map(|d| contains_ignore_case(d, needle))
                    .unwrap_or(false)
        });
        tours
    }

    /// Delete every cached row. Idempotent.
    pub async fn clear(&self) {
        match self.store.execute("DELETE FROM tours", vec![]).await {
            Ok(removed) => info!(removed, "Tour cache cleared"),
            Err(e) => {
                log_store_failure("clear", e);
            }
        }
    }

    pub async fn info(&self) -> CacheInfo {
        let result = self
            .store
            .query(
                "SELECT COUNT(*), MAX(cached_at) FROM tours",
                vec![],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<String>>(1)?)),
            )
            .await;

        match result {
            Ok(rows) => match rows.into_iter().next() {
                Some((count, last)) => CacheInfo {
                    count: usize::try_from(count).unwrap_or(0),
                    last_update: last.as_deref().and_then(parse_timestamp),
                },
                None => CacheInfo::default(),
            },
            Err(e) => {
                log_store_failure("info", e);
                CacheInfo::default()
            }
        }
    }
}

/// Log a swallowed store error and return its kind.
fn log_store_failure(operation: &str, err: StoreError) -> ErrorKind {
    let err = CacheError::from(err);
    let kind = err.kind();
    match err {
        // Expected on hosts without persistent storage
        CacheError::StorageUnavailable => debug!(operation, kind = %kind, "Offline cache skipped"),
        _ => warn!(operation, kind = %kind, error = %err, "Offline cache operation failed"),
    }
    kind
}

fn row_to_tour(row: &Row<'_>) -> rusqlite::Result<CachedTour> {
    let cached_at: Option<String> = row.get("cached_at")?;
    Ok(CachedTour {
        id: row.get("tourID")?,
        name: row.get("tourName")?,
        description: row.get("description")?,
        price: row.get("price")?,
        destination: row.get("touristDestination")?,
        category_id: row.get("tourTypeID")?,
        promotion_id: row.get("promotionID")?,
        cached_at: cached_at.as_deref().and_then(parse_timestamp),
    })
}

/// Rows written by this crate use RFC 3339; the column default
/// (`CURRENT_TIMESTAMP`) produces `YYYY-MM-DD HH:MM:SS` in UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreLocation;
    use chrono::Duration;
    use tempfile::TempDir;

    fn temp_cache() -> (TempDir, CacheManager) {
        let dir = TempDir::new().unwrap();
        let store = LocalStore::new(StoreLocation::in_dir(Some(dir.path().to_path_buf())));
        (dir, CacheManager::new(store))
    }

    fn ids(tours: &[CachedTour]) -> Vec<i64> {
        tours.iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_replace_all_replaces_fully() {
        let (_dir, cache) = temp_cache();
        cache
            .replace_all(&[CachedTour::new(1, "A"), CachedTour::new(2, "B")])
            .await;
        let report = cache.replace_all(&[CachedTour::new(3, "C")]).await;
        assert!(report.is_complete());
        assert_eq!(report.written, 1);

        let tours = cache.read_all().await;
        assert_eq!(ids(&tours), vec![3]);
    }

    #[tokio::test]
    async fn test_empty_replace_clears() {
        let (_dir, cache) = temp_cache();
        cache.replace_all(&[CachedTour::new(1, "A")]).await;
        let report = cache.replace_all(&[]).await;
        assert!(report.is_complete());
        assert!(cache.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_read_all_orders_by_name_binary() {
        let (_dir, cache) = temp_cache();
        cache
            .replace_all(&[
                CachedTour::new(1, "banana"),
                CachedTour::new(2, "Apple"),
                CachedTour::new(3, "Cherry"),
            ])
            .await;

        let names: Vec<String> = cache.read_all().await.into_iter().map(|t| t.name).collect();
        // Binary collation puts uppercase before lowercase
        assert_eq!(names, vec!["Apple", "Cherry", "banana"]);
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_partial_write() {
        let (_dir, cache) = temp_cache();
        let report = cache
            .replace_all(&[
                CachedTour::new(1, "First"),
                CachedTour::new(1, "Duplicate"),
                CachedTour::new(2, "Second"),
            ])
            .await;

        assert_eq!(report.written, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.error, Some(ErrorKind::PartialCacheWrite));

        let tours = cache.read_all().await;
        assert_eq!(ids(&tours), vec![1, 2]);
        assert_eq!(tours[0].name, "First");
    }

    #[tokio::test]
    async fn test_full_database_report_matches_rows() {
        let (_dir, cache) = temp_cache();
        let pages = cache
            .store()
            .query("PRAGMA page_count", vec![], |row| row.get::<_, i64>(0))
            .await
            .unwrap();
        cache
            .store()
            .query(
                format!("PRAGMA max_page_count = {}", pages[0] + 2),
                vec![],
                |row| row.get::<_, i64>(0),
            )
            .await
            .unwrap();

        let long = "x".repeat(4096);
        let tours: Vec<CachedTour> = (1..=50)
            .map(|id| {
                let mut tour = CachedTour::new(id, format!("Tour {}", id));
                tour.description = Some(long.clone());
                tour
            })
            .collect();
        let report = cache.replace_all(&tours).await;

        assert!(report.error.is_some());
        assert_eq!(report.written, cache.info().await.count);
    }

    #[tokio::test]
    async fn test_read_by_id() {
        let (_dir, cache) = temp_cache();
        let tour = CachedTour::new(7, "Hạ Long Bay")
            .with_destination("Quảng Ninh")
            .with_price(2_500_000.0);
        cache.replace_all(&[tour.clone()]).await;

        let found = cache.read_by_id(7).await.unwrap();
        assert_eq!(found.name, tour.name);
        assert_eq!(found.destination, tour.destination);
        assert_eq!(found.price, tour.price);
        assert!(found.cached_at.is_some());

        assert!(cache.read_by_id(999).await.is_none());
    }

    #[tokio::test]
    async fn test_search_matches_destination_too() {
        let (_dir, cache) = temp_cache();
        cache
            .replace_all(&[
                CachedTour::new(1, "Hạ Long Bay").with_destination("Quảng Ninh"),
                CachedTour::new(2, "Mekong Delta").with_destination("Cần Thơ"),
                CachedTour::new(3, "Night Market"),
            ])
            .await;

        assert_eq!(ids(&cache.search("QUẢNG").await), vec![1]);
        assert_eq!(ids(&cache.search("cần").await), vec![2]);
        assert_eq!(ids(&cache.search("").await), vec![1, 2, 3]);
        assert!(cache.search("Sapa").await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_info() {
        let (_dir, cache) = temp_cache();
        assert_eq!(cache.info().await, CacheInfo::default());

        cache
            .replace_all(&[CachedTour::new(1, "A"), CachedTour::new(2, "B")])
            .await;
        let info = cache.info().await;
        assert_eq!(info.count, 2);
        assert!(info.last_update.is_some());

        cache.clear().await;
        cache.clear().await;
        let info = cache.info().await;
        assert_eq!(info.count, 0);
        assert_eq!(info.last_update, None);
    }

    #[tokio::test]
    async fn test_unavailable_store_degrades() {
        let cache = CacheManager::new(LocalStore::new(StoreLocation::Unavailable));

        let report = cache.replace_all(&[CachedTour::new(1, "A")]).await;
        assert_eq!(report.written, 0);
        assert_eq!(report.error, Some(ErrorKind::StorageUnavailable));

        assert!(cache.read_all().await.is_empty());
        assert!(cache.read_by_id(1).await.is_none());
        assert!(cache.search("a").await.is_empty());
        cache.clear().await;
        assert_eq!(cache.info().await, CacheInfo::default());
    }

    #[tokio::test]
    async fn test_rows_with_default_timestamp_parse() {
        let (_dir, cache) = temp_cache();
        cache
            .store()
            .execute("INSERT INTO tours (tourID, tourName) VALUES (5, 'Legacy')", vec![])
            .await
            .unwrap();

        let tour = cache.read_by_id(5).await.unwrap();
        assert!(tour.cached_at.is_some());
        assert!(cache.info().await.last_update.is_some());
    }

    #[test]
    fn test_cache_info_age_display() {
        let fresh = CacheInfo {
            count: 1,
            last_update: Some(Utc::now()),
        };
        assert_eq!(fresh.age_display(), "just now");
        assert!(!fresh.is_stale());

        let old = CacheInfo {
            count: 1,
            last_update: Some(Utc::now() - Duration::minutes(61)),
        };
        assert_eq!(old.age_display(), "1h ago");
        assert!(old.is_stale());

        let days = CacheInfo {
            count: 1,
            last_update: Some(Utc::now() - Duration::hours(50)),
        };
        assert_eq!(days.age_display(), "2d ago");

        assert_eq!(CacheInfo::default().age_display(), "never");
        assert!(CacheInfo::default().is_stale());
    }
}
