//! SQLite-backed local store.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::{params_from_iter, types::Value, Connection, Row, Transaction};
use tracing::{debug, info};

use super::error::{Result, StoreError};

/// Database file name inside the data directory
pub const DB_FILE: &str = "tourdb.sqlite3";

/// Milliseconds SQLite waits on a locked database before failing a statement
const BUSY_TIMEOUT_MS: u32 = 5000;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS tours (
        tourID INTEGER PRIMARY KEY,
        tourName TEXT NOT NULL,
        description TEXT,
        price REAL,
        touristDestination TEXT,
        tourTypeID INTEGER,
        promotionID INTEGER,
        cached_at TEXT DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_tour_name ON tours(tourName);
    CREATE INDEX IF NOT EXISTS idx_cached_at ON tours(cached_at);
"#;

/// Where the database file lives, if anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    /// The host has no persistent storage (e.g. no resolvable data dir).
    Unavailable,
}

impl StoreLocation {
    /// Place the database file inside `dir`, or mark storage unavailable.
    pub fn in_dir(dir: Option<PathBuf>) -> Self {
        match dir {
            Some(dir) => StoreLocation::File(dir.join(DB_FILE)),
            None => StoreLocation::Unavailable,
        }
    }
}

/// Async adapter over the tour database.
///
/// Clone is cheap; clones share one connection. The connection is opened
/// lazily, so calling any operation after `close()` reopens the file.
#[derive(Clone)]
pub struct LocalStore {
    location: StoreLocation,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl LocalStore {
    pub fn new(location: StoreLocation) -> Self {
        Self {
            location,
            conn: Arc::new(Mutex::new(None)),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Create the database file and schema if absent. Safe to call repeatedly.
    pub async fn open(&self) -> Result<()> {
        self.with_conn(|_| Ok(())).await
    }

    /// Run a single statement that returns no rows.
    ///
    /// Returns the number of rows changed.
    pub async fn execute(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<usize> {
        let sql = sql.into();
        self.with_conn(move |conn| Ok(conn.execute(&sql, params_from_iter(params))?))
            .await
    }

    /// Run a single statement and map every result row with `map`.
    pub async fn query<T, F>(&self, sql: impl Into<String>, params: Vec<Value>, map: F) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T> + Send + 'static,
    {
        let sql = sql.into();
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params_from_iter(params), map)?
                .collect::<rusqlite::Result<Vec<T>>>()?;
            Ok(rows)
        })
        .await
    }

    /// Run `work` inside one transaction, committing if it returns `Ok`.
    ///
    /// Statements that fail inside `work` without being propagated do not
    /// abort the transaction, except for errors where SQLite rolls the
    /// whole transaction back itself (`SQLITE_FULL`, `SQLITE_IOERR`,
    /// `SQLITE_BUSY`, `SQLITE_NOMEM`). After one of those the connection is
    /// back in autocommit mode; `work` should check `is_autocommit()` and
    /// return the error rather than keep issuing statements.
    pub async fn transaction<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Transaction<'_>) -> Result<T> + Send + 'static,
    {
        self.with_conn(move |conn| {
            let tx = conn.transaction()?;
            let out = work(&tx)?;
            tx.commit()?;
            Ok(out)
        })
        .await
    }

    /// Release the connection. Idempotent.
    pub async fn close(&self) {
        let conn = Arc::clone(&self.conn);
        let closed = tokio::task::spawn_blocking(move || match conn.lock() {
            Ok(mut guard) => guard.take().is_some(),
            Err(_) => false,
        })
        .await
        .unwrap_or(false);

        if closed {
            info!("Tour database connection closed");
        }
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    async fn with_conn<T, F>(&self, work: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let path = match &self.location {
            StoreLocation::File(path) => path.clone(),
            StoreLocation::Unavailable => return Err(StoreError::Unavailable),
        };
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StoreError::Worker("connection lock poisoned".to_string()))?;

            if guard.is_none() {
                *guard = Some(Self::connect(&path)?);
            }

            match guard.as_mut() {
                Some(conn) => work(conn),
                None => Err(StoreError::Worker("connection not available".to_string())),
            }
        })
        .await
        .map_err(|e| StoreError::Worker(e.to_string()))?
    }

    fn connect(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(&format!(
            "PRAGMA journal_mode=WAL;\n\
             PRAGMA busy_timeout={};\n\
             PRAGMA synchronous=NORMAL;",
            BUSY_TIMEOUT_MS,
        ))?;
        conn.execute_batch(SCHEMA)?;

        debug!(path = %path.display(), "Tour database opened");
        Ok(conn)
    }
}
