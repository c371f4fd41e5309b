//! Persistent Location store
//!
//! The resolver only sees the [`LocationStore`] trait. [`FjallLocationStore`]
//! keeps one row per `search_query` in an embedded fjall keyspace;
//! [`MemoryLocationStore`] is the in-process double used by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fjall::{Database, Keyspace, PersistMode};
use tokio::sync::RwLock;
use tokio::task;
use tracing::{debug, info, instrument};

use crate::models::Location;
use crate::{GatewayError, Result};

const LOCATION_KEYSPACE: &str = "location";

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Exact-match lookup by `search_query`
    async fn find(&self, search_query: &str) -> Result<Option<Location>>;

    /// Store `location` unless a row with the same `search_query` exists.
    ///
    /// Returns the row that is stored after the call.
    async fn insert_if_absent(&self, location: &Location) -> Result<Location>;

    /// Flush and release the store
    async fn close(&self) -> Result<()>;
}

pub struct FjallLocationStore {
    db: Database,
    rows: Keyspace,
    // makes check-then-insert atomic across concurrent writers
    write_lock: Arc<Mutex<()>>,
}

fn get_from_store(rows: &Keyspace, key: &[u8]) -> Result<Option<Location>> {
    rows.get(key)?
        .map(|bytes| postcard::from_bytes::<Location>(bytes.as_ref()).map_err(GatewayError::from))
        .transpose()
}

impl FjallLocationStore {
    /// Open (or create) the database directory at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = fjall::Database::builder(path.as_ref()).open()?;
        let rows = db.keyspace(LOCATION_KEYSPACE, fjall::KeyspaceCreateOptions::default)?;
        info!("Opened location store at {}", path.as_ref().display());
        Ok(Self {
            db,
            rows,
            write_lock: Arc::new(Mutex::new(())),
        })
    }
}

#[async_trait]
impl LocationStore for FjallLocationStore {
    #[instrument(name = "store_find", level = "debug", skip(self))]
    async fn find(&self, search_query: &str) -> Result<Option<Location>> {
        let rows = self.rows.clone();
        let key = search_query.as_bytes().to_vec();

        let found = task::spawn_blocking(move || get_from_store(&rows, &key)).await??;
        debug!(hit = found.is_some(), "store lookup");
        Ok(found)
    }

    #[instrument(name = "store_insert", level = "debug", skip(self, location), fields(search_query = %location.search_query))]
    async fn insert_if_absent(&self, location: &Location) -> Result<Location> {
        let rows = self.rows.clone();
        let write_lock = Arc::clone(&self.write_lock);
        let location = location.clone();

        task::spawn_blocking(move || {
            let _guard = write_lock
                .lock()
                .map_err(|_| GatewayError::store("location write lock poisoned"))?;

            if let Some(existing) = get_from_store(&rows, location.key())? {
                debug!("Row already present, keeping existing");
                return Ok(existing);
            }

            let bytes = postcard::to_stdvec(&location)?;
            rows.insert(location.key().to_vec(), bytes)?;
            info!("Stored location '{}'", location.search_query);
            Ok(location)
        })
        .await?
    }

    async fn close(&self) -> Result<()> {
        let db = self.db.clone();
        task::spawn_blocking(move || db.persist(PersistMode::SyncAll)).await??;
        info!("Location store flushed and closed");
        Ok(())
    }
}

/// In-memory store, counting the rows it has actually written
#[derive(Default)]
pub struct MemoryLocationStore {
    rows: RwLock<HashMap<String, Location>>,
    inserts: AtomicUsize,
}

impl MemoryLocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with existing rows
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = Location>) -> Self {
        let rows = rows
            .into_iter()
            .map(|location| (location.search_query.clone(), location))
            .collect();
        Self {
            rows: RwLock::new(rows),
            inserts: AtomicUsize::new(0),
        }
    }

    /// Number of rows written through `insert_if_absent`
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl LocationStore for MemoryLocationStore {
    async fn find(&self, search_query: &str) -> Result<Option<Location>> {
        Ok(self.rows.read().await.get(search_query).cloned())
    }

    async fn insert_if_absent(&self, location: &Location) -> Result<Location> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows.get(&location.search_query) {
            return Ok(existing.clone());
        }
        rows.insert(location.search_query.clone(), location.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(location.clone())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
