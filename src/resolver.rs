//! Geocode cache resolution
//!
//! Cache-aside lookup of search strings: the store is always consulted
//! before the geocoding provider, and a provider answer is written back
//! before it is returned. Concurrent misses for the same string are
//! serialized on a per-key lock so only the first one calls the provider;
//! the others find its row when they get the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::models::Location;
use crate::normalize;
use crate::providers::locationiq::GeocodeCandidate;
use crate::store::LocationStore;
use crate::{GatewayError, Result};

/// Forward geocoding seam, implemented by [`crate::providers::Providers`]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates for `query`, best first. An empty list means no match.
    async fn geocode(&self, query: &str) -> Result<Vec<GeocodeCandidate>>;
}

type InFlight = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

pub struct GeocodeResolver {
    store: Arc<dyn LocationStore>,
    geocoder: Arc<dyn Geocoder>,
    in_flight: Arc<InFlight>,
}

impl GeocodeResolver {
    pub fn new(store: Arc<dyn LocationStore>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            store,
            geocoder,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Resolve a user-entered search string into a Location
    #[instrument(name = "resolve_location", skip(self))]
    pub async fn resolve(&self, query: &str) -> Result<Location> {
        if query.is_empty() {
            return Err(GatewayError::validation(
                "Sorry, please enter a valid U.S. city",
            ));
        }

        if let Some(location) = self.store.find(query).await? {
            debug!("Cache hit for '{}'", query);
            return Ok(location);
        }

        let key_lock = KeyLock::acquire(&self.in_flight, query);
        let _held = key_lock.lock.lock().await;

        // another request may have stored it while we waited
        if let Some(location) = self.store.find(query).await? {
            debug!("Resolved by a concurrent request for '{}'", query);
            return Ok(location);
        }

        debug!("Cache miss for '{}', calling geocoder", query);
        let candidates = self.geocoder.geocode(query).await?;
        let Some(first) = candidates.first() else {
            warn!("Geocoder returned no candidates for '{}'", query);
            return Err(GatewayError::not_found(format!(
                "No location found for '{query}'"
            )));
        };

        let location = normalize::location(query, first)?;
        let stored = self.store.insert_if_absent(&location).await?;
        info!(
            "Resolved '{}' to {} ({:.4}, {:.4})",
            query, stored.formatted_query, stored.latitude, stored.longitude
        );
        Ok(stored)
    }

    /// Number of keys with a resolution currently in progress
    #[must_use]
    pub fn pending(&self) -> usize {
        lock_in_flight(&self.in_flight).len()
    }
}

fn lock_in_flight(in_flight: &InFlight) -> MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<()>>>> {
    // the map holds no invariants a panicking holder could break
    in_flight.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Shared per-key lock, removed from the map when its last user drops it.
///
/// Dropping on cancellation releases the key too.
struct KeyLock {
    in_flight: Arc<InFlight>,
    key: String,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl KeyLock {
    fn acquire(in_flight: &Arc<InFlight>, key: &str) -> Self {
        let lock = Arc::clone(
            lock_in_flight(in_flight)
                .entry(key.to_string())
                .or_default(),
        );
        Self {
            in_flight: Arc::clone(in_flight),
            key: key.to_string(),
            lock,
        }
    }
}

impl Drop for KeyLock {
    fn drop(&mut self) {
        let mut map = lock_in_flight(&self.in_flight);
        // one reference in the map, one here
        if Arc::strong_count(&self.lock) == 2 {
            map.remove(&self.key);
        }
    }
}
