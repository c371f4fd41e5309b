//! Geocode cache resolver behavior against in-memory and fjall stores

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use city_explorer::providers::locationiq::{Coordinate, GeocodeCandidate};
use city_explorer::{
    FjallLocationStore, GatewayError, GeocodeResolver, Geocoder, Location, LocationStore,
    MemoryLocationStore, Result,
};
use tempfile::TempDir;

/// Scripted geocoder that counts calls and can be slowed down
struct FakeGeocoder {
    answer: std::result::Result<Vec<GeocodeCandidate>, GatewayError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeGeocoder {
    fn answering(candidates: Vec<GeocodeCandidate>) -> Self {
        Self {
            answer: Ok(candidates),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing(error: GatewayError) -> Self {
        Self {
            answer: Err(error),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn geocode(&self, _query: &str) -> Result<Vec<GeocodeCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.answer.clone()
    }
}

/// Store whose every operation fails
struct BrokenStore;

#[async_trait]
impl LocationStore for BrokenStore {
    async fn find(&self, _search_query: &str) -> Result<Option<Location>> {
        Err(GatewayError::store("connection reset"))
    }

    async fn insert_if_absent(&self, _location: &Location) -> Result<Location> {
        Err(GatewayError::store("connection reset"))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

fn seattle_candidate() -> GeocodeCandidate {
    GeocodeCandidate {
        display_name: "Seattle, WA, USA".to_string(),
        lat: Coordinate::Text("47.6".to_string()),
        lon: Coordinate::Text("-122.3".to_string()),
    }
}

fn expected_seattle() -> Location {
    Location::new("Seattle", "Seattle, WA, USA", 47.6, -122.3)
}

#[tokio::test]
async fn test_miss_resolves_and_persists_one_row() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    let location = resolver.resolve("Seattle").await.unwrap();

    assert_eq!(location, expected_seattle());
    assert_eq!(store.find("Seattle").await.unwrap(), Some(expected_seattle()));
    assert_eq!(store.insert_count(), 1);
    assert_eq!(geocoder.calls(), 1);
}

#[tokio::test]
async fn test_second_resolution_is_a_cache_hit() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    let first = resolver.resolve("Seattle").await.unwrap();
    let second = resolver.resolve("Seattle").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(store.insert_count(), 1);
}

#[tokio::test]
async fn test_stored_row_returned_unchanged() {
    let cached = Location::new("Seattle", "Emerald City", 1.5, 2.5);
    let store = Arc::new(MemoryLocationStore::with_rows([cached.clone()]));
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    assert_eq!(resolver.resolve("Seattle").await.unwrap(), cached);
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn test_query_identity_is_case_and_whitespace_sensitive() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    resolver.resolve("Seattle").await.unwrap();
    resolver.resolve("seattle").await.unwrap();
    resolver.resolve("Seattle ").await.unwrap();

    assert_eq!(geocoder.calls(), 3);
    assert_eq!(store.len().await, 3);
}

#[tokio::test]
async fn test_empty_query_is_rejected_before_any_access() {
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    // a broken store proves the store is never touched
    let resolver = GeocodeResolver::new(Arc::new(BrokenStore), geocoder.clone());

    let err = resolver.resolve("").await.unwrap_err();

    assert!(matches!(err, GatewayError::Validation { .. }));
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn test_zero_candidates_is_not_found_and_stores_nothing() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(FakeGeocoder::answering(Vec::new()));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    let err = resolver.resolve("Atlantis").await.unwrap_err();

    assert!(matches!(err, GatewayError::NotFound { .. }));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_provider_failure_is_not_cached() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(FakeGeocoder::failing(GatewayError::provider(
        "LocationIQ",
        "HTTP 500 - Internal Server Error",
    )));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    for _ in 0..2 {
        let err = resolver.resolve("Seattle").await.unwrap_err();
        assert!(matches!(err, GatewayError::Provider { .. }));
    }

    // each request tries the provider itself, no shared failure state
    assert_eq!(geocoder.calls(), 2);
    assert!(store.is_empty().await);
    assert_eq!(resolver.pending(), 0);
}

#[tokio::test]
async fn test_store_failure_surfaces_as_store_error() {
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(Arc::new(BrokenStore), geocoder.clone());

    let err = resolver.resolve("Seattle").await.unwrap_err();

    assert!(matches!(err, GatewayError::Store { .. }));
    assert_eq!(geocoder.calls(), 0);
}

#[tokio::test]
async fn test_concurrent_misses_share_one_provider_call() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(
        FakeGeocoder::answering(vec![seattle_candidate()]).with_delay(Duration::from_millis(50)),
    );
    let resolver = Arc::new(GeocodeResolver::new(store.clone(), geocoder.clone()));

    let lookups = (0..10).map(|_| {
        let resolver = Arc::clone(&resolver);
        async move { resolver.resolve("Seattle").await }
    });
    let results = futures::future::join_all(lookups).await;

    for result in results {
        assert_eq!(result.unwrap(), expected_seattle());
    }
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(store.insert_count(), 1);
    assert_eq!(resolver.pending(), 0);
}

#[tokio::test]
async fn test_concurrent_misses_on_different_keys_run_independently() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(
        FakeGeocoder::answering(vec![seattle_candidate()]).with_delay(Duration::from_millis(20)),
    );
    let resolver = Arc::new(GeocodeResolver::new(store.clone(), geocoder.clone()));

    let (a, b) = tokio::join!(resolver.resolve("Seattle"), resolver.resolve("Tacoma"));

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(geocoder.calls(), 2);
    assert_eq!(store.len().await, 2);
}

#[tokio::test]
async fn test_cancelled_resolution_skips_store_write() {
    let store = Arc::new(MemoryLocationStore::new());
    let geocoder = Arc::new(
        FakeGeocoder::answering(vec![seattle_candidate()]).with_delay(Duration::from_secs(5)),
    );
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    let outcome = tokio::time::timeout(Duration::from_millis(20), resolver.resolve("Seattle")).await;

    assert!(outcome.is_err());
    assert_eq!(geocoder.calls(), 1);
    assert!(store.is_empty().await);
    assert_eq!(resolver.pending(), 0);
}

#[tokio::test]
async fn test_resolver_over_fjall_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(FjallLocationStore::open(temp_dir.path()).unwrap());
    let geocoder = Arc::new(FakeGeocoder::answering(vec![seattle_candidate()]));
    let resolver = GeocodeResolver::new(store.clone(), geocoder.clone());

    assert_eq!(resolver.resolve("Seattle").await.unwrap(), expected_seattle());
    assert_eq!(resolver.resolve("Seattle").await.unwrap(), expected_seattle());
    assert_eq!(geocoder.calls(), 1);
    assert_eq!(store.find("Seattle").await.unwrap(), Some(expected_seattle()));
    store.close().await.unwrap();
}
