//! `City Explorer` - location, weather, parks, movies and restaurant lookups
//!
//! This library provides the geocode cache resolver, the provider
//! integrations and response normalizers, and the HTTP gateway that
//! exposes them.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod providers;
pub mod resolver;
pub mod store;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use models::{Location, Movie, Park, Restaurant, WeatherDay};
pub use providers::{Provider, ProviderClient, Providers};
pub use resolver::{GeocodeResolver, Geocoder};
pub use store::{FjallLocationStore, LocationStore, MemoryLocationStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GatewayError>;
