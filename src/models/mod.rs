//! Data models for the City Explorer gateway
//!
//! This module contains the fixed-shape records returned to clients:
//! - Location: a resolved search string, the only persisted entity
//! - WeatherDay, Park, Movie, Restaurant: request-scoped results

pub mod location;
pub mod movie;
pub mod park;
pub mod restaurant;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Location;
pub use movie::Movie;
pub use park::Park;
pub use restaurant::Restaurant;
pub use weather::WeatherDay;
