//! Daily forecast entry

use serde::{Deserialize, Serialize};

/// One forecast day
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherDay {
    /// Human-readable description of the day's conditions
    pub forecast: String,
    /// Date the forecast is valid for, as reported by the provider
    pub time: String,
}
