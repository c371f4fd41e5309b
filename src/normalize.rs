//! Response normalization
//!
//! Pure mappings from raw provider records to the fixed-shape models.
//! Missing optional fields degrade to empty strings or zero so one bad
//! record never drops the rest of a batch. Only geocoding can fail, because
//! a Location without coordinates is useless to every later lookup.

use crate::models::{Location, Movie, Park, Restaurant, WeatherDay};
use crate::providers::locationiq::GeocodeCandidate;
use crate::providers::nps::ParkRecord;
use crate::providers::tmdb::{MovieRecord, POSTER_BASE_URL};
use crate::providers::weatherbit::ForecastDay;
use crate::providers::yelp::{BusinessRecord, PAGE_SIZE};
use crate::{GatewayError, Result};

/// Build the Location for `query` from the provider's chosen candidate
pub fn location(query: &str, candidate: &GeocodeCandidate) -> Result<Location> {
    Ok(Location::new(
        query,
        candidate.display_name.clone(),
        candidate.latitude()?,
        candidate.longitude()?,
    ))
}

#[must_use]
pub fn weather_day(raw: &ForecastDay) -> WeatherDay {
    WeatherDay {
        forecast: raw
            .weather
            .as_ref()
            .and_then(|conditions| conditions.description.clone())
            .unwrap_or_default(),
        time: raw.valid_date.clone().unwrap_or_default(),
    }
}

/// First address and first entrance fee win
#[must_use]
pub fn park(raw: &ParkRecord) -> Park {
    let address = raw
        .addresses
        .first()
        .map(|address| {
            [
                &address.line1,
                &address.city,
                &address.state_code,
                &address.postal_code,
            ]
            .into_iter()
            .map(|part| part.as_deref().unwrap_or_default())
            .collect::<Vec<_>>()
            .join(", ")
        })
        .unwrap_or_default();

    let fee = raw
        .entrance_fees
        .first()
        .and_then(|fee| fee.cost.as_ref())
        .and_then(parse_fee)
        .unwrap_or(0.0);

    Park {
        name: raw.full_name.clone().unwrap_or_default(),
        address,
        fee,
        description: raw.description.clone().unwrap_or_default(),
        url: raw.url.clone().unwrap_or_default(),
    }
}

fn parse_fee(cost: &serde_json::Value) -> Option<f64> {
    match cost {
        serde_json::Value::Number(number) => number.as_f64(),
        serde_json::Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[must_use]
pub fn movie(raw: &MovieRecord) -> Movie {
    Movie {
        title: raw.title.clone().unwrap_or_default(),
        overview: raw.overview.clone().unwrap_or_default(),
        average_votes: raw.vote_average.unwrap_or(0.0),
        total_votes: raw.vote_count.unwrap_or(0),
        image_url: poster_url(raw.poster_path.as_deref()),
        popularity: raw.popularity.unwrap_or(0.0),
        released_on: raw.release_date.clone().unwrap_or_default(),
    }
}

/// Empty when there is no poster rather than a dangling base URL
fn poster_url(poster_path: Option<&str>) -> String {
    match poster_path.map(str::trim) {
        Some(path) if !path.is_empty() => format!("{POSTER_BASE_URL}{path}"),
        _ => String::new(),
    }
}

#[must_use]
pub fn restaurant(raw: &BusinessRecord) -> Restaurant {
    Restaurant {
        name: raw.name.clone().unwrap_or_default(),
        image_url: raw.image_url.clone().unwrap_or_default(),
        price: raw.price.clone().unwrap_or_default(),
        rating: raw.rating.unwrap_or(0.0),
        url: raw.url.clone().unwrap_or_default(),
    }
}

/// Zero-based result offset for a 1-based `page` parameter
pub fn restaurant_offset(page: &str) -> Result<u32> {
    let page: u32 = page
        .trim()
        .parse()
        .map_err(|_| GatewayError::validation(format!("page must be a positive integer, got '{page}'")))?;

    if page == 0 {
        return Err(GatewayError::validation(
            "page must be a positive integer, got '0'",
        ));
    }

    (page - 1)
        .checked_mul(PAGE_SIZE)
        .ok_or_else(|| GatewayError::validation("page is too large"))
}
