use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use crate::models::{Location, Movie, Park, Restaurant, WeatherDay};
use crate::normalize;
use crate::providers::Providers;
use crate::providers::nps::PARK_LIMIT;
use crate::providers::weatherbit::FORECAST_DAYS;
use crate::providers::yelp::PAGE_SIZE;
use crate::resolver::GeocodeResolver;
use crate::{GatewayError, Result};

const FRONTEND_POINTER: &str = "Frontend here --> https://codefellows.github.io/code-301-guide/curriculum/city-explorer-app/front-end/";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<GeocodeResolver>,
    pub providers: Arc<Providers>,
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    pub search_query: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub search_query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RestaurantParams {
    pub search_query: Option<String>,
    pub page: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/location", get(get_location))
        .route("/weather", get(get_weather))
        .route("/parks", get(get_parks))
        .route("/movies", get(get_movies))
        .route("/yelp", get(get_restaurants))
        .with_state(state)
}

async fn frontend() -> &'static str {
    FRONTEND_POINTER
}

async fn get_location(
    State(state): State<AppState>,
    Query(params): Query<LocationParams>,
) -> Result<Json<Location>> {
    let city = params.city.unwrap_or_default();
    let location = state.resolver.resolve(&city).await?;
    Ok(Json(location))
}

async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<Vec<WeatherDay>>> {
    required("search_query", params.search_query.as_deref())?;
    let latitude = coordinate("latitude", params.latitude.as_deref(), 90.0)?;
    let longitude = coordinate("longitude", params.longitude.as_deref(), 180.0)?;

    let days = state.providers.daily_forecast(latitude, longitude).await?;
    Ok(Json(
        days.iter()
            .take(FORECAST_DAYS)
            .map(normalize::weather_day)
            .collect(),
    ))
}

async fn get_parks(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Park>>> {
    let query = required("search_query", params.search_query.as_deref())?;

    let parks = state.providers.parks(query).await?;
    Ok(Json(
        parks.iter().take(PARK_LIMIT).map(normalize::park).collect(),
    ))
}

async fn get_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Movie>>> {
    let query = required("search_query", params.search_query.as_deref())?;

    let movies = state.providers.movies(query).await?;
    Ok(Json(movies.iter().map(normalize::movie).collect()))
}

async fn get_restaurants(
    State(state): State<AppState>,
    Query(params): Query<RestaurantParams>,
) -> Result<Json<Vec<Restaurant>>> {
    let query = required("search_query", params.search_query.as_deref())?;
    let offset = normalize::restaurant_offset(required("page", params.page.as_deref())?)?;

    let businesses = state.providers.restaurants(query, offset).await?;
    Ok(Json(
        businesses
            .iter()
            .take(PAGE_SIZE as usize)
            .map(normalize::restaurant)
            .collect(),
    ))
}

fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GatewayError::validation(format!("Missing required parameter '{name}'"))),
    }
}

fn coordinate(name: &str, value: Option<&str>, limit: f64) -> Result<f64> {
    let raw = required(name, value)?;
    let degrees: f64 = raw
        .trim()
        .parse()
        .map_err(|_| GatewayError::validation(format!("{name} must be a number, got '{raw}'")))?;

    if !degrees.is_finite() || degrees.abs() > limit {
        return Err(GatewayError::validation(format!(
            "{name} must be between -{limit} and {limit}, got {degrees}"
        )));
    }
    Ok(degrees)
}
