//! Outbound provider integrations
//!
//! [`ProviderClient`] performs exactly one HTTP call per invocation and
//! classifies every failure as [`GatewayError::Provider`] tagged with the
//! provider's name. The submodules hold each provider's raw payload shapes
//! and request parameters; [`Providers`] bundles them with their settings.

pub mod locationiq;
pub mod nps;
pub mod tmdb;
pub mod weatherbit;
pub mod yelp;

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{GatewayConfig, HttpConfig, ProviderSettings, ProvidersConfig};
use crate::{GatewayError, Result};

/// The external APIs this gateway talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Geocode,
    Weather,
    Parks,
    Movies,
    Restaurants,
}

impl Provider {
    /// Display name used in errors and logs
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Provider::Geocode => "LocationIQ",
            Provider::Weather => "Weatherbit",
            Provider::Parks => "National Parks",
            Provider::Movies => "MovieDB",
            Provider::Restaurants => "Yelp",
        }
    }
}

/// A single outbound request, fully described
#[derive(Debug)]
pub struct ProviderRequest<'a> {
    pub provider: Provider,
    pub url: &'a str,
    pub query: Vec<(&'static str, String)>,
    /// Sent as `Authorization: Bearer <token>` when present
    pub bearer: Option<&'a str>,
}

impl<'a> ProviderRequest<'a> {
    #[must_use]
    pub fn new(provider: Provider, url: &'a str) -> Self {
        Self {
            provider,
            url,
            query: Vec::new(),
            bearer: None,
        }
    }

    #[must_use]
    pub fn param(mut self, name: &'static str, value: impl ToString) -> Self {
        self.query.push((name, value.to_string()));
        self
    }

    #[must_use]
    pub fn bearer(mut self, token: &'a str) -> Self {
        self.bearer = Some(token);
        self
    }
}

/// Thin wrapper around a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ProviderClient {
    client: Client,
}

impl ProviderClient {
    /// Create a client whose calls give up after `config.timeout_seconds`
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| GatewayError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Issue the request and decode the JSON body into `T`.
    ///
    /// No retries: a failure fails this call only.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ProviderRequest<'_>) -> Result<T> {
        let provider = request.provider.name();
        self.fetch_optional(request)
            .await?
            .ok_or_else(|| GatewayError::provider(provider, "HTTP 404 - Not Found"))
    }

    /// Like [`fetch`](Self::fetch), but an HTTP 404 answer yields `Ok(None)`.
    ///
    /// Some providers (LocationIQ) report "no results" that way.
    #[instrument(
        name = "provider_fetch",
        skip(self, request),
        fields(provider = request.provider.name(), url = request.url)
    )]
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: ProviderRequest<'_>,
    ) -> Result<Option<T>> {
        let provider = request.provider.name();
        let start_time = Instant::now();

        let mut builder = self.client.get(request.url).query(&request.query);
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            let message = describe_transport_error(e);
            error!("Network error calling {}: {}", provider, message);
            GatewayError::provider(provider, message)
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if status == StatusCode::NOT_FOUND {
            debug!("{} answered 404", provider);
            return Ok(None);
        }

        if !status.is_success() {
            warn!("{} answered with HTTP {}", provider, status);
            return Err(GatewayError::provider(
                provider,
                format!(
                    "HTTP {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        let payload = response.json::<T>().await.map_err(|e| {
            let e = e.without_url();
            error!("Failed to parse {} response: {}", provider, e);
            GatewayError::provider(provider, format!("invalid response body: {e}"))
        })?;

        info!(
            "{} request succeeded in {:.3}s",
            provider,
            start_time.elapsed().as_secs_f64()
        );

        Ok(Some(payload))
    }
}

fn describe_transport_error(err: reqwest::Error) -> String {
    // reqwest's Display includes the full URL, which carries API keys
    let err = err.without_url();
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}

/// Decode a JSON list item by item.
///
/// An item that does not fit `T` becomes `T::default()` instead of failing the
/// whole payload. `null` or a non-list value yields an empty list.
pub(crate) fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            warn!("Expected a list in provider payload, got {}", other);
            return Ok(Vec::new());
        }
    };

    Ok(items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|e| {
                warn!("Malformed provider record, using defaults: {}", e);
                T::default()
            })
        })
        .collect())
}

/// Decode an optional field, treating a value of the wrong type as absent
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value::<Option<T>>(value).unwrap_or_else(|e| {
        debug!("Ignoring mistyped provider field: {}", e);
        None
    }))
}

/// All provider integrations, sharing one HTTP client
#[derive(Debug, Clone)]
pub struct Providers {
    client: ProviderClient,
    settings: ProvidersConfig,
}

impl Providers {
    #[must_use]
    pub fn new(client: ProviderClient, settings: ProvidersConfig) -> Self {
        Self { client, settings }
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        Ok(Self::new(
            ProviderClient::new(&config.http)?,
            config.providers.clone(),
        ))
    }

    pub(crate) fn client(&self) -> &ProviderClient {
        &self.client
    }

    pub(crate) fn settings(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Geocode => &self.settings.geocode,
            Provider::Weather => &self.settings.weather,
            Provider::Parks => &self.settings.parks,
            Provider::Movies => &self.settings.movies,
            Provider::Restaurants => &self.settings.restaurants,
        }
    }
}
