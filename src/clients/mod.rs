//! External API clients
//!
//! Each upstream sits behind a trait so dialogs can be exercised with stubs.
//! The HTTP implementations share one pooled `reqwest::Client`.

use crate::error::BotError;
use crate::models::{ExchangeRates, GeoLocation, WeatherReading};
use crate::Result;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::error;

pub mod exchange;
pub mod geocoding;
pub mod weather;

pub use exchange::OpenExchangeRatesClient;
pub use geocoding::GoogleGeocodingClient;
pub use weather::DarkSkyClient;

#[async_trait::async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<GeoLocation>;
}

#[async_trait::async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReading>;
}

#[async_trait::async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    async fn latest(&self) -> Result<ExchangeRates>;
}

/// Build the shared connection-pooled client
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(8)
        .timeout(timeout)
        .build()
        .map_err(|e| BotError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Send a request and decode a JSON body, mapping transport failures
/// onto the dialog error taxonomy.
pub(crate) async fn get_json<T: DeserializeOwned>(service: &str, request: RequestBuilder) -> Result<T> {
    let response = request.send().await.map_err(|e| {
        error!("{} request failed: {}", service, e);
        BotError::from(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("{} returned {}: {}", service, status, body);
        return Err(BotError::UpstreamError(format!(
            "{} returned {}",
            service, status
        )));
    }

    response.json::<T>().await.map_err(|e| {
        error!("Failed to parse {} response: {}", service, e);
        BotError::UpstreamError(format!("invalid {} response: {}", service, e))
    })
}
