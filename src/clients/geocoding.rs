//! Google geocoding client

use super::{get_json, Geocoder};
use crate::error::BotError;
use crate::models::GeoLocation;
use crate::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

pub struct GoogleGeocodingClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleGeocodingClient {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl Geocoder for GoogleGeocodingClient {
    async fn geocode(&self, address: &str) -> Result<GeoLocation> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);

        let mut query = vec![("address", address)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        debug!(address, "Geocoding");
        let response: GeocodeResponse =
            get_json("geocoding API", self.client.get(url).query(&query)).await?;

        interpret(response)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

/// Map the provider status onto a location or a classified failure.
pub(crate) fn interpret(response: GeocodeResponse) -> Result<GeoLocation> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(BotError::LocationNotFound),
        "OVER_QUERY_LIMIT" => return Err(BotError::RateLimited),
        other => {
            return Err(BotError::UpstreamError(match response.error_message {
                Some(msg) => format!("geocoding failed ({}): {}", other, msg),
                None => format!("geocoding failed ({})", other),
            }))
        }
    }

    let first = response
        .results
        .into_iter()
        .next()
        .ok_or(BotError::LocationNotFound)?;

    Ok(GeoLocation {
        formatted_address: first.formatted_address,
        latitude: first.geometry.location.lat,
        longitude: first.geometry.location.lng,
    })
}
