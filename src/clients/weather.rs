//! Dark Sky forecast client

use super::{get_json, WeatherProvider};
use crate::error::BotError;
use crate::models::WeatherReading;
use crate::Result;
use reqwest::Client;
use serde::Deserialize;

pub struct DarkSkyClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DarkSkyClient {
    pub fn new(client: Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait::async_trait]
impl WeatherProvider for DarkSkyClient {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherReading> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            BotError::UpstreamError("DARKSKY_API_KEY is not configured".to_string())
        })?;

        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, api_key, latitude, longitude
        );

        let forecast: Forecast = get_json("weather API", self.client.get(url)).await?;

        Ok(WeatherReading {
            temperature: forecast.currently.temperature,
            apparent_temperature: forecast.currently.apparent_temperature,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Forecast {
    currently: Currently,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Currently {
    temperature: f64,
    apparent_temperature: f64,
}
