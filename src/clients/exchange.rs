//! Open Exchange Rates client
//!
//! Rates are fetched fresh on every call; nothing is cached.

use super::{get_json, ExchangeRateProvider};
use crate::error::BotError;
use crate::models::ExchangeRates;
use crate::Result;
use reqwest::Client;

pub struct OpenExchangeRatesClient {
    client: Client,
    base_url: String,
    app_id: Option<String>,
}

impl OpenExchangeRatesClient {
    pub fn new(client: Client, base_url: String, app_id: Option<String>) -> Self {
        Self {
            client,
            base_url,
            app_id,
        }
    }
}

#[async_trait::async_trait]
impl ExchangeRateProvider for OpenExchangeRatesClient {
    async fn latest(&self) -> Result<ExchangeRates> {
        let app_id = self.app_id.as_deref().ok_or_else(|| {
            BotError::UpstreamError("EXCHANGE_RATES_APP_ID is not configured".to_string())
        })?;

        let url = format!("{}/api/latest.json", self.base_url);
        get_json(
            "exchange rate API",
            self.client.get(url).query(&[("app_id", app_id)]),
        )
        .await
    }
}
