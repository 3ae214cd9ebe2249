//! Process configuration
//!
//! Everything is read from the environment (after `dotenv`), so API keys
//! never live in source.

use crate::error::BotError;
use crate::Result;
use std::env;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3978;
pub const DEFAULT_LUIS_HOST: &str = "westus.api.cognitive.microsoft.com";
pub const DEFAULT_GEOCODE_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.darksky.net";
pub const DEFAULT_EXCHANGE_BASE_URL: &str = "https://openexchangerates.org";

/// +05:30
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct LuisConfig {
    pub app_id: String,
    pub api_key: String,
    pub host_name: String,
}

impl LuisConfig {
    /// Endpoint of the published LUIS v2 application
    pub fn endpoint(&self) -> String {
        format!("https://{}/luis/v2.0/apps/{}", self.host_name, self.app_id)
    }
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub port: u16,
    pub app_id: String,
    pub luis: LuisConfig,
    pub geocode_base_url: String,
    pub geocode_api_key: Option<String>,
    pub weather_base_url: String,
    pub weather_api_key: Option<String>,
    pub exchange_base_url: String,
    pub exchange_app_id: Option<String>,
    pub utc_offset_minutes: i32,
    pub http_timeout: Duration,
    /// Turns kept per conversation by the in-memory store
    pub history_limit: usize,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match get("port").or_else(|| get("PORT")) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| BotError::Config(format!("invalid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let luis = LuisConfig {
            app_id: get("LuisAppId")
                .ok_or_else(|| BotError::Config("LuisAppId is not set".to_string()))?,
            api_key: get("LuisAPIKey")
                .ok_or_else(|| BotError::Config("LuisAPIKey is not set".to_string()))?,
            host_name: get("LuisAPIHostName").unwrap_or_else(|| DEFAULT_LUIS_HOST.to_string()),
        };

        let utc_offset_minutes: i32 = match get("GREETING_UTC_OFFSET_MINUTES") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                BotError::Config(format!("invalid GREETING_UTC_OFFSET_MINUTES: {}", raw))
            })?,
            None => DEFAULT_UTC_OFFSET_MINUTES,
        };
        if utc_offset_minutes.abs() >= 24 * 60 {
            return Err(BotError::Config(format!(
                "GREETING_UTC_OFFSET_MINUTES out of range: {}",
                utc_offset_minutes
            )));
        }

        let timeout_secs: u64 = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| BotError::Config(format!("invalid HTTP_TIMEOUT_SECS: {}", raw)))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        let history_limit: usize = match get("CONVERSATION_HISTORY_LIMIT") {
            Some(raw) => raw
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    BotError::Config(format!("invalid CONVERSATION_HISTORY_LIMIT: {}", raw))
                })?,
            None => DEFAULT_HISTORY_LIMIT,
        };

        Ok(Self {
            port,
            app_id: get("MicrosoftAppId").unwrap_or_else(|| "bot".to_string()),
            luis,
            geocode_base_url: base_url(get("GEOCODE_BASE_URL"), DEFAULT_GEOCODE_BASE_URL),
            geocode_api_key: get("GOOGLE_MAPS_API_KEY"),
            weather_base_url: base_url(get("WEATHER_BASE_URL"), DEFAULT_WEATHER_BASE_URL),
            weather_api_key: get("DARKSKY_API_KEY"),
            exchange_base_url: base_url(get("EXCHANGE_BASE_URL"), DEFAULT_EXCHANGE_BASE_URL),
            exchange_app_id: get("EXCHANGE_RATES_APP_ID"),
            utc_offset_minutes,
            http_timeout: Duration::from_secs(timeout_secs),
            history_limit,
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            BotConfig::from_lookup(lookup(&[("LuisAppId", "app"), ("LuisAPIKey", "secret")]))
                .unwrap();

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.luis.host_name, DEFAULT_LUIS_HOST);
        assert_eq!(
            config.luis.endpoint(),
            "https://westus.api.cognitive.microsoft.com/luis/v2.0/apps/app"
        );
        assert_eq!(config.utc_offset_minutes, 330);
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert!(config.weather_api_key.is_none());
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_missing_luis_credentials() {
        let err = BotConfig::from_lookup(lookup(&[("LuisAppId", "app")])).unwrap_err();
        assert!(matches!(err, BotError::Config(msg) if msg.contains("LuisAPIKey")));
    }

    #[test]
    fn test_overrides() {
        let config = BotConfig::from_lookup(lookup(&[
            ("LuisAppId", "app"),
            ("LuisAPIKey", "secret"),
            ("PORT", "8080"),
            ("WEATHER_BASE_URL", "http://localhost:9000/"),
            ("GREETING_UTC_OFFSET_MINUTES", "-300"),
            ("DARKSKY_API_KEY", "  "),
            ("CONVERSATION_HISTORY_LIMIT", "10"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.weather_base_url, "http://localhost:9000");
        assert_eq!(config.utc_offset_minutes, -300);
        assert!(config.weather_api_key.is_none());
        assert_eq!(config.history_limit, 10);
    }

    #[test]
    fn test_zero_history_limit_rejected() {
        let err = BotConfig::from_lookup(lookup(&[
            ("LuisAppId", "app"),
            ("LuisAPIKey", "secret"),
            ("CONVERSATION_HISTORY_LIMIT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::Config(msg) if msg.contains("CONVERSATION_HISTORY_LIMIT")));
    }

    #[test]
    fn test_invalid_port() {
        let err = BotConfig::from_lookup(lookup(&[
            ("LuisAppId", "app"),
            ("LuisAPIKey", "secret"),
            ("port", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, BotError::Config(_)));
    }
}
