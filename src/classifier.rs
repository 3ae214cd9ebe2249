//! Intent classification
//!
//! Sends the raw utterance to a LUIS v2 application and turns the top-scoring
//! intent plus its entities into a [`ClassificationResult`].

use crate::config::LuisConfig;
use crate::error::BotError;
use crate::models::{ClassificationResult, Entity};
use crate::Result;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error};

#[async_trait::async_trait]
pub trait IntentClassifier: Send + Sync {
    async fn classify(&self, utterance: &str) -> Result<ClassificationResult>;
}

pub struct LuisClassifier {
    client: Client,
    config: LuisConfig,
}

impl LuisClassifier {
    pub fn new(client: Client, config: LuisConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait::async_trait]
impl IntentClassifier for LuisClassifier {
    async fn classify(&self, utterance: &str) -> Result<ClassificationResult> {
        let response = self
            .client
            .get(self.config.endpoint())
            .query(&[
                ("subscription-key", self.config.api_key.as_str()),
                ("verbose", "false"),
                ("q", utterance),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("LUIS request failed: {}", e);
                BotError::Classifier(format!("LUIS request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("LUIS error response ({}): {}", status, body);
            return Err(BotError::Classifier(format!("LUIS returned {}", status)));
        }

        let luis: LuisResponse = response.json().await.map_err(|e| {
            error!("Failed to parse LUIS response: {}", e);
            BotError::Classifier(format!("LUIS parse error: {}", e))
        })?;

        let result = luis.into_classification();
        debug!(
            intent = %result.intent,
            entities = result.entities.len(),
            "Utterance classified"
        );
        Ok(result)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LuisResponse {
    top_scoring_intent: Option<LuisIntent>,
    #[serde(default)]
    entities: Vec<LuisEntity>,
}

#[derive(Debug, Deserialize)]
struct LuisIntent {
    intent: String,
    score: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LuisEntity {
    entity: String,
    #[serde(rename = "type")]
    entity_type: String,
}

impl LuisResponse {
    fn into_classification(self) -> ClassificationResult {
        let entities = self
            .entities
            .into_iter()
            .map(|e| Entity::new(e.entity_type, e.entity))
            .collect();

        match self.top_scoring_intent {
            Some(top) => ClassificationResult {
                intent: top.intent,
                score: top.score,
                entities,
            },
            None => ClassificationResult {
                entities,
                ..ClassificationResult::none()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{intents, roles};

    #[test]
    fn test_luis_response_mapping() {
        let luis: LuisResponse = serde_json::from_value(serde_json::json!({
            "query": "what's the weather in paris",
            "topScoringIntent": { "intent": "Weather.GetForecast", "score": 0.97 },
            "entities": [
                {
                    "entity": "paris",
                    "type": "Weather.Location",
                    "startIndex": 22,
                    "endIndex": 26,
                    "score": 0.91
                }
            ]
        }))
        .unwrap();

        let result = luis.into_classification();
        assert_eq!(result.intent, intents::WEATHER);
        assert_eq!(result.score, Some(0.97));
        assert_eq!(result.entity(roles::LOCATION), Some("paris"));
    }

    #[test]
    fn test_missing_top_intent_maps_to_none() {
        let luis: LuisResponse =
            serde_json::from_value(serde_json::json!({ "query": "zzz" })).unwrap();

        let result = luis.into_classification();
        assert_eq!(result.intent, intents::NONE);
        assert!(result.entities.is_empty());
    }
}
