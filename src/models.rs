//! Core data models for the intent bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::BotError;
use crate::Result;

//
// ================= Intents & Roles =================
//

pub mod intents {
    pub const GREETING: &str = "Greeting";
    pub const HELP: &str = "Help";
    pub const CANCEL: &str = "Cancel";
    pub const WEATHER: &str = "Weather.GetForecast";
    pub const CURRENCY: &str = "Currency.Exchange";
    pub const NONE: &str = "None";
}

/// Entity roles the dialogs read. These match the entity types of the LUIS app.
pub mod roles {
    pub const TIME_OF_DAY: &str = "TimeOfDay";
    pub const LOCATION: &str = "Weather.Location";
    pub const CURRENCY_CODE: &str = "Currency.Code";
    pub const CURRENCY_AMOUNT: &str = "Currency.Amount";
}

//
// ================= Classification =================
//

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub role: String,
    pub value: String,
}

impl Entity {
    pub fn new(role: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: String,
    pub score: Option<f64>,
    pub entities: Vec<Entity>,
}

impl ClassificationResult {
    pub fn new(intent: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            intent: intent.into(),
            score: None,
            entities,
        }
    }

    /// Result used when nothing could be recognised.
    pub fn none() -> Self {
        Self::new(intents::NONE, Vec::new())
    }

    /// First entity tagged with `role`
    pub fn entity(&self, role: &str) -> Option<&str> {
        self.entities
            .iter()
            .find(|e| e.role == role)
            .map(|e| e.value.as_str())
    }

    /// Like [`entity`](Self::entity), but a missing role is an `InvalidEntities` error.
    pub fn require(&self, role: &str) -> Result<&str> {
        self.entity(role)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| BotError::InvalidEntities(format!("missing '{}' entity", role)))
    }
}

//
// ================= External API Results =================
//

#[derive(Debug, Clone, PartialEq)]
pub struct GeoLocation {
    pub formatted_address: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReading {
    pub temperature: f64,
    pub apparent_temperature: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangeRates {
    pub base: String,
    pub rates: HashMap<String, f64>,
}

//
// ================= Activity Envelope =================
//

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,
}

/// Inbound / outbound activity, a subset of the Bot Framework schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
}

impl Activity {
    pub fn is_message(&self) -> bool {
        self.activity_type == "message"
    }

    /// Outbound message replying to this activity, sent as `bot_id`.
    pub fn reply(&self, bot_id: &str, text: String) -> Activity {
        Activity {
            activity_type: "message".to_string(),
            id: Some(Uuid::new_v4().to_string()),
            text: Some(text),
            conversation: self.conversation.clone(),
            from: ChannelAccount {
                id: bot_id.to_string(),
                name: None,
            },
            recipient: Some(self.from.clone()),
            reply_to_id: self.id.clone(),
        }
    }
}

//
// ================= Conversation History =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn_id: Uuid,
    pub conversation_id: String,
    pub utterance: String,
    pub intent: String,
    pub dialog: String,
    pub replies: Vec<String>,
    pub created_at: DateTime<Utc>,
}
