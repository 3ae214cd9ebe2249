//! HTTP surface of the bot
//!
//! Receives activities from the hosting service, classifies and dispatches
//! them, and returns the reply activities in the response body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::classifier::{IntentClassifier, LuisClassifier};
use crate::clients::{build_http_client, DarkSkyClient, GoogleGeocodingClient, OpenExchangeRatesClient};
use crate::config::BotConfig;
use crate::dialogs::{create_default_registry, DialogRegistry, DialogServices, SystemClock};
use crate::models::{Activity, ClassificationResult, TurnRecord};
use crate::session::Session;
use crate::state::{ConversationStore, InMemoryConversationStore};
use crate::Result;

/// =============================
/// Response Wrapper
/// =============================

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub error: Option<String>,
    pub timestamp: String,
}

impl ApiResponse {
    pub fn success<T: Serialize>(data: T) -> Self {
        Self {
            success: true,
            data: serde_json::to_value(data).ok(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// =============================
/// Bot Runtime
/// =============================

/// Everything needed to process one turn. Built once at start-up.
pub struct Bot {
    pub app_id: String,
    pub classifier: Arc<dyn IntentClassifier>,
    pub dialogs: Arc<DialogRegistry>,
    pub store: Arc<dyn ConversationStore>,
}

/// Outcome of one processed turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub intent: String,
    pub dialog: &'static str,
    pub replies: Vec<String>,
}

impl Bot {
    /// Wire the HTTP-backed collaborators described by `config`.
    pub fn from_config(config: &BotConfig) -> Result<Self> {
        let http = build_http_client(config.http_timeout)?;

        let services = DialogServices {
            geocoder: Arc::new(GoogleGeocodingClient::new(
                http.clone(),
                config.geocode_base_url.clone(),
                config.geocode_api_key.clone(),
            )),
            weather: Arc::new(DarkSkyClient::new(
                http.clone(),
                config.weather_base_url.clone(),
                config.weather_api_key.clone(),
            )),
            exchange: Arc::new(OpenExchangeRatesClient::new(
                http.clone(),
                config.exchange_base_url.clone(),
                config.exchange_app_id.clone(),
            )),
            clock: Arc::new(SystemClock),
            utc_offset_minutes: config.utc_offset_minutes,
        };

        Ok(Self {
            app_id: config.app_id.clone(),
            classifier: Arc::new(LuisClassifier::new(http, config.luis.clone())),
            dialogs: Arc::new(create_default_registry(services)),
            store: Arc::new(InMemoryConversationStore::with_history_limit(
                config.history_limit,
            )),
        })
    }

    /// Classify `text`, run the matching dialog and record the turn.
    pub async fn handle_message(&self, conversation_id: &str, text: &str) -> TurnOutcome {
        let classification = match self.classifier.classify(text).await {
            Ok(result) => result,
            Err(e) => {
                warn!(conversation_id, error = %e, "Classification failed, using default dialog");
                ClassificationResult::none()
            }
        };

        let mut session = Session::new(conversation_id, text);
        let dialog = self.dialogs.dispatch(&mut session, &classification).await;
        let replies = session.into_replies();

        info!(
            conversation_id,
            intent = %classification.intent,
            dialog,
            replies = replies.len(),
            "Turn complete"
        );

        let record = TurnRecord {
            turn_id: Uuid::new_v4(),
            conversation_id: conversation_id.to_string(),
            utterance: text.to_string(),
            intent: classification.intent.clone(),
            dialog: dialog.to_string(),
            replies: replies.clone(),
            created_at: chrono::Utc::now(),
        };
        if let Err(e) = self.store.record_turn(record).await {
            error!(conversation_id, error = %e, "Failed to record turn");
        }

        TurnOutcome {
            intent: classification.intent,
            dialog,
            replies,
        }
    }
}

/// =============================
/// API State
/// =============================

#[derive(Clone)]
pub struct ApiState {
    pub bot: Arc<Bot>,
}

/// =============================
/// Health Endpoint
/// =============================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// =============================
/// Messages Endpoint
/// =============================

async fn messages_handler(
    State(state): State<ApiState>,
    Json(activity): Json<Activity>,
) -> (StatusCode, Json<ApiResponse>) {
    if !activity.is_message() {
        info!(activity_type = %activity.activity_type, "Ignoring non-message activity");
        return (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({ "activities": [] }))),
        );
    }

    let conversation_id = activity.conversation.id.trim();
    if conversation_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("conversation.id is required".into())),
        );
    }

    let text = activity.text.as_deref().unwrap_or_default();
    info!(conversation_id, "Received message");

    let outcome = state.bot.handle_message(conversation_id, text).await;

    let activities: Vec<Activity> = outcome
        .replies
        .into_iter()
        .map(|reply| activity.reply(&state.bot.app_id, reply))
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "intent": outcome.intent,
            "dialog": outcome.dialog,
            "activities": activities,
        }))),
    )
}

/// =============================
/// Conversation History Endpoint
/// =============================

async fn conversation_turns(
    State(state): State<ApiState>,
    Path(conversation_id): Path<String>,
) -> (StatusCode, Json<ApiResponse>) {
    match state.bot.store.load_turns(&conversation_id).await {
        Ok(turns) => (StatusCode::OK, Json(ApiResponse::success(turns))),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(format!("Failed to load turns: {}", e))),
        ),
    }
}

/// =============================
/// Router
/// =============================

pub fn create_router(bot: Arc<Bot>) -> Router {
    let state = ApiState { bot };

    Router::new()
        .route("/health", get(health))
        .route("/api/messages", post(messages_handler))
        .route("/api/conversations/:id/turns", get(conversation_turns))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// =============================
/// Server Startup
/// =============================

pub async fn start_server(
    bot: Arc<Bot>,
    port: u16,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let router = create_router(bot);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!("Bot listening on http://0.0.0.0:{}/api/messages", port);

    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialogs::testing::{services, StubGeocoder, StubWeather};
    use crate::error::BotError;
    use crate::models::{roles, Entity};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct StubClassifier;

    #[async_trait::async_trait]
    impl IntentClassifier for StubClassifier {
        async fn classify(&self, utterance: &str) -> Result<ClassificationResult> {
            if utterance.contains("weather") {
                Ok(ClassificationResult::new(
                    "Weather.GetForecast",
                    vec![Entity::new(roles::LOCATION, "Paris")],
                ))
            } else if utterance == "boom" {
                Err(BotError::Classifier("LUIS returned 401 Unauthorized".into()))
            } else {
                Ok(ClassificationResult::new("Help", vec![]))
            }
        }
    }

    fn bot() -> Arc<Bot> {
        Arc::new(Bot {
            app_id: "bot-1".to_string(),
            classifier: Arc::new(StubClassifier),
            dialogs: Arc::new(create_default_registry(services(
                StubGeocoder::with_status("OK"),
                StubWeather::reading(15.0, 13.0),
            ))),
            store: Arc::new(InMemoryConversationStore::new()),
        })
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn message(text: &str) -> Request<Body> {
        let body = serde_json::json!({
            "type": "message",
            "id": "act-1",
            "text": text,
            "conversation": { "id": "conv-1" },
            "from": { "id": "user-1" }
        });
        Request::post("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_weather_message_end_to_end() {
        let (status, json) = send(create_router(bot()), message("weather in Paris")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["intent"], "Weather.GetForecast");

        let activities = json["data"]["activities"].as_array().unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0]["text"], "Location: Paris, France");
        assert_eq!(activities[1]["text"], "Temperature is 15 but feels like 13");
        assert_eq!(activities[1]["replyToId"], "act-1");
        assert_eq!(activities[1]["from"]["id"], "bot-1");
    }

    #[tokio::test]
    async fn test_classifier_failure_falls_back_to_default() {
        let bot = bot();
        let outcome = bot.handle_message("conv-9", "boom").await;

        assert_eq!(outcome.intent, "None");
        assert_eq!(outcome.dialog, "DefaultDialog");
        assert_eq!(
            outcome.replies,
            vec!["You reached the default message handler. You said 'boom'."]
        );
    }

    #[tokio::test]
    async fn test_turns_are_recorded() {
        let bot = bot();
        let router = create_router(bot.clone());

        send(router.clone(), message("help")).await;
        send(router.clone(), message("weather in Paris")).await;

        let request = Request::get("/api/conversations/conv-1/turns")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        let turns = json["data"].as_array().unwrap();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0]["dialog"], "HelpDialog");
        assert_eq!(turns[1]["intent"], "Weather.GetForecast");
    }

    #[tokio::test]
    async fn test_non_message_activity_is_acknowledged() {
        let body = serde_json::json!({
            "type": "conversationUpdate",
            "conversation": { "id": "conv-1" },
            "from": { "id": "user-1" }
        });
        let request = Request::post("/api/messages")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let (status, json) = send(create_router(bot()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["data"]["activities"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_health_blocking() {
        let Json(body) = tokio_test::block_on(health());
        assert_eq!(body["status"], "healthy");
    }
}
