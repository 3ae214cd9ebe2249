//! Intent Bot
//!
//! A webhook-driven conversational agent that:
//! - Receives user utterances forwarded by a bot-hosting service
//! - Classifies each utterance's intent through LUIS
//! - Dispatches to exactly one dialog per turn (default dialog on no match)
//! - Answers weather and currency questions from external HTTP APIs
//!
//! TURN LOOP:
//! RECEIVE → CLASSIFY → DISPATCH → REPLY → END TURN

pub mod api;
pub mod classifier;
pub mod clients;
pub mod config;
pub mod dialogs;
pub mod error;
pub mod models;
pub mod session;
pub mod state;

pub use error::Result;

// Re-export common types
pub use classifier::{IntentClassifier, LuisClassifier};
pub use config::BotConfig;
pub use dialogs::{create_default_registry, Dialog, DialogRegistry, DialogServices};
pub use models::*;
pub use session::Session;
