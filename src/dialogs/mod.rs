//! Dialog trait and dispatch table
//!
//! Every classified turn runs exactly one dialog: the one registered for its
//! intent, or the default dialog. The registry is the handler boundary: dialog
//! errors become a single user-facing reply, then the turn is ended.

use crate::clients::{ExchangeRateProvider, Geocoder, WeatherProvider};
use crate::models::{intents, ClassificationResult};
use crate::session::Session;
use crate::Result;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod canned;
pub mod currency;
pub mod greeting;
pub mod weather;

pub use canned::{CancelDialog, DefaultDialog, HelpDialog};
pub use currency::CurrencyDialog;
pub use greeting::{Clock, GreetingDialog, SystemClock};
pub use weather::WeatherDialog;

/// A reply handler for one intent
#[async_trait::async_trait]
pub trait Dialog: Send + Sync {
    fn name(&self) -> &'static str;

    /// Compose and send replies. Must not end the turn itself.
    async fn run(&self, session: &mut Session, args: &ClassificationResult) -> Result<()>;
}

/// Intent → dialog table with a single fallback
pub struct DialogRegistry {
    dialogs: HashMap<String, Arc<dyn Dialog>>,
    default: Arc<dyn Dialog>,
}

impl DialogRegistry {
    pub fn new(default: Arc<dyn Dialog>) -> Self {
        Self {
            dialogs: HashMap::new(),
            default,
        }
    }

    pub fn register(&mut self, intent: &str, dialog: Arc<dyn Dialog>) {
        self.dialogs.insert(intent.to_string(), dialog);
    }

    /// Exact-match lookup; falls back to the default dialog.
    pub fn resolve(&self, intent: &str) -> Arc<dyn Dialog> {
        self.dialogs
            .get(intent)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }

    pub fn intents(&self) -> Vec<&str> {
        self.dialogs.keys().map(|s| s.as_str()).collect()
    }

    /// Run the dialog for `args.intent` to completion, then end the turn.
    ///
    /// Returns the name of the dialog that ran.
    pub async fn dispatch(&self, session: &mut Session, args: &ClassificationResult) -> &'static str {
        let dialog = self.resolve(&args.intent);
        let name = dialog.name();

        debug!(intent = %args.intent, dialog = name, "Dispatching");

        if let Err(e) = dialog.run(session, args).await {
            warn!(
                dialog = name,
                conversation_id = %session.conversation_id(),
                error = %e,
                "Dialog failed"
            );
            session.send(e.user_message());
        }

        session.end_dialog();
        name
    }
}

/// External collaborators the stock dialogs need
pub struct DialogServices {
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
    pub exchange: Arc<dyn ExchangeRateProvider>,
    pub clock: Arc<dyn Clock>,
    pub utc_offset_minutes: i32,
}

/// Build the dispatch table with every stock dialog registered.
pub fn create_default_registry(services: DialogServices) -> DialogRegistry {
    let mut registry = DialogRegistry::new(Arc::new(DefaultDialog));

    registry.register(
        intents::GREETING,
        Arc::new(GreetingDialog::new(services.clock, services.utc_offset_minutes)),
    );
    registry.register(intents::HELP, Arc::new(HelpDialog));
    registry.register(intents::CANCEL, Arc::new(CancelDialog));
    registry.register(
        intents::WEATHER,
        Arc::new(WeatherDialog::new(services.geocoder, services.weather)),
    );
    registry.register(intents::CURRENCY, Arc::new(CurrencyDialog::new(services.exchange)));

    registry
}
