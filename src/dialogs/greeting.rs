//! Greeting dialog
//!
//! With a time-of-day entity the reply is a greeting for the local hour;
//! otherwise the bot answers plain "hi"/"hello" and echoes anything else.

use super::Dialog;
use crate::models::{roles, ClassificationResult};
use crate::session::Session;
use crate::Result;
use chrono::{DateTime, Duration, Timelike, Utc};
use std::sync::Arc;

/// Ordered `[lower, upper)` hour ranges. Hours outside every range are night.
const TIME_BUCKETS: &[(u32, u32, &str)] = &[
    (5, 12, "Good Morning"),
    (12, 16, "Good Afternoon"),
    (16, 20, "Good Evening"),
];

const NIGHT: &str = "Good Night";

const GREETING_TOKENS: &[&str] = &["hi", "hello"];

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn greeting_for_hour(hour: u32) -> &'static str {
    TIME_BUCKETS
        .iter()
        .find(|(lower, upper, _)| *lower <= hour && hour < *upper)
        .map(|(_, _, label)| *label)
        .unwrap_or(NIGHT)
}

pub struct GreetingDialog {
    clock: Arc<dyn Clock>,
    utc_offset_minutes: i32,
}

impl GreetingDialog {
    pub fn new(clock: Arc<dyn Clock>, utc_offset_minutes: i32) -> Self {
        Self {
            clock,
            utc_offset_minutes,
        }
    }

    /// Server time shifted by the configured offset.
    fn local_now(&self) -> DateTime<Utc> {
        self.clock.now() + Duration::minutes(i64::from(self.utc_offset_minutes))
    }
}

#[async_trait::async_trait]
impl Dialog for GreetingDialog {
    fn name(&self) -> &'static str {
        "GreetingDialog"
    }

    async fn run(&self, session: &mut Session, args: &ClassificationResult) -> Result<()> {
        if args.entity(roles::TIME_OF_DAY).is_some() {
            let now = self.local_now();
            session.send(format!(
                "Time is now {}, {}",
                now.format("%H:%M:%S"),
                greeting_for_hour(now.hour())
            ));
            return Ok(());
        }

        let text = session.message_text().trim().to_lowercase();
        if GREETING_TOKENS.contains(&text.as_str()) {
            session.send("Yo!");
        } else {
            let reply = format!("You said '{}'.", session.message_text());
            session.send(reply);
        }

        Ok(())
    }
}
