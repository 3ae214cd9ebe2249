use intent_bot::{api::Bot, BotConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Local console channel: one utterance per line on stdin, replies on stdout.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = BotConfig::from_env()?;
    let bot = Bot::from_config(&config)?;

    let conversation_id = format!("console-{}", Uuid::new_v4());
    info!(conversation_id = %conversation_id, "Console session started");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let outcome = bot.handle_message(&conversation_id, text).await;
        for reply in outcome.replies {
            println!("bot> {}", reply);
        }
    }

    Ok(())
}
