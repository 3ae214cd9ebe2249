use intent_bot::{
    api::{start_server, Bot},
    BotConfig,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env()?;

    info!("Intent Bot - API Server");
    info!("Port: {}", config.port);
    info!("LUIS host: {}", config.luis.host_name);

    let bot = Arc::new(Bot::from_config(&config)?);
    info!("Dialogs registered: {:?}", bot.dialogs.intents());

    start_server(bot, config.port).await?;

    Ok(())
}
