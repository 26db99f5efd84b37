use banking_chat_assistant::{
    api::start_server,
    assistant::FallbackAssistant,
    config::AppConfig,
    interpreter::CommandInterpreter,
    store::{AccountStore, SqliteAccountStore},
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();
    let config = AppConfig::from_env();

    info!("Banking Chat Assistant - API Server");
    info!("Port: {}", config.port);
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set; running in fallback-only mode");
    }

    // Bootstrap the account store
    let store = SqliteAccountStore::connect(&config.database_url).await?;
    store.ensure_schema().await?;
    store.seed_demo_account().await?;
    let store: Arc<dyn AccountStore> = Arc::new(store);

    // Create the interpreter
    let assistant = FallbackAssistant::new(config.openai_api_key.clone());
    let interpreter = Arc::new(CommandInterpreter::new(store.clone(), assistant));

    info!("Interpreter initialized");
    info!("Starting API server...");

    start_server(interpreter, store, config.port).await?;

    Ok(())
}
