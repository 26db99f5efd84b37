use banking_chat_assistant::{
    assistant::FallbackAssistant,
    interpreter::{ChatOutcome, CommandInterpreter},
    store::{AccountStore, SqliteAccountStore},
};
use std::sync::Arc;
use tracing::info;

/// Offline walkthrough: runs a scripted conversation against an in-memory
/// store with the canned-reply assistant. No network required.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .init();

    let store = SqliteAccountStore::in_memory().await?;
    store.ensure_schema().await?;
    store.seed_demo_account().await?;
    let store: Arc<dyn AccountStore> = Arc::new(store);

    let interpreter = CommandInterpreter::new(store, FallbackAssistant::new(None));

    info!("Demo conversation starting");

    let messages = [
        "What's my balance?",
        "Transfer $50 to John",
        "Transfer $50000 to John",
        "Show my transaction history",
        "Can you help me invest?",
    ];

    println!("=== BANKING ASSISTANT DEMO ===\n");

    for message in messages {
        println!("> {}", message);

        match interpreter.handle_message("demo_user", message).await? {
            ChatOutcome::Reply(reply) => println!("{}\n", reply),
            ChatOutcome::Rejected(reason) => println!("[rejected] {}\n", reason),
            ChatOutcome::UnknownUser => println!("[error] user not found\n"),
        }
    }

    Ok(())
}
