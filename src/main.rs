//! # Main Entry Point
//!
//! Initializes the application:
//! - Configuration (`data/config.yaml`)
//! - Logging (file + console)
//! - Record store (SQLite)
//! - Telegram dispatcher

mod config;
mod event;
mod form;
mod services;
mod state;
mod store;
mod strings;

use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::services::telegram::TelegramService;
use crate::state::BotState;
use crate::store::ProjectStore;

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    Start,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load Configuration
    let config = AppConfig::load("data/config.yaml")?;

    // 2. Logging Setup
    if !std::path::Path::new("data").exists() {
        fs::create_dir("data").context("Failed to create data directory")?;
    }

    // Clear previous session log
    let log_path = std::path::Path::new("data/session.log");
    if log_path.exists() {
        let _ = fs::remove_file(log_path);
    }

    let file_appender = tracing_appender::rolling::never("data", "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new("info,teloxide=warn,hyper=warn,reqwest=warn,sqlx=warn")
        });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting portfolio bot...");

    // 3. Record Store
    let store = ProjectStore::connect(&config.storage.database_path)
        .await
        .context("Failed to open project database")?;
    store
        .ensure_schema()
        .await
        .context("Failed to create projects table")?;
    tracing::info!("Projects table ready at {}", config.storage.database_path);

    // 4. Conversation State
    let state = Arc::new(Mutex::new(BotState::default()));

    // 5. Telegram Setup
    let token = config.services.telegram.resolve_token()?;
    let bot = Bot::new(token);

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state, Arc::new(store)])
        .default_handler(|_upd| async {})
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Failed to handle update",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    state: Arc<Mutex<BotState>>,
) -> Result<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    match cmd {
        Command::Start => {
            tracing::info!("/start from user {}", user.id);
            let chat = TelegramService::new(bot, msg.chat.id, user.id.0 as i64);
            form::start(&state, &chat).await
        }
    }
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    state: Arc<Mutex<BotState>>,
    store: Arc<ProjectStore>,
) -> Result<()> {
    let Some(user) = msg.from() else {
        return Ok(());
    };

    // Messages outside an active conversation are ignored; /start opens one.
    let conversation_active = {
        let guard = state.lock().await;
        guard
            .chats
            .get(&msg.chat.id.0)
            .and_then(|c| c.form.as_ref())
            .is_some()
    };
    if !conversation_active {
        return Ok(());
    }

    let chat = TelegramService::new(bot, msg.chat.id, user.id.0 as i64);
    let Some(event) = chat.extract_event(&msg).await else {
        return Ok(());
    };

    form::handle_event(&store, &state, &chat, event).await
}
