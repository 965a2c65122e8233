use dotenvy::dotenv;
use std::sync::Arc;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;

use teleshelf::cli::{Cli, Commands};
use teleshelf::core::{config, init_logger, AppResult};
use teleshelf::registry::FolderRegistry;
use teleshelf::session::InMemorySessions;
use teleshelf::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// Parses CLI arguments and dispatches to the appropriate subcommand.
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse_args();

    // Catch panics escaping the dispatcher so they get logged instead of
    // silently killing the process output
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    match cli.command {
        Some(Commands::Stats) => run_stats(),
        Some(Commands::Run) | None => run_bot().await,
    }
}

/// Print registry statistics and exit
fn run_stats() -> AppResult<()> {
    let registry = FolderRegistry::open(&config::DATABASE_PATH)?;
    let stats = registry.stats()?;
    println!("Folders: {}", stats.folders);
    println!("Files:   {}", stats.files);
    Ok(())
}

/// Run the bot until shutdown
async fn run_bot() -> AppResult<()> {
    // Without an admin identity every write path is dead; refuse to start
    let Some(admin) = config::ADMIN_USERNAME.as_deref() else {
        return Err(anyhow::anyhow!("ADMIN_USERNAME environment variable not set").into());
    };
    log::info!("Admin identity: @{}", admin);

    let registry = Arc::new(FolderRegistry::open(&config::DATABASE_PATH)?);
    log::info!("Registry opened at {}", config::DATABASE_PATH.as_str());

    let sessions = Arc::new(InMemorySessions::new());
    let deps = HandlerDeps::new(registry, sessions);

    let bot = create_bot()?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    log::info!("Starting dispatcher...");
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher shutdown gracefully");
    Ok(())
}
