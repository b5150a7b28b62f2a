use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::prelude::*;
use teloxide::update_listeners::Polling;
use tokio::time::sleep;

use popkeeper::core::{config, init_logger, log_google_configuration};
use popkeeper::storage::credentials;
use popkeeper::storage::drive::DriveApi;
use popkeeper::storage::{GoogleDrive, GoogleSheet, SubmissionLog, SubmissionStorage};
use popkeeper::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, credentials,
/// spreadsheet resolution, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any Lazy config is read
    let _ = dotenv();

    // Set up global panic handler to catch panics in dispatcher
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Initialize logger (console + file)
    init_logger(&config::LOG_FILE_PATH)?;

    run_bot().await
}

/// Run the Telegram bot
async fn run_bot() -> Result<()> {
    log::info!("Starting bot...");

    // Log Google backend configuration at startup
    log_google_configuration();

    // Local staging directory for incoming screenshots. Created once here;
    // staged files are never cleaned up.
    tokio::fs::create_dir_all(config::POP_DIR.as_str()).await?;

    // Credential errors are fatal at startup
    if config::GOOGLE_JSON.is_empty() {
        return Err(anyhow::anyhow!("GOOGLE_JSON environment variable not set"));
    }
    let clients = credentials::build_clients(&config::GOOGLE_JSON)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to build Google clients: {}", e))?;

    let drive = Arc::new(GoogleDrive::new(clients.drive));

    // Resolve the submissions spreadsheet by name, once, like the sheet
    // handle the rest of the process reuses.
    let spreadsheet_id = drive
        .find_spreadsheet(&config::SHEET_NAME)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to look up spreadsheet '{}': {}", config::SHEET_NAME.as_str(), e))?
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Spreadsheet '{}' not found; share it with the service account",
                config::SHEET_NAME.as_str()
            )
        })?;
    log::info!("📊 Using spreadsheet {} ({})", config::SHEET_NAME.as_str(), spreadsheet_id);

    let storage = Arc::new(SubmissionStorage::new(
        Arc::clone(&drive) as Arc<dyn DriveApi>,
        config::DRIVE_FOLDER_ID.clone(),
    ));
    let log_sheet = Arc::new(SubmissionLog::new(Arc::new(GoogleSheet::new(
        clients.sheets,
        spreadsheet_id,
    ))));

    // Create bot instance
    let bot = create_bot()?;

    // Get bot information; retry while the Bot API is still warming up
    let bot_info = {
        let mut startup_retry = 0;
        loop {
            match bot.get_me().await {
                Ok(info) => break info,
                Err(e) => {
                    let err_str = e.to_string();
                    let is_retryable = err_str.contains("restart")
                        || err_str.contains("network")
                        || err_str.contains("connection")
                        || err_str.contains("timed out")
                        || err_str.contains("Connection refused");

                    startup_retry += 1;
                    if startup_retry >= config::retry::MAX_STARTUP_RETRIES || !is_retryable {
                        return Err(anyhow::anyhow!(
                            "Failed to connect to Bot API after {} retries: {}",
                            startup_retry,
                            e
                        ));
                    }

                    log::warn!(
                        "Bot API not ready (attempt {}/{}): {}. Retrying in {} seconds...",
                        startup_retry,
                        config::retry::MAX_STARTUP_RETRIES,
                        err_str,
                        config::retry::STARTUP_RETRY_DELAY_SECS
                    );
                    sleep(config::retry::startup_delay()).await;
                }
            }
        }
    };
    log::info!("Bot username: {:?}, Bot ID: {}", bot_info.username, bot_info.id);

    // Set up bot commands in the Telegram UI
    setup_bot_commands(&bot).await?;

    // Create handler dependencies for the modular schema
    let handler_deps = HandlerDeps::new(storage, log_sheet, config::POP_DIR.as_str().into());
    let handler = schema(handler_deps);

    log::info!("================================================");
    log::info!("🎉 Bot initialization complete");
    log::info!("📡 Ready to receive submissions!");
    log::info!("================================================");

    // Long polling mode; drop updates that queued up while we were down
    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler)
        .dependencies(DependencyMap::new())
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
