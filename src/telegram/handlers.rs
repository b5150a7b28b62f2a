//! Telegram bot handler tree configuration
//!
//! The handlers are organized so integration tests can exercise the same
//! pipeline as production code: the dptree endpoints stay thin and the
//! submission flow proper lives in `submission::workflow`, behind the
//! backend trait seams.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::core::error::{AppError, AppResult};
use crate::storage::{SubmissionLog, SubmissionStorage};
use crate::submission::{self, submit_saved_photo, Submission};
use crate::telegram::bot::Command;
use crate::telegram::files::download_file_from_telegram;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
///
/// Long-lived backend handles, injected rather than held as globals.
#[derive(Clone)]
pub struct HandlerDeps {
    pub storage: Arc<SubmissionStorage>,
    pub log: Arc<SubmissionLog>,
    pub staging_dir: PathBuf,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(storage: Arc<SubmissionStorage>, log: Arc<SubmissionLog>, staging_dir: PathBuf) -> Self {
        Self {
            storage,
            log,
            staging_dir,
        }
    }
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// This function returns a handler tree that can be used with teloxide's
/// Dispatcher. The same schema is used in production and in tests.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry()
        // Command handler for the two static replies
        .branch(command_handler())
        // Photo handler runs the submission workflow
        .branch(photo_handler(deps))
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("🎯 Received command: {:?} from chat {}", cmd, msg.chat.id);

            match cmd {
                Command::Start => {
                    bot.send_message(msg.chat.id, "Welcome! Use /submitpop to send your POP screenshot.")
                        .await?;
                }
                Command::Submitpop => {
                    bot.send_message(msg.chat.id, "Please send your POP screenshot now.").await?;
                }
            }
            Ok(())
        },
    ))
}

fn photo_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some())
        .endpoint(move |bot: Bot, msg: Message| {
            let deps = deps.clone();
            async move {
                // One event, one attempt: any backend failure abandons this
                // submission with a log line and no retry.
                if let Err(e) = handle_photo(&bot, &msg, &deps).await {
                    log::error!("❌ Submission failed for chat {}: {}", msg.chat.id, e);
                }
                Ok(())
            }
        })
}

/// Runs the full submission workflow for one photo message:
/// stage locally, upload to Drive, append the log row, acknowledge.
async fn handle_photo(bot: &Bot, msg: &Message, deps: &HandlerDeps) -> AppResult<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| AppError::Validation("photo message without a sender".to_string()))?;
    let handle = submission::display_handle(user.username.as_deref(), user.id.0);

    // Highest-resolution variant of the photo
    let photo = msg
        .photo()
        .unwrap_or_default()
        .iter()
        .max_by_key(|p| p.width * p.height)
        .ok_or_else(|| AppError::Validation("photo message with an empty photo list".to_string()))?;

    let filename = submission::staging_filename(&handle, &Local::now());
    let local_path = deps.staging_dir.join(&filename);
    download_file_from_telegram(bot, &photo.file.id.0, &local_path).await?;

    let submission = Submission {
        handle: handle.clone(),
        user_id: user.id.0,
        filename,
        local_path,
    };

    let link = submit_saved_photo(&deps.storage, &deps.log, &submission).await?;
    log::info!("✅ POP from {} logged: {}", handle, link);

    bot.send_message(msg.chat.id, "✅ POP received and uploaded to your folder in Drive!")
        .await?;

    Ok(())
}
