//! Staging downloads from the Telegram file API

use std::path::Path;

use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::FileId;

use crate::core::error::AppResult;

/// Downloads a Telegram file to `dest_path`.
///
/// # Arguments
/// * `bot` - Bot instance
/// * `file_id` - Telegram file_id to download
/// * `dest_path` - Where to write the file (parent directory must exist)
pub async fn download_file_from_telegram(bot: &Bot, file_id: &str, dest_path: &Path) -> AppResult<()> {
    let file = bot.get_file(FileId(file_id.to_string())).await?;
    log::info!(
        "📥 Downloading file {} ({} bytes) to {}",
        file_id,
        file.size,
        dest_path.display()
    );

    let mut dst = tokio::fs::File::create(dest_path).await?;
    bot.download_file(&file.path, &mut dst).await?;

    Ok(())
}
