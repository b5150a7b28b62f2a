//! Telegram bot integration and handlers

pub mod bot;
pub mod files;
pub mod handlers;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use files::download_file_from_telegram;
pub use handlers::{schema, HandlerDeps, HandlerError};
