//! Logging initialization and configuration checking
//!
//! This module provides:
//! - Logger initialization (console + file)
//! - Google backend configuration validation and logging
//! - Startup diagnostics

use anyhow::Result;
use serde::Deserialize;
use simplelog::*;
use std::fs::File;

use crate::core::config;

/// The only key fields worth surfacing in startup diagnostics
#[derive(Debug, Deserialize)]
struct ServiceAccountInfo {
    client_email: Option<String>,
    project_id: Option<String>,
}

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to initialize logger
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Logs Google backend configuration at application startup
///
/// Validates and logs:
/// - GOOGLE_JSON presence and whether it parses as JSON
/// - DRIVE_FOLDER_ID root folder
/// - SHEET_NAME target spreadsheet
/// - POP_DIR staging directory
pub fn log_google_configuration() {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("📋 Google Backend Configuration Check");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if config::GOOGLE_JSON.is_empty() {
        log::error!("❌ GOOGLE_JSON: not set");
        log::error!("   Drive uploads and Sheet logging will FAIL without credentials!");
        log::error!("   Export the service-account key JSON in GOOGLE_JSON");
    } else {
        match serde_json::from_str::<ServiceAccountInfo>(&config::GOOGLE_JSON) {
            Ok(info) => {
                log::info!("✅ GOOGLE_JSON: set ({} bytes)", config::GOOGLE_JSON.len());
                log::info!(
                    "   Service account: {}",
                    info.client_email.as_deref().unwrap_or("<missing client_email>")
                );
                if let Some(project) = info.project_id.as_deref() {
                    log::info!("   Project: {}", project);
                }
                log::info!("   Share the root folder and the sheet with this account");
            }
            Err(e) => {
                log::error!("❌ GOOGLE_JSON: set but not valid JSON: {}", e);
            }
        }
    }

    log::info!("📁 DRIVE_FOLDER_ID: {}", config::DRIVE_FOLDER_ID.as_str());
    log::info!("📊 SHEET_NAME: {}", config::SHEET_NAME.as_str());
    log::info!("📂 POP_DIR: {}", config::POP_DIR.as_str());

    if config::BOT_TOKEN.is_empty() {
        log::error!("❌ BOT_TOKEN: not set (also checked TELOXIDE_TOKEN)");
    } else {
        log::info!("✅ BOT_TOKEN: set");
    }

    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}
