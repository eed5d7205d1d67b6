//! Configuration inspection.

use clap::Args;

use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;
use feedhub_database::connection::mask_password;

/// Arguments for the config command
#[derive(Debug, Args)]
pub struct ConfigArgs {}

/// Print the merged configuration as JSON with secrets masked
pub fn execute(_args: &ConfigArgs, config: &AppConfig) -> Result<(), AppError> {
    let mut shown = config.clone();
    shown.database.url = mask_password(&shown.database.url);
    shown.auth.jwt_secret = "****".to_string();
    println!("{}", serde_json::to_string_pretty(&shown)?);
    Ok(())
}
