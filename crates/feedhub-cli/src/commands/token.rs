//! Development token minting.

use clap::Args;
use uuid::Uuid;

use crate::output;
use feedhub_auth::JwtEncoder;
use feedhub_core::config::AppConfig;
use feedhub_core::error::AppError;

/// Arguments for the token command
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// User ID to put in `sub`; random when omitted
    #[arg(long)]
    pub user_id: Option<Uuid>,
    /// Email claim
    #[arg(long)]
    pub email: Option<String>,
}

/// Print a token signed with the configured secret
pub fn execute(args: &TokenArgs, config: &AppConfig) -> Result<(), AppError> {
    let user_id = args.user_id.unwrap_or_else(Uuid::new_v4);
    let (token, expires_at) = JwtEncoder::new(&config.auth).issue(user_id, args.email.as_deref())?;

    output::print_kv("user_id", &user_id.to_string());
    output::print_kv("expires_at", &expires_at.to_rfc3339());
    println!();
    println!("{token}");
    Ok(())
}
