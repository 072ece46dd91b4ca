use anyhow::Context;
use chrono::{TimeZone, Utc};
use clap::Subcommand;
use serde_json::json;

use crate::auth::{decode_jwt, generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Mint a bearer token for a user id")]
    Token {
        #[arg(help = "User id placed in the token subject")]
        user_id: String,
        #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Verify a bearer token and show who it belongs to")]
    Whoami {
        #[arg(help = "Bearer token")]
        token: String,
    },
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config::config().security;

    match cmd {
        AuthCommands::Token { user_id, hours } => {
            let claims = Claims::new(user_id, hours.unwrap_or(security.jwt_expiry_hours))
                .context("invalid token lifetime")?;
            let token = generate_jwt(&claims, &security.jwt_secret).context("failed to mint token")?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "token": token, "user_id": claims.sub, "expires_at": expires_at(claims.exp) })
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
        AuthCommands::Whoami { token } => {
            let claims = decode_jwt(&token, &security.jwt_secret).context("token rejected")?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "user_id": claims.sub, "expires_at": expires_at(claims.exp) })
                ),
                OutputFormat::Text => {
                    println!("User:    {}", claims.sub);
                    println!("Expires: {}", expires_at(claims.exp));
                }
            }
            Ok(())
        }
    }
}

fn expires_at(exp: i64) -> String {
    Utc.timestamp_opt(exp, 0)
        .single()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| exp.to_string())
}
