use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only malformed values are fatal; everything has a usable default.
#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string. When absent the service runs on in-memory stores.
    pub database_url: Option<String>,
    /// Anthropic key for the AI collaborators. When absent every collaborator call
    /// degrades to its fallback value.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Upper bound on any single collaborator call.
    pub collaborator_timeout: Duration,
    /// `true` = re-answering a question overwrites it, `false` = rejected as invalid state.
    pub allow_answer_resubmission: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            collaborator_timeout: Duration::from_secs(30),
            allow_answer_resubmission: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: match optional_env("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            collaborator_timeout: match optional_env("COLLABORATOR_TIMEOUT_SECS") {
                Some(secs) => Duration::from_secs(
                    secs.parse::<u64>()
                        .context("COLLABORATOR_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => defaults.collaborator_timeout,
            },
            allow_answer_resubmission: match optional_env("ALLOW_ANSWER_RESUBMISSION") {
                Some(flag) => parse_flag(&flag).with_context(|| {
                    format!("ALLOW_ANSWER_RESUBMISSION must be true or false, got '{flag}'")
                })?,
                None => defaults.allow_answer_resubmission,
            },
        })
    }
}

/// Reads an env var, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("unrecognised boolean"),
    }
}
