//! Runtime settings loaded from the environment

use std::env;
use tracker_core::CurrencyPair;

const DEFAULT_DATABASE_PATH: &str = "data/volumes.db";
const DEFAULT_MAIL_FROM: &str = "cryptotracker@samburba.com";
const DEFAULT_SERVER_PORT: u16 = 8000;

/// How alerts are delivered
#[derive(Debug, Clone, PartialEq)]
pub enum MailerSettings {
    /// Write alerts to the log only
    Logging,
    /// Send real email through SendGrid
    SendGrid { api_key: String, from_email: String },
}

/// Settings shared by the API server and the one-shot refresh job
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: String,
    pub notify_emails: Vec<String>,
    pub mailer: MailerSettings,
    pub livecoin_api_base: String,
    pub tracked_pairs: Vec<CurrencyPair>,
    pub refresh_interval_secs: u64,
    pub enable_scheduler: bool,
    pub server_port: u16,
}

impl Settings {
    /// Load settings from environment variables
    ///
    /// Expects:
    /// - DATABASE_PATH: SQLite file (default `data/volumes.db`)
    /// - NOTIFY_EMAILS: comma-separated alert recipients
    /// - USE_REAL_MAILER / SENDGRID_API_KEY / MAIL_FROM: alert delivery
    /// - LIVECOIN_API_BASE: ticker upstream
    /// - TRACKED_PAIRS: comma-separated subset of the supported pairs
    /// - REFRESH_INTERVAL_SECS / ENABLE_SCHEDULER: in-process refresh loop
    /// - SERVER_PORT: HTTP port
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let notify_emails = var("NOTIFY_EMAILS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let use_real_mailer = match var("USE_REAL_MAILER") {
            Some(raw) => parse_bool("USE_REAL_MAILER", &raw)?,
            None => false,
        };

        let mailer = if use_real_mailer {
            MailerSettings::SendGrid {
                api_key: var("SENDGRID_API_KEY").ok_or(ConfigError::Missing("SENDGRID_API_KEY"))?,
                from_email: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            }
        } else {
            MailerSettings::Logging
        };

        let tracked_pairs = match var("TRACKED_PAIRS") {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|symbol| symbol.parse::<CurrencyPair>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|error| ConfigError::Invalid {
                    field: "TRACKED_PAIRS",
                    error,
                })?,
            None => CurrencyPair::ALL.to_vec(),
        };

        let refresh_interval_secs = match var("REFRESH_INTERVAL_SECS") {
            Some(raw) => parse_number("REFRESH_INTERVAL_SECS", &raw)?,
            None => 60,
        };

        let enable_scheduler = match var("ENABLE_SCHEDULER") {
            Some(raw) => parse_bool("ENABLE_SCHEDULER", &raw)?,
            None => true,
        };

        let server_port = match var("SERVER_PORT") {
            Some(raw) => parse_number("SERVER_PORT", &raw)?,
            None => DEFAULT_SERVER_PORT,
        };

        Ok(Self {
            database_path: var("DATABASE_PATH").unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            notify_emails,
            mailer,
            livecoin_api_base: var("LIVECOIN_API_BASE")
                .unwrap_or_else(|| tracker_livecoin::client::LIVECOIN_API_BASE.to_string()),
            tracked_pairs,
            refresh_interval_secs,
            enable_scheduler,
            server_port,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(field: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Ok(false),
        other => Err(ConfigError::Invalid {
            field,
            error: format!("not a boolean: {}", other),
        }),
    }
}

fn parse_number<T>(field: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        field,
        error: e.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {error}")]
    Invalid { field: &'static str, error: String },
}
