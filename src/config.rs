//! Environment configuration.

use std::env;
use thiserror::Error;

use crate::payment::sumup::{SumUpOptions, DEFAULT_BASE_URL};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub nats_url: Option<String>,
    pub sumup: SumUpOptions,
    pub notification_admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            Err(_) => 9000,
        };
        let database_url = required("DATABASE_URL")?;
        let sumup = SumUpOptions {
            api_key: required("SUMUP_API_KEY")?,
            merchant_code: required("SUMUP_MERCHANT_CODE")?,
            base_url: optional("SUMUP_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        Ok(Self {
            port,
            database_url,
            nats_url: optional("NATS_URL"),
            sumup,
            notification_admin_email: optional("NOTIFICATION_ADMIN_EMAIL"),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

/// Blank values count as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
