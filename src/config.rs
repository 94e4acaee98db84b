//! Service configuration from the environment (and `.env` via dotenvy).

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::fleet::requests::MAX_RENTAL_DAYS;

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Product catalog JSON
    pub catalog_path: PathBuf,
    /// Closure rules JSON; defaults apply when unset
    pub closures_path: Option<PathBuf>,
    pub currency: String,
    /// Rental duration used when a request does not name one
    pub default_duration: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            catalog_path: PathBuf::from("data/catalog.json"),
            closures_path: Some(PathBuf::from("data/closures.json")),
            currency: "EUR".to_string(),
            default_duration: 1,
        }
    }
}

impl Config {
    /// Load from process environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got '{}'", raw))?,
            None => defaults.port,
        };

        let default_duration = match lookup("DEFAULT_DURATION") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DEFAULT_DURATION must be a number, got '{}'", raw))?,
            None => defaults.default_duration,
        };
        if !(1..=MAX_RENTAL_DAYS).contains(&default_duration) {
            bail!(
                "DEFAULT_DURATION must be between 1 and {} days",
                MAX_RENTAL_DAYS
            );
        }

        let closures_path = match lookup("CLOSURES_PATH") {
            Some(raw) if raw.is_empty() => None,
            Some(raw) => Some(PathBuf::from(raw)),
            None => defaults.closures_path,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            catalog_path: lookup("CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.catalog_path),
            closures_path,
            currency: lookup("CURRENCY").unwrap_or(defaults.currency),
            default_duration,
        })
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
