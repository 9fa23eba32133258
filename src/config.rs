// src/config.rs
use std::env;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Seconds an open auction waits for a higher bid.
    pub countdown_secs: i64,
    /// How often open auctions are checked for an elapsed countdown.
    pub poll_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            countdown_secs: 10,
            poll_millis: 500,
        }
    }
}

fn parse_var<T: FromStr>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(text) => text
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidValue { name, value: text }),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            host: lookup("AUCTION_HOST").unwrap_or(defaults.host),
            port: parse_var("AUCTION_PORT", lookup("AUCTION_PORT"), defaults.port)?,
            countdown_secs: parse_var("AUCTION_COUNTDOWN_SECS", lookup("AUCTION_COUNTDOWN_SECS"), defaults.countdown_secs)?,
            poll_millis: parse_var("AUCTION_POLL_MILLIS", lookup("AUCTION_POLL_MILLIS"), defaults.poll_millis)?,
        };
        if config.countdown_secs <= 0 {
            return Err(ConfigError::InvalidValue {
                name: "AUCTION_COUNTDOWN_SECS",
                value: config.countdown_secs.to_string(),
            });
        }
        if config.poll_millis == 0 {
            return Err(ConfigError::InvalidValue {
                name: "AUCTION_POLL_MILLIS",
                value: "0".to_string(),
            });
        }
        Ok(config)
    }
}
