// Application configuration loaded from environment variables

use thiserror::Error;

use crate::member::token::{DEFAULT_TOKEN_TTL_SECONDS, MAX_TOKEN_TTL_SECONDS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings for the server
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    /// Lifetime of issued tokens and of the token cookie
    pub token_ttl_seconds: i64,
    /// Adds the `Secure` attribute to the token cookie
    pub cookie_secure: bool,
}

impl Config {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`, which returns a variable's value if set
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port = match lookup("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value })?,
            None => 8080,
        };

        let token_ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(value) => match value.parse::<i64>() {
                Ok(ttl) if ttl > 0 && ttl <= MAX_TOKEN_TTL_SECONDS => ttl,
                _ => return Err(ConfigError::Invalid { key: "TOKEN_TTL_SECONDS", value }),
            },
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|_| ConfigError::Invalid { key: "COOKIE_SECURE", value })?,
            None => false,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            token_ttl_seconds,
            cookie_secure,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
