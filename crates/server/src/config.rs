//! Server configuration loaded from environment variables.
//!
//! - `HOST` - Optional. Bind address. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Bind port. Defaults to `5000`; `0` asks the OS for a
//!   free port.
//! - `TASKDECK_JWT_SECRET` - Secret used to sign bearer tokens. Debug builds
//!   fall back to a throwaway secret when unset; release builds require it.
//! - `TASKDECK_TOKEN_DAYS` - Optional. Token lifetime in days. Defaults to `30`.

use rand::RngCore;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_TOKEN_DAYS: i64 = 30;

pub const JWT_SECRET_ENV: &str = "TASKDECK_JWT_SECRET";
pub const TOKEN_DAYS_ENV: &str = "TASKDECK_TOKEN_DAYS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Secret used to sign and verify bearer tokens.
    pub jwt_secret: String,

    /// How long issued tokens stay valid.
    pub token_ttl: chrono::Duration,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{e}")))?;

        let jwt_secret = match std::env::var(JWT_SECRET_ENV) {
            Ok(value) if !value.trim().is_empty() => value,
            _ if cfg!(debug_assertions) => {
                tracing::warn!(
                    "{JWT_SECRET_ENV} is not set; using a throwaway secret, \
                     issued tokens will not survive a restart"
                );
                generate_throwaway_secret()
            }
            _ => return Err(ConfigError::MissingEnvVar(JWT_SECRET_ENV.to_string())),
        };

        let token_days: i64 = std::env::var(TOKEN_DAYS_ENV)
            .unwrap_or_else(|_| DEFAULT_TOKEN_DAYS.to_string())
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(TOKEN_DAYS_ENV.to_string(), format!("{e}")))?;
        if token_days <= 0 {
            return Err(ConfigError::InvalidValue(
                TOKEN_DAYS_ENV.to_string(),
                "must be a positive number of days".to_string(),
            ));
        }

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl: chrono::Duration::days(token_days),
        })
    }
}

fn generate_throwaway_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
