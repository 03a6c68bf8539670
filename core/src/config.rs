//! Connection settings and test credentials.
//!
//! Values come from the process environment, optionally seeded from a `.env`
//! file in the working directory.

use std::time::Duration;

use crate::client::DEFAULT_BASE_URL;
use crate::error::{ApiError, Result};
use crate::transport::DEFAULT_TIMEOUT;

pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";
pub const EMAIL_VAR: &str = "PETFRIENDS_EMAIL";
pub const PASSWORD_VAR: &str = "PETFRIENDS_PASSWORD";
pub const TIMEOUT_VAR: &str = "PETFRIENDS_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub email: String,
    pub password: String,
    pub timeout: Duration,
}

impl Settings {
    /// Loads `.env` if present, then reads the environment.
    pub fn load() -> Result<Self> {
        seed_env(dotenvy::dotenv())?;
        Self::from_env()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| ApiError::Config(format!("{name} is not set")))
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ApiError::Config(format!("{TIMEOUT_VAR} must be whole seconds, got {raw:?}")))?;
                if secs == 0 {
                    return Err(ApiError::Config(format!("{TIMEOUT_VAR} must be at least 1 second")));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            base_url: lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            email: required(EMAIL_VAR)?,
            password: required(PASSWORD_VAR)?,
            timeout,
        })
    }
}

// A missing .env file is normal; an unreadable or malformed one is not.
fn seed_env<T>(loaded: dotenvy::Result<T>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(ApiError::Config(format!("failed to load .env: {e}"))),
    }
}
