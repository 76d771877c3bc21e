//! Runtime configuration loaded from the environment (and `.env` via dotenvy).
//!
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `SECRET_KEY`: session cookie key material, at least 32 bytes (required)
//! - `MAIL_SERVER`, `MAIL_USERNAME`, `MAIL_PASSWORD`: SMTP relay (required)
//! - `MAIL_PORT`: SMTP port (default 587)
//! - `BIND_ADDR`: listen address (default `127.0.0.1:8080`)
//! - `DATABASE_MAX_CONNECTIONS`: pool size (default 5)
//! - `SESSION_COOKIE_SECURE`: send the session cookie over HTTPS only (default true;
//!   set to false for plain-HTTP local development)

use anyhow::{bail, Context, Result};
use std::env;

pub const MIN_SECRET_KEY_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub secret_key: String,
    pub session_cookie_secure: bool,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't touch the process env.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).with_context(|| format!("{} must be set", key));

        let secret_key = required("SECRET_KEY")?;
        if secret_key.len() < MIN_SECRET_KEY_LEN {
            bail!("SECRET_KEY must be at least {} bytes", MIN_SECRET_KEY_LEN);
        }

        let port: u16 = lookup("MAIL_PORT")
            .unwrap_or_else(|| "587".to_string())
            .parse()
            .context("Invalid MAIL_PORT")?;

        let database_max_connections: u32 = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "5".to_string())
            .parse()
            .context("Invalid DATABASE_MAX_CONNECTIONS")?;

        let session_cookie_secure: bool = lookup("SESSION_COOKIE_SECURE")
            .unwrap_or_else(|| "true".to_string())
            .parse()
            .context("Invalid SESSION_COOKIE_SECURE")?;

        Ok(Config {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            database_url: required("DATABASE_URL")?,
            database_max_connections,
            secret_key,
            session_cookie_secure,
            mail: MailConfig {
                host: required("MAIL_SERVER")?,
                port,
                username: required("MAIL_USERNAME")?,
                password: required("MAIL_PASSWORD")?,
            },
        })
    }
}
