use std::{env, str::FromStr};

use thiserror::Error;

/// Upper bound for `JWT_EXPIRES_IN_DAYS`: ten years.
const MAX_TOKEN_DAYS: i64 = 3650;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Runtime settings, read from the environment (and `.env` via `dotenv` in `main`).
///
/// | Variable | Default |
/// |---|---|
/// | `DATABASE_URL` | unset: in-memory store |
/// | `DATABASE_MAX_CONNECTIONS` | `10` |
/// | `SERVER_HOST` | `127.0.0.1` |
/// | `SERVER_PORT` | `8080` |
/// | `JWT_SECRET` | required |
/// | `JWT_EXPIRES_IN_DAYS` | `30` |
/// | `BCRYPT_COST` | `10` |
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_expires_in_days: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let bcrypt_cost: u32 = parse_or(&lookup, "BCRYPT_COST", "an integer", 10)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                expected: "between 4 and 31",
                value: bcrypt_cost.to_string(),
            });
        }

        let jwt_expires_in_days: i64 =
            parse_or(&lookup, "JWT_EXPIRES_IN_DAYS", "an integer", 30)?;
        if !(1..=MAX_TOKEN_DAYS).contains(&jwt_expires_in_days) {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRES_IN_DAYS",
                expected: "between 1 and 3650 days",
                value: jwt_expires_in_days.to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                "an integer",
                10,
            )?,
            server_port: parse_or(&lookup, "SERVER_PORT", "a port number", 8080)?,
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            jwt_secret,
            jwt_expires_in_days,
            bcrypt_cost,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}
