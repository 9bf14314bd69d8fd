use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use sqlx::postgres::PgConnectOptions;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} env var must be set")]
    Missing(&'static str),

    #[error("{key} env var is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Looks a single variable up by name. The process environment (plus `.env`) in production,
/// a plain map in tests.
pub trait ConfigSource {
    fn get(&self, key: &str) -> Option<String>;

    fn required(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(ConfigError::Missing(key))
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw.trim().parse().map_err(|err: T::Err| ConfigError::Invalid {
                key,
                reason: err.to_string(),
            }),
            None => Ok(default),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Env;

impl ConfigSource for Env {
    fn get(&self, key: &str) -> Option<String> {
        dotenvy::var(key).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Connection parameters for the listings database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(&Env)
    }

    pub fn from_source(source: &impl ConfigSource) -> Result<Self, ConfigError> {
        Ok(Self {
            host: source.get("DB_HOST").unwrap_or_else(|| "localhost".into()),
            port: source.parse_or("DB_PORT", 5432)?,
            user: source.required("DB_USER")?,
            password: source.get("DB_PASSWORD").unwrap_or_default(),
            name: source.required("DB_NAME")?,
            max_connections: source.parse_or("DB_MAX_CONNECTIONS", 5)?,
        })
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        self.server_options().database(&self.name)
    }

    /// Options for the server's maintenance database, used while the listings database may not
    /// exist yet.
    pub fn maintenance_options(&self) -> PgConnectOptions {
        self.server_options().database("postgres")
    }

    fn server_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
    }
}
