use std::env;

use crate::error::ConfigError;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Apply pending schema migrations at startup
    pub auto_migrate: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// `DATABASE_URL` wins when set; otherwise the URL is assembled from the
    /// individual `DB_*` variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = parse_or("DB_PORT", lookup("DB_PORT"), 5432)?;
                let user = lookup("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let name = lookup("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?;
                match lookup("DB_PASSWORD") {
                    Some(password) => {
                        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
                    }
                    None => format!("postgres://{}@{}:{}/{}", user, host, port, name),
                }
            }
        };

        Ok(Self {
            database_url,
            port: parse_or("PORT", lookup("PORT"), 8080)?,
            auto_migrate: parse_or("AUTO_MIGRATE", lookup("AUTO_MIGRATE"), true)?,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: v }),
        None => Ok(default),
    }
}
