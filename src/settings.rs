//! Process settings from the environment (`.env` is loaded first when present).

use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://furniture.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Settings {
    /// `DATABASE_URL`
    pub database_url: String,
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `BODY_LIMIT_BYTES`
    pub body_limit: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source; unset variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let bind = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr = bind.parse().map_err(|_| SettingsError::Invalid {
            name: "BIND_ADDR",
            value: bind.clone(),
        })?;
        let body_limit = match lookup("BODY_LIMIT_BYTES") {
            Some(v) => v.parse().map_err(|_| SettingsError::Invalid {
                name: "BODY_LIMIT_BYTES",
                value: v.clone(),
            })?,
            None => DEFAULT_BODY_LIMIT,
        };
        Ok(Settings {
            database_url,
            bind_addr,
            body_limit,
        })
    }
}
