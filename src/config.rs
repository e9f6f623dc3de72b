use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use tracing::{info, warn};

use crate::error::{config_error, Error};

pub struct Config {
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub database_url: String,
    pub database_max_connections: u32,
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads the process environment, after merging in a `.env` file when present.
    pub fn load() -> Result<Self, Error> {
        if let Err(err) = dotenv::dotenv() {
            info!("no .env file loaded: {err}");
        }

        Ok(Self {
            backend_url: env::var("BACKEND_URL")?,
            backend_timeout: Duration::from_secs(try_load("BACKEND_TIMEOUT_SECS", "30")?),
            database_url: env::var("DATABASE_URL")?,
            database_max_connections: try_load("DATABASE_MAX_CONNECTIONS", "5")?,
            listen_addr: try_load("LISTEN_ADDR", "127.0.0.1:3000")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse(key, &raw)
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T, Error>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| {
        warn!("invalid {key} value: {e}");
        config_error(format!("invalid {key} value"))
    })
}
