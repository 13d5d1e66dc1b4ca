use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

/// Settings shared by every service built on this crate.
///
/// Each service flattens this into its own config; see [`Config::load`] for
/// where values come from.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Listen port, `8080` unless overridden.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl Config {
    /// Load shared settings. Later sources win:
    ///
    /// 1. `.env` in the working directory or a parent, copied into the
    ///    process environment by `dotenvy` (existing variables are kept)
    /// 2. an optional `configuration` file (`configuration.toml`,
    ///    `configuration.yaml`, ...)
    /// 3. `APP__`-prefixed environment variables, `__` separating nested
    ///    keys, e.g. `APP__PORT=9090`
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
