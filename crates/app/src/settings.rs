//! Application settings, read from an optional `settings.toml` and
//! overridden by `CASHWISE__*` environment variables, e.g.
//! `CASHWISE__SERVER__PORT=8080`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Database,
    pub query_timeout_secs: Option<u64>,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_config(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("CASHWISE")
                        .separator("__")
                        .list_separator(",")
                        .with_list_parse_key("server.cors_origins")
                        .try_parsing(true),
                ),
        )
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }
}
