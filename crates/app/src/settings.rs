//! Handles settings for the application. Configuration is read from
//! `settings.toml` (or the file given with `--config`) and can be overridden
//! with `POCKETBOOK__<SECTION>__<KEY>` environment variables.
use clap::Parser;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "pocketbook", about = "Personal finance tracking bot")]
struct Args {
    /// Optional config file path (TOML), without or with extension.
    #[arg(long, env = "POCKETBOOK_CONFIG")]
    config: Option<String>,
    /// Override the log level.
    #[arg(long)]
    level: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// IANA name of the reference time zone.
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "UTC".to_string(),
        }
    }
}

/// Where the finance document lives.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    Memory,
    Json(String),
}

impl Default for Store {
    fn default() -> Self {
        Store::Json("finance_data.json".to_string())
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
    #[serde(default)]
    pub allowed_users: Vec<u64>,
    #[serde(default)]
    pub strict_persistence: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub store: Store,
    pub telegram: Option<Telegram>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut settings = Settings::layered(
            File::with_name(path).required(args.config.is_some()),
            environment(),
        )?;

        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }

    /// Settings from `file`, overridden by `env`.
    fn layered(
        file: impl Source + Send + Sync + 'static,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(file)
            .add_source(env)
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("POCKETBOOK")
        .prefix_separator("__")
        .separator("__")
}
