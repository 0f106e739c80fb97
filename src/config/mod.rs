pub mod cli;
pub mod smtp;
pub mod toml_config;

pub use cli::{Cli, Command};
pub use smtp::SmtpConfig;
pub use toml_config::TomlConfig;

use crate::core::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_socket_addr, Validate,
};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_LEADS_FILE: &str = "data/leads.json";

/// 視窗上限一小時
pub const MAX_WINDOW_SECS: u64 = 3600;

/// Effective settings after merging defaults, the TOML file and CLI/env.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub leads_file: PathBuf,
    pub rate_limit_max: u32,
    pub rate_window_secs: u64,
    pub smtp: SmtpConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            leads_file: PathBuf::from(DEFAULT_LEADS_FILE),
            rate_limit_max: DEFAULT_MAX_REQUESTS,
            rate_window_secs: DEFAULT_WINDOW.as_secs(),
            smtp: SmtpConfig::default(),
        }
    }
}

impl AppConfig {
    /// defaults → `--config` file → flags / env. SMTP env variables always
    /// win over the file's `[smtp]` table.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        Self::merge(cli, file, |key| std::env::var(key).ok())
    }

    pub fn merge<F>(cli: &Cli, file: TomlConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind = cli
            .bind
            .clone()
            .or(file.server.bind)
            .unwrap_or(defaults.bind);
        let leads_file = cli
            .leads_file
            .clone()
            .or(file.server.leads_file.map(PathBuf::from))
            .unwrap_or(defaults.leads_file);
        let rate_limit_max = cli
            .rate_limit
            .or(file.rate_limit.max_requests)
            .unwrap_or(defaults.rate_limit_max);
        let rate_window_secs = cli
            .rate_window_secs
            .or(file.rate_limit.window_seconds)
            .unwrap_or(defaults.rate_window_secs);
        let smtp = file.smtp.unwrap_or_default().overlay(env)?;

        Ok(Self {
            bind,
            leads_file,
            rate_limit_max,
            rate_window_secs,
            smtp,
        })
    }

    pub fn rate_window(&self) -> Duration {
        Duration::from_secs(self.rate_window_secs)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.bind)?;
        validate_path("server.leads_file", &self.leads_file.to_string_lossy())?;
        validate_positive_number("rate_limit.max_requests", u64::from(self.rate_limit_max), 1)?;
        validate_range("rate_limit.window_seconds", self.rate_window_secs, 1, MAX_WINDOW_SECS)?;
        self.smtp.validate()
    }
}
