pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::http::LeadServer;
pub use adapters::mailer::{build_notifier, LogNotifier, SmtpNotifier};
pub use adapters::storage::JsonFileStore;
pub use config::{AppConfig, Cli, Command};
pub use core::intake::LeadIntake;
pub use core::rate_limit::RateLimiter;
pub use domain::model::{Lead, LeadSubmission};
pub use utils::error::{LeadError, Result};
