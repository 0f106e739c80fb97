use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "folio-leads")]
#[command(about = "Portfolio site with a spam-resistant lead capture endpoint")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    /// Listen address
    #[arg(long, global = true, env = "BIND_ADDR")]
    pub bind: Option<String>,

    /// JSON file holding submitted leads
    #[arg(long, global = true, env = "LEADS_FILE")]
    pub leads_file: Option<PathBuf>,

    /// Accepted submissions per client per window
    #[arg(long, global = true, env = "RATE_LIMIT_MAX")]
    pub rate_limit: Option<u32>,

    #[arg(long, global = true, env = "RATE_LIMIT_WINDOW_SECS")]
    pub rate_window_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Serve the site and the lead endpoint (default)
    Serve,
    /// Print stored leads
    Leads {
        /// Only print how many leads are stored
        #[arg(long)]
        count: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}
