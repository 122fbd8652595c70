//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// TripBot - trip planning chat bot
#[derive(Parser)]
#[command(
    name = "tb",
    about = "Trip planning chat bot: webhook server and planning tools",
    version = env!("CARGO_PKG_VERSION"),
    after_help = generate_after_help(),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the webhook and place search server
    Serve {
        /// Address to bind (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// List regions and their prefectures
    Regions {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Search places by keyword
    Search {
        /// Search keyword
        keyword: String,

        /// Limit the search to a prefecture
        #[arg(short, long)]
        prefecture: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show popular spots in a prefecture
    Popular {
        /// Prefecture name (English or Japanese)
        prefecture: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Work with plan drafts
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Send a push message to a user
    Push {
        /// Recipient user id
        user_id: String,

        /// Message text
        text: String,
    },

    /// Print the webhook signature for a file's contents
    Sign {
        /// File holding the request body
        file: PathBuf,
    },
}

/// Plan subcommands
#[derive(Debug, Subcommand)]
pub enum PlanCommand {
    /// Validate a YAML plan draft
    Check {
        /// Draft file
        file: PathBuf,

        /// Print the finalized plan as JSON when valid
        #[arg(long)]
        json: bool,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripbot")
        .join("logs")
        .join("tripbot.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text
pub fn generate_after_help() -> String {
    format!("Logs are written to: {}\n", get_log_path().display())
}

/// Output format for listing commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}
