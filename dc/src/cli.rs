//! CLI command definitions and subcommands

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::domain::{CategoryId, Mood};

/// Decide - hand small daily decisions to a chooser
#[derive(Parser)]
#[command(
    name = "dc",
    about = "Offload small daily decisions: what to eat, wear, do, and focus on",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/decide/logs/decide.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute (defaults to the interactive session)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Start an interactive decision session
    Repl,

    /// Make one decision and exit
    Decide {
        /// Category id or label (meals, eat, outfits, wear, ...)
        category: CategoryId,

        /// Current mood/energy (tired, good, energized, stressed, overwhelmed)
        #[arg(short, long)]
        mood: Option<Mood>,

        /// Option for the custom category (repeatable)
        #[arg(short, long = "option", value_name = "OPTION")]
        options: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the category catalog
    Categories {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for one-shot commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Path of the log file written by `dc`
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("decide")
        .join("logs")
        .join("decide.log");
    debug!(?path, "get_log_path: returning path");
    path
}
