//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SalesDash - sales pipeline dashboard for the terminal
///
/// Pulls sales reps and deals from the dashboard API (or a local dataset),
/// computes pipeline metrics and renders a Markdown or JSON dashboard.
///
/// Examples:
///   salesdash
///   salesdash --api-url http://localhost:8000 --format json -o dashboard.json
///   salesdash --data-file dummyData.json --rep 2
///   salesdash --ask "Which region closed the most business?"
///   salesdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dashboard API base URL
    ///
    /// Defaults to the value in .salesdash.toml, then http://localhost:8000.
    #[arg(long, value_name = "URL", env = "SALESDASH_API_URL")]
    pub api_url: Option<String>,

    /// Read sales reps and deals from a local JSON file instead of the API
    ///
    /// The file uses the backend's format: {"salesReps": [...]}.
    #[arg(long, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Show a single sales representative by id
    #[arg(long, value_name = "ID")]
    pub rep: Option<u32>,

    /// Ask the AI assistant a question and print the answer
    #[arg(long, value_name = "QUESTION", conflicts_with_all = ["data_file", "rep"])]
    pub ask: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Write the dashboard to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave the full deal table out of the report
    #[arg(long)]
    pub no_deals: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref question) = self.ask {
            if question.trim().is_empty() {
                return Err("Question cannot be empty".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if let Some(ref path) = self.data_file {
            if !path.is_file() {
                return Err(format!("Data file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
