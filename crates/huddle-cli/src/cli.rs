use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages, including each HTTP attempt
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Parser)]
#[command(name = "huddle")]
#[command(about = "huddle - run SurrealQL against the Huddle database")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses config file value or defaults to 'info'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/huddle/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a query and print the result as JSON
    Query {
        /// Query text (reads --file or stdin when omitted)
        sql: Option<String>,

        /// Read the query from a file
        #[arg(short, long, conflicts_with = "sql")]
        file: Option<PathBuf>,

        /// Print every statement's result instead of only the last
        #[arg(long)]
        complete: bool,

        /// Run as a user with this bearer token instead of the service account
        #[arg(long, env = "HUDDLE_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Print compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the effective configuration with secrets redacted
    RenderConfig {
        /// Output format
        #[arg(short, long, value_enum, default_value = "toml")]
        format: ConfigFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl Cli {
    /// Level requested on the command line, if any
    ///
    /// `--verbose` wins over `--log-level`.
    pub fn log_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some(LogLevel::Debug.as_str())
        } else {
            self.log_level.map(LogLevel::as_str)
        }
    }

    /// Filter directive for the tracing subscriber
    ///
    /// Command-line flags win over the configured level.
    pub fn log_filter(&self, configured: &str) -> String {
        let level = self.log_override().unwrap_or(configured);
        format!(
            "huddle={level},huddle_cli={level},huddle_client={level},huddle_config={level}",
            level = level
        )
    }
}
