// Wagecast CLI - reconcile compensation uploads and project salaries

mod commands;
mod exit_codes;
mod logging;
mod util;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{ConfigCommands, FilterArgs, UploadArgs};
use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "wagecast")]
#[command(about = "Reconcile compensation datasets and forecast salaries")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log level for diagnostics on stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "WAGECAST_LOG", default_value = logging::DEFAULT_LOG_LEVEL)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map an upload onto the canonical salary, economic and legal tables
    #[command(after_help = "\
Examples:
  wagecast reconcile salaries.csv
  wagecast reconcile salaries.csv --json
  wagecast reconcile survey.json --output reconciled.json
  wagecast reconcile salaries.csv --strict --config wagecast.toml")]
    Reconcile {
        #[command(flatten)]
        upload: UploadArgs,
    },

    /// Reconcile an upload and project salaries per country and role
    #[command(after_help = "\
Examples:
  wagecast forecast salaries.csv
  wagecast forecast salaries.csv --json --country Germany
  wagecast forecast salaries.csv --role \"Platform Engineer\" --team-setup remote")]
    Forecast {
        #[command(flatten)]
        upload: UploadArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Forecast the built-in demo dataset
    #[command(after_help = "\
Examples:
  wagecast demo
  wagecast demo --json")]
    Demo {
        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,
    },

    /// Config file utilities
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nrecon:    wagecast-recon ", env!("CARGO_PKG_VERSION"),
            "\nforecast: wagecast-forecast ", env!("CARGO_PKG_VERSION"),
            "\nbuild:    debug",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            "\nrecon:    wagecast-recon ", env!("CARGO_PKG_VERSION"),
            "\nforecast: wagecast-forecast ", env!("CARGO_PKG_VERSION"),
            "\nbuild:    release",
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _logger = match logging::init_logging(&cli.log_level) {
        Ok(handle) => handle,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = match cli.command {
        Commands::Reconcile { upload } => commands::cmd_reconcile(upload),
        Commands::Forecast { upload, filter } => commands::cmd_forecast(upload, filter),
        Commands::Demo { json } => commands::cmd_demo(json),
        Commands::Config(cmd) => commands::cmd_config(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }
}
