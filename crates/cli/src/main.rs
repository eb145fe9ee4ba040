// ldd-notify - reminds users holding more than one LDD to clean up.
// Runs the structured (JSON) pipeline, then the tabular (CSV) pipeline.

mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use ldd_notify::config::StructuredDelivery;
use ldd_notify::{NotifyConfig, RunOptions};

#[derive(Parser)]
#[command(name = "ldd-notify")]
#[command(about = "Send cleanup reminders to users holding more than one LDD")]
#[command(version)]
#[command(after_help = "\
Examples:
  ldd-notify
  ldd-notify --config notify.toml
  ldd-notify --dry-run --reference-date 2026-03-31
  ldd-notify --config notify.toml --json > report.json

Log verbosity follows RUST_LOG (default: info).")]
struct Cli {
    /// TOML config file. Built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Measure staleness against this date (YYYY-MM-DD) instead of today
    #[arg(long)]
    reference_date: Option<NaiveDate>,

    /// Print host reminders instead of mailing them
    #[arg(long)]
    dry_run: bool,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cmd_run(cli) {
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

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<NotifyConfig, CliError> {
    match path {
        Some(path) => {
            let config = NotifyConfig::load(path).map_err(|e| {
                CliError::usage(e.to_string())
                    .with_hint("run without --config to use the built-in defaults")
            })?;
            info!(path = %path.display(), "loaded config");
            Ok(config)
        }
        None => Ok(NotifyConfig::default()),
    }
}

fn cmd_run(cli: Cli) -> Result<(), CliError> {
    let mut config = load_config(cli.config.as_ref())?;
    if cli.dry_run {
        config.delivery.structured = StructuredDelivery::Print;
    }

    let reference_date = cli
        .reference_date
        .or(config.reference_date)
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let report = ldd_notify::run(&config, &RunOptions { reference_date });

    if cli.json {
        let json = serde_json::to_string(&report)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_valid() {
        let cli = Cli::try_parse_from(["ldd-notify"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.reference_date.is_none());
        assert!(!cli.dry_run);
        assert!(!cli.json);
    }

    #[test]
    fn parses_reference_date() {
        let cli = Cli::try_parse_from(["ldd-notify", "--reference-date", "2026-03-31"]).unwrap();
        assert_eq!(cli.reference_date, NaiveDate::from_ymd_opt(2026, 3, 31));
    }

    #[test]
    fn rejects_bad_reference_date() {
        assert!(Cli::try_parse_from(["ldd-notify", "--reference-date", "31/03/2026"]).is_err());
    }

    #[test]
    fn missing_config_is_usage_error() {
        let path = PathBuf::from("/nonexistent/notify.toml");
        let err = load_config(Some(&path)).err().unwrap();
        assert_eq!(err.code, EXIT_USAGE);
        assert!(err.hint.is_some());
    }

    #[test]
    fn runtime_errors_are_not_usage_errors() {
        let err = CliError::general("JSON serialization error: boom");
        assert_eq!(err.code, EXIT_ERROR);
        assert_ne!(err.code, EXIT_USAGE);
        assert!(err.hint.is_none());
    }
}
