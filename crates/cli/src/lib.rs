pub mod commands;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use callsheet_core::config::{AppConfig, LoadOptions, LogFormat};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "callsheet",
    about = "Callsheet contact cadence scheduler",
    long_about = "Rebuild the contact roster from the call log, plan the daily call sheet, \
                  and audit exclusions before dialing.",
    after_help = "Examples:\n  callsheet sync\n  callsheet sheet --date 2026-02-11\n  callsheet check --json"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Read configuration from this file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo campaign (safe to repeat)")]
    Seed,
    #[command(about = "Append calls and upsert companies and prospects from a JSON batch")]
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    #[command(about = "Rebuild the contact roster from the call log")]
    Sync {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Classify as of this date (default: today)")]
        date: Option<NaiveDate>,
    },
    #[command(about = "Plan the daily call sheet from the synced roster")]
    Sheet {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Plan for this date (default: today)")]
        date: Option<NaiveDate>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Run the pre-dial compliance check against the raw call log")]
    Check {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Audit as of this date (default: today)")]
        date: Option<NaiveDate>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Summarize roster status counts and company saturation")]
    Stats {
        #[arg(long, value_name = "YYYY-MM-DD", help = "Report header date (default: today)")]
        date: Option<NaiveDate>,
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, do-not-touch list and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            ..LoadOptions::default()
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    // Commands report config errors themselves; logging just stays off.
    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(&options),
        Command::Seed => commands::seed::run(&options),
        Command::Import { file } => commands::import::run(&options, &file),
        Command::Sync { date } => commands::sync::run(&options, date),
        Command::Sheet { date, json } => commands::sheet::run(&options, date, json),
        Command::Check { date, json } => commands::check::run(&options, date, json),
        Command::Stats { date, json } => commands::stats::run(&options, date, json),
        Command::Config => commands::CommandResult::report(commands::config::run(&options)),
        Command::Doctor { json } => {
            commands::CommandResult::report(commands::doctor::run(&options, json))
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so command output on stdout stays parseable.
fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn global_config_flag_is_accepted_after_the_subcommand() {
        let cli = Cli::try_parse_from([
            "callsheet",
            "sheet",
            "--date",
            "2026-02-11",
            "--json",
            "--config",
            "ops/callsheet.toml",
        ])
        .expect("arguments parse");

        let options = cli.load_options();
        assert!(options.require_file);
        let expected = std::path::Path::new("ops/callsheet.toml");
        assert_eq!(options.config_path.as_deref(), Some(expected));
        match cli.command {
            Command::Sheet { date, json } => {
                assert_eq!(date.map(|date| date.to_string()).as_deref(), Some("2026-02-11"));
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(Cli::try_parse_from(["callsheet", "sync", "--date", "11/02/2026"]).is_err());
    }
}
