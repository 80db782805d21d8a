pub mod check;
pub mod config;
pub mod doctor;
pub mod import;
pub mod migrate;
pub mod seed;
pub mod sheet;
pub mod stats;
pub mod sync;

use callsheet_core::config::{AppConfig, LoadOptions};
use callsheet_db::{connect_with_config, migrations, CadenceRepositories, DbPool, PipelineError};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    /// A successful command whose output is a report rather than a status line.
    pub fn report(output: String) -> Self {
        Self { exit_code: 0, output }
    }
}

/// `(error_class, message, exit_code)` carried out of an async block.
pub(crate) type Failure = (&'static str, String, u8);

pub(crate) fn load_config(
    command: &str,
    options: &LoadOptions,
) -> Result<AppConfig, CommandResult> {
    AppConfig::load(options.clone()).map_err(|error| {
        CommandResult::failure(
            command,
            "config_validation",
            format!("configuration issue: {error}"),
            2,
        )
    })
}

pub(crate) fn build_runtime(command: &str) -> Result<Runtime, CommandResult> {
    tokio::runtime::Builder::new_current_thread().enable_all().build().map_err(|error| {
        CommandResult::failure(
            command,
            "runtime_init",
            format!("failed to initialize async runtime: {error}"),
            3,
        )
    })
}

/// Connects, brings the schema up to date and hands back SQL-backed repositories.
pub(crate) async fn open_store(
    config: &AppConfig,
) -> Result<(DbPool, CadenceRepositories), Failure> {
    let pool = connect_with_config(&config.database)
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), 4u8))?;
    migrations::run_pending(&pool)
        .await
        .map_err(|error| ("migration", error.to_string(), 5u8))?;
    let repos = CadenceRepositories::sql(pool.clone());
    Ok((pool, repos))
}

pub(crate) fn pipeline_failure(error: PipelineError) -> Failure {
    match error {
        PipelineError::Repository(error) => ("store", error.to_string(), 5),
        PipelineError::SheetRejected(_) => ("sheet_validation", error.to_string(), 6),
    }
}

pub(crate) fn resolve_date(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}

pub(crate) fn to_json<T: Serialize>(command: &str, value: &T) -> CommandResult {
    match serde_json::to_string_pretty(value) {
        Ok(output) => CommandResult::report(output),
        Err(error) => CommandResult::failure(command, "serialization", error.to_string(), 6),
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
