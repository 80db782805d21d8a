use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cadence::policy::{ComplianceAuditPolicy, OperationalPolicy};

pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["callsheet.toml", "config/callsheet.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub cadence: CadenceConfig,
    pub compliance: ComplianceConfig,
    pub blocklist: BlocklistConfig,
    pub campaign: CampaignConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct CadenceConfig {
    pub max_attempts: u32,
    pub cooldown_business_days: u32,
    pub max_contacts_per_company: usize,
    pub daily_target: usize,
    pub per_company_daily_cap: usize,
}

#[derive(Clone, Debug)]
pub struct ComplianceConfig {
    pub max_attempts: u32,
    pub cooldown_calendar_days: u32,
    pub max_voicemail_no_reply: usize,
    pub max_no_answer: usize,
}

#[derive(Clone, Debug, Default)]
pub struct BlocklistConfig {
    pub dnt_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct CampaignConfig {
    pub start_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub database_url: Option<String>,
    pub log_level: Option<String>,
    pub dnt_file: Option<PathBuf>,
    pub daily_target: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for CadenceConfig {
    fn default() -> Self {
        let policy = OperationalPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            cooldown_business_days: policy.cooldown_business_days,
            max_contacts_per_company: policy.max_contacts_per_company,
            daily_target: policy.daily_target,
            per_company_daily_cap: policy.per_company_daily_cap,
        }
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        let policy = ComplianceAuditPolicy::default();
        Self {
            max_attempts: policy.max_attempts,
            cooldown_calendar_days: policy.cooldown_calendar_days,
            max_voicemail_no_reply: policy.max_voicemail_no_reply,
            max_no_answer: policy.max_no_answer,
        }
    }
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self { start_date: NaiveDate::from_ymd_opt(2026, 1, 19).unwrap_or_default() }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite://callsheet.db?mode=rwc".to_string(),
                max_connections: 5,
                timeout_secs: 30,
            },
            cadence: CadenceConfig::default(),
            compliance: ComplianceConfig::default(),
            blocklist: BlocklistConfig::default(),
            campaign: CampaignConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn operational_policy(&self) -> OperationalPolicy {
        OperationalPolicy {
            max_attempts: self.cadence.max_attempts,
            cooldown_business_days: self.cadence.cooldown_business_days,
            max_contacts_per_company: self.cadence.max_contacts_per_company,
            daily_target: self.cadence.daily_target,
            per_company_daily_cap: self.cadence.per_company_daily_cap,
            ..OperationalPolicy::default()
        }
    }

    pub fn compliance_policy(&self) -> ComplianceAuditPolicy {
        ComplianceAuditPolicy {
            max_attempts: self.compliance.max_attempts,
            cooldown_calendar_days: self.compliance.cooldown_calendar_days,
            max_voicemail_no_reply: self.compliance.max_voicemail_no_reply,
            max_no_answer: self.compliance.max_no_answer,
            ..ComplianceAuditPolicy::default()
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(database) = patch.database {
            if let Some(url) = database.url {
                self.database.url = url;
            }
            if let Some(max_connections) = database.max_connections {
                self.database.max_connections = max_connections;
            }
            if let Some(timeout_secs) = database.timeout_secs {
                self.database.timeout_secs = timeout_secs;
            }
        }

        if let Some(cadence) = patch.cadence {
            if let Some(max_attempts) = cadence.max_attempts {
                self.cadence.max_attempts = max_attempts;
            }
            if let Some(cooldown_business_days) = cadence.cooldown_business_days {
                self.cadence.cooldown_business_days = cooldown_business_days;
            }
            if let Some(max_contacts_per_company) = cadence.max_contacts_per_company {
                self.cadence.max_contacts_per_company = max_contacts_per_company;
            }
            if let Some(daily_target) = cadence.daily_target {
                self.cadence.daily_target = daily_target;
            }
            if let Some(per_company_daily_cap) = cadence.per_company_daily_cap {
                self.cadence.per_company_daily_cap = per_company_daily_cap;
            }
        }

        if let Some(compliance) = patch.compliance {
            if let Some(max_attempts) = compliance.max_attempts {
                self.compliance.max_attempts = max_attempts;
            }
            if let Some(cooldown_calendar_days) = compliance.cooldown_calendar_days {
                self.compliance.cooldown_calendar_days = cooldown_calendar_days;
            }
            if let Some(max_voicemail_no_reply) = compliance.max_voicemail_no_reply {
                self.compliance.max_voicemail_no_reply = max_voicemail_no_reply;
            }
            if let Some(max_no_answer) = compliance.max_no_answer {
                self.compliance.max_no_answer = max_no_answer;
            }
        }

        if let Some(blocklist) = patch.blocklist {
            if let Some(dnt_file) = blocklist.dnt_file {
                self.blocklist.dnt_file = Some(dnt_file);
            }
        }

        if let Some(campaign) = patch.campaign {
            if let Some(start_date) = campaign.start_date {
                self.campaign.start_date = parse_date("campaign.start_date", &start_date)?;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("CALLSHEET_DATABASE_URL") {
            self.database.url = value;
        }
        if let Some(value) = read_env("CALLSHEET_DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections =
                parse_u32("CALLSHEET_DATABASE_MAX_CONNECTIONS", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_DATABASE_TIMEOUT_SECS") {
            self.database.timeout_secs = parse_u64("CALLSHEET_DATABASE_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("CALLSHEET_CADENCE_MAX_ATTEMPTS") {
            self.cadence.max_attempts = parse_u32("CALLSHEET_CADENCE_MAX_ATTEMPTS", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_CADENCE_COOLDOWN_BUSINESS_DAYS") {
            self.cadence.cooldown_business_days =
                parse_u32("CALLSHEET_CADENCE_COOLDOWN_BUSINESS_DAYS", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_CADENCE_MAX_CONTACTS_PER_COMPANY") {
            self.cadence.max_contacts_per_company =
                parse_usize("CALLSHEET_CADENCE_MAX_CONTACTS_PER_COMPANY", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_CADENCE_DAILY_TARGET") {
            self.cadence.daily_target = parse_usize("CALLSHEET_CADENCE_DAILY_TARGET", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_CADENCE_PER_COMPANY_DAILY_CAP") {
            self.cadence.per_company_daily_cap =
                parse_usize("CALLSHEET_CADENCE_PER_COMPANY_DAILY_CAP", &value)?;
        }

        if let Some(value) = read_env("CALLSHEET_COMPLIANCE_MAX_ATTEMPTS") {
            self.compliance.max_attempts = parse_u32("CALLSHEET_COMPLIANCE_MAX_ATTEMPTS", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_COMPLIANCE_COOLDOWN_CALENDAR_DAYS") {
            self.compliance.cooldown_calendar_days =
                parse_u32("CALLSHEET_COMPLIANCE_COOLDOWN_CALENDAR_DAYS", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_COMPLIANCE_MAX_VOICEMAIL_NO_REPLY") {
            self.compliance.max_voicemail_no_reply =
                parse_usize("CALLSHEET_COMPLIANCE_MAX_VOICEMAIL_NO_REPLY", &value)?;
        }
        if let Some(value) = read_env("CALLSHEET_COMPLIANCE_MAX_NO_ANSWER") {
            self.compliance.max_no_answer =
                parse_usize("CALLSHEET_COMPLIANCE_MAX_NO_ANSWER", &value)?;
        }

        if let Some(value) = read_env("CALLSHEET_BLOCKLIST_DNT_FILE") {
            self.blocklist.dnt_file = Some(PathBuf::from(value));
        }
        if let Some(value) = read_env("CALLSHEET_CAMPAIGN_START_DATE") {
            self.campaign.start_date = parse_date("CALLSHEET_CAMPAIGN_START_DATE", &value)
                .map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "CALLSHEET_CAMPAIGN_START_DATE".to_string(),
                    value,
                })?;
        }

        let log_level =
            read_env("CALLSHEET_LOGGING_LEVEL").or_else(|| read_env("CALLSHEET_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }

        let log_format =
            read_env("CALLSHEET_LOGGING_FORMAT").or_else(|| read_env("CALLSHEET_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(database_url) = overrides.database_url {
            self.database.url = database_url;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(dnt_file) = overrides.dnt_file {
            self.blocklist.dnt_file = Some(dnt_file);
        }
        if let Some(daily_target) = overrides.daily_target {
            self.cadence.daily_target = daily_target;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_database(&self.database)?;
        validate_cadence(&self.cadence)?;
        validate_compliance(&self.compliance)?;
        validate_campaign(&self.campaign)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// First config file that exists: the explicit path, else the default locations.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    DEFAULT_CONFIG_FILES.iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();
            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_database(database: &DatabaseConfig) -> Result<(), ConfigError> {
    let url = database.url.trim();
    let sqlite_url =
        url.starts_with("sqlite://") || url.starts_with("sqlite::") || url == ":memory:";
    if !sqlite_url {
        return Err(ConfigError::Validation(
            "database.url must be a sqlite URL (`sqlite://...`, `sqlite::...`, or `:memory:`)"
                .to_string(),
        ));
    }

    if database.max_connections == 0 {
        return Err(ConfigError::Validation(
            "database.max_connections must be greater than zero".to_string(),
        ));
    }

    if database.timeout_secs == 0 || database.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "database.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn require_positive(name: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!("{name} must be greater than zero")));
    }
    Ok(())
}

fn validate_cadence(cadence: &CadenceConfig) -> Result<(), ConfigError> {
    require_positive("cadence.max_attempts", u64::from(cadence.max_attempts))?;
    require_positive("cadence.cooldown_business_days", u64::from(cadence.cooldown_business_days))?;
    require_positive("cadence.max_contacts_per_company", cadence.max_contacts_per_company as u64)?;
    require_positive("cadence.daily_target", cadence.daily_target as u64)?;
    require_positive("cadence.per_company_daily_cap", cadence.per_company_daily_cap as u64)?;

    if cadence.per_company_daily_cap > cadence.daily_target {
        return Err(ConfigError::Validation(format!(
            "cadence.per_company_daily_cap ({}) must not exceed cadence.daily_target ({})",
            cadence.per_company_daily_cap, cadence.daily_target
        )));
    }

    Ok(())
}

fn validate_compliance(compliance: &ComplianceConfig) -> Result<(), ConfigError> {
    require_positive("compliance.max_attempts", u64::from(compliance.max_attempts))?;
    require_positive(
        "compliance.cooldown_calendar_days",
        u64::from(compliance.cooldown_calendar_days),
    )?;
    require_positive(
        "compliance.max_voicemail_no_reply",
        compliance.max_voicemail_no_reply as u64,
    )?;
    require_positive("compliance.max_no_answer", compliance.max_no_answer as u64)?;
    Ok(())
}

fn validate_campaign(campaign: &CampaignConfig) -> Result<(), ConfigError> {
    if campaign.start_date.weekday() != Weekday::Mon {
        return Err(ConfigError::Validation(format!(
            "campaign.start_date must be a Monday, got {} ({})",
            campaign.start_date,
            campaign.start_date.weekday()
        )));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ConfigError::Validation(format!("{field} must be a YYYY-MM-DD date, got `{value}`"))
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    database: Option<DatabasePatch>,
    cadence: Option<CadencePatch>,
    compliance: Option<CompliancePatch>,
    blocklist: Option<BlocklistPatch>,
    campaign: Option<CampaignPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatabasePatch {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct CadencePatch {
    max_attempts: Option<u32>,
    cooldown_business_days: Option<u32>,
    max_contacts_per_company: Option<usize>,
    daily_target: Option<usize>,
    per_company_daily_cap: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct CompliancePatch {
    max_attempts: Option<u32>,
    cooldown_calendar_days: Option<u32>,
    max_voicemail_no_reply: Option<usize>,
    max_no_answer: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct BlocklistPatch {
    dnt_file: Option<PathBuf>,
}

// Dates are read as strings; a bare TOML date literal is rejected by the parser.
#[derive(Debug, Default, Deserialize)]
struct CampaignPatch {
    start_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
