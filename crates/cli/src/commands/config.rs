use std::env;
use std::fs;
use std::path::Path;

use callsheet_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

/// One reported setting: dotted path, rendered value and the env keys that can set it.
struct Field {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key, &field.value, source));
    }

    lines.join("\n")
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let dnt_file = config
        .blocklist
        .dnt_file
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unset>".to_string());

    vec![
        Field {
            key: "database.url",
            value: config.database.url.clone(),
            env_keys: &["CALLSHEET_DATABASE_URL"],
        },
        Field {
            key: "database.max_connections",
            value: config.database.max_connections.to_string(),
            env_keys: &["CALLSHEET_DATABASE_MAX_CONNECTIONS"],
        },
        Field {
            key: "database.timeout_secs",
            value: config.database.timeout_secs.to_string(),
            env_keys: &["CALLSHEET_DATABASE_TIMEOUT_SECS"],
        },
        Field {
            key: "cadence.max_attempts",
            value: config.cadence.max_attempts.to_string(),
            env_keys: &["CALLSHEET_CADENCE_MAX_ATTEMPTS"],
        },
        Field {
            key: "cadence.cooldown_business_days",
            value: config.cadence.cooldown_business_days.to_string(),
            env_keys: &["CALLSHEET_CADENCE_COOLDOWN_BUSINESS_DAYS"],
        },
        Field {
            key: "cadence.max_contacts_per_company",
            value: config.cadence.max_contacts_per_company.to_string(),
            env_keys: &["CALLSHEET_CADENCE_MAX_CONTACTS_PER_COMPANY"],
        },
        Field {
            key: "cadence.daily_target",
            value: config.cadence.daily_target.to_string(),
            env_keys: &["CALLSHEET_CADENCE_DAILY_TARGET"],
        },
        Field {
            key: "cadence.per_company_daily_cap",
            value: config.cadence.per_company_daily_cap.to_string(),
            env_keys: &["CALLSHEET_CADENCE_PER_COMPANY_DAILY_CAP"],
        },
        Field {
            key: "compliance.max_attempts",
            value: config.compliance.max_attempts.to_string(),
            env_keys: &["CALLSHEET_COMPLIANCE_MAX_ATTEMPTS"],
        },
        Field {
            key: "compliance.cooldown_calendar_days",
            value: config.compliance.cooldown_calendar_days.to_string(),
            env_keys: &["CALLSHEET_COMPLIANCE_COOLDOWN_CALENDAR_DAYS"],
        },
        Field {
            key: "compliance.max_voicemail_no_reply",
            value: config.compliance.max_voicemail_no_reply.to_string(),
            env_keys: &["CALLSHEET_COMPLIANCE_MAX_VOICEMAIL_NO_REPLY"],
        },
        Field {
            key: "compliance.max_no_answer",
            value: config.compliance.max_no_answer.to_string(),
            env_keys: &["CALLSHEET_COMPLIANCE_MAX_NO_ANSWER"],
        },
        Field {
            key: "blocklist.dnt_file",
            value: dnt_file,
            env_keys: &["CALLSHEET_BLOCKLIST_DNT_FILE"],
        },
        Field {
            key: "campaign.start_date",
            value: config.campaign.start_date.to_string(),
            env_keys: &["CALLSHEET_CAMPAIGN_START_DATE"],
        },
        Field {
            key: "logging.level",
            value: config.logging.level.clone(),
            env_keys: &["CALLSHEET_LOGGING_LEVEL", "CALLSHEET_LOG_LEVEL"],
        },
        Field {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            env_keys: &["CALLSHEET_LOGGING_FORMAT", "CALLSHEET_LOG_FORMAT"],
        },
    ]
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
