use std::fs;

use callsheet_core::config::{AppConfig, LoadOptions};
use callsheet_core::domain::company::parse_do_not_touch;
use callsheet_db::{sync_roster, SyncOutcome};
use chrono::NaiveDate;

use crate::commands::{
    build_runtime, load_config, open_store, pipeline_failure, resolve_date, CommandResult, Failure,
};

pub fn run(options: &LoadOptions, date: Option<NaiveDate>) -> CommandResult {
    let config = match load_config("sync", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let do_not_touch = match read_do_not_touch(&config) {
        Ok(names) => names,
        Err((error_class, message, exit_code)) => {
            return CommandResult::failure("sync", error_class, message, exit_code);
        }
    };
    let runtime = match build_runtime("sync") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let today = resolve_date(date);
    let policy = config.operational_policy();

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;
        let outcome =
            sync_roster(&repos, &policy, &do_not_touch, today).await.map_err(pipeline_failure);
        pool.close().await;
        outcome
    });

    match result {
        Ok(outcome) => CommandResult::success("sync", render_summary(&outcome)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("sync", error_class, message, exit_code)
        }
    }
}

fn read_do_not_touch(config: &AppConfig) -> Result<Vec<String>, Failure> {
    let Some(path) = config.blocklist.dnt_file.as_deref() else {
        return Ok(Vec::new());
    };
    let contents = fs::read_to_string(path).map_err(|error| {
        (
            "config_validation",
            format!("could not read do-not-touch list `{}`: {error}", path.display()),
            2u8,
        )
    })?;
    Ok(parse_do_not_touch(&contents))
}

fn render_summary(outcome: &SyncOutcome) -> String {
    let run = &outcome.run;
    let counts = outcome
        .status_counts
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect::<Vec<_>>()
        .join(", ");
    let digest = run.roster_digest.get(..12).unwrap_or(&run.roster_digest);

    let mut message = format!(
        "roster synced as of {}: {} contacts from {} call events ({} skipped rows); {}; digest {}",
        run.as_of, run.contact_count, run.event_count, run.skipped_rows, counts, digest
    );
    if outcome.unchanged {
        message.push_str(" (unchanged since previous sync)");
    }
    message
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use callsheet_core::config::{AppConfig, LoadOptions};
    use callsheet_core::domain::contact::ContactStatus;
    use callsheet_db::repositories::SyncRun;
    use callsheet_db::SyncOutcome;
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{read_do_not_touch, render_summary};

    #[test]
    fn summary_lists_counts_and_short_digest() {
        let outcome = SyncOutcome {
            run: SyncRun {
                run_id: "run-1".to_string(),
                synced_at: Utc.with_ymd_and_hms(2026, 2, 11, 8, 0, 0).single().expect("time"),
                as_of: NaiveDate::from_ymd_opt(2026, 2, 11).expect("date"),
                event_count: 18,
                skipped_rows: 1,
                contact_count: 14,
                roster_digest: "0123456789abcdef".to_string(),
            },
            unchanged: true,
            status_counts: vec![(ContactStatus::Active, 7), (ContactStatus::Blocked, 2)],
        };

        assert_eq!(
            render_summary(&outcome),
            "roster synced as of 2026-02-11: 14 contacts from 18 call events (1 skipped rows); \
             active 7, blocked 2; digest 0123456789ab (unchanged since previous sync)"
        );
    }

    #[test]
    fn do_not_touch_file_is_optional_and_parsed_when_set() {
        let mut config = AppConfig::load(LoadOptions::default()).expect("default config loads");
        config.blocklist.dnt_file = None;
        assert!(read_do_not_touch(&config).expect("no file configured").is_empty());

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "# legal hold\nUmbrella Transit\n\n  Hooli Haulage  ").expect("write list");
        config.blocklist.dnt_file = Some(file.path().to_path_buf());
        assert_eq!(
            read_do_not_touch(&config).expect("list parses"),
            vec!["Umbrella Transit".to_string(), "Hooli Haulage".to_string()]
        );

        config.blocklist.dnt_file = Some("missing-dnt.txt".into());
        let (class, _, code) = read_do_not_touch(&config).expect_err("file is missing");
        assert_eq!(class, "config_validation");
        assert_eq!(code, 2);
    }
}
