use callsheet_core::config::LoadOptions;
use callsheet_db::{DemoDataset, SeedResult};

use crate::commands::{build_runtime, load_config, open_store, CommandResult, Failure};

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match load_config("seed", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;

        let seed_result = DemoDataset::load(&repos)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), 5u8))?;
        let verification = DemoDataset::verify(&repos)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), 6u8))?;

        let run_result: Result<SeedResult, Failure> = if verification.all_present {
            Ok(seed_result)
        } else {
            Err(("seed_verification", verification_message(&verification.checks), 6u8))
        };

        pool.close().await;
        run_result
    });

    match result {
        Ok(seed_result) => CommandResult::success("seed", summary(&seed_result)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(result: &SeedResult) -> String {
    format!(
        "demo dataset loaded (as of {}): {} companies, {} prospects, {} of {} call events new",
        DemoDataset::as_of(),
        result.companies,
        result.prospects,
        result.calls_inserted,
        result.calls_total
    )
}

fn verification_message(checks: &[(&'static str, bool)]) -> String {
    let failed_checks = checks
        .iter()
        .filter_map(|(check, passed)| (!passed).then_some(*check))
        .collect::<Vec<_>>();
    if failed_checks.is_empty() {
        "Some seed data failed to load".to_string()
    } else {
        format!("Seed verification failed for checks: {}", failed_checks.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::{summary, verification_message};
    use callsheet_db::SeedResult;

    #[test]
    fn verification_error_message_targets_failed_checks() {
        let checks = [("companies", true), ("call-log", false), ("prospects", false)];

        assert_eq!(
            verification_message(&checks),
            "Seed verification failed for checks: call-log, prospects"
        );
    }

    #[test]
    fn verification_error_message_falls_back_to_generic_when_no_labels() {
        let checks = [("companies", true), ("call-log", true)];

        assert_eq!(verification_message(&checks), "Some seed data failed to load");
    }

    #[test]
    fn summary_reports_new_call_events() {
        let result = SeedResult { companies: 6, calls_inserted: 0, calls_total: 18, prospects: 5 };

        assert_eq!(
            summary(&result),
            "demo dataset loaded (as of 2026-02-11): 6 companies, 5 prospects, 0 of 18 call events new"
        );
    }
}
