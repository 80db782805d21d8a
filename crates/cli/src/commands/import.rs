use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use callsheet_core::config::LoadOptions;
use callsheet_core::domain::company::Company;
use callsheet_core::domain::contact::Prospect;
use callsheet_db::repositories::LoggedCall;
use serde::Deserialize;

use crate::commands::{build_runtime, load_config, open_store, CommandResult, Failure};

/// Batch accepted by `callsheet import`. Every section is optional.
#[derive(Debug, Default, Deserialize)]
pub struct ImportBatch {
    #[serde(default)]
    pub companies: Vec<Company>,
    #[serde(default)]
    pub calls: Vec<LoggedCall>,
    #[serde(default)]
    pub prospects: Vec<Prospect>,
}

#[derive(Debug, PartialEq, Eq)]
struct ImportSummary {
    companies: usize,
    calls_received: usize,
    calls_inserted: usize,
    prospects: usize,
}

pub fn read_batch(path: &Path) -> Result<ImportBatch> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read import file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("import file `{}` is not a valid batch", path.display()))
}

pub fn run(options: &LoadOptions, path: &Path) -> CommandResult {
    let config = match load_config("import", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let batch = match read_batch(path) {
        Ok(batch) => batch,
        Err(error) => {
            return CommandResult::failure("import", "import_input", format!("{error:#}"), 6);
        }
    };
    let runtime = match build_runtime("import") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;
        let store_error = |error: callsheet_db::RepositoryError| ("store", error.to_string(), 5u8);

        for company in &batch.companies {
            repos.companies.upsert_company(company.clone()).await.map_err(store_error)?;
        }
        let calls_inserted =
            repos.calls.append_call_events(&batch.calls).await.map_err(store_error)?;
        for prospect in &batch.prospects {
            repos.prospects.save_prospect(prospect.clone()).await.map_err(store_error)?;
        }

        pool.close().await;
        Ok::<ImportSummary, Failure>(ImportSummary {
            companies: batch.companies.len(),
            calls_received: batch.calls.len(),
            calls_inserted,
            prospects: batch.prospects.len(),
        })
    });

    match result {
        Ok(summary) => CommandResult::success("import", render_summary(&summary)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("import", error_class, message, exit_code)
        }
    }
}

fn render_summary(summary: &ImportSummary) -> String {
    let duplicates = summary.calls_received.saturating_sub(summary.calls_inserted);
    format!(
        "imported {} companies, {} call events ({} duplicates skipped), {} prospects; \
         run `callsheet sync` to rebuild the roster",
        summary.companies, summary.calls_inserted, duplicates, summary.prospects
    )
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use callsheet_core::domain::call::OutcomeCategory;
    use callsheet_core::domain::company::BlocklistStatus;

    use super::{read_batch, render_summary, ImportSummary};

    #[test]
    fn batch_sections_default_to_empty() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"calls":[{{"external_id":"crm-1","contact_name":"Ana Ruiz","company_name":"Acme Rail",
                "outcome_category":"Left Voicemail","called_at":"2026-02-02T15:10:00Z"}},
              {{"company_name":"Acme Rail","outcome_category":"No Answer",
                "called_at":"2026-02-03T15:10:00Z"}}],
               "companies":[{{"name":"Acme Rail","blocklist_status":"do_not_contact"}}]}}"#
        )
        .expect("write batch");

        let batch = read_batch(file.path()).expect("batch parses");
        assert!(batch.prospects.is_empty());
        assert_eq!(batch.companies[0].blocklist_status, BlocklistStatus::DoNotContact);
        assert_eq!(batch.calls.len(), 2);
        assert_eq!(batch.calls[0].external_id.as_deref(), Some("crm-1"));
        assert_eq!(batch.calls[0].call.outcome_category, OutcomeCategory::LeftVoicemail);
        assert_eq!(batch.calls[1].external_id, None);
        assert_eq!(batch.calls[1].call.contact_name, None);
    }

    #[test]
    fn unknown_outcome_is_reported_with_file_context() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"calls":[{{"contact_name":"Ana Ruiz","company_name":"Acme Rail",
                "outcome_category":"Hung Up","called_at":"2026-02-02T15:10:00Z"}}]}}"#
        )
        .expect("write batch");

        let error = read_batch(file.path()).expect_err("outcome is outside the vocabulary");
        assert!(format!("{error:#}").contains("is not a valid batch"));
    }

    #[test]
    fn missing_file_is_reported() {
        let error = read_batch(std::path::Path::new("does-not-exist.json"))
            .expect_err("file is missing");
        assert!(error.to_string().contains("failed to read import file"));
    }

    #[test]
    fn summary_counts_duplicates() {
        let summary =
            ImportSummary { companies: 1, calls_received: 4, calls_inserted: 3, prospects: 0 };
        assert!(render_summary(&summary).starts_with(
            "imported 1 companies, 3 call events (1 duplicates skipped), 0 prospects"
        ));
    }
}
