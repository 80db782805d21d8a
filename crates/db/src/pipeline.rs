//! Store-backed cadence runs: each function reads what it needs through the
//! repositories, runs the pure core logic, and writes back where applicable.

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use callsheet_core::cadence::aggregate::CallHistory;
use callsheet_core::cadence::allocate::{allocate, SheetOutcome};
use callsheet_core::cadence::compliance::{self, ComplianceReport};
use callsheet_core::cadence::policy::{ComplianceAuditPolicy, OperationalPolicy};
use callsheet_core::cadence::roster::{build_roster, roster_digest};
use callsheet_core::cadence::schedule::select_candidates;
use callsheet_core::cadence::stats::{self, RosterStats};
use callsheet_core::cadence::validate::{PolicySheetValidator, SheetValidator};
use callsheet_core::domain::company::CompanyBlocklist;
use callsheet_core::domain::contact::ContactStatus;

use crate::repositories::{CadenceRepositories, RepositoryError, RosterFilter, SyncRun};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("daily sheet failed validation: {0}")]
    SheetRejected(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyncOutcome {
    pub run: SyncRun,
    /// Set when the previous run for the same day produced the same roster.
    pub unchanged: bool,
    pub status_counts: Vec<(ContactStatus, usize)>,
}

/// Rebuilds the roster from the call log, prospects and blocklist, replaces the
/// stored roster wholesale and records the run.
pub async fn sync_roster(
    repos: &CadenceRepositories,
    policy: &OperationalPolicy,
    do_not_touch: &[String],
    today: NaiveDate,
) -> Result<SyncOutcome, PipelineError> {
    let run_id = Uuid::new_v4().to_string();
    info!(
        event_name = "cadence.sync.started",
        correlation_id = %run_id,
        as_of = %today,
        policy_version = %policy.version,
        "rebuilding contact roster"
    );

    let events = repos.calls.list_call_events().await?;
    let prospects = repos.prospects.list_prospects().await?;
    let blocked = repos.companies.list_blocked_companies().await?;

    let history = CallHistory::fold(&events).with_prospects(&prospects);
    if history.skipped_rows() > 0 {
        warn!(
            event_name = "cadence.sync.skipped_rows",
            correlation_id = %run_id,
            skipped_rows = history.skipped_rows(),
            "call log rows without a contact or company name were skipped"
        );
    }

    let blocklist = CompanyBlocklist::from_companies(&blocked).with_do_not_touch(do_not_touch);
    let roster = build_roster(&history, &blocklist, policy, today);
    let digest = roster_digest(&roster);

    let previous = repos.sync_runs.latest_sync_run().await?;
    let unchanged = previous
        .as_ref()
        .map(|run| run.as_of == today && run.roster_digest == digest)
        .unwrap_or(false);

    repos.roster.replace_contact_roster(&roster).await?;

    let run = SyncRun {
        run_id: run_id.clone(),
        synced_at: Utc::now(),
        as_of: today,
        event_count: history.event_count(),
        skipped_rows: history.skipped_rows(),
        contact_count: roster.len(),
        roster_digest: digest,
    };
    repos.sync_runs.record_sync_run(&run).await?;

    let status_counts = ContactStatus::ALL
        .iter()
        .map(|status| (*status, roster.iter().filter(|record| record.status == *status).count()))
        .collect();

    info!(
        event_name = "cadence.sync.completed",
        correlation_id = %run_id,
        contacts = run.contact_count,
        events = run.event_count,
        roster_digest = %run.roster_digest,
        unchanged,
        "contact roster replaced"
    );

    Ok(SyncOutcome { run, unchanged, status_counts })
}

/// Builds and re-checks the sheet for `today`. A roster that was never synced
/// yields [`SheetOutcome::NotSynced`].
pub async fn plan_daily_sheet(
    repos: &CadenceRepositories,
    policy: &OperationalPolicy,
    today: NaiveDate,
) -> Result<SheetOutcome, PipelineError> {
    let correlation_id = Uuid::new_v4().to_string();

    if repos.sync_runs.latest_sync_run().await?.is_none() {
        warn!(
            event_name = "cadence.sheet.not_synced",
            correlation_id = %correlation_id,
            "roster has never been synced"
        );
        return Ok(SheetOutcome::NotSynced);
    }

    let filter = RosterFilter::callable(&[ContactStatus::Active, ContactStatus::Cooling], today);
    let roster = repos.roster.list_roster(&filter).await?;
    let candidates = select_candidates(&roster, today).into_combined();
    let workload = repos.roster.count_active_or_cooling_by_company().await?;

    let outcome = allocate(&candidates, &workload, policy, today);
    let validator = PolicySheetValidator::new(policy.clone());
    match &outcome {
        SheetOutcome::Ready(sheet) => {
            let check = validator.validate(sheet);
            if !check.valid {
                return Err(PipelineError::SheetRejected(check.summary()));
            }
            info!(
                event_name = "cadence.sheet.planned",
                correlation_id = %correlation_id,
                date = %today,
                entries = sheet.len(),
                fresh = sheet.fresh.len(),
                retry = sheet.retry.len(),
                skipped_saturated = sheet.stats.skipped_saturated,
                skipped_daily_cap = sheet.stats.skipped_daily_cap,
                "daily sheet planned"
            );
        }
        SheetOutcome::Empty { stats, .. } => {
            info!(
                event_name = "cadence.sheet.empty",
                correlation_id = %correlation_id,
                date = %today,
                candidates = stats.candidates_considered,
                "no contacts available for the day"
            );
        }
        SheetOutcome::NotSynced => {}
    }

    Ok(outcome)
}

/// Audit straight from the call log. Writes nothing.
pub async fn run_compliance_check(
    repos: &CadenceRepositories,
    policy: &ComplianceAuditPolicy,
    today: NaiveDate,
) -> Result<ComplianceReport, PipelineError> {
    let correlation_id = Uuid::new_v4().to_string();
    let events = repos.calls.list_call_events().await?;
    let blocked = repos.companies.list_blocked_companies().await?;

    let history = CallHistory::fold(&events);
    let report = compliance::run_compliance_check(&history, &blocked, policy, today);

    info!(
        event_name = "cadence.compliance.completed",
        correlation_id = %correlation_id,
        policy_version = %report.policy_version,
        contacts_blocked = report.summary.contacts_blocked,
        contacts_cooling = report.summary.contacts_cooling,
        "pre-dial compliance check finished"
    );

    Ok(report)
}

pub async fn roster_stats(
    repos: &CadenceRepositories,
    policy: &OperationalPolicy,
) -> Result<RosterStats, PipelineError> {
    let roster = repos.roster.list_roster(&RosterFilter::all()).await?;
    Ok(stats::roster_stats(&roster, policy.max_contacts_per_company))
}
