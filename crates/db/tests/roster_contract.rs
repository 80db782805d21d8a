use callsheet_core::cadence::allocate::{DailySheet, SheetOutcome, SheetPriority};
use callsheet_core::cadence::policy::{ComplianceAuditPolicy, OperationalPolicy};
use callsheet_core::domain::contact::ContactStatus;
use callsheet_db::repositories::{CadenceRepositories, RosterFilter};
use callsheet_db::{
    connect_with_settings, migrations, plan_daily_sheet, roster_stats, run_compliance_check,
    sync_roster, DemoDataset,
};

type ContractResult<T = ()> = Result<T, String>;

macro_rules! require {
    ($cond:expr) => {
        if !$cond {
            return Err(format!("assertion failed: `{}`", stringify!($cond)));
        }
    };
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            return Err(format!($($arg)*));
        }
    };
}

macro_rules! require_eq {
    ($left:expr, $right:expr) => {
        if $left != $right {
            return Err(format!(
                "assertion failed: `left == right` (`{:?}` != `{:?}`)",
                $left,
                $right
            ));
        }
    };
    ($left:expr, $right:expr, $($arg:tt)*) => {
        if $left != $right {
            return Err(format!($($arg)*));
        }
    };
}

async fn sql_repositories() -> ContractResult<CadenceRepositories> {
    let pool = connect_with_settings("sqlite::memory:", 1, 30)
        .await
        .map_err(|error| format!("connect: {error}"))?;
    migrations::run_pending(&pool).await.map_err(|error| format!("migrate: {error}"))?;
    Ok(CadenceRepositories::sql(pool))
}

async fn seeded_sheet(repos: &CadenceRepositories) -> ContractResult<DailySheet> {
    DemoDataset::load(repos).await.map_err(|error| format!("seed: {error}"))?;
    let policy = OperationalPolicy::default();
    sync_roster(repos, &policy, &[], DemoDataset::as_of())
        .await
        .map_err(|error| format!("sync: {error}"))?;

    match plan_daily_sheet(repos, &policy, DemoDataset::as_of())
        .await
        .map_err(|error| format!("plan: {error}"))?
    {
        SheetOutcome::Ready(sheet) => Ok(sheet),
        other => Err(format!("expected a ready sheet, got {other:?}")),
    }
}

fn names(sheet: &DailySheet) -> Vec<&str> {
    sheet.entries().map(|entry| entry.contact_name.as_str()).collect()
}

#[tokio::test]
async fn demo_roster_covers_every_lifecycle_state() -> ContractResult {
    let repos = sql_repositories().await?;
    DemoDataset::load(&repos).await.map_err(|error| format!("seed: {error}"))?;

    let sync = sync_roster(&repos, &OperationalPolicy::default(), &[], DemoDataset::as_of())
        .await
        .map_err(|error| format!("sync: {error}"))?;

    require_eq!(sync.run.event_count, 18);
    require_eq!(sync.run.skipped_rows, 1, "the nameless call row should be skipped");
    require_eq!(sync.run.contact_count, 14);
    require_eq!(
        sync.status_counts,
        vec![
            (ContactStatus::Active, 7),
            (ContactStatus::Cooling, 1),
            (ContactStatus::Retired, 4),
            (ContactStatus::Blocked, 2),
        ]
    );

    let cooling = repos
        .roster
        .list_roster(&RosterFilter {
            statuses: vec![ContactStatus::Cooling],
            callable_on: None,
        })
        .await
        .map_err(|error| format!("list cooling: {error}"))?;
    require_eq!(cooling.len(), 1);
    require_eq!(cooling[0].contact_name, "Ben Ode");
    require_eq!(
        cooling[0].next_callable_at.map(|date| date.to_string()),
        Some("2026-02-12".to_string())
    );

    let stats = roster_stats(&repos, &OperationalPolicy::default())
        .await
        .map_err(|error| format!("stats: {error}"))?;
    require_eq!(stats.total, 14);
    require!(
        stats.retired_reasons.iter().any(|(reason, _)| reason == "Meeting booked — in pipeline"),
        "meeting booked retirement should be listed"
    );
    Ok(())
}

#[tokio::test]
async fn sheet_orders_warm_then_fresh_then_retries() -> ContractResult {
    let repos = sql_repositories().await?;
    let sheet = seeded_sheet(&repos).await?;

    require_eq!(
        names(&sheet),
        vec!["Kim Lowe", "Lia Ford", "Max Bell", "Ana Ruiz", "Gus Hale", "Cara Lim", "Eli Park"]
    );
    require_eq!(sheet.count_by_priority(SheetPriority::High), 2);
    require_eq!(sheet.count_by_priority(SheetPriority::Low), 3);
    require!(
        sheet.company_distribution().iter().all(|(_, count)| *count <= 3),
        "no company may exceed three entries"
    );
    require!(!names(&sheet).contains(&"Ben Ode"), "cooling contact must not be scheduled");
    Ok(())
}

#[tokio::test]
async fn sql_and_in_memory_stores_agree() -> ContractResult {
    let sql = sql_repositories().await?;
    let memory = CadenceRepositories::in_memory();

    let from_sql = seeded_sheet(&sql).await?;
    let from_memory = seeded_sheet(&memory).await?;

    require_eq!(from_sql, from_memory);

    let sql_roster = sql
        .roster
        .list_roster(&RosterFilter::all())
        .await
        .map_err(|error| format!("sql roster: {error}"))?;
    let memory_roster = memory
        .roster
        .list_roster(&RosterFilter::all())
        .await
        .map_err(|error| format!("memory roster: {error}"))?;
    require_eq!(sql_roster, memory_roster);
    Ok(())
}

#[tokio::test]
async fn compliance_audit_flags_drift_from_the_operational_roster() -> ContractResult {
    let repos = sql_repositories().await?;
    DemoDataset::load(&repos).await.map_err(|error| format!("seed: {error}"))?;

    let report =
        run_compliance_check(&repos, &ComplianceAuditPolicy::default(), DemoDataset::as_of())
            .await
            .map_err(|error| format!("check: {error}"))?;

    require_eq!(report.summary.companies_blocked, 2);
    require_eq!(report.summary.contacts_blocked, 5);
    require_eq!(report.summary.contacts_cooling, 2);
    // Operationally still active, but the audit stops calling after three unanswered voicemails.
    require!(
        report
            .blocked_contacts
            .iter()
            .any(|contact| contact.contact_name == "Eli Park"
                && contact.reason == "3 voicemails, never answered"),
        "Eli Park should be blocked by the voicemail rule"
    );
    let cooling: Vec<_> =
        report.cooling_contacts.iter().map(|c| (c.contact_name.as_str(), c.days_ago)).collect();
    require_eq!(cooling, vec![("Ben Ode", 2), ("Gus Hale", 6)]);
    Ok(())
}
