use callsheet_core::calendar::campaign_week;
use callsheet_core::cadence::allocate::{DailySheet, SheetEntry, SheetOutcome, SheetPriority};
use callsheet_core::config::LoadOptions;
use callsheet_db::plan_daily_sheet;
use chrono::NaiveDate;

use crate::commands::{
    build_runtime, load_config, open_store, pipeline_failure, resolve_date, to_json, CommandResult,
};
use crate::render::{or_dash, table};

pub fn run(options: &LoadOptions, date: Option<NaiveDate>, json_output: bool) -> CommandResult {
    let config = match load_config("sheet", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("sheet") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let today = resolve_date(date);
    let policy = config.operational_policy();

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;
        let outcome = plan_daily_sheet(&repos, &policy, today).await.map_err(pipeline_failure);
        pool.close().await;
        outcome
    });

    match result {
        Ok(outcome) if json_output => to_json("sheet", &outcome),
        Ok(outcome) => CommandResult::report(render_human(
            &outcome,
            today,
            campaign_week(today, config.campaign.start_date),
        )),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("sheet", error_class, message, exit_code)
        }
    }
}

fn render_human(outcome: &SheetOutcome, today: NaiveDate, week: i64) -> String {
    let heading = today.format("%a %Y-%m-%d");
    let mut lines = vec![format!("Daily call sheet for {heading} (campaign week {week})")];

    let SheetOutcome::Ready(sheet) = outcome else {
        lines.push(outcome.operator_message());
        return lines.join("\n");
    };

    lines.push(format!(
        "{} | priority HIGH {} / MEDIUM {} / LOW {}",
        outcome.operator_message(),
        sheet.count_by_priority(SheetPriority::High),
        sheet.count_by_priority(SheetPriority::Medium),
        sheet.count_by_priority(SheetPriority::Low)
    ));

    push_section(&mut lines, "FRESH", &sheet.fresh, 1);
    push_section(&mut lines, "RETRY", &sheet.retry, sheet.fresh.len() + 1);
    push_footer(&mut lines, sheet);

    lines.join("\n")
}

fn push_section(lines: &mut Vec<String>, title: &str, entries: &[SheetEntry], first: usize) {
    lines.push(String::new());
    lines.push(format!("{title} ({})", entries.len()));
    if entries.is_empty() {
        lines.push("  (none)".to_string());
        return;
    }

    let rows = entries
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            vec![
                (first + offset).to_string(),
                entry.contact_name.clone(),
                entry.company_name.clone(),
                entry.priority.as_str().to_string(),
                entry.attempt.to_string(),
                or_dash(entry.last_called_at),
                or_dash(entry.prior_best),
            ]
        })
        .collect::<Vec<_>>();
    lines.extend(table(
        &["#", "Contact", "Company", "Priority", "Attempt", "Last called", "Prior best"],
        &rows,
    ));
}

fn push_footer(lines: &mut Vec<String>, sheet: &DailySheet) {
    let distribution = sheet
        .company_distribution()
        .into_iter()
        .map(|(company, count)| format!("{company} {count}"))
        .collect::<Vec<_>>()
        .join(", ");

    lines.push(String::new());
    lines.push(format!("Companies: {distribution}"));
    lines.push(format!(
        "Skipped: {} at saturated companies, {} over the per-company daily cap",
        sheet.stats.skipped_saturated, sheet.stats.skipped_daily_cap
    ));
}

#[cfg(test)]
mod tests {
    use callsheet_core::cadence::allocate::{
        AllocationStats, DailySheet, SheetEntry, SheetOutcome, SheetPriority,
    };
    use callsheet_core::domain::call::OutcomeCategory;
    use callsheet_core::domain::contact::ContactStatus;
    use chrono::NaiveDate;

    use super::render_human;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 11).expect("valid date")
    }

    fn entry(name: &str, company: &str, attempt: u32, priority: SheetPriority) -> SheetEntry {
        SheetEntry {
            contact_name: name.to_string(),
            company_name: company.to_string(),
            attempt,
            last_called_at: (attempt > 1).then(|| day() - chrono::Duration::days(7)),
            prior_best: (priority == SheetPriority::High).then_some(OutcomeCategory::Interested),
            priority,
            source_status: ContactStatus::Active,
            next_callable_at: None,
        }
    }

    #[test]
    fn ready_sheet_renders_both_sections_and_footer() {
        let sheet = DailySheet {
            date: day(),
            target: 50,
            fresh: vec![entry("Kim Lowe", "Acme Rail", 1, SheetPriority::Low)],
            retry: vec![
                entry("Ana Ruiz", "Acme Rail", 2, SheetPriority::High),
                entry("Cara Lim", "Globex Freight", 4, SheetPriority::Medium),
            ],
            stats: AllocationStats {
                candidates_considered: 4,
                skipped_saturated: 1,
                skipped_daily_cap: 0,
            },
        };
        let rendered = render_human(&SheetOutcome::Ready(sheet), day(), 4);

        assert!(rendered.starts_with("Daily call sheet for Wed 2026-02-11 (campaign week 4)"));
        assert!(rendered.contains("3 contacts scheduled (target: 50)"));
        assert!(rendered.contains("FRESH (1)"));
        assert!(rendered.contains("RETRY (2)"));
        assert!(rendered.contains("Interested"));
        assert!(rendered.contains("Companies: Acme Rail 2, Globex Freight 1"));
        assert!(rendered.contains("Skipped: 1 at saturated companies"));

        let fresh_row = rendered.lines().find(|line| line.contains("Kim Lowe")).expect("row");
        assert!(fresh_row.trim_start().starts_with('1'));
        let retry_row = rendered.lines().find(|line| line.contains("Cara Lim")).expect("row");
        assert!(retry_row.trim_start().starts_with('3'));
    }

    #[test]
    fn empty_and_unsynced_sheets_render_operator_messages() {
        let empty = SheetOutcome::Empty { date: day(), stats: AllocationStats::default() };
        assert!(render_human(&empty, day(), 4).contains("No contacts available."));

        let unsynced = render_human(&SheetOutcome::NotSynced, day(), 4);
        assert!(unsynced.contains("Run `callsheet sync` first."));
    }
}
