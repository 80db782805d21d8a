use callsheet_core::calendar::campaign_week;
use callsheet_core::cadence::stats::RosterStats;
use callsheet_core::config::LoadOptions;
use callsheet_db::roster_stats;
use chrono::NaiveDate;

use crate::commands::{
    build_runtime, load_config, open_store, pipeline_failure, resolve_date, to_json, CommandResult,
};
use crate::render::table;

pub fn run(options: &LoadOptions, date: Option<NaiveDate>, json_output: bool) -> CommandResult {
    let config = match load_config("stats", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("stats") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let today = resolve_date(date);
    let policy = config.operational_policy();

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;
        let stats = roster_stats(&repos, &policy).await.map_err(pipeline_failure);
        pool.close().await;
        stats
    });

    match result {
        Ok(stats) if json_output => to_json("stats", &stats),
        Ok(stats) => CommandResult::report(render_human(
            &stats,
            today,
            campaign_week(today, config.campaign.start_date),
            policy.max_contacts_per_company,
        )),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("stats", error_class, message, exit_code)
        }
    }
}

fn render_human(stats: &RosterStats, today: NaiveDate, week: i64, min_contacts: usize) -> String {
    let mut lines = vec![
        format!("Roster statistics for {today} (campaign week {week})"),
        format!("Total contacts: {}", stats.total),
    ];

    let rows = stats
        .by_status
        .iter()
        .map(|entry| {
            vec![
                entry.status.to_string(),
                entry.count.to_string(),
                format!("{:.1}%", entry.percent),
            ]
        })
        .collect::<Vec<_>>();
    lines.extend(table(&["Status", "Count", "Share"], &rows));

    if !stats.retired_reasons.is_empty() {
        lines.push(String::new());
        lines.push("Retired reasons:".to_string());
        for (reason, count) in &stats.retired_reasons {
            lines.push(format!("  {reason}: {count}"));
        }
    }

    lines.push(String::new());
    lines.push(format!("Most worked companies (>= {min_contacts} contacts):"));
    if stats.most_worked.is_empty() {
        lines.push("  (none)".to_string());
    }
    for load in &stats.most_worked {
        let marker = if load.saturated { " [saturated]" } else { "" };
        lines.push(format!(
            "  {}: {} contacts, {} active, {} retired{marker}",
            load.company_name, load.total, load.active, load.retired
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use callsheet_core::cadence::stats::{CompanyLoad, RosterStats, StatusCount};
    use callsheet_core::domain::contact::ContactStatus;
    use chrono::NaiveDate;

    use super::render_human;

    #[test]
    fn saturated_companies_are_flagged() {
        let stats = RosterStats {
            total: 4,
            by_status: vec![
                StatusCount { status: ContactStatus::Active, count: 1, percent: 25.0 },
                StatusCount { status: ContactStatus::Retired, count: 3, percent: 75.0 },
            ],
            retired_reasons: vec![("Max attempts reached (4)".to_string(), 3)],
            most_worked: vec![CompanyLoad {
                company_name: "Acme Rail".to_string(),
                active: 0,
                retired: 3,
                total: 3,
                saturated: true,
            }],
        };
        let today = NaiveDate::from_ymd_opt(2026, 2, 11).expect("valid date");

        let rendered = render_human(&stats, today, 4, 3);
        assert!(rendered.starts_with("Roster statistics for 2026-02-11 (campaign week 4)"));
        assert!(rendered.contains("retired  3      75.0%"));
        assert!(rendered.contains("  Max attempts reached (4): 3"));
        assert!(rendered.contains("  Acme Rail: 3 contacts, 0 active, 3 retired [saturated]"));
    }
}
