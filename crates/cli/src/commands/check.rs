use callsheet_core::cadence::compliance::ComplianceReport;
use callsheet_core::config::LoadOptions;
use callsheet_db::run_compliance_check;
use chrono::NaiveDate;

use crate::commands::{
    build_runtime, load_config, open_store, pipeline_failure, resolve_date, to_json, CommandResult,
};

pub fn run(options: &LoadOptions, date: Option<NaiveDate>, json_output: bool) -> CommandResult {
    let config = match load_config("check", options) {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("check") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };
    let today = resolve_date(date);
    let policy = config.compliance_policy();

    let result = runtime.block_on(async {
        let (pool, repos) = open_store(&config).await?;
        let report = run_compliance_check(&repos, &policy, today).await.map_err(pipeline_failure);
        pool.close().await;
        report
    });

    match result {
        Ok(report) if json_output => to_json("check", &report),
        Ok(report) => CommandResult::report(render_human(&report)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("check", error_class, message, exit_code)
        }
    }
}

fn render_human(report: &ComplianceReport) -> String {
    let mut lines = vec![format!(
        "Pre-dial compliance check as of {} (policy {})",
        report.as_of, report.policy_version
    )];

    lines.push(String::new());
    lines.push(format!("BLOCKED COMPANIES ({})", report.blocked_companies.len()));
    for company in &report.blocked_companies {
        let reason = company.reason.as_deref().unwrap_or("no reason recorded");
        lines.push(format!("  - {} [{}]: {reason}", company.name, company.status));
    }

    lines.push(String::new());
    lines.push(format!("BLOCKED CONTACTS ({})", report.blocked_contacts.len()));
    for (label, contacts) in report.blocked_by_group() {
        lines.push(format!("  {label} ({})", contacts.len()));
        for contact in contacts {
            lines.push(format!(
                "    - {} ({}): {}",
                contact.contact_name, contact.company_name, contact.reason
            ));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "COOLING, called within {} days ({})",
        report.cooldown_calendar_days,
        report.cooling_contacts.len()
    ));
    for contact in &report.cooling_contacts {
        lines.push(format!(
            "  - {} ({}): last called {}, {} days ago",
            contact.contact_name, contact.company_name, contact.last_called_at, contact.days_ago
        ));
    }

    let summary = &report.summary;
    lines.push(String::new());
    lines.push("SUMMARY".to_string());
    lines.push(format!("  companies blocked: {}", summary.companies_blocked));
    lines.push(format!("  contacts blocked:  {}", summary.contacts_blocked));
    lines.push(format!("  contacts cooling:  {}", summary.contacts_cooling));
    lines.push(format!("  total exclusions:  {}", summary.total_exclusions));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use callsheet_core::cadence::compliance::{
        BlockKind, BlockedCompany, BlockedContact, ComplianceReport, ComplianceSummary,
        CoolingContact,
    };
    use callsheet_core::domain::company::BlocklistStatus;
    use chrono::NaiveDate;

    use super::render_human;

    #[test]
    fn report_groups_blocked_contacts_by_section() {
        let as_of = NaiveDate::from_ymd_opt(2026, 2, 11).expect("valid date");
        let report = ComplianceReport {
            as_of,
            policy_version: "compliance-audit-v1".to_string(),
            cooldown_calendar_days: 7,
            blocked_companies: vec![BlockedCompany {
                name: "Umbrella Transit".to_string(),
                status: BlocklistStatus::DoNotContact,
                reason: None,
            }],
            blocked_contacts: vec![
                BlockedContact {
                    contact_name: "Dev Shah".to_string(),
                    company_name: "Globex Freight".to_string(),
                    kind: BlockKind::TerminalOutcome,
                    reason: "Outcome: Not Interested".to_string(),
                },
                BlockedContact {
                    contact_name: "Eli Park".to_string(),
                    company_name: "Globex Freight".to_string(),
                    kind: BlockKind::VoicemailNoReply,
                    reason: "3 voicemails, never answered".to_string(),
                },
            ],
            cooling_contacts: vec![CoolingContact {
                contact_name: "Ben Ode".to_string(),
                company_name: "Acme Rail".to_string(),
                last_called_at: as_of - chrono::Duration::days(2),
                days_ago: 2,
            }],
            summary: ComplianceSummary {
                companies_blocked: 1,
                contacts_blocked: 2,
                contacts_cooling: 1,
                total_exclusions: 4,
            },
        };

        let rendered = render_human(&report);
        assert!(rendered.contains("  - Umbrella Transit [do_not_contact]: no reason recorded"));
        assert!(rendered.contains("  Terminal outcome (1)\n    - Dev Shah (Globex Freight)"));
        assert!(rendered.contains("  Exhausted (1)\n    - Eli Park"));
        assert!(rendered.contains("COOLING, called within 7 days (1)"));
        assert!(rendered.contains("Ben Ode (Acme Rail): last called 2026-02-09, 2 days ago"));
        assert!(rendered.ends_with("  total exclusions:  4"));
    }
}
