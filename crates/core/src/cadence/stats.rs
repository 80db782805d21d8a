//! Roster health summary.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::contact::{ContactRecord, ContactStatus};

const MOST_WORKED_LIMIT: usize = 15;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: ContactStatus,
    pub count: usize,
    pub percent: f64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyLoad {
    pub company_name: String,
    pub active: usize,
    pub retired: usize,
    pub total: usize,
    /// No contact at the company is still active.
    pub saturated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub retired_reasons: Vec<(String, usize)>,
    pub most_worked: Vec<CompanyLoad>,
}

impl RosterStats {
    pub fn count(&self, status: ContactStatus) -> usize {
        self.by_status.iter().find(|entry| entry.status == status).map_or(0, |entry| entry.count)
    }
}

/// Companies listed under "most worked" have at least `min_contacts` roster rows.
pub fn roster_stats(roster: &[ContactRecord], min_contacts: usize) -> RosterStats {
    let total = roster.len();

    let by_status = ContactStatus::ALL
        .iter()
        .map(|status| {
            let count = roster.iter().filter(|record| record.status == *status).count();
            let percent = if total == 0 { 0.0 } else { count as f64 * 100.0 / total as f64 };
            StatusCount { status: *status, count, percent }
        })
        .collect();

    let mut reasons: HashMap<&str, usize> = HashMap::new();
    for record in roster.iter().filter(|record| record.status == ContactStatus::Retired) {
        if let Some(reason) = record.retired_reason.as_deref() {
            *reasons.entry(reason).or_default() += 1;
        }
    }
    let mut retired_reasons: Vec<(String, usize)> =
        reasons.into_iter().map(|(reason, count)| (reason.to_string(), count)).collect();
    retired_reasons.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));

    let mut companies: HashMap<&str, CompanyLoad> = HashMap::new();
    for record in roster {
        let load = companies.entry(record.company_name.as_str()).or_insert_with(|| CompanyLoad {
            company_name: record.company_name.clone(),
            active: 0,
            retired: 0,
            total: 0,
            saturated: false,
        });
        load.total += 1;
        match record.status {
            ContactStatus::Active => load.active += 1,
            ContactStatus::Retired => load.retired += 1,
            _ => {}
        }
    }
    let mut most_worked: Vec<CompanyLoad> = companies
        .into_values()
        .filter(|load| load.total >= min_contacts)
        .map(|load| CompanyLoad { saturated: load.active == 0, ..load })
        .collect();
    most_worked.sort_by(|left, right| {
        right.total.cmp(&left.total).then_with(|| left.company_name.cmp(&right.company_name))
    });
    most_worked.truncate(MOST_WORKED_LIMIT);

    RosterStats { total, by_status, retired_reasons, most_worked }
}

#[cfg(test)]
mod tests {
    use super::roster_stats;
    use crate::domain::contact::{ContactRecord, ContactStatus};

    fn record(
        name: &str,
        company: &str,
        status: ContactStatus,
        reason: Option<&str>,
    ) -> ContactRecord {
        ContactRecord {
            contact_name: name.to_string(),
            company_name: company.to_string(),
            attempt_count: 1,
            last_called_at: None,
            best_outcome: None,
            status,
            retired_reason: reason.map(str::to_string),
            next_callable_at: None,
        }
    }

    #[test]
    fn counts_statuses_with_percentages() {
        let roster = vec![
            record("a", "Acme", ContactStatus::Active, None),
            record("b", "Acme", ContactStatus::Active, None),
            record("c", "Acme", ContactStatus::Cooling, None),
            record("d", "Globex", ContactStatus::Blocked, Some("Company blocked")),
        ];

        let stats = roster_stats(&roster, 5);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.count(ContactStatus::Active), 2);
        assert_eq!(stats.count(ContactStatus::Retired), 0);
        assert!((stats.by_status[0].percent - 50.0).abs() < f64::EPSILON);
        assert!(stats.most_worked.is_empty());
    }

    #[test]
    fn breaks_down_retired_reasons_by_frequency() {
        let roster = vec![
            record("a", "Acme", ContactStatus::Retired, Some("Outcome: No Rail")),
            record("b", "Acme", ContactStatus::Retired, Some("Max attempts reached (4)")),
            record("c", "Acme", ContactStatus::Retired, Some("Max attempts reached (4)")),
        ];

        let stats = roster_stats(&roster, 5);

        assert_eq!(
            stats.retired_reasons,
            vec![
                ("Max attempts reached (4)".to_string(), 2),
                ("Outcome: No Rail".to_string(), 1)
            ]
        );
    }

    #[test]
    fn flags_worked_out_companies_as_saturated() {
        let retired = Some("Outcome: No Rail");
        let mut roster: Vec<_> = (0..5)
            .map(|i| record(&format!("r{i}"), "Acme", ContactStatus::Retired, retired))
            .collect();
        roster.extend(
            (0..6).map(|i| record(&format!("g{i}"), "Globex", ContactStatus::Active, None)),
        );

        let stats = roster_stats(&roster, 5);

        let loads: Vec<_> = stats
            .most_worked
            .iter()
            .map(|load| (load.company_name.as_str(), load.total, load.saturated))
            .collect();
        assert_eq!(loads, vec![("Globex", 6, false), ("Acme", 5, true)]);
    }

    #[test]
    fn empty_roster_has_zero_percentages() {
        let stats = roster_stats(&[], 5);
        assert_eq!(stats.total, 0);
        assert!(stats.by_status.iter().all(|entry| entry.percent == 0.0));
    }
}
