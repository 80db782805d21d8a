//! Daily sheet allocation under company capacity limits.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cadence::policy::OperationalPolicy;
use crate::domain::call::OutcomeCategory;
use crate::domain::contact::{ContactRecord, ContactStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetPriority {
    High,
    Medium,
    Low,
}

impl SheetPriority {
    pub fn for_contact(record: &ContactRecord) -> Self {
        if record.has_warm_signal() {
            Self::High
        } else if record.attempt_count > 0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetEntry {
    pub contact_name: String,
    pub company_name: String,
    /// Attempt number this call will be, starting at 1.
    pub attempt: u32,
    pub last_called_at: Option<NaiveDate>,
    pub prior_best: Option<OutcomeCategory>,
    pub priority: SheetPriority,
    pub source_status: ContactStatus,
    pub next_callable_at: Option<NaiveDate>,
}

impl SheetEntry {
    fn from_record(record: &ContactRecord) -> Self {
        Self {
            contact_name: record.contact_name.clone(),
            company_name: record.company_name.clone(),
            attempt: record.attempt_count + 1,
            last_called_at: record.last_called_at,
            prior_best: record.best_outcome,
            priority: SheetPriority::for_contact(record),
            source_status: record.status,
            next_callable_at: record.next_callable_at,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.attempt == 1
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub candidates_considered: usize,
    pub skipped_saturated: usize,
    pub skipped_daily_cap: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySheet {
    pub date: NaiveDate,
    pub target: usize,
    pub fresh: Vec<SheetEntry>,
    pub retry: Vec<SheetEntry>,
    pub stats: AllocationStats,
}

impl DailySheet {
    pub fn len(&self) -> usize {
        self.fresh.len() + self.retry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fresh.is_empty() && self.retry.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SheetEntry> {
        self.fresh.iter().chain(self.retry.iter())
    }

    pub fn count_by_priority(&self, priority: SheetPriority) -> usize {
        self.entries().filter(|entry| entry.priority == priority).count()
    }

    /// Entries per company, largest first, ties by name.
    pub fn company_distribution(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for entry in self.entries() {
            *counts.entry(entry.company_name.as_str()).or_default() += 1;
        }
        let mut distribution: Vec<(String, usize)> =
            counts.into_iter().map(|(company, count)| (company.to_string(), count)).collect();
        distribution.sort_by(|left, right| right.1.cmp(&left.1).then_with(|| left.0.cmp(&right.0)));
        distribution
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SheetOutcome {
    /// The roster has never been built.
    NotSynced,
    /// The roster exists but nothing is callable today.
    Empty { date: NaiveDate, stats: AllocationStats },
    Ready(DailySheet),
}

impl SheetOutcome {
    pub fn operator_message(&self) -> String {
        match self {
            Self::NotSynced => {
                "Roster has not been synced yet. Run `callsheet sync` first.".to_string()
            }
            Self::Empty { .. } => {
                "No contacts available. Re-sync the roster or add new prospects.".to_string()
            }
            Self::Ready(sheet) => {
                format!("{} contacts scheduled (target: {})", sheet.len(), sheet.target)
            }
        }
    }
}

/// Roster-wide count of active and cooling contacts per company.
pub fn count_workable_by_company<'a>(
    roster: impl IntoIterator<Item = &'a ContactRecord>,
) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in roster.into_iter().filter(|record| record.status.is_workable()) {
        *counts.entry(record.company_name.clone()).or_default() += 1;
    }
    counts
}

/// Walks candidates in priority order, skipping companies saturated roster-wide
/// (more than `max_contacts_per_company` workable contacts) and companies that
/// already hold `per_company_daily_cap` slots today.
pub fn allocate(
    candidates: &[ContactRecord],
    workload: &HashMap<String, usize>,
    policy: &OperationalPolicy,
    date: NaiveDate,
) -> SheetOutcome {
    let mut stats = AllocationStats::default();
    let mut slots_today: HashMap<&str, usize> = HashMap::new();
    let mut fresh = Vec::new();
    let mut retry = Vec::new();

    for candidate in candidates {
        if fresh.len() + retry.len() >= policy.daily_target {
            break;
        }
        stats.candidates_considered += 1;

        let company = candidate.company_name.as_str();
        if workload.get(company).copied().unwrap_or(0) > policy.max_contacts_per_company {
            stats.skipped_saturated += 1;
            continue;
        }

        let slots = slots_today.entry(company).or_default();
        if *slots >= policy.per_company_daily_cap {
            stats.skipped_daily_cap += 1;
            continue;
        }
        *slots += 1;

        let entry = SheetEntry::from_record(candidate);
        if entry.is_fresh() {
            fresh.push(entry);
        } else {
            retry.push(entry);
        }
    }

    if fresh.is_empty() && retry.is_empty() {
        return SheetOutcome::Empty { date, stats };
    }

    SheetOutcome::Ready(DailySheet { date, target: policy.daily_target, fresh, retry, stats })
}
