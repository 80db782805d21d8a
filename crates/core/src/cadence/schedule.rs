//! Cooldown scheduler: which roster contacts may be dialed on a given day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::contact::{ContactRecord, ContactStatus};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLists {
    pub active: Vec<ContactRecord>,
    /// Cooling contacts whose cooldown has lapsed by `today`; only non-empty
    /// when the roster was not rebuilt today.
    pub cooling_expiring: Vec<ContactRecord>,
}

impl CandidateLists {
    pub fn len(&self) -> usize {
        self.active.len() + self.cooling_expiring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.cooling_expiring.is_empty()
    }

    /// Active candidates first, then lapsed-cooldown ones, each in priority order.
    pub fn into_combined(self) -> Vec<ContactRecord> {
        let mut combined = self.active;
        combined.extend(self.cooling_expiring);
        combined
    }
}

fn callable_by(record: &ContactRecord, today: NaiveDate) -> bool {
    record.next_callable_at.map(|expiry| expiry <= today).unwrap_or(true)
}

pub fn select_candidates<'a>(
    roster: impl IntoIterator<Item = &'a ContactRecord>,
    today: NaiveDate,
) -> CandidateLists {
    let mut lists = CandidateLists::default();
    for record in roster {
        match record.status {
            ContactStatus::Active if callable_by(record, today) => {
                lists.active.push(record.clone());
            }
            ContactStatus::Cooling
                if record.next_callable_at.is_some() && callable_by(record, today) =>
            {
                lists.cooling_expiring.push(record.clone());
            }
            _ => {}
        }
    }

    sort_by_priority(&mut lists.active);
    sort_by_priority(&mut lists.cooling_expiring);
    lists
}

/// Warm contacts first, then fewest attempts, then least recently called with
/// never-called contacts ahead. Stable, so ties keep roster order.
pub fn sort_by_priority(records: &mut [ContactRecord]) {
    records.sort_by_key(|record| {
        (!record.has_warm_signal(), record.attempt_count, record.last_called_at)
    });
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{select_candidates, sort_by_priority};
    use crate::domain::call::OutcomeCategory;
    use crate::domain::contact::{ContactRecord, ContactStatus};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, d).expect("valid date")
    }

    fn record(
        name: &str,
        status: ContactStatus,
        attempts: u32,
        last: Option<u32>,
        best: Option<OutcomeCategory>,
        next: Option<u32>,
    ) -> ContactRecord {
        ContactRecord {
            contact_name: name.to_string(),
            company_name: "Acme Rail".to_string(),
            attempt_count: attempts,
            last_called_at: last.map(date),
            best_outcome: best,
            status,
            retired_reason: None,
            next_callable_at: next.map(date),
        }
    }

    fn names(records: &[ContactRecord]) -> Vec<&str> {
        records.iter().map(|record| record.contact_name.as_str()).collect()
    }

    #[test]
    fn interested_contact_sorts_before_same_attempt_unknown() {
        let mut records = vec![
            record("plain", ContactStatus::Active, 1, Some(2), None, Some(5)),
            record(
                "warm",
                ContactStatus::Active,
                1,
                Some(3),
                Some(OutcomeCategory::Interested),
                Some(6),
            ),
        ];
        sort_by_priority(&mut records);
        assert_eq!(names(&records), vec!["warm", "plain"]);
    }

    #[test]
    fn fewer_attempts_then_older_call_then_never_called_first() {
        let mut records = vec![
            record("two-old", ContactStatus::Active, 2, Some(2), None, Some(5)),
            record("one-recent", ContactStatus::Active, 1, Some(6), None, Some(11)),
            record("one-old", ContactStatus::Active, 1, Some(3), None, Some(6)),
            record("never", ContactStatus::Active, 0, None, None, None),
        ];
        sort_by_priority(&mut records);
        assert_eq!(names(&records), vec!["never", "one-old", "one-recent", "two-old"]);
    }

    #[test]
    fn ties_keep_roster_order() {
        let mut records = vec![
            record("first", ContactStatus::Active, 1, Some(3), None, Some(6)),
            record("second", ContactStatus::Active, 1, Some(3), None, Some(6)),
        ];
        sort_by_priority(&mut records);
        assert_eq!(names(&records), vec!["first", "second"]);
    }

    #[test]
    fn candidates_split_active_and_lapsed_cooling() {
        let roster = vec![
            record("active-due", ContactStatus::Active, 1, Some(2), None, Some(5)),
            record("active-future", ContactStatus::Active, 1, Some(10), None, Some(13)),
            record("cooling-lapsed", ContactStatus::Cooling, 1, Some(3), None, Some(6)),
            record("cooling-still", ContactStatus::Cooling, 1, Some(10), None, Some(13)),
            record("retired", ContactStatus::Retired, 4, Some(2), None, None),
            record("blocked", ContactStatus::Blocked, 1, Some(2), None, None),
            record("prospect", ContactStatus::Active, 0, None, None, None),
        ];

        let lists = select_candidates(&roster, date(11));

        assert_eq!(names(&lists.active), vec!["prospect", "active-due"]);
        assert_eq!(names(&lists.cooling_expiring), vec!["cooling-lapsed"]);
        assert_eq!(lists.len(), 3);
        assert_eq!(names(&lists.into_combined()), vec!["prospect", "active-due", "cooling-lapsed"]);
    }
}
