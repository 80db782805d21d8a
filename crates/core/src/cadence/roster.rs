//! Roster rebuild: a pure function of the call log, the prospect list and the
//! blocklist. The store replaces its roster wholesale with the result.

use chrono::NaiveDate;
use sha2::{Digest, Sha256};

use crate::cadence::aggregate::CallHistory;
use crate::cadence::classify::classify;
use crate::cadence::policy::OperationalPolicy;
use crate::domain::company::CompanyBlocklist;
use crate::domain::contact::ContactRecord;

/// One record per contact, in first-seen order.
pub fn build_roster(
    history: &CallHistory,
    blocklist: &CompanyBlocklist,
    policy: &OperationalPolicy,
    today: NaiveDate,
) -> Vec<ContactRecord> {
    history
        .iter()
        .map(|contact| {
            let classification = classify(contact, blocklist, policy, today);
            ContactRecord {
                contact_name: contact.key.contact_name.clone(),
                company_name: contact.key.company_name.clone(),
                attempt_count: contact.attempt_count,
                last_called_at: contact.last_called_at,
                best_outcome: contact.best_outcome,
                status: classification.status,
                retired_reason: classification.retired_reason,
                next_callable_at: classification.next_callable_at,
            }
        })
        .collect()
}

/// SHA-256 over a canonical line-per-record rendering of the roster.
pub fn roster_digest(records: &[ContactRecord]) -> String {
    let mut hasher = Sha256::new();
    for record in records {
        let line = format!(
            "{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\u{1f}{}\n",
            record.contact_name,
            record.company_name,
            record.attempt_count,
            record.last_called_at.map(|date| date.to_string()).unwrap_or_default(),
            record.best_outcome.map(|outcome| outcome.as_str()).unwrap_or_default(),
            record.status.as_str(),
            record.retired_reason.as_deref().unwrap_or_default(),
            record.next_callable_at.map(|date| date.to_string()).unwrap_or_default(),
        );
        hasher.update(line.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}
