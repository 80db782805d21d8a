//! Lifecycle classifier: first matching rule wins.
//!
//! 1. company blocked
//! 2. any terminal-negative outcome
//! 3. meeting booked
//! 4. max attempts reached
//! 5. inside the business-day cooldown
//! 6. otherwise active

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cadence::aggregate::ContactAccumulator;
use crate::cadence::policy::OperationalPolicy;
use crate::calendar::add_business_days;
use crate::domain::call::OutcomeCategory;
use crate::domain::company::CompanyBlocklist;
use crate::domain::contact::ContactStatus;

pub const MEETING_BOOKED_REASON: &str = "Meeting booked — in pipeline";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub status: ContactStatus,
    pub retired_reason: Option<String>,
    pub next_callable_at: Option<NaiveDate>,
}

impl Classification {
    fn terminal(status: ContactStatus, reason: impl Into<String>) -> Self {
        Self { status, retired_reason: Some(reason.into()), next_callable_at: None }
    }
}

pub fn next_callable_date(last_called_at: NaiveDate, policy: &OperationalPolicy) -> NaiveDate {
    add_business_days(last_called_at, policy.cooldown_business_days)
}

pub fn classify(
    contact: &ContactAccumulator,
    blocklist: &CompanyBlocklist,
    policy: &OperationalPolicy,
    today: NaiveDate,
) -> Classification {
    if let Some(reason) = blocklist.block_reason(&contact.key.company_name) {
        return Classification::terminal(ContactStatus::Blocked, reason);
    }

    if let Some(terminal) = contact.last_terminal_negative() {
        return Classification::terminal(ContactStatus::Retired, format!("Outcome: {terminal}"));
    }

    if contact.contains(OutcomeCategory::MeetingBooked) {
        return Classification::terminal(ContactStatus::Retired, MEETING_BOOKED_REASON);
    }

    if contact.attempt_count >= policy.max_attempts {
        return Classification::terminal(
            ContactStatus::Retired,
            format!("Max attempts reached ({})", contact.attempt_count),
        );
    }

    let next_callable_at =
        contact.last_called_at.map(|last_called_at| next_callable_date(last_called_at, policy));
    let status = match next_callable_at {
        Some(expiry) if today < expiry => ContactStatus::Cooling,
        _ => ContactStatus::Active,
    };

    Classification { status, retired_reason: None, next_callable_at }
}
