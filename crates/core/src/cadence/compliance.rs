//! Pre-dial compliance audit.
//!
//! Recomputes exclusions straight from the call log under
//! [`ComplianceAuditPolicy`], independently of the persisted roster, so drift
//! between the two shows up here. Read-only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cadence::aggregate::{CallHistory, ContactAccumulator};
use crate::cadence::policy::ComplianceAuditPolicy;
use crate::domain::call::OutcomeCategory;
use crate::domain::company::{BlocklistStatus, Company, CompanyBlocklist};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    TerminalOutcome,
    MeetingBooked,
    VoicemailNoReply,
    NoAnswer,
    MaxAttempts,
}

impl BlockKind {
    /// Report section a block is listed under.
    pub fn group_label(self) -> &'static str {
        match self {
            Self::TerminalOutcome => "Terminal outcome",
            Self::MeetingBooked => "Meeting booked",
            Self::VoicemailNoReply | Self::NoAnswer | Self::MaxAttempts => "Exhausted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedCompany {
    pub name: String,
    pub status: BlocklistStatus,
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedContact {
    pub contact_name: String,
    pub company_name: String,
    pub kind: BlockKind,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolingContact {
    pub contact_name: String,
    pub company_name: String,
    pub last_called_at: NaiveDate,
    pub days_ago: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub companies_blocked: usize,
    pub contacts_blocked: usize,
    pub contacts_cooling: usize,
    pub total_exclusions: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub as_of: NaiveDate,
    pub policy_version: String,
    pub cooldown_calendar_days: u32,
    pub blocked_companies: Vec<BlockedCompany>,
    pub blocked_contacts: Vec<BlockedContact>,
    pub cooling_contacts: Vec<CoolingContact>,
    pub summary: ComplianceSummary,
}

impl ComplianceReport {
    /// Blocked contacts grouped by report section, in section order.
    pub fn blocked_by_group(&self) -> Vec<(&'static str, Vec<&BlockedContact>)> {
        let mut groups: Vec<(&'static str, Vec<&BlockedContact>)> = Vec::new();
        for contact in &self.blocked_contacts {
            let label = contact.kind.group_label();
            match groups.iter_mut().find(|(existing, _)| *existing == label) {
                Some((_, members)) => members.push(contact),
                None => groups.push((label, vec![contact])),
            }
        }
        groups
    }
}

fn block_for(
    contact: &ContactAccumulator,
    policy: &ComplianceAuditPolicy,
) -> Option<(BlockKind, String)> {
    if let Some(terminal) = contact.last_terminal_negative() {
        return Some((BlockKind::TerminalOutcome, format!("Outcome: {terminal}")));
    }
    if contact.contains(OutcomeCategory::MeetingBooked) {
        return Some((BlockKind::MeetingBooked, "Outcome: Meeting Booked".to_string()));
    }

    let voicemails = contact.count(OutcomeCategory::LeftVoicemail);
    if voicemails >= policy.max_voicemail_no_reply && !contact.ever_answered() {
        return Some((
            BlockKind::VoicemailNoReply,
            format!("{voicemails} voicemails, never answered"),
        ));
    }

    let no_answers = contact.count(OutcomeCategory::NoAnswer);
    if no_answers >= policy.max_no_answer {
        return Some((BlockKind::NoAnswer, format!("{no_answers} no-answers")));
    }

    if contact.attempt_count >= policy.max_attempts {
        return Some((
            BlockKind::MaxAttempts,
            format!("Max attempts reached ({})", contact.attempt_count),
        ));
    }

    None
}

pub fn run_compliance_check(
    history: &CallHistory,
    companies: &[Company],
    policy: &ComplianceAuditPolicy,
    today: NaiveDate,
) -> ComplianceReport {
    let cutoff = today - chrono::Duration::days(i64::from(policy.cooldown_calendar_days));

    let mut blocked_companies: Vec<BlockedCompany> = companies
        .iter()
        .filter(|company| company.blocklist_status.is_blocked())
        .map(|company| BlockedCompany {
            name: company.name.clone(),
            status: company.blocklist_status,
            reason: company.status_reason.clone(),
        })
        .collect();
    blocked_companies.sort_by(|left, right| left.name.cmp(&right.name));

    let blocklist = CompanyBlocklist::from_companies(companies);
    let mut blocked_contacts = Vec::new();
    let mut cooling_contacts = Vec::new();

    for contact in history.iter() {
        // Already excluded by the company section.
        if blocklist.is_blocked(&contact.key.company_name) {
            continue;
        }
        if let Some((kind, reason)) = block_for(contact, policy) {
            blocked_contacts.push(BlockedContact {
                contact_name: contact.key.contact_name.clone(),
                company_name: contact.key.company_name.clone(),
                kind,
                reason,
            });
            continue;
        }

        if let Some(last) = contact.last_called_at.filter(|last| *last >= cutoff) {
            cooling_contacts.push(CoolingContact {
                contact_name: contact.key.contact_name.clone(),
                company_name: contact.key.company_name.clone(),
                last_called_at: last,
                days_ago: (today - last).num_days(),
            });
        }
    }

    blocked_contacts.sort_by(|left, right| {
        (left.kind, &left.company_name, &left.contact_name).cmp(&(
            right.kind,
            &right.company_name,
            &right.contact_name,
        ))
    });
    cooling_contacts.sort_by(|left, right| {
        (left.days_ago, &left.company_name).cmp(&(right.days_ago, &right.company_name))
    });

    let summary = ComplianceSummary {
        companies_blocked: blocked_companies.len(),
        contacts_blocked: blocked_contacts.len(),
        contacts_cooling: cooling_contacts.len(),
        total_exclusions: blocked_contacts.len() + cooling_contacts.len(),
    };

    ComplianceReport {
        as_of: today,
        policy_version: policy.version.clone(),
        cooldown_calendar_days: policy.cooldown_calendar_days,
        blocked_companies,
        blocked_contacts,
        cooling_contacts,
        summary,
    }
}
