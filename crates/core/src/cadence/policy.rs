//! Named rule sets.
//!
//! The daily scheduler and the pre-dial audit deliberately run different
//! policies: the audit uses a longer, calendar-day cooldown and volume rules
//! the scheduler does not apply. Both are versioned so reports can state which
//! rules produced them.

use serde::{Deserialize, Serialize};

/// Rules the classifier, cooldown scheduler and allocator run under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalPolicy {
    pub version: String,
    pub max_attempts: u32,
    pub cooldown_business_days: u32,
    pub max_contacts_per_company: usize,
    pub daily_target: usize,
    pub per_company_daily_cap: usize,
}

impl Default for OperationalPolicy {
    fn default() -> Self {
        Self {
            version: "operational-v1".to_string(),
            max_attempts: 4,
            cooldown_business_days: 3,
            max_contacts_per_company: 5,
            daily_target: 50,
            per_company_daily_cap: 3,
        }
    }
}

/// Rules the pre-dial compliance checker runs under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceAuditPolicy {
    pub version: String,
    pub max_attempts: u32,
    pub cooldown_calendar_days: u32,
    pub max_voicemail_no_reply: usize,
    pub max_no_answer: usize,
}

impl Default for ComplianceAuditPolicy {
    fn default() -> Self {
        Self {
            version: "compliance-audit-v1".to_string(),
            max_attempts: 4,
            cooldown_calendar_days: 7,
            max_voicemail_no_reply: 3,
            max_no_answer: 5,
        }
    }
}
