//! Re-check of a built sheet before it is handed to the operator.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::cadence::allocate::DailySheet;
use crate::cadence::policy::OperationalPolicy;
use crate::domain::contact::ContactStatus;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetViolation {
    pub code: String,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetCheck {
    pub valid: bool,
    pub violations: Vec<SheetViolation>,
}

impl Default for SheetCheck {
    fn default() -> Self {
        Self { valid: true, violations: Vec::new() }
    }
}

impl SheetCheck {
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|violation| format!("{}: {}", violation.code, violation.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub trait SheetValidator: Send + Sync {
    fn validate(&self, sheet: &DailySheet) -> SheetCheck;
}

pub struct PolicySheetValidator {
    policy: OperationalPolicy,
}

impl PolicySheetValidator {
    pub fn new(policy: OperationalPolicy) -> Self {
        Self { policy }
    }
}

impl SheetValidator for PolicySheetValidator {
    fn validate(&self, sheet: &DailySheet) -> SheetCheck {
        validate_sheet(sheet, &self.policy)
    }
}

pub fn validate_sheet(sheet: &DailySheet, policy: &OperationalPolicy) -> SheetCheck {
    let mut result = SheetCheck::default();

    if sheet.len() > policy.daily_target {
        result.violations.push(SheetViolation {
            code: "OVER_DAILY_TARGET".to_string(),
            message: format!(
                "Sheet has {} entries, target is {}",
                sheet.len(),
                policy.daily_target
            ),
        });
    }

    let mut seen = HashSet::new();
    let mut per_company: HashMap<&str, usize> = HashMap::new();

    for entry in sheet.entries() {
        let label = format!("{} @ {}", entry.contact_name, entry.company_name);

        if !seen.insert((entry.contact_name.as_str(), entry.company_name.as_str())) {
            result.violations.push(SheetViolation {
                code: "DUPLICATE_CONTACT".to_string(),
                message: format!("{label} appears more than once"),
            });
        }

        *per_company.entry(entry.company_name.as_str()).or_default() += 1;

        match entry.source_status {
            ContactStatus::Active => {}
            ContactStatus::Cooling => {
                if entry.next_callable_at.map_or(true, |next| next > sheet.date) {
                    result.violations.push(SheetViolation {
                        code: "COOLDOWN_NOT_ELAPSED".to_string(),
                        message: format!("{label} is still cooling on {}", sheet.date),
                    });
                }
            }
            status => {
                result.violations.push(SheetViolation {
                    code: "NOT_CALLABLE".to_string(),
                    message: format!("{label} has status {status}"),
                });
            }
        }
    }

    let mut over_cap: Vec<_> = per_company
        .into_iter()
        .filter(|(_, count)| *count > policy.per_company_daily_cap)
        .collect();
    over_cap.sort();
    for (company, count) in over_cap {
        result.violations.push(SheetViolation {
            code: "COMPANY_CAP_EXCEEDED".to_string(),
            message: format!(
                "{company} has {count} entries, cap is {}",
                policy.per_company_daily_cap
            ),
        });
    }

    result.valid = result.violations.is_empty();
    result
}
