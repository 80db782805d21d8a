use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::call::OutcomeCategory;
use crate::errors::DomainError;

/// Identity of a contact: one roster row per (name, company).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactKey {
    pub contact_name: String,
    pub company_name: String,
}

impl ContactKey {
    /// Builds a key from raw fields, rejecting blank names or companies.
    pub fn from_parts(contact_name: Option<&str>, company_name: Option<&str>) -> Option<Self> {
        let contact_name = contact_name.map(str::trim).filter(|value| !value.is_empty())?;
        let company_name = company_name.map(str::trim).filter(|value| !value.is_empty())?;
        Some(Self {
            contact_name: contact_name.to_string(),
            company_name: company_name.to_string(),
        })
    }
}

impl fmt::Display for ContactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.contact_name, self.company_name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Active,
    Cooling,
    Retired,
    Blocked,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 4] = [Self::Active, Self::Cooling, Self::Retired, Self::Blocked];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Cooling => "cooling",
            Self::Retired => "retired",
            Self::Blocked => "blocked",
        }
    }

    /// Active and cooling contacts still count against company capacity.
    pub fn is_workable(self) -> bool {
        matches!(self, Self::Active | Self::Cooling)
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "cooling" => Ok(Self::Cooling),
            "retired" => Ok(Self::Retired),
            "blocked" => Ok(Self::Blocked),
            other => Err(DomainError::UnknownContactStatus(other.to_string())),
        }
    }
}

/// Derived lifecycle state for one contact. Always rebuilt from the call log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub contact_name: String,
    pub company_name: String,
    pub attempt_count: u32,
    pub last_called_at: Option<NaiveDate>,
    pub best_outcome: Option<OutcomeCategory>,
    pub status: ContactStatus,
    pub retired_reason: Option<String>,
    pub next_callable_at: Option<NaiveDate>,
}

impl ContactRecord {
    pub fn key(&self) -> ContactKey {
        ContactKey {
            contact_name: self.contact_name.clone(),
            company_name: self.company_name.clone(),
        }
    }

    pub fn has_warm_signal(&self) -> bool {
        self.best_outcome.map(OutcomeCategory::is_warm).unwrap_or(false)
    }
}

/// A contact known to the campaign but never dialed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prospect {
    pub contact_name: String,
    pub company_name: String,
}

#[cfg(test)]
mod tests {
    use super::{ContactKey, ContactStatus};

    #[test]
    fn contact_key_requires_name_and_company() {
        assert_eq!(
            ContactKey::from_parts(Some(" Dana Reyes "), Some("Acme Rail")),
            Some(ContactKey {
                contact_name: "Dana Reyes".to_string(),
                company_name: "Acme Rail".to_string(),
            })
        );
        assert_eq!(ContactKey::from_parts(Some("Dana Reyes"), Some("   ")), None);
        assert_eq!(ContactKey::from_parts(None, Some("Acme Rail")), None);
    }

    #[test]
    fn only_active_and_cooling_are_workable() {
        let workable: Vec<_> =
            ContactStatus::ALL.into_iter().filter(|status| status.is_workable()).collect();
        assert_eq!(workable, vec![ContactStatus::Active, ContactStatus::Cooling]);
    }
}
