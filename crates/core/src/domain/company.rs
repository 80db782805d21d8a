use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlocklistStatus {
    #[default]
    None,
    DoNotContact,
    NotInterested,
    Exhausted,
}

impl BlocklistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::DoNotContact => "do_not_contact",
            Self::NotInterested => "not_interested",
            Self::Exhausted => "exhausted",
        }
    }

    pub fn is_blocked(self) -> bool {
        self != Self::None
    }
}

impl fmt::Display for BlocklistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlocklistStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "do_not_contact" => Ok(Self::DoNotContact),
            "not_interested" => Ok(Self::NotInterested),
            "exhausted" => Ok(Self::Exhausted),
            other => Err(DomainError::UnknownBlocklistStatus(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    #[serde(default)]
    pub blocklist_status: BlocklistStatus,
    #[serde(default)]
    pub status_reason: Option<String>,
}

impl Company {
    pub fn new(name: impl Into<String>, blocklist_status: BlocklistStatus) -> Self {
        Self { name: name.into(), blocklist_status, status_reason: None }
    }
}

/// Company-level do-not-call gate.
///
/// Two sources feed it: companies flagged in the store and the operator's
/// do-not-touch list. Names are matched trimmed and case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct CompanyBlocklist {
    flagged: HashSet<String>,
    do_not_touch: HashSet<String>,
}

impl CompanyBlocklist {
    pub fn from_companies<'a>(companies: impl IntoIterator<Item = &'a Company>) -> Self {
        let flagged = companies
            .into_iter()
            .filter(|company| company.blocklist_status.is_blocked())
            .map(|company| normalize(&company.name))
            .filter(|name| !name.is_empty())
            .collect();
        Self { flagged, do_not_touch: HashSet::new() }
    }

    pub fn with_do_not_touch<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.do_not_touch.extend(
            names.into_iter().map(|name| normalize(name.as_ref())).filter(|name| !name.is_empty()),
        );
        self
    }

    /// Reason a company is blocked, if it is. Store flags win over the
    /// do-not-touch list.
    pub fn block_reason(&self, company_name: &str) -> Option<&'static str> {
        let key = normalize(company_name);
        if self.flagged.contains(&key) {
            Some("Company blocked")
        } else if self.do_not_touch.contains(&key) {
            Some("DNT list")
        } else {
            None
        }
    }

    pub fn is_blocked(&self, company_name: &str) -> bool {
        self.block_reason(company_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.flagged.union(&self.do_not_touch).count()
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty() && self.do_not_touch.is_empty()
    }
}

/// Parses a do-not-touch file: one company per line, blanks ignored.
pub fn parse_do_not_touch(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{parse_do_not_touch, BlocklistStatus, Company, CompanyBlocklist};

    #[test]
    fn only_flagged_companies_are_blocked() {
        let companies = vec![
            Company::new("Acme Rail", BlocklistStatus::DoNotContact),
            Company::new("Globex", BlocklistStatus::None),
            Company::new("Initech", BlocklistStatus::Exhausted),
        ];
        let blocklist = CompanyBlocklist::from_companies(&companies);

        assert!(blocklist.is_blocked("Acme Rail"));
        assert!(blocklist.is_blocked("  initech "));
        assert!(!blocklist.is_blocked("Globex"));
        assert_eq!(blocklist.len(), 2);
    }

    #[test]
    fn store_flag_wins_over_do_not_touch_reason() {
        let companies = vec![Company::new("Acme Rail", BlocklistStatus::NotInterested)];
        let blocklist = CompanyBlocklist::from_companies(&companies)
            .with_do_not_touch(["ACME RAIL", "Hooli"]);

        assert_eq!(blocklist.block_reason("Acme Rail"), Some("Company blocked"));
        assert_eq!(blocklist.block_reason("hooli"), Some("DNT list"));
        assert_eq!(blocklist.block_reason("Globex"), None);
        assert_eq!(blocklist.len(), 2);
    }

    #[test]
    fn do_not_touch_file_skips_blank_and_comment_lines() {
        let names = parse_do_not_touch("# accounts owned by field sales\nHooli\n\n  Vandelay  \n");
        assert_eq!(names, vec!["Hooli".to_string(), "Vandelay".to_string()]);
    }

    #[test]
    fn blank_status_means_not_blocked() {
        assert_eq!("".parse::<BlocklistStatus>(), Ok(BlocklistStatus::None));
        assert_eq!("Do_Not_Contact".parse::<BlocklistStatus>(), Ok(BlocklistStatus::DoNotContact));
        assert!("paused".parse::<BlocklistStatus>().is_err());
    }
}
