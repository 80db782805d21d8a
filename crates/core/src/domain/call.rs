use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Fixed call disposition vocabulary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeCategory {
    #[serde(rename = "Interested")]
    Interested,
    #[serde(rename = "Not Interested")]
    NotInterested,
    #[serde(rename = "Meeting Booked")]
    MeetingBooked,
    #[serde(rename = "Referral Given")]
    ReferralGiven,
    #[serde(rename = "No Rail")]
    NoRail,
    #[serde(rename = "Wrong Person")]
    WrongPerson,
    #[serde(rename = "Wrong Number")]
    WrongNumber,
    #[serde(rename = "Gatekeeper")]
    Gatekeeper,
    #[serde(rename = "Left Voicemail")]
    LeftVoicemail,
    #[serde(rename = "No Answer")]
    NoAnswer,
}

impl OutcomeCategory {
    pub const ALL: [OutcomeCategory; 10] = [
        Self::Interested,
        Self::MeetingBooked,
        Self::ReferralGiven,
        Self::NotInterested,
        Self::NoRail,
        Self::WrongPerson,
        Self::WrongNumber,
        Self::Gatekeeper,
        Self::LeftVoicemail,
        Self::NoAnswer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interested => "Interested",
            Self::NotInterested => "Not Interested",
            Self::MeetingBooked => "Meeting Booked",
            Self::ReferralGiven => "Referral Given",
            Self::NoRail => "No Rail",
            Self::WrongPerson => "Wrong Person",
            Self::WrongNumber => "Wrong Number",
            Self::Gatekeeper => "Gatekeeper",
            Self::LeftVoicemail => "Left Voicemail",
            Self::NoAnswer => "No Answer",
        }
    }

    /// Outcomes that permanently end outreach to a contact.
    pub fn is_terminal_negative(self) -> bool {
        matches!(self, Self::NotInterested | Self::NoRail | Self::WrongPerson | Self::WrongNumber)
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Self::Interested | Self::MeetingBooked | Self::ReferralGiven)
    }

    /// Prior positive signal that earns a contact priority on the sheet.
    pub fn is_warm(self) -> bool {
        matches!(self, Self::Interested | Self::ReferralGiven)
    }

    /// True when the call never reached a live person.
    pub fn is_unanswered(self) -> bool {
        matches!(self, Self::LeftVoicemail | Self::NoAnswer)
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutcomeCategory {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DomainError::UnknownOutcome(trimmed.to_string()))
    }
}

/// One logged call. Name and company are optional because upstream rows can
/// arrive incomplete; the aggregator skips those.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEvent {
    pub contact_name: Option<String>,
    pub company_name: Option<String>,
    pub outcome_category: OutcomeCategory,
    pub called_at: DateTime<Utc>,
}

impl CallEvent {
    pub fn new(
        contact_name: impl Into<String>,
        company_name: impl Into<String>,
        outcome_category: OutcomeCategory,
        called_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contact_name: Some(contact_name.into()),
            company_name: Some(company_name.into()),
            outcome_category,
            called_at,
        }
    }

    pub fn called_on(&self) -> NaiveDate {
        self.called_at.date_naive()
    }
}
