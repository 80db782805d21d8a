use chrono::{DateTime, NaiveDate, Utc};

use callsheet_core::domain::call::{CallEvent, OutcomeCategory};
use callsheet_core::domain::company::{BlocklistStatus, Company};
use callsheet_core::domain::contact::Prospect;

use crate::repositories::{CadenceRepositories, LoggedCall, RepositoryError};

struct SeedCompany {
    name: &'static str,
    status: &'static str,
    reason: Option<&'static str>,
}

struct SeedCall {
    external_id: &'static str,
    contact: Option<&'static str>,
    company: &'static str,
    outcome: &'static str,
    called_at: &'static str,
}

const SEED_COMPANIES: &[SeedCompany] = &[
    SeedCompany { name: "Acme Rail", status: "none", reason: None },
    SeedCompany { name: "Globex Freight", status: "none", reason: None },
    SeedCompany { name: "Initech Logistics", status: "none", reason: None },
    SeedCompany { name: "Umbrella Transit", status: "do_not_contact", reason: Some("Legal hold") },
    SeedCompany {
        name: "Hooli Haulage",
        status: "not_interested",
        reason: Some("Declined at director level"),
    },
    SeedCompany { name: "Vandelay Imports", status: "none", reason: None },
];

const SEED_CALLS: &[SeedCall] = &[
    SeedCall {
        external_id: "seed-001",
        contact: Some("Ana Ruiz"),
        company: "Acme Rail",
        outcome: "Interested",
        called_at: "2026-02-02T15:10:00Z",
    },
    SeedCall {
        external_id: "seed-002",
        contact: Some("Ben Ode"),
        company: "Acme Rail",
        outcome: "Left Voicemail",
        called_at: "2026-02-09T14:00:00Z",
    },
    SeedCall {
        external_id: "seed-003",
        contact: Some("Cara Lim"),
        company: "Acme Rail",
        outcome: "No Answer",
        called_at: "2026-01-20T16:00:00Z",
    },
    SeedCall {
        external_id: "seed-004",
        contact: Some("Cara Lim"),
        company: "Acme Rail",
        outcome: "No Answer",
        called_at: "2026-01-27T16:00:00Z",
    },
    SeedCall {
        external_id: "seed-005",
        contact: Some("Cara Lim"),
        company: "Acme Rail",
        outcome: "No Answer",
        called_at: "2026-02-03T16:00:00Z",
    },
    SeedCall {
        external_id: "seed-006",
        contact: Some("Dev Shah"),
        company: "Globex Freight",
        outcome: "Not Interested",
        called_at: "2026-01-21T15:30:00Z",
    },
    SeedCall {
        external_id: "seed-007",
        contact: Some("Eli Park"),
        company: "Globex Freight",
        outcome: "Left Voicemail",
        called_at: "2026-01-22T15:00:00Z",
    },
    SeedCall {
        external_id: "seed-008",
        contact: Some("Eli Park"),
        company: "Globex Freight",
        outcome: "Left Voicemail",
        called_at: "2026-01-29T15:00:00Z",
    },
    SeedCall {
        external_id: "seed-009",
        contact: Some("Eli Park"),
        company: "Globex Freight",
        outcome: "Left Voicemail",
        called_at: "2026-02-05T15:00:00Z",
    },
    SeedCall {
        external_id: "seed-010",
        contact: Some("Fay Moss"),
        company: "Initech Logistics",
        outcome: "Meeting Booked",
        called_at: "2026-02-04T17:45:00Z",
    },
    SeedCall {
        external_id: "seed-011",
        contact: Some("Gus Hale"),
        company: "Initech Logistics",
        outcome: "Referral Given",
        called_at: "2026-02-05T18:20:00Z",
    },
    SeedCall {
        external_id: "seed-012",
        contact: Some("Hal Ito"),
        company: "Umbrella Transit",
        outcome: "Gatekeeper",
        called_at: "2026-01-28T14:05:00Z",
    },
    SeedCall {
        external_id: "seed-013",
        contact: Some("Ivy Chen"),
        company: "Vandelay Imports",
        outcome: "Wrong Number",
        called_at: "2026-01-23T19:00:00Z",
    },
    SeedCall {
        external_id: "seed-014",
        contact: None,
        company: "Vandelay Imports",
        outcome: "No Answer",
        called_at: "2026-02-06T19:00:00Z",
    },
    SeedCall {
        external_id: "seed-015",
        contact: Some("Jon Ray"),
        company: "Vandelay Imports",
        outcome: "Gatekeeper",
        called_at: "2026-01-20T17:00:00Z",
    },
    SeedCall {
        external_id: "seed-016",
        contact: Some("Jon Ray"),
        company: "Vandelay Imports",
        outcome: "Gatekeeper",
        called_at: "2026-01-27T17:00:00Z",
    },
    SeedCall {
        external_id: "seed-017",
        contact: Some("Jon Ray"),
        company: "Vandelay Imports",
        outcome: "Gatekeeper",
        called_at: "2026-02-03T17:00:00Z",
    },
    SeedCall {
        external_id: "seed-018",
        contact: Some("Jon Ray"),
        company: "Vandelay Imports",
        outcome: "Gatekeeper",
        called_at: "2026-02-10T17:00:00Z",
    },
];

const SEED_PROSPECTS: &[(&str, &str)] = &[
    ("Kim Lowe", "Acme Rail"),
    ("Lia Ford", "Globex Freight"),
    ("Max Bell", "Initech Logistics"),
    ("Noa Dunn", "Hooli Haulage"),
    ("Ana Ruiz", "Acme Rail"),
];

/// Small campaign used for smoke testing: a mix of warm, cooling, retired,
/// blocked and never-called contacts plus one call row with no contact name.
pub struct DemoDataset;

impl DemoDataset {
    /// A Wednesday on which every lifecycle state is represented.
    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 11).unwrap_or_default()
    }

    pub fn calls() -> Result<Vec<LoggedCall>, RepositoryError> {
        SEED_CALLS
            .iter()
            .map(|seed| {
                let outcome = seed
                    .outcome
                    .parse::<OutcomeCategory>()
                    .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                let called_at = DateTime::parse_from_rfc3339(seed.called_at)
                    .map(|timestamp| timestamp.with_timezone(&Utc))
                    .map_err(|error| RepositoryError::Decode(error.to_string()))?;
                Ok(LoggedCall {
                    external_id: Some(seed.external_id.to_string()),
                    call: CallEvent {
                        contact_name: seed.contact.map(str::to_string),
                        company_name: Some(seed.company.to_string()),
                        outcome_category: outcome,
                        called_at,
                    },
                })
            })
            .collect()
    }

    pub fn companies() -> Result<Vec<Company>, RepositoryError> {
        SEED_COMPANIES
            .iter()
            .map(|seed| {
                Ok(Company {
                    name: seed.name.to_string(),
                    blocklist_status: seed
                        .status
                        .parse::<BlocklistStatus>()
                        .map_err(|error| RepositoryError::Decode(error.to_string()))?,
                    status_reason: seed.reason.map(str::to_string),
                })
            })
            .collect()
    }

    pub fn prospects() -> Vec<Prospect> {
        SEED_PROSPECTS
            .iter()
            .map(|(contact, company)| Prospect {
                contact_name: contact.to_string(),
                company_name: company.to_string(),
            })
            .collect()
    }

    /// Safe to run repeatedly: companies and prospects upsert, calls are keyed
    /// by external id.
    pub async fn load(repos: &CadenceRepositories) -> Result<SeedResult, RepositoryError> {
        let companies = Self::companies()?;
        for company in &companies {
            repos.companies.upsert_company(company.clone()).await?;
        }

        let calls_inserted = repos.calls.append_call_events(&Self::calls()?).await?;

        let prospects = Self::prospects();
        for prospect in &prospects {
            repos.prospects.save_prospect(prospect.clone()).await?;
        }

        Ok(SeedResult {
            companies: companies.len(),
            calls_inserted,
            calls_total: SEED_CALLS.len(),
            prospects: prospects.len(),
        })
    }

    pub async fn verify(
        repos: &CadenceRepositories,
    ) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let companies = repos.companies.list_companies().await?;
        let companies_present = SEED_COMPANIES
            .iter()
            .all(|seed| companies.iter().any(|company| company.name == seed.name));
        checks.push(("companies", companies_present));

        let blocked = repos.companies.list_blocked_companies().await?;
        let expected_blocked = SEED_COMPANIES.iter().filter(|seed| seed.status != "none").count();
        checks.push(("blocked-companies", blocked.len() >= expected_blocked));

        let calls = repos.calls.list_call_events().await?;
        checks.push(("call-log", calls.len() >= SEED_CALLS.len()));

        let prospects = repos.prospects.list_prospects().await?;
        let prospects_present = Self::prospects().iter().all(|seed| prospects.contains(seed));
        checks.push(("prospects", prospects_present));

        let all_present = checks.iter().all(|(_, passed)| *passed);
        Ok(VerificationResult { all_present, checks })
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub companies: usize,
    pub calls_inserted: usize,
    pub calls_total: usize,
    pub prospects: usize,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
