use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use callsheet_core::domain::call::CallEvent;
use callsheet_core::domain::company::Company;
use callsheet_core::domain::contact::{ContactRecord, ContactStatus, Prospect};

use crate::DbPool;

pub mod call_log;
pub mod company;
pub mod memory;
pub mod prospect;
pub mod roster;
pub mod sync_run;

pub use call_log::{LoggedCall, SqlCallLogRepository};
pub use company::SqlCompanyRepository;
pub use memory::{
    InMemoryCallLogRepository, InMemoryCompanyRepository, InMemoryProspectRepository,
    InMemoryRosterRepository, InMemorySyncRunRepository,
};
pub use prospect::SqlProspectRepository;
pub use roster::SqlRosterRepository;
pub use sync_run::{SqlSyncRunRepository, SyncRun};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Roster query: any of `statuses`, and when `callable_on` is set only rows
/// with no cooldown or one that has lapsed by that day.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterFilter {
    pub statuses: Vec<ContactStatus>,
    pub callable_on: Option<NaiveDate>,
}

impl RosterFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn callable(statuses: &[ContactStatus], on: NaiveDate) -> Self {
        Self { statuses: statuses.to_vec(), callable_on: Some(on) }
    }

    pub fn matches(&self, record: &ContactRecord) -> bool {
        let status_ok = self.statuses.is_empty() || self.statuses.contains(&record.status);
        let date_ok = match (self.callable_on, record.next_callable_at) {
            (Some(on), Some(next)) => next <= on,
            _ => true,
        };
        status_ok && date_ok
    }
}

#[async_trait]
pub trait CallLogRepository: Send + Sync {
    /// Oldest first.
    async fn list_call_events(&self) -> Result<Vec<CallEvent>, RepositoryError>;

    /// Returns how many calls were new; repeated external ids are ignored.
    async fn append_call_events(&self, calls: &[LoggedCall]) -> Result<usize, RepositoryError>;
}

#[async_trait]
pub trait CompanyRepository: Send + Sync {
    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError>;
    async fn list_blocked_companies(&self) -> Result<Vec<Company>, RepositoryError>;
    async fn upsert_company(&self, company: Company) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait ProspectRepository: Send + Sync {
    async fn list_prospects(&self) -> Result<Vec<Prospect>, RepositoryError>;
    async fn save_prospect(&self, prospect: Prospect) -> Result<(), RepositoryError>;
}

#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Drops every row and writes `records` in order, atomically.
    async fn replace_contact_roster(&self, records: &[ContactRecord])
        -> Result<(), RepositoryError>;

    /// Rows in the order they were written.
    async fn list_roster(&self, filter: &RosterFilter)
        -> Result<Vec<ContactRecord>, RepositoryError>;

    async fn count_active_or_cooling_by_company(
        &self,
    ) -> Result<HashMap<String, usize>, RepositoryError>;
}

#[async_trait]
pub trait SyncRunRepository: Send + Sync {
    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), RepositoryError>;
    async fn latest_sync_run(&self) -> Result<Option<SyncRun>, RepositoryError>;
}

/// Everything the cadence pipeline reads and writes.
pub struct CadenceRepositories {
    pub calls: Box<dyn CallLogRepository>,
    pub companies: Box<dyn CompanyRepository>,
    pub prospects: Box<dyn ProspectRepository>,
    pub roster: Box<dyn RosterRepository>,
    pub sync_runs: Box<dyn SyncRunRepository>,
}

impl CadenceRepositories {
    pub fn sql(pool: DbPool) -> Self {
        Self {
            calls: Box::new(SqlCallLogRepository::new(pool.clone())),
            companies: Box::new(SqlCompanyRepository::new(pool.clone())),
            prospects: Box::new(SqlProspectRepository::new(pool.clone())),
            roster: Box::new(SqlRosterRepository::new(pool.clone())),
            sync_runs: Box::new(SqlSyncRunRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            calls: Box::new(InMemoryCallLogRepository::default()),
            companies: Box::new(InMemoryCompanyRepository::default()),
            prospects: Box::new(InMemoryProspectRepository::default()),
            roster: Box::new(InMemoryRosterRepository::default()),
            sync_runs: Box::new(InMemorySyncRunRepository::default()),
        }
    }
}

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn decode_error(error: impl ToString) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}

pub(crate) fn encode_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn decode_date(column: &str, raw: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|error| RepositoryError::Decode(format!("{column}: {error}")))
}

pub(crate) fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|error| RepositoryError::Decode(format!("{column}: {error}")))
}
