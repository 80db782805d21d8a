use std::collections::{BTreeMap, HashMap, HashSet};

use tokio::sync::RwLock;

use callsheet_core::cadence::allocate::count_workable_by_company;
use callsheet_core::domain::call::CallEvent;
use callsheet_core::domain::company::Company;
use callsheet_core::domain::contact::{ContactRecord, Prospect};

use super::{
    CallLogRepository, CompanyRepository, LoggedCall, ProspectRepository, RepositoryError,
    RosterFilter, RosterRepository, SyncRun, SyncRunRepository,
};

#[derive(Default)]
struct CallLog {
    calls: Vec<CallEvent>,
    external_ids: HashSet<String>,
}

#[derive(Default)]
pub struct InMemoryCallLogRepository {
    log: RwLock<CallLog>,
}

#[async_trait::async_trait]
impl CallLogRepository for InMemoryCallLogRepository {
    async fn list_call_events(&self) -> Result<Vec<CallEvent>, RepositoryError> {
        let log = self.log.read().await;
        let mut calls = log.calls.clone();
        calls.sort_by_key(|call| call.called_at);
        Ok(calls)
    }

    async fn append_call_events(&self, calls: &[LoggedCall]) -> Result<usize, RepositoryError> {
        let mut log = self.log.write().await;
        let mut inserted = 0;
        for logged in calls {
            if let Some(external_id) = &logged.external_id {
                if !log.external_ids.insert(external_id.clone()) {
                    continue;
                }
            }
            log.calls.push(logged.call.clone());
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[derive(Default)]
pub struct InMemoryCompanyRepository {
    companies: RwLock<BTreeMap<String, Company>>,
}

#[async_trait::async_trait]
impl CompanyRepository for InMemoryCompanyRepository {
    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let companies = self.companies.read().await;
        Ok(companies.values().cloned().collect())
    }

    async fn list_blocked_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let companies = self.companies.read().await;
        Ok(companies
            .values()
            .filter(|company| company.blocklist_status.is_blocked())
            .cloned()
            .collect())
    }

    async fn upsert_company(&self, company: Company) -> Result<(), RepositoryError> {
        let mut companies = self.companies.write().await;
        companies.insert(company.name.clone(), company);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryProspectRepository {
    prospects: RwLock<Vec<Prospect>>,
}

#[async_trait::async_trait]
impl ProspectRepository for InMemoryProspectRepository {
    async fn list_prospects(&self) -> Result<Vec<Prospect>, RepositoryError> {
        Ok(self.prospects.read().await.clone())
    }

    async fn save_prospect(&self, prospect: Prospect) -> Result<(), RepositoryError> {
        let mut prospects = self.prospects.write().await;
        if !prospects.contains(&prospect) {
            prospects.push(prospect);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryRosterRepository {
    records: RwLock<Vec<ContactRecord>>,
}

#[async_trait::async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn replace_contact_roster(
        &self,
        records: &[ContactRecord],
    ) -> Result<(), RepositoryError> {
        let mut stored = self.records.write().await;
        *stored = records.to_vec();
        Ok(())
    }

    async fn list_roster(
        &self,
        filter: &RosterFilter,
    ) -> Result<Vec<ContactRecord>, RepositoryError> {
        let stored = self.records.read().await;
        Ok(stored.iter().filter(|record| filter.matches(record)).cloned().collect())
    }

    async fn count_active_or_cooling_by_company(
        &self,
    ) -> Result<HashMap<String, usize>, RepositoryError> {
        let stored = self.records.read().await;
        Ok(count_workable_by_company(stored.iter()))
    }
}

#[derive(Default)]
pub struct InMemorySyncRunRepository {
    runs: RwLock<Vec<SyncRun>>,
}

#[async_trait::async_trait]
impl SyncRunRepository for InMemorySyncRunRepository {
    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), RepositoryError> {
        self.runs.write().await.push(run.clone());
        Ok(())
    }

    async fn latest_sync_run(&self) -> Result<Option<SyncRun>, RepositoryError> {
        Ok(self.runs.read().await.last().cloned())
    }
}
