use std::collections::HashMap;

use sqlx::{QueryBuilder, Row, Sqlite};

use callsheet_core::domain::call::OutcomeCategory;
use callsheet_core::domain::contact::{ContactRecord, ContactStatus};

use super::{
    decode_date, decode_error, encode_date, RepositoryError, RosterFilter, RosterRepository,
};
use crate::DbPool;

pub struct SqlRosterRepository {
    pool: DbPool,
}

impl SqlRosterRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<ContactRecord, RepositoryError> {
    let contact_name: String = row.try_get("contact_name").map_err(decode_error)?;
    let company_name: String = row.try_get("company_name").map_err(decode_error)?;
    let attempt_count: i64 = row.try_get("attempt_count").map_err(decode_error)?;
    let last_called_str: Option<String> = row.try_get("last_called_at").map_err(decode_error)?;
    let best_outcome_str: Option<String> = row.try_get("best_outcome").map_err(decode_error)?;
    let status_str: String = row.try_get("status").map_err(decode_error)?;
    let retired_reason: Option<String> = row.try_get("retired_reason").map_err(decode_error)?;
    let next_callable_str: Option<String> =
        row.try_get("next_callable_at").map_err(decode_error)?;

    Ok(ContactRecord {
        contact_name,
        company_name,
        attempt_count: u32::try_from(attempt_count).map_err(decode_error)?,
        last_called_at: last_called_str
            .as_deref()
            .map(|raw| decode_date("last_called_at", raw))
            .transpose()?,
        best_outcome: best_outcome_str
            .as_deref()
            .map(|raw| raw.parse::<OutcomeCategory>().map_err(decode_error))
            .transpose()?,
        status: status_str.parse::<ContactStatus>().map_err(decode_error)?,
        retired_reason,
        next_callable_at: next_callable_str
            .as_deref()
            .map(|raw| decode_date("next_callable_at", raw))
            .transpose()?,
    })
}

#[async_trait::async_trait]
impl RosterRepository for SqlRosterRepository {
    async fn replace_contact_roster(
        &self,
        records: &[ContactRecord],
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM contact_roster").execute(&mut *tx).await?;

        for (position, record) in records.iter().enumerate() {
            sqlx::query(
                "INSERT INTO contact_roster (position, contact_name, company_name, attempt_count,
                                             last_called_at, best_outcome, status,
                                             retired_reason, next_callable_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(position as i64)
            .bind(&record.contact_name)
            .bind(&record.company_name)
            .bind(i64::from(record.attempt_count))
            .bind(record.last_called_at.map(encode_date))
            .bind(record.best_outcome.map(|outcome| outcome.as_str()))
            .bind(record.status.as_str())
            .bind(&record.retired_reason)
            .bind(record.next_callable_at.map(encode_date))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_roster(
        &self,
        filter: &RosterFilter,
    ) -> Result<Vec<ContactRecord>, RepositoryError> {
        let mut query_builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT contact_name, company_name, attempt_count, last_called_at, best_outcome,
                    status, retired_reason, next_callable_at
             FROM contact_roster
             WHERE 1=1",
        );

        if !filter.statuses.is_empty() {
            query_builder.push(" AND status IN (");
            let mut separated = query_builder.separated(", ");
            for status in &filter.statuses {
                separated.push_bind(status.as_str());
            }
            query_builder.push(")");
        }

        if let Some(on) = filter.callable_on {
            query_builder.push(" AND (next_callable_at IS NULL OR next_callable_at <= ");
            query_builder.push_bind(encode_date(on));
            query_builder.push(")");
        }

        query_builder.push(" ORDER BY position ASC");

        let rows = query_builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn count_active_or_cooling_by_company(
        &self,
    ) -> Result<HashMap<String, usize>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT company_name, COUNT(*) AS contacts
             FROM contact_roster
             WHERE status IN ('active', 'cooling')
             GROUP BY company_name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let company: String = row.try_get("company_name").map_err(decode_error)?;
                let contacts: i64 = row.try_get("contacts").map_err(decode_error)?;
                Ok((company, usize::try_from(contacts).map_err(decode_error)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use callsheet_core::domain::call::OutcomeCategory;
    use callsheet_core::domain::contact::{ContactRecord, ContactStatus};

    use super::SqlRosterRepository;
    use crate::repositories::{RosterFilter, RosterRepository};
    use crate::{connect_with_settings, migrations};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, day).expect("valid date")
    }

    fn record(name: &str, status: ContactStatus, next: Option<NaiveDate>) -> ContactRecord {
        ContactRecord {
            contact_name: name.to_string(),
            company_name: "Acme Rail".to_string(),
            attempt_count: 1,
            last_called_at: Some(date(2)),
            best_outcome: Some(OutcomeCategory::Interested),
            status,
            retired_reason: None,
            next_callable_at: next,
        }
    }

    #[tokio::test]
    async fn replace_is_wholesale_and_keeps_order() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        let repo = SqlRosterRepository::new(pool);

        repo.replace_contact_roster(&[record("Old", ContactStatus::Active, None)])
            .await
            .expect("first write");
        let roster = vec![
            record("Zed", ContactStatus::Active, Some(date(5))),
            record("Amy", ContactStatus::Cooling, Some(date(12))),
            record("Bo", ContactStatus::Retired, None),
        ];
        repo.replace_contact_roster(&roster).await.expect("second write");

        let stored = repo.list_roster(&RosterFilter::all()).await.expect("list");
        assert_eq!(stored, roster);
    }

    #[tokio::test]
    async fn filter_applies_status_and_callable_date() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrate");
        let repo = SqlRosterRepository::new(pool);
        repo.replace_contact_roster(&[
            record("Due", ContactStatus::Active, Some(date(5))),
            record("Never", ContactStatus::Active, None),
            record("Later", ContactStatus::Cooling, Some(date(12))),
            record("Gone", ContactStatus::Retired, None),
        ])
        .await
        .expect("write");

        let filter =
            RosterFilter::callable(&[ContactStatus::Active, ContactStatus::Cooling], date(10));
        let names: Vec<_> = repo
            .list_roster(&filter)
            .await
            .expect("list")
            .into_iter()
            .map(|record| record.contact_name)
            .collect();

        assert_eq!(names, vec!["Due".to_string(), "Never".to_string()]);

        let counts = repo.count_active_or_cooling_by_company().await.expect("count");
        assert_eq!(counts.get("Acme Rail"), Some(&3));
    }
}
