use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use sqlx::Row;

use callsheet_core::domain::call::{CallEvent, OutcomeCategory};

use super::{decode_error, decode_timestamp, CallLogRepository, RepositoryError};
use crate::DbPool;

/// A call as it arrives from an import or the seed data. `external_id` is the
/// upstream identifier used to drop re-imported rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedCall {
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(flatten)]
    pub call: CallEvent,
}

impl LoggedCall {
    pub fn new(external_id: impl Into<String>, call: CallEvent) -> Self {
        Self { external_id: Some(external_id.into()), call }
    }
}

pub struct SqlCallLogRepository {
    pool: DbPool,
}

impl SqlCallLogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_call_event(row: &sqlx::sqlite::SqliteRow) -> Result<CallEvent, RepositoryError> {
    let contact_name: Option<String> = row.try_get("contact_name").map_err(decode_error)?;
    let company_name: Option<String> = row.try_get("company_name").map_err(decode_error)?;
    let outcome_str: String = row.try_get("outcome_category").map_err(decode_error)?;
    let called_at_str: String = row.try_get("called_at").map_err(decode_error)?;

    Ok(CallEvent {
        contact_name,
        company_name,
        outcome_category: outcome_str.parse::<OutcomeCategory>().map_err(decode_error)?,
        called_at: decode_timestamp("called_at", &called_at_str)?,
    })
}

#[async_trait::async_trait]
impl CallLogRepository for SqlCallLogRepository {
    async fn list_call_events(&self) -> Result<Vec<CallEvent>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT contact_name, company_name, outcome_category, called_at
             FROM call_event
             ORDER BY called_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_call_event).collect()
    }

    async fn append_call_events(&self, calls: &[LoggedCall]) -> Result<usize, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        let mut inserted = 0;

        for logged in calls {
            let result = sqlx::query(
                "INSERT INTO call_event (external_id, contact_name, company_name,
                                         outcome_category, called_at)
                 VALUES (?, ?, ?, ?, ?)
                 ON CONFLICT(external_id) DO NOTHING",
            )
            .bind(&logged.external_id)
            .bind(&logged.call.contact_name)
            .bind(&logged.call.company_name)
            .bind(logged.call.outcome_category.as_str())
            .bind(logged.call.called_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .execute(&mut *tx)
            .await?;
            inserted += result.rows_affected() as usize;
        }

        tx.commit().await?;
        Ok(inserted)
    }
}
