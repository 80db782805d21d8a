use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

use super::{
    decode_date, decode_error, decode_timestamp, encode_date, RepositoryError, SyncRunRepository,
};
use crate::DbPool;

/// Record of one roster rebuild.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRun {
    pub run_id: String,
    pub synced_at: DateTime<Utc>,
    pub as_of: NaiveDate,
    pub event_count: usize,
    pub skipped_rows: usize,
    pub contact_count: usize,
    pub roster_digest: String,
}

pub struct SqlSyncRunRepository {
    pool: DbPool,
}

impl SqlSyncRunRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_sync_run(row: &sqlx::sqlite::SqliteRow) -> Result<SyncRun, RepositoryError> {
    let count = |column: &str| -> Result<usize, RepositoryError> {
        let raw: i64 = row.try_get(column).map_err(decode_error)?;
        usize::try_from(raw).map_err(decode_error)
    };
    let synced_at_str: String = row.try_get("synced_at").map_err(decode_error)?;
    let as_of_str: String = row.try_get("as_of").map_err(decode_error)?;

    Ok(SyncRun {
        run_id: row.try_get("run_id").map_err(decode_error)?,
        synced_at: decode_timestamp("synced_at", &synced_at_str)?,
        as_of: decode_date("as_of", &as_of_str)?,
        event_count: count("event_count")?,
        skipped_rows: count("skipped_rows")?,
        contact_count: count("contact_count")?,
        roster_digest: row.try_get("roster_digest").map_err(decode_error)?,
    })
}

#[async_trait::async_trait]
impl SyncRunRepository for SqlSyncRunRepository {
    async fn record_sync_run(&self, run: &SyncRun) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO sync_run (run_id, synced_at, as_of, event_count, skipped_rows,
                                   contact_count, roster_digest)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&run.run_id)
        .bind(run.synced_at.to_rfc3339_opts(SecondsFormat::Millis, true))
        .bind(encode_date(run.as_of))
        .bind(run.event_count as i64)
        .bind(run.skipped_rows as i64)
        .bind(run.contact_count as i64)
        .bind(&run.roster_digest)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn latest_sync_run(&self) -> Result<Option<SyncRun>, RepositoryError> {
        let row = sqlx::query(
            "SELECT run_id, synced_at, as_of, event_count, skipped_rows, contact_count,
                    roster_digest
             FROM sync_run
             ORDER BY synced_at DESC, rowid DESC
             LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref row) => Ok(Some(row_to_sync_run(row)?)),
            None => Ok(None),
        }
    }
}
