use sqlx::Row;

use callsheet_core::domain::company::{BlocklistStatus, Company};

use super::{decode_error, CompanyRepository, RepositoryError};
use crate::DbPool;

pub struct SqlCompanyRepository {
    pool: DbPool,
}

impl SqlCompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_company(row: &sqlx::sqlite::SqliteRow) -> Result<Company, RepositoryError> {
    let name: String = row.try_get("name").map_err(decode_error)?;
    let status_str: String = row.try_get("blocklist_status").map_err(decode_error)?;
    let status_reason: Option<String> = row.try_get("status_reason").map_err(decode_error)?;

    Ok(Company {
        name,
        blocklist_status: status_str.parse::<BlocklistStatus>().map_err(decode_error)?,
        status_reason,
    })
}

#[async_trait::async_trait]
impl CompanyRepository for SqlCompanyRepository {
    async fn list_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT name, blocklist_status, status_reason FROM company ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_company).collect()
    }

    async fn list_blocked_companies(&self) -> Result<Vec<Company>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT name, blocklist_status, status_reason
             FROM company
             WHERE blocklist_status <> 'none'
             ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_company).collect()
    }

    async fn upsert_company(&self, company: Company) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO company (name, blocklist_status, status_reason)
             VALUES (?, ?, ?)
             ON CONFLICT(name) DO UPDATE SET
                 blocklist_status = excluded.blocklist_status,
                 status_reason = excluded.status_reason",
        )
        .bind(&company.name)
        .bind(company.blocklist_status.as_str())
        .bind(&company.status_reason)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
