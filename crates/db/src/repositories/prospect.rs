use sqlx::Row;

use callsheet_core::domain::contact::Prospect;

use super::{decode_error, ProspectRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProspectRepository {
    pool: DbPool,
}

impl SqlProspectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProspectRepository for SqlProspectRepository {
    async fn list_prospects(&self) -> Result<Vec<Prospect>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT contact_name, company_name FROM prospect ORDER BY rowid ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                Ok(Prospect {
                    contact_name: row.try_get("contact_name").map_err(decode_error)?,
                    company_name: row.try_get("company_name").map_err(decode_error)?,
                })
            })
            .collect()
    }

    async fn save_prospect(&self, prospect: Prospect) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO prospect (contact_name, company_name) VALUES (?, ?)
             ON CONFLICT(contact_name, company_name) DO NOTHING",
        )
        .bind(&prospect.contact_name)
        .bind(&prospect.company_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
