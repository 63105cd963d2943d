use super::entities::{to_db_enum, AgencyEntity};
use super::CrmRepository;
use crate::domain::crm::Agency;
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn get_agency(&self, id: &str) -> Result<Agency> {
        let agency = sqlx::query_as::<_, AgencyEntity>("SELECT * FROM agencies WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch agency: {}", e)))?;

        match agency {
            Some(agency) => Ok(agency.into()),
            None => Err(AppError::NotFound(format!("Agency not found: {}", id))),
        }
    }

    pub async fn list_agencies(&self) -> Result<Vec<Agency>> {
        let agencies = sqlx::query_as::<_, AgencyEntity>("SELECT * FROM agencies ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to list agencies: {}", e)))?;

        Ok(agencies.into_iter().map(Into::into).collect())
    }

    pub async fn upsert_agency(&self, agency: &Agency) -> Result<()> {
        sqlx::query(
            "INSERT INTO agencies (id, name, plan, logo, ai_credits, ai_limits)
             VALUES (?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               plan = excluded.plan,
               logo = excluded.logo,
               ai_credits = excluded.ai_credits,
               ai_limits = excluded.ai_limits",
        )
        .bind(&agency.id)
        .bind(&agency.name)
        .bind(to_db_enum(&agency.plan))
        .bind(&agency.logo)
        .bind(agency.ai_credits)
        .bind(agency.ai_limits)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to upsert agency: {}", e)))?;

        Ok(())
    }
}
