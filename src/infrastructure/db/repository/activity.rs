use super::entities::{to_db_enum, ActivityEntity};
use super::CrmRepository;
use crate::domain::crm::Activity;
use crate::domain::error::{AppError, Result};

/// Rows kept per agency; older entries are pruned on insert.
const ACTIVITY_CAP: i64 = 200;

impl CrmRepository {
    pub async fn log_activity(&self, activity: &Activity) -> Result<()> {
        sqlx::query(
            "INSERT INTO activity (id, agency_id, user_id, action, target, kind, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&activity.id)
        .bind(&activity.agency_id)
        .bind(&activity.user_id)
        .bind(&activity.action)
        .bind(&activity.target)
        .bind(to_db_enum(&activity.kind))
        .bind(activity.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to log activity: {}", e)))?;

        sqlx::query(
            "DELETE FROM activity WHERE agency_id = ? AND id NOT IN (
               SELECT id FROM activity WHERE agency_id = ?
               ORDER BY timestamp DESC LIMIT ?
             )",
        )
        .bind(&activity.agency_id)
        .bind(&activity.agency_id)
        .bind(ACTIVITY_CAP)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to prune activity: {}", e)))?;

        Ok(())
    }

    pub async fn list_activity(&self, agency_id: &str) -> Result<Vec<Activity>> {
        let entries = sqlx::query_as::<_, ActivityEntity>(
            "SELECT * FROM activity WHERE agency_id = ? ORDER BY timestamp DESC",
        )
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list activity: {}", e)))?;

        Ok(entries.into_iter().map(Into::into).collect())
    }
}
