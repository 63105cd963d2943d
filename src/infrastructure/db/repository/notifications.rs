use super::entities::NotificationEntity;
use super::CrmRepository;
use crate::domain::crm::Notification;
use crate::domain::error::{AppError, Result};

/// Rows kept per recipient; older entries are pruned on insert.
const NOTIFICATION_CAP: i64 = 100;

impl CrmRepository {
    pub async fn push_notification(&self, notification: &Notification) -> Result<()> {
        sqlx::query(
            "INSERT INTO notifications (id, agency_id, user_id, title, message, read, timestamp)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.agency_id)
        .bind(&notification.user_id)
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.read as i64)
        .bind(notification.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to push notification: {}", e)))?;

        sqlx::query(
            "DELETE FROM notifications WHERE agency_id = ? AND user_id = ? AND id NOT IN (
               SELECT id FROM notifications WHERE agency_id = ? AND user_id = ?
               ORDER BY timestamp DESC LIMIT ?
             )",
        )
        .bind(&notification.agency_id)
        .bind(&notification.user_id)
        .bind(&notification.agency_id)
        .bind(&notification.user_id)
        .bind(NOTIFICATION_CAP)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to prune notifications: {}", e)))?;

        Ok(())
    }

    pub async fn list_notifications(
        &self,
        agency_id: &str,
        user_id: &str,
    ) -> Result<Vec<Notification>> {
        let entries = sqlx::query_as::<_, NotificationEntity>(
            "SELECT * FROM notifications WHERE agency_id = ? AND user_id = ?
             ORDER BY timestamp DESC",
        )
        .bind(agency_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list notifications: {}", e)))?;

        Ok(entries.into_iter().map(Into::into).collect())
    }

    pub async fn clear_notifications(&self, agency_id: &str, user_id: &str) -> Result<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE agency_id = ? AND user_id = ?")
                .bind(agency_id)
                .bind(user_id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to clear notifications: {}", e))
                })?;

        Ok(result.rows_affected())
    }
}
