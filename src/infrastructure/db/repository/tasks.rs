use super::entities::{to_db_enum, TaskEntity};
use super::CrmRepository;
use crate::domain::crm::{Task, TaskStatus};
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn list_tasks(
        &self,
        agency_id: &str,
        assigned_to: Option<&str>,
    ) -> Result<Vec<Task>> {
        let tasks = match assigned_to {
            Some(user_id) => sqlx::query_as::<_, TaskEntity>(
                "SELECT * FROM tasks WHERE agency_id = ? AND assigned_to = ?
                 ORDER BY due_date, created_at",
            )
            .bind(agency_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, TaskEntity>(
                "SELECT * FROM tasks WHERE agency_id = ? ORDER BY due_date, created_at",
            )
            .bind(agency_id)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list tasks: {}", e)))?;

        Ok(tasks.into_iter().map(Into::into).collect())
    }

    pub async fn get_task(&self, agency_id: &str, id: &str) -> Result<Task> {
        let task =
            sqlx::query_as::<_, TaskEntity>("SELECT * FROM tasks WHERE agency_id = ? AND id = ?")
                .bind(agency_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to fetch task: {}", e)))?;

        match task {
            Some(task) => Ok(task.into()),
            None => Err(AppError::NotFound(format!("Task not found: {}", id))),
        }
    }

    pub async fn save_task(&self, task: &Task) -> Result<()> {
        sqlx::query(
            "INSERT INTO tasks
               (id, agency_id, title, assigned_to, due_date, status, priority, related_json, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               title = excluded.title,
               assigned_to = excluded.assigned_to,
               due_date = excluded.due_date,
               status = excluded.status,
               priority = excluded.priority,
               related_json = excluded.related_json",
        )
        .bind(&task.id)
        .bind(&task.agency_id)
        .bind(&task.title)
        .bind(&task.assigned_to)
        .bind(&task.due_date)
        .bind(to_db_enum(&task.status))
        .bind(to_db_enum(&task.priority))
        .bind(
            task.related_to
                .as_ref()
                .and_then(|r| serde_json::to_string(r).ok()),
        )
        .bind(task.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save task: {}", e)))?;

        Ok(())
    }

    pub async fn set_task_status(
        &self,
        agency_id: &str,
        id: &str,
        status: TaskStatus,
    ) -> Result<()> {
        let result = sqlx::query("UPDATE tasks SET status = ? WHERE agency_id = ? AND id = ?")
            .bind(to_db_enum(&status))
            .bind(agency_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to update task status: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Task not found: {}", id)));
        }
        Ok(())
    }
}
