use crate::application::use_cases::contact_service::visibility_filter;
use crate::domain::crm::{RelatedRef, Task, TaskPriority, TaskStatus, User};
use crate::domain::error::Result;
use crate::infrastructure::db::repository::CrmRepository;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct TaskInput {
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default = "default_priority")]
    pub priority: TaskPriority,
    pub related_to: Option<RelatedRef>,
    pub assigned_to: Option<String>,
}

fn default_priority() -> TaskPriority {
    TaskPriority::Medium
}

pub struct TaskService {
    repository: Arc<CrmRepository>,
}

impl TaskService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, actor: &User) -> Result<Vec<Task>> {
        let assignee = visibility_filter(actor);
        self.repository.list_tasks(&actor.agency_id, assignee).await
    }

    pub async fn save(&self, actor: &User, input: TaskInput) -> Result<Task> {
        let task = Task {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            agency_id: actor.agency_id.clone(),
            title: input.title,
            assigned_to: input.assigned_to.unwrap_or_else(|| actor.id.clone()),
            due_date: input.due_date,
            status: TaskStatus::Pending,
            priority: input.priority,
            related_to: input.related_to,
            created_at: chrono::Utc::now(),
        };

        self.repository.save_task(&task).await?;
        Ok(task)
    }

    pub async fn toggle(&self, actor: &User, id: &str) -> Result<Task> {
        let task = self.repository.get_task(&actor.agency_id, id).await?;
        let next = match task.status {
            TaskStatus::Pending => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Pending,
        };

        self.repository
            .set_task_status(&actor.agency_id, id, next)
            .await?;

        self.repository.get_task(&actor.agency_id, id).await
    }
}
