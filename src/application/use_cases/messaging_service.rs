use crate::domain::crm::{Message, Thread, ThreadKind, User};
use crate::domain::error::Result;
use crate::infrastructure::db::repository::CrmRepository;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ThreadInput {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[serde(default = "default_kind")]
    pub kind: ThreadKind,
    pub related_id: Option<String>,
}

fn default_kind() -> ThreadKind {
    ThreadKind::General
}

#[derive(Debug, Deserialize, Validate)]
pub struct MessageInput {
    #[validate(length(min = 1, message = "text is required"))]
    pub text: String,
}

pub struct MessagingService {
    repository: Arc<CrmRepository>,
}

impl MessagingService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    /// Threads are agency-wide; there is no per-agent scoping here.
    pub async fn list(&self, actor: &User) -> Result<Vec<Thread>> {
        self.repository.list_threads(&actor.agency_id).await
    }

    pub async fn create_thread(&self, actor: &User, input: ThreadInput) -> Result<Thread> {
        let thread = Thread {
            id: Uuid::new_v4().to_string(),
            agency_id: actor.agency_id.clone(),
            title: input.title,
            kind: input.kind,
            related_id: input.related_id,
            messages: Vec::new(),
        };

        self.repository.create_thread(&thread).await?;
        Ok(thread)
    }

    pub async fn post_message(
        &self,
        actor: &User,
        thread_id: &str,
        input: MessageInput,
    ) -> Result<Message> {
        // Also enforces agency scoping on the thread.
        self.repository
            .get_thread(&actor.agency_id, thread_id)
            .await?;

        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender_id: actor.id.clone(),
            text: input.text,
            timestamp: chrono::Utc::now(),
        };
        self.repository.append_message(thread_id, &message).await?;

        Ok(message)
    }
}
