use super::entities::{to_db_enum, MessageEntity, ThreadEntity};
use super::CrmRepository;
use crate::domain::crm::{Message, Thread};
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn list_threads(&self, agency_id: &str) -> Result<Vec<Thread>> {
        let entities =
            sqlx::query_as::<_, ThreadEntity>("SELECT * FROM threads WHERE agency_id = ?")
                .bind(agency_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to list threads: {}", e)))?;

        let mut threads = Vec::with_capacity(entities.len());
        for entity in entities {
            let messages = self.thread_messages(&entity.id).await?;
            threads.push(Thread {
                kind: entity.kind(),
                id: entity.id,
                agency_id: entity.agency_id,
                title: entity.title,
                related_id: entity.related_id,
                messages,
            });
        }

        Ok(threads)
    }

    pub async fn get_thread(&self, agency_id: &str, id: &str) -> Result<Thread> {
        let entity = sqlx::query_as::<_, ThreadEntity>(
            "SELECT * FROM threads WHERE agency_id = ? AND id = ?",
        )
        .bind(agency_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to fetch thread: {}", e)))?;

        let Some(entity) = entity else {
            return Err(AppError::NotFound(format!("Thread not found: {}", id)));
        };

        let messages = self.thread_messages(&entity.id).await?;
        Ok(Thread {
            kind: entity.kind(),
            id: entity.id,
            agency_id: entity.agency_id,
            title: entity.title,
            related_id: entity.related_id,
            messages,
        })
    }

    pub async fn create_thread(&self, thread: &Thread) -> Result<()> {
        sqlx::query(
            "INSERT INTO threads (id, agency_id, title, kind, related_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&thread.id)
        .bind(&thread.agency_id)
        .bind(&thread.title)
        .bind(to_db_enum(&thread.kind))
        .bind(&thread.related_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create thread: {}", e)))?;

        for message in &thread.messages {
            self.append_message(&thread.id, message).await?;
        }

        Ok(())
    }

    pub async fn append_message(&self, thread_id: &str, message: &Message) -> Result<()> {
        sqlx::query(
            "INSERT INTO messages (id, thread_id, sender_id, text, timestamp)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(thread_id)
        .bind(&message.sender_id)
        .bind(&message.text)
        .bind(message.timestamp.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to append message: {}", e)))?;

        Ok(())
    }

    async fn thread_messages(&self, thread_id: &str) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, MessageEntity>(
            "SELECT id, sender_id, text, timestamp FROM messages
             WHERE thread_id = ? ORDER BY timestamp",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list messages: {}", e)))?;

        Ok(messages.into_iter().map(Into::into).collect())
    }
}
