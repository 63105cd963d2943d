use super::entities::{to_json_list, to_json_map, ContactEntity};
use super::CrmRepository;
use crate::domain::crm::Contact;
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    /// Agency-scoped listing; pass `assigned_to` to restrict to one
    /// agent's records (non-admin visibility).
    pub async fn list_contacts(
        &self,
        agency_id: &str,
        assigned_to: Option<&str>,
    ) -> Result<Vec<Contact>> {
        let contacts = match assigned_to {
            Some(user_id) => sqlx::query_as::<_, ContactEntity>(
                "SELECT * FROM contacts WHERE agency_id = ? AND assigned_to = ?
                 ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, ContactEntity>(
                "SELECT * FROM contacts WHERE agency_id = ? ORDER BY created_at DESC",
            )
            .bind(agency_id)
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| AppError::DatabaseError(format!("Failed to list contacts: {}", e)))?;

        Ok(contacts.into_iter().map(Into::into).collect())
    }

    pub async fn save_contact(&self, contact: &Contact) -> Result<()> {
        sqlx::query(
            "INSERT INTO contacts
               (id, agency_id, name, phone, email, tags_json, notes, assigned_to, created_at, metadata_json)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
               name = excluded.name,
               phone = excluded.phone,
               email = excluded.email,
               tags_json = excluded.tags_json,
               notes = excluded.notes,
               assigned_to = excluded.assigned_to,
               metadata_json = excluded.metadata_json",
        )
        .bind(&contact.id)
        .bind(&contact.agency_id)
        .bind(&contact.name)
        .bind(&contact.phone)
        .bind(&contact.email)
        .bind(to_json_list(&contact.tags))
        .bind(&contact.notes)
        .bind(&contact.assigned_to)
        .bind(contact.created_at.to_rfc3339())
        .bind(to_json_map(&contact.metadata))
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to save contact: {}", e)))?;

        Ok(())
    }

    /// Batch delete by id, agency-scoped. Returns the number of rows
    /// actually removed.
    pub async fn delete_contacts(&self, agency_id: &str, ids: &[String]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM contacts WHERE agency_id = ? AND id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(agency_id);
        for id in ids {
            query = query.bind(id);
        }

        let result = query
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete contacts: {}", e)))?;

        Ok(result.rows_affected())
    }
}
