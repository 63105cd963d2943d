use crate::domain::crm::{Contact, Metadata, User};
use crate::domain::error::Result;
use crate::infrastructure::db::repository::CrmRepository;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactInput {
    /// Present on edits; a fresh id is generated otherwise.
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub notes: String,
    /// Admins may assign to someone else; defaults to the actor.
    pub assigned_to: Option<String>,
}

pub struct ContactService {
    repository: Arc<CrmRepository>,
}

impl ContactService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self, actor: &User) -> Result<Vec<Contact>> {
        let assignee = visibility_filter(actor);
        self.repository
            .list_contacts(&actor.agency_id, assignee)
            .await
    }

    pub async fn save(&self, actor: &User, input: ContactInput) -> Result<Contact> {
        let contact = Contact {
            id: input.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            agency_id: actor.agency_id.clone(),
            name: input.name,
            phone: input.phone,
            email: input.email,
            tags: input.tags,
            notes: input.notes,
            assigned_to: input.assigned_to.unwrap_or_else(|| actor.id.clone()),
            created_at: chrono::Utc::now(),
            metadata: Metadata::new(),
        };

        self.repository.save_contact(&contact).await?;
        Ok(contact)
    }

    pub async fn delete(&self, actor: &User, ids: &[String]) -> Result<u64> {
        self.repository.delete_contacts(&actor.agency_id, ids).await
    }

    /// CSV export in the same dialect the import parser reads back
    /// (quoted fields, `""` escaping).
    pub async fn export_csv(&self, actor: &User) -> Result<String> {
        let contacts = self.list(actor).await?;

        let mut out = String::from("Name,Email,Phone,Tags,Notes,Created At\n");
        for contact in contacts {
            let row = [
                contact.name.as_str(),
                contact.email.as_str(),
                contact.phone.as_str(),
                &contact.tags.join("; "),
                contact.notes.as_str(),
                &contact.created_at.format("%Y-%m-%d").to_string(),
            ]
            .iter()
            .map(|cell| quote_csv_cell(cell))
            .collect::<Vec<_>>()
            .join(",");
            out.push_str(&row);
            out.push('\n');
        }

        Ok(out)
    }
}

/// Admins see every agency record; everyone else only their own.
pub(crate) fn visibility_filter(actor: &User) -> Option<&str> {
    if actor.role.sees_all_records() {
        None
    } else {
        Some(actor.id.as_str())
    }
}

fn quote_csv_cell(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crm::{UserRole, UserStatus};

    fn actor(role: UserRole) -> User {
        User {
            id: "u1".to_string(),
            agency_id: "a1".to_string(),
            name: "Test".to_string(),
            email: "t@x.com".to_string(),
            role,
            avatar: None,
            status: UserStatus::Active,
            ai_usage: 0,
        }
    }

    #[test]
    fn admins_are_unfiltered_agents_are_scoped() {
        assert_eq!(visibility_filter(&actor(UserRole::Admin)), None);
        assert_eq!(visibility_filter(&actor(UserRole::Agent)), Some("u1"));
    }

    #[test]
    fn export_quotes_embedded_quotes() {
        assert_eq!(quote_csv_cell("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn contact_input_validation() {
        let input = ContactInput {
            id: None,
            name: String::new(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            tags: Vec::new(),
            notes: String::new(),
            assigned_to: None,
        };
        assert!(input.validate().is_err());
    }
}
