use crate::domain::crm::{User, UserRole, UserStatus};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::db::repository::CrmRepository;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Trivial login: look the user up by email, auto-provision an agent in
/// the given agency when absent. Deliberately not an auth system.
pub struct AuthService {
    repository: Arc<CrmRepository>,
}

impl AuthService {
    pub fn new(repository: Arc<CrmRepository>) -> Self {
        Self { repository }
    }

    pub async fn login_or_provision(
        &self,
        agency_id: &str,
        email: &str,
        name: Option<String>,
    ) -> Result<User> {
        if let Some(user) = self.repository.find_user_by_email(email).await? {
            if user.agency_id != agency_id {
                return Err(AppError::Forbidden(
                    "User belongs to a different agency".to_string(),
                ));
            }
            return Ok(user);
        }

        // The agency must exist before we provision into it.
        self.repository.get_agency(agency_id).await?;

        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.split('@').next().unwrap_or("Agent").to_string());

        let user = User {
            id: Uuid::new_v4().to_string(),
            agency_id: agency_id.to_string(),
            name,
            email: email.to_string(),
            role: UserRole::Agent,
            avatar: None,
            status: UserStatus::Active,
            ai_usage: 0,
        };
        self.repository.create_user(&user).await?;

        info!(email = %user.email, agency = %user.agency_id, "Provisioned new agent on login");
        Ok(user)
    }

    /// Resolve the acting user for a request.
    pub async fn require_actor(&self, user_id: &str) -> Result<User> {
        self.repository.get_user(user_id).await
    }
}
