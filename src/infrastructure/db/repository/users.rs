use super::entities::{to_db_enum, UserEntity};
use super::CrmRepository;
use crate::domain::crm::User;
use crate::domain::error::{AppError, Result};

impl CrmRepository {
    pub async fn get_user(&self, id: &str) -> Result<User> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to fetch user: {}", e)))?;

        match user {
            Some(user) => Ok(user.into()),
            None => Err(AppError::NotFound(format!("User not found: {}", id))),
        }
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE LOWER(email) = LOWER(?)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(format!("Failed to look up user by email: {}", e))
                })?;

        Ok(user.map(Into::into))
    }

    pub async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, agency_id, name, email, role, avatar, status, ai_usage)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.id)
        .bind(&user.agency_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(to_db_enum(&user.role))
        .bind(&user.avatar)
        .bind(to_db_enum(&user.status))
        .bind(user.ai_usage)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create user: {}", e)))?;

        Ok(())
    }

    pub async fn list_users(&self, agency_id: &str) -> Result<Vec<User>> {
        let users =
            sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE agency_id = ? ORDER BY name")
                .bind(agency_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| AppError::DatabaseError(format!("Failed to list users: {}", e)))?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    pub async fn bump_ai_usage(&self, user_id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET ai_usage = ai_usage + 1 WHERE id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to bump AI usage: {}", e)))?;
        Ok(())
    }
}
