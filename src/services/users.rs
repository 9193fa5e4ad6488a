use sqlx::PgPool;

use crate::{error::ApiError, models::user::User};

pub struct UserService;

impl UserService {
    /// Resolve a verified session email to its user row.
    pub async fn require_by_email(pool: &PgPool, email: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, name, created_at FROM users WHERE lower(email) = lower($1)",
        )
        .bind(email)
        .fetch_optional(pool)
        .await?
        .ok_or(ApiError::UserNotFound)
    }
}
