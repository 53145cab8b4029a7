use super::{DBClient, timed};
use crate::dtos::UserSummaryDto;
use crate::models::User;

/// User database operations trait
pub trait UserExt {
    /// Get single user by ID or email.
    /// Returns Option - Some(user) if found, None if not found
    async fn get_user(
        &self,
        user_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error>;

    /// Create new user. The email's UNIQUE constraint surfaces duplicates as
    /// a database unique violation.
    async fn save_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, sqlx::Error>;

    /// Case-insensitive substring search on username, for the friend finder.
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummaryDto>, sqlx::Error>;
}

impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<i64>,
        email: Option<&str>,
    ) -> Result<Option<User>, sqlx::Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = timed(
                sqlx::query_as::<_, User>(
                    "SELECT id, username, email, password, role FROM users WHERE id = ?",
                )
                .bind(user_id)
                .fetch_optional(&self.pool),
            )
            .await?;
        } else if let Some(email) = email {
            user = timed(
                sqlx::query_as::<_, User>(
                    "SELECT id, username, email, password, role FROM users WHERE email = ?",
                )
                .bind(email)
                .fetch_optional(&self.pool),
            )
            .await?;
        }

        Ok(user)
    }

    async fn save_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, sqlx::Error> {
        let user = timed(
            sqlx::query_as::<_, User>(
                r#"
                INSERT INTO users (username, email, password, role)
                VALUES (?, ?, ?, 'user')
                RETURNING id, username, email, password, role
                "#,
            )
            .bind(username)
            .bind(email)
            .bind(password)
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(user)
    }

    async fn search_users(&self, query: &str) -> Result<Vec<UserSummaryDto>, sqlx::Error> {
        let pattern = format!("%{}%", query);

        let users = timed(
            sqlx::query_as::<_, UserSummaryDto>(
                r#"
                SELECT id, username FROM users
                WHERE LOWER(username) LIKE LOWER(?)
                ORDER BY username
                "#,
            )
            .bind(pattern)
            .fetch_all(&self.pool),
        )
        .await?;

        Ok(users)
    }
}
