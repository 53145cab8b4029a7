use super::{DBClient, timed};
use crate::models::{Session, User};
use chrono::Utc;
use uuid::Uuid;

/// Session database operations trait
///
/// Sessions are server-side rows keyed by an opaque uuid token; the client
/// only ever holds the token in a cookie. Destroying the row is what logs a
/// user out, regardless of what the client keeps.
pub trait SessionExt {
    /// Create a session row for the user and return it (token included).
    async fn create_session(&self, user_id: i64) -> Result<Session, sqlx::Error>;

    /// Resolve a cookie token to the user it belongs to, in one lookup.
    /// Returns None for unknown or destroyed sessions.
    async fn get_session_user(&self, token: &str) -> Result<Option<User>, sqlx::Error>;

    /// Invalidate the session server-side.
    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error>;
}

impl SessionExt for DBClient {
    async fn create_session(&self, user_id: i64) -> Result<Session, sqlx::Error> {
        let token = Uuid::new_v4().to_string();

        let session = timed(
            sqlx::query_as::<_, Session>(
                r#"
                INSERT INTO sessions (token, user_id, created_at)
                VALUES (?, ?, ?)
                RETURNING token, user_id, created_at
                "#,
            )
            .bind(&token)
            .bind(user_id)
            .bind(Utc::now())
            .fetch_one(&self.pool),
        )
        .await?;

        Ok(session)
    }

    async fn get_session_user(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        let user = timed(
            sqlx::query_as::<_, User>(
                r#"
                SELECT u.id, u.username, u.email, u.password, u.role
                FROM sessions s
                INNER JOIN users u ON s.user_id = u.id
                WHERE s.token = ?
                "#,
            )
            .bind(token)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(user)
    }

    async fn delete_session(&self, token: &str) -> Result<(), sqlx::Error> {
        timed(
            sqlx::query("DELETE FROM sessions WHERE token = ?")
                .bind(token)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }
}
