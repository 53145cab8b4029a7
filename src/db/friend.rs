use super::{DBClient, timed};
use crate::models::FriendLink;

const FRIEND_COLUMNS: &str = "id, user_id, friend_id, friend_name, message";

/// Friend link database operations trait
///
/// Links are directional: adding a friend creates one row for the requesting
/// user only, and removal checks ownership.
pub trait FriendExt {
    async fn add_friend(
        &self,
        user_id: i64,
        friend_id: i64,
        friend_name: &str,
        message: Option<&str>,
    ) -> Result<FriendLink, sqlx::Error>;

    /// Delete a link the requesting user owns. Returns the number of rows
    /// removed; zero means the link does not exist or belongs to someone else.
    async fn remove_friend(&self, user_id: i64, link_id: i64) -> Result<u64, sqlx::Error>;

    async fn friends_of(&self, user_id: i64) -> Result<Vec<FriendLink>, sqlx::Error>;
}

impl FriendExt for DBClient {
    async fn add_friend(
        &self,
        user_id: i64,
        friend_id: i64,
        friend_name: &str,
        message: Option<&str>,
    ) -> Result<FriendLink, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO friends (user_id, friend_id, friend_name, message)
            VALUES (?, ?, ?, ?)
            RETURNING {FRIEND_COLUMNS}
            "#
        );

        let link = timed(
            sqlx::query_as::<_, FriendLink>(&query)
                .bind(user_id)
                .bind(friend_id)
                .bind(friend_name)
                .bind(message)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(link)
    }

    async fn remove_friend(&self, user_id: i64, link_id: i64) -> Result<u64, sqlx::Error> {
        let result = timed(
            sqlx::query("DELETE FROM friends WHERE id = ? AND user_id = ?")
                .bind(link_id)
                .bind(user_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn friends_of(&self, user_id: i64) -> Result<Vec<FriendLink>, sqlx::Error> {
        let query = format!("SELECT {FRIEND_COLUMNS} FROM friends WHERE user_id = ? ORDER BY id");

        let links = timed(
            sqlx::query_as::<_, FriendLink>(&query)
                .bind(user_id)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(links)
    }
}
