use super::{DBClient, timed};
use crate::models::{Comment, FeedScope, Post};
use chrono::Utc;

const POST_COLUMNS: &str =
    "post_id, user_id, username, title, content, image_url, published_at, likes";
const COMMENT_COLUMNS: &str = "comment_id, post_id, commenter_name, comment_text, comment_date";

/// Result of a like attempt. A duplicate is an expected outcome, not a store
/// failure; the UNIQUE (post_id, user_id) constraint is what detects it.
#[derive(Debug, PartialEq)]
pub enum LikeOutcome {
    Liked { likes: i64 },
    AlreadyLiked,
}

/// Post/comment/like database operations trait
///
/// Every method is parameterized by [`FeedScope`], which selects between the
/// personal-feed tables and the community tables (plus a category filter).
/// The table names come from the scope, never from request input; all values
/// are bound.
pub trait PostExt {
    async fn create_post(
        &self,
        scope: FeedScope,
        user_id: i64,
        username: &str,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post, sqlx::Error>;

    /// Posts in the scope, newest first.
    async fn list_posts(&self, scope: FeedScope) -> Result<Vec<Post>, sqlx::Error>;

    async fn get_post(&self, scope: FeedScope, post_id: i64)
    -> Result<Option<Post>, sqlx::Error>;

    /// Append-only comment insert. The post must exist.
    async fn add_comment(
        &self,
        scope: FeedScope,
        post_id: i64,
        commenter_name: &str,
        comment_text: &str,
    ) -> Result<Comment, sqlx::Error>;

    /// Comments for one post in the order they were written.
    async fn comments_for_post(
        &self,
        scope: FeedScope,
        post_id: i64,
    ) -> Result<Vec<Comment>, sqlx::Error>;

    /// Insert the like row and bump the post's counter as one transaction.
    /// A duplicate (post_id, user_id) pair yields `AlreadyLiked` and leaves
    /// the counter untouched; a missing post yields `RowNotFound` and rolls
    /// the like row back.
    async fn like_post(
        &self,
        scope: FeedScope,
        post_id: i64,
        user_id: i64,
    ) -> Result<LikeOutcome, sqlx::Error>;
}

impl PostExt for DBClient {
    async fn create_post(
        &self,
        scope: FeedScope,
        user_id: i64,
        username: &str,
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Post, sqlx::Error> {
        let posts = scope.posts_table();

        let post = match scope {
            FeedScope::Personal => {
                let query = format!(
                    r#"
                    INSERT INTO {posts} (user_id, username, title, content, image_url, published_at)
                    VALUES (?, ?, ?, ?, ?, ?)
                    RETURNING {POST_COLUMNS}
                    "#
                );

                timed(
                    sqlx::query_as::<_, Post>(&query)
                        .bind(user_id)
                        .bind(username)
                        .bind(title)
                        .bind(content)
                        .bind(image_url)
                        .bind(Utc::now())
                        .fetch_one(&self.pool),
                )
                .await?
            }
            FeedScope::Community(category) => {
                let query = format!(
                    r#"
                    INSERT INTO {posts} (category, user_id, username, title, content, image_url, published_at)
                    VALUES (?, ?, ?, ?, ?, ?, ?)
                    RETURNING {POST_COLUMNS}
                    "#
                );

                timed(
                    sqlx::query_as::<_, Post>(&query)
                        .bind(category)
                        .bind(user_id)
                        .bind(username)
                        .bind(title)
                        .bind(content)
                        .bind(image_url)
                        .bind(Utc::now())
                        .fetch_one(&self.pool),
                )
                .await?
            }
        };

        Ok(post)
    }

    async fn list_posts(&self, scope: FeedScope) -> Result<Vec<Post>, sqlx::Error> {
        let posts_table = scope.posts_table();

        let posts = match scope {
            FeedScope::Personal => {
                let query = format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM {posts_table}
                    ORDER BY published_at DESC, post_id DESC
                    "#
                );

                timed(sqlx::query_as::<_, Post>(&query).fetch_all(&self.pool)).await?
            }
            FeedScope::Community(category) => {
                let query = format!(
                    r#"
                    SELECT {POST_COLUMNS} FROM {posts_table}
                    WHERE category = ?
                    ORDER BY published_at DESC, post_id DESC
                    "#
                );

                timed(
                    sqlx::query_as::<_, Post>(&query)
                        .bind(category)
                        .fetch_all(&self.pool),
                )
                .await?
            }
        };

        Ok(posts)
    }

    async fn get_post(
        &self,
        scope: FeedScope,
        post_id: i64,
    ) -> Result<Option<Post>, sqlx::Error> {
        let posts_table = scope.posts_table();

        // A community lookup must match the category too; a post reached
        // through the wrong community URL is a miss, not a hit.
        let post = match scope {
            FeedScope::Personal => {
                let query = format!("SELECT {POST_COLUMNS} FROM {posts_table} WHERE post_id = ?");

                timed(
                    sqlx::query_as::<_, Post>(&query)
                        .bind(post_id)
                        .fetch_optional(&self.pool),
                )
                .await?
            }
            FeedScope::Community(category) => {
                let query = format!(
                    "SELECT {POST_COLUMNS} FROM {posts_table} WHERE post_id = ? AND category = ?"
                );

                timed(
                    sqlx::query_as::<_, Post>(&query)
                        .bind(post_id)
                        .bind(category)
                        .fetch_optional(&self.pool),
                )
                .await?
            }
        };

        Ok(post)
    }

    async fn add_comment(
        &self,
        scope: FeedScope,
        post_id: i64,
        commenter_name: &str,
        comment_text: &str,
    ) -> Result<Comment, sqlx::Error> {
        let comments = scope.comments_table();

        let comment = match scope {
            FeedScope::Personal => {
                let query = format!(
                    r#"
                    INSERT INTO {comments} (post_id, commenter_name, comment_text, comment_date)
                    VALUES (?, ?, ?, ?)
                    RETURNING {COMMENT_COLUMNS}
                    "#
                );

                timed(
                    sqlx::query_as::<_, Comment>(&query)
                        .bind(post_id)
                        .bind(commenter_name)
                        .bind(comment_text)
                        .bind(Utc::now())
                        .fetch_one(&self.pool),
                )
                .await?
            }
            FeedScope::Community(category) => {
                let query = format!(
                    r#"
                    INSERT INTO {comments} (post_id, category, commenter_name, comment_text, comment_date)
                    VALUES (?, ?, ?, ?, ?)
                    RETURNING {COMMENT_COLUMNS}
                    "#
                );

                timed(
                    sqlx::query_as::<_, Comment>(&query)
                        .bind(post_id)
                        .bind(category)
                        .bind(commenter_name)
                        .bind(comment_text)
                        .bind(Utc::now())
                        .fetch_one(&self.pool),
                )
                .await?
            }
        };

        Ok(comment)
    }

    async fn comments_for_post(
        &self,
        scope: FeedScope,
        post_id: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let comments_table = scope.comments_table();
        let query = format!(
            r#"
            SELECT {COMMENT_COLUMNS} FROM {comments_table}
            WHERE post_id = ?
            ORDER BY comment_date ASC, comment_id ASC
            "#
        );

        let comments = timed(
            sqlx::query_as::<_, Comment>(&query)
                .bind(post_id)
                .fetch_all(&self.pool),
        )
        .await?;

        Ok(comments)
    }

    async fn like_post(
        &self,
        scope: FeedScope,
        post_id: i64,
        user_id: i64,
    ) -> Result<LikeOutcome, sqlx::Error> {
        let likes_table = scope.likes_table();
        let posts_table = scope.posts_table();

        let insert_like = format!("INSERT INTO {likes_table} (post_id, user_id) VALUES (?, ?)");
        // The counter update carries the category filter for community
        // scopes, so a like through the wrong community URL matches no row
        // and rolls back as not-found.
        let bump_counter = match scope {
            FeedScope::Personal => format!(
                "UPDATE {posts_table} SET likes = likes + 1 WHERE post_id = ? RETURNING likes"
            ),
            FeedScope::Community(_) => format!(
                "UPDATE {posts_table} SET likes = likes + 1 WHERE post_id = ? AND category = ? RETURNING likes"
            ),
        };

        timed(async {
            let mut tx = self.pool.begin().await?;

            let inserted = sqlx::query(&insert_like)
                .bind(post_id)
                .bind(user_id)
                .execute(&mut *tx)
                .await;

            if let Err(e) = inserted {
                // Constraint violation means this user already liked the
                // post; everything else is a real store failure.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        tx.rollback().await?;
                        return Ok(LikeOutcome::AlreadyLiked);
                    }
                }
                return Err(e);
            }

            // Counter update failing to match a row means the post does not
            // exist in this scope; roll the like row back rather than leave
            // it orphaned.
            let mut bump = sqlx::query_scalar(&bump_counter).bind(post_id);
            if let FeedScope::Community(category) = scope {
                bump = bump.bind(category);
            }
            let likes: Option<i64> = bump.fetch_optional(&mut *tx).await?;

            let Some(likes) = likes else {
                tx.rollback().await?;
                return Err(sqlx::Error::RowNotFound);
            };

            tx.commit().await?;
            Ok(LikeOutcome::Liked { likes })
        })
        .await
    }
}
