use sqlx::{Pool, Sqlite};
use std::future::Future;
use std::time::Duration;

mod user;
pub use user::UserExt;

mod session;
pub use session::SessionExt;

mod health;
pub use health::HealthExt;

mod post;
pub use post::{LikeOutcome, PostExt};

mod friend;
pub use friend::FriendExt;

mod article;
pub use article::ArticleExt;

/// Upper bound on any single store operation. The underlying driver has no
/// cancellation semantics of its own, so exceeding this maps to a store error
/// (500) instead of hanging the request.
const STORE_TIMEOUT: Duration = Duration::from_secs(5);

pub(crate) async fn timed<T>(
    fut: impl Future<Output = Result<T, sqlx::Error>>,
) -> Result<T, sqlx::Error> {
    match tokio::time::timeout(STORE_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(sqlx::Error::PoolTimedOut),
    }
}

#[derive(Debug, Clone)]
pub struct DBClient {
    pool: Pool<Sqlite>,
}

impl DBClient {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        DBClient { pool }
    }

    /// Create every table the application needs. All statements are
    /// idempotent; additive migrations that can legitimately fail on an
    /// already-migrated file (duplicate column) are swallowed and logged,
    /// never surfaced to the caller.
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        let statements = [
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT,
                email TEXT UNIQUE,
                password TEXT,
                role TEXT DEFAULT 'user'
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                token TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS health_stats (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                calories INTEGER,
                steps INTEGER,
                mvpa INTEGER,
                sleep REAL,
                date TEXT,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS friends (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                friend_id INTEGER,
                friend_name TEXT,
                message TEXT,
                FOREIGN KEY (user_id) REFERENCES users(id),
                FOREIGN KEY (friend_id) REFERENCES users(id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS articles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT NOT NULL,
                published_at TEXT NOT NULL
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                post_id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                image_url TEXT,
                published_at TEXT NOT NULL,
                likes INTEGER DEFAULT 0
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                commenter_name TEXT NOT NULL,
                comment_text TEXT NOT NULL,
                comment_date TEXT NOT NULL,
                FOREIGN KEY (post_id) REFERENCES posts(post_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER,
                user_id INTEGER,
                UNIQUE (post_id, user_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS community_posts (
                post_id INTEGER PRIMARY KEY AUTOINCREMENT,
                category TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                username TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                image_url TEXT,
                published_at TEXT NOT NULL,
                likes INTEGER DEFAULT 0
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS community_comments (
                comment_id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                commenter_name TEXT NOT NULL,
                comment_text TEXT NOT NULL,
                comment_date TEXT NOT NULL,
                FOREIGN KEY (post_id) REFERENCES community_posts(post_id)
            )
            "#,
            r#"
            CREATE TABLE IF NOT EXISTS community_likes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id INTEGER,
                user_id INTEGER,
                UNIQUE (post_id, user_id)
            )
            "#,
        ];

        for statement in statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        // The notes column was added after the first release. On a database
        // file that already has it, SQLite reports a duplicate column; that
        // is expected and must not fail startup.
        if let Err(e) = sqlx::query("ALTER TABLE health_stats ADD COLUMN notes TEXT")
            .execute(&self.pool)
            .await
        {
            tracing::debug!("Skipping notes column migration: {}", e);
        }

        Ok(())
    }
}
