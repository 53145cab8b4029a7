use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User role enumeration for role-based access control (RBAC)
///
/// Stored in the `users.role` TEXT column as "admin" / "user".
/// `sqlx::Type` with `rename_all = "lowercase"` handles the mapping.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin, // Full system access (publish/delete articles)
    User,  // Standard user permissions
}

impl UserRole {
    pub fn to_str(&self) -> &str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

/// The six fixed topical categories shared by community feeds and articles.
///
/// Wire/database representation is the kebab-case slug ("physical-health", ...).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    PhysicalHealth,
    Fitness,
    GeneralDisease,
    HumanBody,
    Medicine,
    MentalHealth,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PhysicalHealth => "physical-health",
            Category::Fitness => "fitness",
            Category::GeneralDisease => "general-disease",
            Category::HumanBody => "human-body",
            Category::Medicine => "medicine",
            Category::MentalHealth => "mental-health",
        }
    }
}

impl FromStr for Category {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical-health" => Ok(Category::PhysicalHealth),
            "fitness" => Ok(Category::Fitness),
            "general-disease" => Ok(Category::GeneralDisease),
            "human-body" => Ok(Category::HumanBody),
            "medicine" => Ok(Category::Medicine),
            "mental-health" => Ok(Category::MentalHealth),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which feed a post/comment/like operation targets.
///
/// The personal feed and the six community feeds share one schema shape and
/// one set of queries; the scope picks the table family and, for communities,
/// the category the rows are filtered by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedScope {
    Personal,
    Community(Category),
}

impl FeedScope {
    pub fn posts_table(&self) -> &'static str {
        match self {
            FeedScope::Personal => "posts",
            FeedScope::Community(_) => "community_posts",
        }
    }

    pub fn comments_table(&self) -> &'static str {
        match self {
            FeedScope::Personal => "comments",
            FeedScope::Community(_) => "community_comments",
        }
    }

    pub fn likes_table(&self) -> &'static str {
        match self {
            FeedScope::Personal => "likes",
            FeedScope::Community(_) => "community_likes",
        }
    }
}

/// User model mapping the `users` table.
///
/// `password` holds the argon2 hash, never clear text.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Server-side session state, referenced by the opaque cookie-held token.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
}

/// One daily metrics row in `health_stats`.
///
/// Rows are append-only: a date can have several rows and the most recently
/// inserted one wins for "latest" reads. Absent metrics are stored as NULL,
/// and the submission form may omit the date entirely.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct HealthRecord {
    pub id: i64,
    pub user_id: i64,
    pub calories: Option<i64>,
    pub steps: Option<i64>,
    pub mvpa: Option<i64>, // active minutes (moderate-to-vigorous physical activity)
    pub sleep: Option<f64>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A post in the personal feed or one of the community feeds.
///
/// `username` is denormalized at creation time. `likes` is a counter kept
/// equal to the number of like rows for the post; the like tables' UNIQUE
/// (post_id, user_id) constraint is what keeps it honest under races.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Post {
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub likes: i64,
}

/// Append-only comment on a post. No edit or delete exists.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Comment {
    pub comment_id: i64,
    pub post_id: i64,
    pub commenter_name: String,
    pub comment_text: String,
    pub comment_date: DateTime<Utc>,
}

/// Directional friend link (user_id -> friend_id). Self-links are permitted.
///
/// `friend_name` is the friend's username captured at link time; `message` is
/// a free-text display note.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct FriendLink {
    pub id: i64,
    pub user_id: i64,
    pub friend_id: i64,
    pub friend_name: String,
    pub message: Option<String>,
}

/// Admin-authored educational article scoped to a category.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: Category,
    pub published_at: DateTime<Utc>,
}
