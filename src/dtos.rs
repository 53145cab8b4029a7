use crate::models::{Article, Category, Comment, FriendLink, HealthRecord, Post, User};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

// DTOs define the structure of data exchanged with clients. They are separate
// from the database models so the API controls exactly what gets exposed
// (the User model's password hash, most importantly).

// ============================================================================
// Authentication DTOs
// ============================================================================

/// Signup request. The username is optional; when absent it is derived from
/// the email local-part (everything before the '@').
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    pub username: Option<String>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Filtered user data sent to clients (excludes the password hash)
#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id,
            username: user.username.to_owned(),
            email: user.email.to_owned(),
            role: user.role.to_str().to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponseDto {
    pub status: String,
    pub user: FilterUserDto,
}

// ============================================================================
// Health tracker DTOs
// ============================================================================

/// Daily metrics submission. Every field may be omitted; absent metrics are
/// stored as NULL so older clients that post partial forms keep working.
/// Bounds reject garbage without changing the "absent means null" behavior.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RecordStatsDto {
    #[validate(range(min = 0, max = 100000, message = "calories out of range"))]
    pub calories: Option<i64>,

    #[validate(range(min = 0, max = 1000000, message = "steps out of range"))]
    pub steps: Option<i64>,

    #[validate(range(min = 0, max = 1440, message = "mvpa out of range"))]
    pub mvpa: Option<i64>,

    #[validate(range(min = 0.0, max = 24.0, message = "sleep out of range"))]
    pub sleep: Option<f64>,

    pub date: Option<NaiveDate>,

    pub notes: Option<String>,
}

/// Dashboard stats with zeroed defaults when the user has no records yet.
/// "No data" is never an error on this path.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStatsDto {
    pub calories: i64,
    pub steps: i64,
    pub mvpa: i64,
    pub sleep: f64,
}

impl DashboardStatsDto {
    pub fn from_record(record: Option<HealthRecord>) -> Self {
        match record {
            Some(r) => DashboardStatsDto {
                calories: r.calories.unwrap_or(0),
                steps: r.steps.unwrap_or(0),
                mvpa: r.mvpa.unwrap_or(0),
                sleep: r.sleep.unwrap_or(0.0),
            },
            None => DashboardStatsDto {
                calories: 0,
                steps: 0,
                mvpa: 0,
                sleep: 0.0,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthTrackerResponseDto {
    pub status: String,
    pub user: FilterUserDto,
    pub stats: DashboardStatsDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponseDto {
    pub status: String,
    pub user: FilterUserDto,
    pub health_stats: Vec<HealthRecord>,
    pub friends: Vec<FriendLink>,
}

#[derive(Debug, Deserialize)]
pub struct HealthDataQueryDto {
    pub date: NaiveDate,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SaveNotesDto {
    pub date: NaiveDate,

    #[validate(length(min = 1, message = "Notes text is required"))]
    pub notes: String,
}

/// `{"success": true|false}` shape the calendar page expects.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveNotesResponseDto {
    pub success: bool,
}

// ============================================================================
// Feed DTOs (personal and community)
// ============================================================================

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreatePostDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    /// Server-relative path produced by the upload collaborator; stored opaque.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePostResponseDto {
    pub status: String,
    pub post_id: i64,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AddCommentDto {
    #[validate(length(min = 1, message = "Comment text is required"))]
    pub comment_text: String,

    /// Defaults to the session user's username when absent.
    pub commenter_name: Option<String>,
}

/// One post with its comments attached, newest posts first and comments in
/// the order they were written.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostWithCommentsDto {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedResponseDto {
    pub status: String,
    pub category: Option<Category>,
    pub posts: Vec<PostWithCommentsDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponseDto {
    pub status: String,
    pub likes: i64,
}

// ============================================================================
// Friend DTOs
// ============================================================================

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SearchFriendDto {
    #[validate(length(min = 1, message = "Username query is required"))]
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummaryDto {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchFriendResponseDto {
    pub results: Vec<UserSummaryDto>,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct AddFriendDto {
    pub friend_id: i64,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FriendResponseDto {
    pub status: String,
    pub friend: FriendLink,
}

// ============================================================================
// Article DTOs
// ============================================================================

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct PublishArticleDto {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,

    pub category: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleListResponseDto {
    pub status: String,
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleResponseDto {
    pub status: String,
    pub article: Article,
}

// ============================================================================
// Generic response
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}
