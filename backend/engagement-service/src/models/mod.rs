/// Data models for engagement-service
///
/// Row types map directly onto the Postgres schema; view types are the
/// response shapes with the author's username resolved at query time.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user row, provisioned by the identity provider and read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A post row with its denormalized engagement counters.
///
/// `like_count` mirrors the number of reaction rows with `liked = true`;
/// `comment_count` mirrors the number of comment rows. Both are mutated only
/// through single-statement atomic updates on the write paths that own them.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// One reaction row per (user, post) pair. Created on the first like, flipped
/// in place afterwards, removed only by cascading post deletion.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub post_id: Uuid,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A comment row. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Flat JOIN row: post columns plus the author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Flat JOIN row: comment columns plus the author's username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentWithAuthor {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Author sub-object embedded in view types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorView {
    pub id: Uuid,
    pub username: String,
}

/// A post as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostView {
    pub id: Uuid,
    pub content: String,
    pub user: AuthorView,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<PostWithAuthor> for PostView {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user: AuthorView {
                id: row.user_id,
                username: row.username,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
        }
    }
}

/// A comment as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub user: AuthorView,
    pub created_at: DateTime<Utc>,
}

impl From<CommentWithAuthor> for CommentView {
    fn from(row: CommentWithAuthor) -> Self {
        Self {
            id: row.id,
            post_id: row.post_id,
            content: row.content,
            user: AuthorView {
                id: row.user_id,
                username: row.username,
            },
            created_at: row.created_at,
        }
    }
}

/// A ranked post in a trending view. `engagement_score` is present only for
/// the engagement strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendingPost {
    pub id: Uuid,
    pub content: String,
    pub user: AuthorView,
    pub like_count: i64,
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,
}

impl From<PostWithAuthor> for TrendingPost {
    fn from(row: PostWithAuthor) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user: AuthorView {
                id: row.user_id,
                username: row.username,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
            created_at: row.created_at,
            engagement_score: None,
        }
    }
}

/// Pagination metadata attached to a feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
    pub has_more: bool,
}

/// One page of the global feed, newest-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<PostView>,
    pub pagination: Pagination,
}

/// Result of a like toggle: the new flag plus the authoritative counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToggleResult {
    pub liked: bool,
    pub like_count: i64,
}

/// Read-only like state for a (user, post) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeStatus {
    pub is_liked: bool,
    pub like_count: i64,
}
