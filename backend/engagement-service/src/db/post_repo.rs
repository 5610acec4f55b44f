use crate::models::{Post, PostWithAuthor};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Create a new post with zeroed counters
/// Returns the created post
pub async fn create_post(
    pool: &PgPool,
    user_id: Uuid,
    content: &str,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (user_id, content)
        VALUES ($1, $2)
        RETURNING id, user_id, content, like_count, comment_count, created_at
        "#,
    )
    .bind(user_id)
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID
pub async fn find_post_by_id(pool: &PgPool, post_id: Uuid) -> Result<Option<Post>, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        SELECT id, user_id, content, like_count, comment_count, created_at
        FROM posts
        WHERE id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Find a post by ID with the author's username resolved
pub async fn find_post_with_author(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Option<PostWithAuthor>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.id = $1
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// One page of the global feed, newest first, id as the stable tie-break
pub async fn find_posts_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count all posts
pub async fn count_posts(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Find all posts by a user, newest first
pub async fn find_posts_by_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        WHERE p.user_id = $1
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Count total posts for a user
pub async fn count_posts_by_user(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Top posts by like count, creation date then id as tie-breaks
pub async fn top_posts_by_likes(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.like_count DESC, p.created_at DESC, p.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Top posts by comment count, creation date then id as tie-breaks
pub async fn top_posts_by_comments(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.comment_count DESC, p.created_at DESC, p.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Newest-N candidate window for engagement scoring
pub async fn recent_posts_with_authors(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<PostWithAuthor>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostWithAuthor>(
        r#"
        SELECT p.id, p.user_id, u.username, p.content, p.like_count, p.comment_count, p.created_at
        FROM posts p
        JOIN users u ON u.id = p.user_id
        ORDER BY p.created_at DESC, p.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}
