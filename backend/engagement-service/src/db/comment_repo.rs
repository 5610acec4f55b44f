use crate::models::CommentWithAuthor;
use sqlx::PgPool;
use uuid::Uuid;

/// All comments for a post, newest first, with author usernames resolved.
/// Per-post volume is bounded, so the full list is returned unpaginated.
pub async fn list_comments_by_post(
    pool: &PgPool,
    post_id: Uuid,
) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
    let comments = sqlx::query_as::<_, CommentWithAuthor>(
        r#"
        SELECT c.id, c.post_id, c.user_id, u.username, c.content, c.created_at
        FROM comments c
        JOIN users u ON u.id = c.user_id
        WHERE c.post_id = $1
        ORDER BY c.created_at DESC, c.id DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(pool)
    .await?;

    Ok(comments)
}
