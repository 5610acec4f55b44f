/// Comment service - handles comment creation and retrieval
use crate::cache::EngagementCache;
use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::{AuthorView, Comment, CommentView};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Longest comment body accepted, in characters.
pub const MAX_COMMENT_LEN: usize = 500;

pub struct CommentService {
    pool: PgPool,
    cache: Option<Arc<EngagementCache>>,
}

impl CommentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<EngagementCache>) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    /// Create a comment on a post and bump the post's comment counter.
    ///
    /// Insert and counter update share one transaction: a comment must never
    /// exist without the counter reflecting it, and vice versa.
    pub async fn add_comment(
        &self,
        user_id: Uuid,
        post_id: Uuid,
        text: &str,
    ) -> Result<CommentView> {
        let text = validate_comment_text(text)?;

        let author = user_repo::find_user_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        post_repo::find_post_by_id(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("post not found".to_string()))?;

        let mut tx = self.pool.begin().await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (post_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, user_id, content, created_at
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(
            r#"
            UPDATE posts
            SET comment_count = comment_count + 1
            WHERE id = $1
            "#,
        )
        .bind(post_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            // Post vanished between the existence check and the insert; the
            // dropped transaction rolls the comment back.
            return Err(AppError::NotFound("post not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(comment_id = %comment.id, %post_id, %user_id, "comment added");

        if let Some(cache) = &self.cache {
            if let Err(err) = cache.invalidate_post(post_id).await {
                tracing::debug!(%post_id, "post cache invalidation failed: {}", err);
            }
        }

        Ok(CommentView {
            id: comment.id,
            post_id: comment.post_id,
            content: comment.content,
            user: AuthorView {
                id: author.id,
                username: author.username,
            },
            created_at: comment.created_at,
        })
    }

    /// All comments for a post, newest first, author usernames resolved.
    ///
    /// A missing or deleted post yields an empty list, not an error.
    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<CommentView>> {
        let comments = comment_repo::list_comments_by_post(&self.pool, post_id).await?;
        Ok(comments.into_iter().map(CommentView::from).collect())
    }
}

/// Trim and bound-check a comment body.
pub(crate) fn validate_comment_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "comment text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::ValidationError(format!(
            "comment text exceeds {} characters",
            MAX_COMMENT_LEN
        )));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_comment() {
        assert!(matches!(
            validate_comment_text("  "),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn accepts_and_trims_comment() {
        assert_eq!(validate_comment_text(" nice post ").unwrap(), "nice post");
    }

    #[test]
    fn enforces_comment_length_cap() {
        let long = "x".repeat(MAX_COMMENT_LEN + 1);
        assert!(validate_comment_text(&long).is_err());
    }
}
