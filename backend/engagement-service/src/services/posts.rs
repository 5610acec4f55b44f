/// Post service - handles post creation, retrieval, and pagination queries
use crate::cache::EngagementCache;
use crate::db::{post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::models::PostView;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Longest post body accepted, in characters.
pub const MAX_POST_LEN: usize = 280;

pub struct PostService {
    pool: PgPool,
    cache: Option<Arc<EngagementCache>>,
}

impl PostService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(pool: PgPool, cache: Arc<EngagementCache>) -> Self {
        Self {
            pool,
            cache: Some(cache),
        }
    }

    fn cache(&self) -> Option<&Arc<EngagementCache>> {
        self.cache.as_ref()
    }

    /// Create a new post with zeroed counters.
    ///
    /// An author id that does not resolve to a known user is a validation
    /// failure, not a missing resource: the id came from the caller's own
    /// request context.
    pub async fn create_post(&self, author_id: Uuid, text: &str) -> Result<PostView> {
        let text = validate_post_text(text)?;

        let author = user_repo::find_user_by_id(&self.pool, author_id)
            .await?
            .ok_or_else(|| {
                AppError::ValidationError("author does not resolve to a known user".to_string())
            })?;

        let post = post_repo::create_post(&self.pool, author_id, text).await?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        Ok(PostView {
            id: post.id,
            content: post.content,
            user: crate::models::AuthorView {
                id: author.id,
                username: author.username,
            },
            like_count: post.like_count,
            comment_count: post.comment_count,
            created_at: post.created_at,
        })
    }

    /// Get a post by ID with the author resolved
    pub async fn get_post(&self, post_id: Uuid) -> Result<Option<PostView>> {
        if let Some(cache) = self.cache() {
            match cache.get_post(post_id).await {
                Ok(Some(cached)) => return Ok(Some(cached)),
                Ok(None) => {}
                Err(err) => tracing::debug!(%post_id, "post cache read failed: {}", err),
            }
        }

        let post = post_repo::find_post_with_author(&self.pool, post_id)
            .await?
            .map(PostView::from);

        if let (Some(cache), Some(post)) = (self.cache(), &post) {
            if let Err(err) = cache.cache_post(post).await {
                tracing::debug!(%post_id, "post cache set failed: {}", err);
            }
        }

        Ok(post)
    }

    /// One page of the global feed, newest first, plus the total post count.
    ///
    /// An out-of-range page returns an empty sequence, not an error.
    pub async fn get_posts_page(&self, page: i64, limit: i64) -> Result<(Vec<PostView>, i64)> {
        let offset = page_offset(page, limit)?;

        let posts = post_repo::find_posts_page(&self.pool, limit, offset).await?;
        let total = post_repo::count_posts(&self.pool).await?;

        Ok((posts.into_iter().map(PostView::from).collect(), total))
    }

    /// One page of a single user's posts, newest first, plus their total.
    pub async fn get_user_posts(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<PostView>, i64)> {
        let offset = page_offset(page, limit)?;

        let posts = post_repo::find_posts_by_user(&self.pool, user_id, limit, offset).await?;
        let total = post_repo::count_posts_by_user(&self.pool, user_id).await?;

        Ok((posts.into_iter().map(PostView::from).collect(), total))
    }
}

/// Trim and bound-check a post body.
pub(crate) fn validate_post_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            "post text must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_POST_LEN {
        return Err(AppError::ValidationError(format!(
            "post text exceeds {} characters",
            MAX_POST_LEN
        )));
    }
    Ok(trimmed)
}

/// Offset for 1-based page numbers; non-positive page or limit is rejected.
pub(crate) fn page_offset(page: i64, limit: i64) -> Result<i64> {
    if page < 1 {
        return Err(AppError::ValidationError(
            "page must be at least 1".to_string(),
        ));
    }
    if limit < 1 {
        return Err(AppError::ValidationError(
            "limit must be positive".to_string(),
        ));
    }
    Ok((page - 1) * limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace_text() {
        assert!(matches!(
            validate_post_text(""),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            validate_post_text("   \n\t  "),
            Err(AppError::ValidationError(_))
        ));
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_post_text("  hello  ").unwrap(), "hello");
    }

    #[test]
    fn rejects_oversized_text() {
        let long = "a".repeat(MAX_POST_LEN + 1);
        assert!(matches!(
            validate_post_text(&long),
            Err(AppError::ValidationError(_))
        ));

        let max = "a".repeat(MAX_POST_LEN);
        assert!(validate_post_text(&max).is_ok());
    }

    #[test]
    fn page_offset_math() {
        assert_eq!(page_offset(1, 15).unwrap(), 0);
        assert_eq!(page_offset(2, 15).unwrap(), 15);
        assert_eq!(page_offset(3, 7).unwrap(), 14);
    }

    #[test]
    fn page_offset_rejects_non_positive_inputs() {
        assert!(page_offset(0, 15).is_err());
        assert!(page_offset(-1, 15).is_err());
        assert!(page_offset(1, 0).is_err());
        assert!(page_offset(1, -5).is_err());
    }
}
